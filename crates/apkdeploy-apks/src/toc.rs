//! The `toc.json` table of contents of an APK set.

use crate::{ApksError, ApksResult, BASE_MODULE_NAME};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Component, Path};

/// Table of contents describing every APK in the set.
///
/// # Example JSON
///
/// ```json
/// {
///   "package_name": "com.example.app",
///   "variants": [
///     {
///       "variant_number": 0,
///       "targeting": { "min_sdk": 21 },
///       "apk_sets": [
///         {
///           "module_name": "base",
///           "apks": [
///             { "path": "splits/base-master.apk", "kind": "master" },
///             { "path": "splits/base-arm64_v8a.apk", "kind": "split",
///               "targeting": { "abi": "arm64-v8a" } }
///           ]
///         }
///       ]
///     }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildApksResult {
    pub package_name: String,
    pub variants: Vec<Variant>,
}

/// A group of APK sets serving one device class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    #[serde(default)]
    pub variant_number: u32,

    #[serde(default)]
    pub targeting: VariantTargeting,

    pub apk_sets: Vec<ApkSet>,
}

/// Device requirements of a variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantTargeting {
    /// Lowest SDK level served.
    #[serde(default)]
    pub min_sdk: u32,

    /// ABIs served; empty means any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub abis: Vec<String>,
}

/// The APKs of one module within a variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApkSet {
    pub module_name: String,
    pub apks: Vec<ApkDescription>,
}

/// One APK file in the set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApkDescription {
    /// Path relative to the APK set root.
    pub path: String,

    #[serde(default)]
    pub kind: ApkKind,

    #[serde(default)]
    pub targeting: ApkTargeting,

    /// Optional checksum, `sha256:<hex>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

/// Role of an APK within its module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApkKind {
    /// Module code and resources needed on every device.
    #[default]
    Master,
    /// Configuration split selected by targeting.
    Split,
    /// Complete single APK for devices that cannot install splits.
    Standalone,
}

/// Configuration dimensions of a split APK.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApkTargeting {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abi: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_density: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl BuildApksResult {
    /// Parse from JSON.
    pub fn from_json(json: &str) -> ApksResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> ApksResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check structural invariants; `exists` reports whether a listed path is
    /// present in the archive.
    pub fn validate<F>(&self, exists: F) -> ApksResult<()>
    where
        F: Fn(&str) -> bool,
    {
        if self.package_name.trim().is_empty() {
            return Err(invalid("package_name is empty"));
        }
        if self.variants.is_empty() {
            return Err(invalid("the APK set contains no variants"));
        }

        for variant in &self.variants {
            variant.validate(&exists)?;
        }
        Ok(())
    }
}

impl Variant {
    /// Whether this variant serves devices that cannot install splits.
    #[must_use]
    pub fn is_standalone(&self) -> bool {
        self.apk_sets
            .iter()
            .flat_map(|set| &set.apks)
            .any(|apk| apk.kind == ApkKind::Standalone)
    }

    /// The APK set of `module`, if present.
    #[must_use]
    pub fn apk_set(&self, module: &str) -> Option<&ApkSet> {
        self.apk_sets.iter().find(|set| set.module_name == module)
    }

    /// Names of the modules delivered by this variant.
    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.apk_sets.iter().map(|set| set.module_name.as_str())
    }

    fn validate<F>(&self, exists: &F) -> ApksResult<()>
    where
        F: Fn(&str) -> bool,
    {
        let number = self.variant_number;
        if self.apk_set(BASE_MODULE_NAME).is_none() {
            return Err(invalid(format!(
                "variant {number} has no '{BASE_MODULE_NAME}' module"
            )));
        }

        let mut seen = BTreeSet::new();
        for set in &self.apk_sets {
            if !seen.insert(set.module_name.as_str()) {
                return Err(invalid(format!(
                    "variant {number} lists module '{}' twice",
                    set.module_name
                )));
            }
            if set.apks.is_empty() {
                return Err(invalid(format!(
                    "module '{}' in variant {number} has no APKs",
                    set.module_name
                )));
            }

            let standalone = set.apks.iter().any(|apk| apk.kind == ApkKind::Standalone);
            let masters = set
                .apks
                .iter()
                .filter(|apk| apk.kind == ApkKind::Master)
                .count();
            if standalone && set.apks.iter().any(|apk| apk.kind != ApkKind::Standalone) {
                return Err(invalid(format!(
                    "module '{}' in variant {number} mixes standalone and split APKs",
                    set.module_name
                )));
            }
            if !standalone && masters != 1 {
                return Err(invalid(format!(
                    "module '{}' in variant {number} must have exactly one master APK, found {masters}",
                    set.module_name
                )));
            }

            for apk in &set.apks {
                check_path(&apk.path)?;
                if !exists(apk.path.as_str()) {
                    return Err(ApksError::MissingFile(apk.path.clone()));
                }
            }
        }
        Ok(())
    }
}

/// Reject paths that could escape the APK set root.
fn check_path(path: &str) -> ApksResult<()> {
    let relative = !path.is_empty()
        && Path::new(path)
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
    if relative {
        Ok(())
    } else {
        Err(invalid(format!(
            "APK path '{path}' must be relative and stay inside the APK set"
        )))
    }
}

fn invalid(message: impl Into<String>) -> ApksError {
    ApksError::InvalidApkSet(message.into())
}
