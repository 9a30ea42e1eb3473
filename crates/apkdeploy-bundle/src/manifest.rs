//! Manifest and targeting metadata carried by bundle modules.

use crate::{Abi, BundleResult};
use serde::{Deserialize, Serialize};

/// Application manifest of a module.
///
/// This corresponds to `manifest/AndroidManifest.json` inside each module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppManifest {
    /// Application package name (e.g., "com.example.app").
    pub package: String,

    /// Version code of the application.
    #[serde(default)]
    pub version_code: u64,

    /// Minimum SDK level the module supports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_sdk: Option<u32>,
}

impl AppManifest {
    /// Create a manifest for the given package.
    #[must_use]
    pub fn new(package: &str) -> Self {
        Self {
            package: package.to_string(),
            version_code: 1,
            min_sdk: None,
        }
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> BundleResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> BundleResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Targeting config of an APEX module: which image serves which ABIs.
///
/// This corresponds to `apex_images.json` inside the module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApexImages {
    /// Targeted images, in declaration order.
    #[serde(default)]
    pub images: Vec<TargetedApexImage>,
}

/// A single image file and the targeting it was built for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetedApexImage {
    /// Path of the image, relative to the module root (e.g., "apex/x86_64.img").
    pub path: String,

    /// Targeting dimension of the image.
    #[serde(default)]
    pub targeting: ApexImageTargeting,
}

/// Device-targeting dimension of an APEX image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApexImageTargeting {
    /// ABIs the image runs on. Multi-ABI images list several.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub abis: Vec<Abi>,
}

impl ApexImages {
    /// Create an empty targeting config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an image targeting the given ABIs.
    #[must_use]
    pub fn with_image(mut self, path: &str, abis: &[Abi]) -> Self {
        self.images.push(TargetedApexImage {
            path: path.to_string(),
            targeting: ApexImageTargeting {
                abis: abis.to_vec(),
            },
        });
        self
    }

    /// Iterate over the targeted image paths.
    pub fn image_paths(&self) -> impl Iterator<Item = &str> {
        self.images.iter().map(|image| image.path.as_str())
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> BundleResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> BundleResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
