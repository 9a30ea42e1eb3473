//! In-memory representation of bundle modules.

use crate::{APEX_DIRECTORY, ApexImages, AppManifest, BASE_MODULE_NAME, MANIFEST_PATH};
use std::collections::BTreeSet;

/// A named module of a bundle.
///
/// The file set is fixed when the module is built and never changes
/// afterwards. Paths are relative to the module root and use `/` separators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleModule {
    name: String,
    manifest: Option<AppManifest>,
    apex_config: Option<ApexImages>,
    files: BTreeSet<String>,
}

impl BundleModule {
    /// Module name, unique within a bundle.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Application manifest, if the module declares one.
    #[must_use]
    pub fn manifest(&self) -> Option<&AppManifest> {
        self.manifest.as_ref()
    }

    /// Image targeting config; present only for APEX modules.
    #[must_use]
    pub fn apex_config(&self) -> Option<&ApexImages> {
        self.apex_config.as_ref()
    }

    /// Whether this module belongs to the APEX (system image) family.
    #[must_use]
    pub fn is_apex(&self) -> bool {
        self.apex_config.is_some()
    }

    /// Whether this is the base module.
    #[must_use]
    pub fn is_base(&self) -> bool {
        self.name == BASE_MODULE_NAME
    }

    /// All file paths of the module, sorted.
    #[must_use]
    pub fn files(&self) -> &BTreeSet<String> {
        &self.files
    }

    /// Check if a file exists in the module.
    #[must_use]
    pub fn has_file(&self, path: &str) -> bool {
        self.files.contains(path)
    }

    /// Iterate over files located under `directory` (at any depth).
    pub fn files_under<'a>(&'a self, directory: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.files
            .iter()
            .map(String::as_str)
            .filter(move |path| is_under(path, directory))
    }
}

/// Whether `path` lies inside `directory`.
pub(crate) fn is_under(path: &str, directory: &str) -> bool {
    path.strip_prefix(directory)
        .is_some_and(|rest| rest.starts_with('/') && rest.len() > 1)
}

/// Whether `path` lies inside the APEX image directory.
pub(crate) fn is_apex_image_path(path: &str) -> bool {
    is_under(path, APEX_DIRECTORY)
}

/// Builder for [`BundleModule`].
///
/// # Example
///
/// ```
/// use apkdeploy_bundle::{Abi, ApexImages, AppManifest, ModuleBuilder};
///
/// let module = ModuleBuilder::new("base")
///     .set_manifest(AppManifest::new("com.example.app"))
///     .set_apex_config(ApexImages::new().with_image("apex/x86.img", &[Abi::X86]))
///     .add_file("root/manifest.json")
///     .add_file("apex/x86.img")
///     .build();
///
/// assert!(module.is_apex());
/// assert!(module.has_file("manifest/AndroidManifest.json"));
/// ```
#[derive(Debug, Clone)]
pub struct ModuleBuilder {
    name: String,
    manifest: Option<AppManifest>,
    apex_config: Option<ApexImages>,
    files: BTreeSet<String>,
}

impl ModuleBuilder {
    /// Start building a module with the given name.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            manifest: None,
            apex_config: None,
            files: BTreeSet::new(),
        }
    }

    /// Set the application manifest. The manifest file joins the file set.
    #[must_use]
    pub fn set_manifest(mut self, manifest: AppManifest) -> Self {
        self.manifest = Some(manifest);
        self.files.insert(MANIFEST_PATH.to_string());
        self
    }

    /// Set the image targeting config, marking the module as APEX.
    #[must_use]
    pub fn set_apex_config(mut self, config: ApexImages) -> Self {
        self.apex_config = Some(config);
        self
    }

    /// Add a file path to the module.
    #[must_use]
    pub fn add_file(mut self, path: &str) -> Self {
        self.files.insert(path.to_string());
        self
    }

    /// Finish the module.
    #[must_use]
    pub fn build(self) -> BundleModule {
        BundleModule {
            name: self.name,
            manifest: self.manifest,
            apex_config: self.apex_config,
            files: self.files,
        }
    }
}

/// An immutable, ordered collection of modules plus top-level metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bundle {
    modules: Vec<BundleModule>,
    metadata_files: Vec<String>,
}

impl Bundle {
    /// Create a bundle from modules and top-level metadata file paths.
    #[must_use]
    pub fn new(modules: Vec<BundleModule>, metadata_files: Vec<String>) -> Self {
        Self {
            modules,
            metadata_files,
        }
    }

    /// Modules in bundle order.
    #[must_use]
    pub fn modules(&self) -> &[BundleModule] {
        &self.modules
    }

    /// Look up a module by name.
    #[must_use]
    pub fn module(&self, name: &str) -> Option<&BundleModule> {
        self.modules.iter().find(|module| module.name() == name)
    }

    /// The base module, if the bundle has one.
    #[must_use]
    pub fn base_module(&self) -> Option<&BundleModule> {
        self.module(BASE_MODULE_NAME)
    }

    /// Paths of files stored outside any module (e.g. `BUNDLE-METADATA/...`).
    #[must_use]
    pub fn metadata_files(&self) -> &[String] {
        &self.metadata_files
    }

    /// Whether this is an APEX bundle.
    #[must_use]
    pub fn is_apex(&self) -> bool {
        self.modules.iter().any(BundleModule::is_apex)
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::Abi;

    #[test]
    fn ModuleBuilder___set_manifest___adds_manifest_file() {
        let module = ModuleBuilder::new("base")
            .set_manifest(AppManifest::new("com.test.app"))
            .build();

        assert!(module.has_file(MANIFEST_PATH));
        assert_eq!(module.manifest().unwrap().package, "com.test.app");
        assert!(!module.is_apex());
    }

    #[test]
    fn BundleModule___files_under___matches_directory_only() {
        let module = ModuleBuilder::new("base")
            .add_file("apex/x86.img")
            .add_file("apex/nested/x86_64.img")
            .add_file("apexfile.txt")
            .add_file("root/manifest.json")
            .build();

        let under: Vec<&str> = module.files_under("apex").collect();

        assert_eq!(under, vec!["apex/nested/x86_64.img", "apex/x86.img"]);
    }

    #[test]
    fn is_under___rejects_prefix_without_separator() {
        assert!(is_under("apex/x86.img", "apex"));
        assert!(!is_under("apex", "apex"));
        assert!(!is_under("apex/", "apex"));
        assert!(!is_under("apexes/x86.img", "apex"));
    }

    #[test]
    fn Bundle___base_module___finds_module_by_name() {
        let bundle = Bundle::new(
            vec![
                ModuleBuilder::new("feature").build(),
                ModuleBuilder::new("base").build(),
            ],
            Vec::new(),
        );

        assert_eq!(bundle.base_module().unwrap().name(), "base");
        assert!(bundle.module("missing").is_none());
    }

    #[test]
    fn Bundle___is_apex___true_when_any_module_has_config() {
        let bundle = Bundle::new(
            vec![
                ModuleBuilder::new("base")
                    .set_apex_config(ApexImages::new().with_image("apex/x86.img", &[Abi::X86]))
                    .build(),
            ],
            Vec::new(),
        );

        assert!(bundle.is_apex());
    }
}
