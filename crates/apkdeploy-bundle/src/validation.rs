//! Structural validation of bundle modules.
//!
//! Validation is a fixed, ordered list of pure rules. Module rules look at one
//! module's file set and targeting metadata; bundle rules look at the whole
//! collection of modules. The first violated rule is reported.
//!
//! # Example
//!
//! ```
//! use apkdeploy_bundle::validation::validate_module;
//! use apkdeploy_bundle::{Abi, ApexImages, AppManifest, ModuleBuilder};
//!
//! let module = ModuleBuilder::new("base")
//!     .set_manifest(AppManifest::new("com.example.app"))
//!     .set_apex_config(ApexImages::new().with_image("apex/x86.img", &[Abi::X86]))
//!     .add_file("apex/x86.img")
//!     .build();
//!
//! let err = validate_module(&module).unwrap_err();
//! assert!(err.to_string().contains("Missing expected file in APEX bundle"));
//! ```

mod apex;
mod module_names;

use crate::{Bundle, BundleModule};
use thiserror::Error;

/// Result type for validation rules.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// A rule over a single module.
pub type ModuleRule = fn(&BundleModule) -> ValidationResult<()>;

/// A rule over every module of a bundle.
pub type BundleRule = fn(&[BundleModule]) -> ValidationResult<()>;

/// Per-module rules, in evaluation order.
pub const MODULE_RULES: &[ModuleRule] = &[
    module_names::check_module_name,
    apex::check_expected_files,
    apex::check_no_unexpected_files,
    apex::check_targeted_images_present,
    apex::check_images_targeted,
    apex::check_images_targeted_once,
];

/// Whole-bundle rules, in evaluation order.
pub const BUNDLE_RULES: &[BundleRule] = &[
    apex::check_single_apex_module,
    module_names::check_unique_module_names,
];

/// What a validation failure is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationScope {
    /// A single module, by name.
    Module(String),
    /// The bundle as a whole.
    Bundle,
}

/// A violated packaging invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A file the module family requires is absent.
    #[error("Missing expected file in APEX bundle: '{path}' (module '{module}').")]
    MissingExpectedFile { module: String, path: String },

    /// A file that neither the family nor the targeting config accounts for.
    #[error("Unexpected file in APEX bundle: '{path}' (module '{module}').")]
    UnexpectedFile { module: String, path: String },

    /// Image files that no targeting entry names.
    #[error(
        "Found APEX image files that are not targeted: {} (module '{module}').",
        .paths.join(", ")
    )]
    UntargetedImages { module: String, paths: Vec<String> },

    /// Targeting entries naming files the module does not contain.
    #[error(
        "Targeted APEX image files are missing: {} (module '{module}').",
        .paths.join(", ")
    )]
    MissingTargetedImages { module: String, paths: Vec<String> },

    /// An image path named by more than one targeting entry.
    #[error("APEX image file '{path}' is targeted more than once (module '{module}').")]
    DuplicateTargetedImage { module: String, path: String },

    /// More than one APEX module in the bundle.
    #[error("Multiple APEX modules are not allowed, found {count}.")]
    MultipleApexModules { count: usize },

    /// An APEX module next to other modules.
    #[error("APEX bundles must only contain one module, found {count}.")]
    ApexWithOtherModules { count: usize },

    /// Module name is not a valid identifier.
    #[error("Invalid module name '{module}': {reason}.")]
    InvalidModuleName { module: String, reason: String },

    /// Two modules share a name.
    #[error("Duplicate module name '{module}'.")]
    DuplicateModuleName { module: String },
}

impl ValidationError {
    /// The module or bundle the failure is about.
    #[must_use]
    pub fn scope(&self) -> ValidationScope {
        match self {
            Self::MissingExpectedFile { module, .. }
            | Self::UnexpectedFile { module, .. }
            | Self::UntargetedImages { module, .. }
            | Self::MissingTargetedImages { module, .. }
            | Self::DuplicateTargetedImage { module, .. }
            | Self::InvalidModuleName { module, .. }
            | Self::DuplicateModuleName { module } => ValidationScope::Module(module.clone()),
            Self::MultipleApexModules { .. } | Self::ApexWithOtherModules { .. } => {
                ValidationScope::Bundle
            }
        }
    }
}

/// Run every module rule against `module`.
pub fn validate_module(module: &BundleModule) -> ValidationResult<()> {
    tracing::debug!(module = module.name(), "Validating module");
    MODULE_RULES.iter().try_for_each(|rule| rule(module))
}

/// Run every bundle rule against the full collection of modules.
pub fn validate_all_modules(modules: &[BundleModule]) -> ValidationResult<()> {
    tracing::debug!(modules = modules.len(), "Validating module collection");
    BUNDLE_RULES.iter().try_for_each(|rule| rule(modules))
}

/// Validate each module, then the bundle as a whole.
pub fn validate_bundle(bundle: &Bundle) -> ValidationResult<()> {
    bundle.modules().iter().try_for_each(validate_module)?;
    validate_all_modules(bundle.modules())
}

#[cfg(test)]
#[path = "validation/validation_tests.rs"]
mod validation_tests;
