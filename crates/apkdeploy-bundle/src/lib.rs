//! App bundle model and structural validation for apkdeploy
//!
//! This crate reads app bundles - archives (or extracted directories) holding
//! one directory per module - into an immutable [`Bundle`], and validates each
//! module's file layout against its declared targeting metadata.
//!
//! # Bundle Structure
//!
//! ```text
//! my-app.aab
//! ├── BUNDLE-METADATA/          # opaque metadata, not a module
//! └── base/
//!     ├── apex_images.json      # optional image targeting (APEX modules only)
//!     ├── manifest/
//!     │   └── AndroidManifest.json
//!     ├── root/
//!     │   └── manifest.json     # embedded APEX manifest
//!     └── apex/
//!         ├── x86_64.img
//!         └── arm64-v8a.img
//! ```
//!
//! # Example
//!
//! ```no_run
//! use apkdeploy_bundle::BundleLoader;
//!
//! // Loading validates every module and the bundle as a whole.
//! let bundle = BundleLoader::open("my-app.aab")?;
//! for module in bundle.modules() {
//!     println!("{}: {} files", module.name(), module.files().len());
//! }
//! # Ok::<(), apkdeploy_bundle::BundleError>(())
//! ```

mod abi;
mod error;
mod manifest;
mod module;

pub mod builder;
pub mod loader;
pub mod validation;

pub use abi::Abi;
pub use builder::BundleBuilder;
pub use error::BundleError;
pub use loader::BundleLoader;
pub use manifest::{ApexImageTargeting, ApexImages, AppManifest, TargetedApexImage};
pub use module::{Bundle, BundleModule, ModuleBuilder};
pub use validation::{ValidationError, ValidationResult, ValidationScope};

/// Result type for bundle operations.
pub type BundleResult<T> = Result<T, BundleError>;

/// Name of the module every application bundle is built around.
pub const BASE_MODULE_NAME: &str = "base";

/// Application manifest path, relative to the module root.
pub const MANIFEST_PATH: &str = "manifest/AndroidManifest.json";

/// Image targeting file name, relative to the module root.
///
/// This file is consumed while reading the module and is never part of the
/// module's file set.
pub const APEX_CONFIG_FILE: &str = "apex_images.json";

/// Directory holding the per-ABI system images of an APEX module.
pub const APEX_DIRECTORY: &str = "apex";

/// Embedded APEX manifest, under the `root/` sibling of the image directory.
pub const APEX_MANIFEST_PATH: &str = "root/manifest.json";

/// Top-level directories that hold bundle metadata rather than modules.
pub const RESERVED_DIRECTORIES: &[&str] = &["BUNDLE-METADATA", "META-INF"];
