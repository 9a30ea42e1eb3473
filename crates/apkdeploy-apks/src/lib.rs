//! APK set handling for apkdeploy
//!
//! An APK set is a zip archive (or an extracted directory) holding pre-built
//! APKs for every device configuration, plus a `toc.json` table of contents
//! describing which APKs serve which devices.
//!
//! # APK Set Structure
//!
//! ```text
//! my-app.apks
//! ├── toc.json
//! ├── splits/
//! │   ├── base-master.apk
//! │   ├── base-arm64_v8a.apk
//! │   ├── base-xxhdpi.apk
//! │   ├── base-fr.apk
//! │   └── feature-master.apk
//! └── standalones/
//!     └── standalone-armeabi_v7a.apk
//! ```
//!
//! # Example
//!
//! ```no_run
//! use apkdeploy_apks::InstallApks;
//! use apkdeploy_device::AdbServer;
//!
//! let mut adb = AdbServer::new();
//! InstallApks::new("my-app.apks", "/opt/android-sdk/platform-tools/adb")
//!     .with_allow_downgrade(true)
//!     .execute(&mut adb)?;
//! # Ok::<(), apkdeploy_apks::ApksError>(())
//! ```

mod archive;
mod checksum;
mod error;
mod toc;

pub mod extract;
pub mod install;
pub mod matcher;
pub mod preconditions;
pub mod temp;

pub use archive::ApkSetArchive;
pub use checksum::{compute_sha256, verify_sha256};
pub use error::{ApksError, ErrorCategory};
pub use extract::ExtractApks;
pub use install::InstallApks;
pub use matcher::ApkMatcher;
pub use toc::{ApkDescription, ApkKind, ApkSet, ApkTargeting, BuildApksResult, Variant, VariantTargeting};

/// Result type for APK set operations.
pub type ApksResult<T> = Result<T, ApksError>;

/// Table of contents file name within the APK set.
pub const TOC_FILE: &str = "toc.json";

/// Name of the module that is always installed.
pub const BASE_MODULE_NAME: &str = "base";
