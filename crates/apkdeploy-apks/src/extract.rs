//! Extraction of the APKs that serve a device.

use crate::{ApkMatcher, ApkSetArchive, ApksResult};
use apkdeploy_device::DeviceSpec;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Selects and extracts the APKs of an APK set for one device.
///
/// # Example
///
/// ```no_run
/// use apkdeploy_apks::ExtractApks;
/// use apkdeploy_device::DeviceSpec;
///
/// let spec = DeviceSpec::from_json(&std::fs::read_to_string("pixel.json")?)?;
/// let apks = ExtractApks::new("my-app.apks", spec)
///     .with_output_dir("out")
///     .execute()?;
/// for apk in apks {
///     println!("{}", apk.display());
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct ExtractApks {
    apks_path: PathBuf,
    device_spec: DeviceSpec,
    modules: Option<BTreeSet<String>>,
    output_dir: Option<PathBuf>,
}

impl ExtractApks {
    /// Extract from `apks_path` for a device described by `device_spec`.
    pub fn new<P: AsRef<Path>>(apks_path: P, device_spec: DeviceSpec) -> Self {
        Self {
            apks_path: apks_path.as_ref().to_path_buf(),
            device_spec,
            modules: None,
            output_dir: None,
        }
    }

    /// Limit extraction to these modules plus the base module.
    #[must_use]
    pub fn with_modules(mut self, modules: BTreeSet<String>) -> Self {
        self.modules = Some(modules);
        self
    }

    /// Write extracted APKs below `dir`.
    ///
    /// Required for APK set files; directory APK sets are used in place
    /// without it.
    #[must_use]
    pub fn with_output_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.output_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Select the matching APKs and return their paths, base module first.
    pub fn execute(&self) -> ApksResult<Vec<PathBuf>> {
        tracing::info!(apks = %self.apks_path.display(), "Selecting APKs for device");

        let mut archive = ApkSetArchive::open(&self.apks_path)?;
        let toc = archive.read_toc()?;

        let mut matcher = ApkMatcher::new(&self.device_spec);
        if let Some(modules) = &self.modules {
            matcher = matcher.with_modules(modules);
        }
        let selected = matcher.matching_apks(&toc)?;

        let paths = archive.materialize(&selected, self.output_dir.as_deref())?;
        tracing::info!(
            package = %toc.package_name,
            count = paths.len(),
            "Selected APKs"
        );
        Ok(paths)
    }
}
