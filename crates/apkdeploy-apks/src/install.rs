//! Installing an APK set on a connected device.

use crate::preconditions::{
    check_directory_exists, check_file_exists_and_executable, check_file_exists_and_readable,
};
use crate::temp::with_temp_directory;
use crate::{ApksResult, ExtractApks};
use apkdeploy_device::{ApksInstaller, DeviceAnalyzer, DeviceControlChannel, InstallOptions};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Installs the APKs of an APK set that match a connected device.
///
/// The flow is: check inputs, initialize the channel, resolve the device
/// spec, create a scratch directory, extract the matching APKs into it and
/// install them in a single transaction. A directory APK set is installed
/// from its own files, so the scratch directory stays empty. The scratch
/// directory is removed on every exit path.
#[derive(Debug, Clone)]
pub struct InstallApks {
    apks_path: PathBuf,
    adb_path: PathBuf,
    device_id: Option<String>,
    modules: Option<BTreeSet<String>>,
    allow_downgrade: bool,
}

impl InstallApks {
    /// Install `apks_path` using the adb executable at `adb_path`.
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(apks_path: P, adb_path: Q) -> Self {
        Self {
            apks_path: apks_path.as_ref().to_path_buf(),
            adb_path: adb_path.as_ref().to_path_buf(),
            device_id: None,
            modules: None,
            allow_downgrade: false,
        }
    }

    /// Target a specific device serial.
    #[must_use]
    pub fn with_device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    /// Install only these modules plus the base module.
    #[must_use]
    pub fn with_modules(mut self, modules: BTreeSet<String>) -> Self {
        self.modules = Some(modules);
        self
    }

    /// Allow replacing an installed version with a lower one.
    #[must_use]
    pub fn with_allow_downgrade(mut self, allow_downgrade: bool) -> Self {
        self.allow_downgrade = allow_downgrade;
        self
    }

    /// Path of the APK set.
    #[must_use]
    pub fn apks_path(&self) -> &Path {
        &self.apks_path
    }

    /// Device serial, when one was requested.
    #[must_use]
    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }

    /// Check the input paths without contacting any device.
    pub fn validate_input(&self) -> ApksResult<()> {
        if self.apks_path.is_dir() {
            check_directory_exists(&self.apks_path)?;
        } else {
            check_file_exists_and_readable(&self.apks_path)?;
        }
        check_file_exists_and_executable(&self.adb_path)
    }

    /// Run the install over `channel`.
    pub fn execute(&self, channel: &mut dyn DeviceControlChannel) -> ApksResult<()> {
        self.validate_input()?;

        channel.init(&self.adb_path)?;
        let channel: &dyn DeviceControlChannel = channel;
        let device_id = self.device_id.as_deref();

        let device_spec = DeviceAnalyzer::new(channel).device_spec(device_id)?;
        let options = InstallOptions {
            allow_downgrade: self.allow_downgrade,
        };

        with_temp_directory(|temp_dir| -> ApksResult<()> {
            let mut extract = ExtractApks::new(&self.apks_path, device_spec);
            if !self.apks_path.is_dir() {
                extract = extract.with_output_dir(temp_dir);
            }
            if let Some(modules) = &self.modules {
                extract = extract.with_modules(modules.clone());
            }
            let apks = extract.execute()?;

            ApksInstaller::new(channel).install_apks(&apks, &options, device_id)?;
            Ok(())
        })
    }
}
