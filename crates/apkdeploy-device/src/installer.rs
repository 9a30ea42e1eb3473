//! Single-transaction APK installation.

use crate::{DeviceControlChannel, DeviceResult, select_device};
use std::path::PathBuf;

/// Options applied uniformly to every APK of one install.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallOptions {
    /// Allow replacing an installed app that has a higher version code.
    pub allow_downgrade: bool,
}

/// Installs a set of APKs on one device.
pub struct ApksInstaller<'a> {
    channel: &'a dyn DeviceControlChannel,
}

impl<'a> ApksInstaller<'a> {
    /// Create an installer over an initialized channel.
    pub fn new(channel: &'a dyn DeviceControlChannel) -> Self {
        Self { channel }
    }

    /// Install `apks` in one transaction on `device_id`, or on the sole
    /// connected device when no id is given.
    ///
    /// Channel failures are returned as reported; nothing is retried.
    pub fn install_apks(
        &self,
        apks: &[PathBuf],
        options: &InstallOptions,
        device_id: Option<&str>,
    ) -> DeviceResult<()> {
        let devices = self.channel.devices()?;
        let device = select_device(&devices, device_id)?;

        tracing::info!(
            serial = %device.serial,
            apks = apks.len(),
            allow_downgrade = options.allow_downgrade,
            "Installing APKs"
        );
        self.channel.install(&device.serial, apks, options)?;
        tracing::info!(serial = %device.serial, "Installation complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::{ConnectedDevice, DeviceError};
    use std::cell::RefCell;
    use std::path::Path;

    #[derive(Default)]
    struct RecordingChannel {
        devices: Vec<ConnectedDevice>,
        installs: RefCell<Vec<(String, Vec<PathBuf>, InstallOptions)>>,
    }

    impl DeviceControlChannel for RecordingChannel {
        fn init(&mut self, _executable: &Path) -> DeviceResult<()> {
            Ok(())
        }

        fn devices(&self) -> DeviceResult<Vec<ConnectedDevice>> {
            Ok(self.devices.clone())
        }

        fn get_property(&self, _: &str, _: &str) -> DeviceResult<Option<String>> {
            Ok(None)
        }

        fn install(
            &self,
            serial: &str,
            apks: &[PathBuf],
            options: &InstallOptions,
        ) -> DeviceResult<()> {
            self.installs
                .borrow_mut()
                .push((serial.to_string(), apks.to_vec(), *options));
            Ok(())
        }
    }

    #[test]
    fn ApksInstaller___install_apks___targets_sole_device() {
        let channel = RecordingChannel {
            devices: vec![ConnectedDevice::online("emulator-5554")],
            ..Default::default()
        };
        let apks = vec![PathBuf::from("base-master.apk")];
        let options = InstallOptions {
            allow_downgrade: true,
        };

        ApksInstaller::new(&channel)
            .install_apks(&apks, &options, None)
            .unwrap();

        let installs = channel.installs.borrow();
        assert_eq!(installs.len(), 1);
        assert_eq!(installs[0], ("emulator-5554".to_string(), apks, options));
    }

    #[test]
    fn ApksInstaller___install_apks___targets_requested_device() {
        let channel = RecordingChannel {
            devices: vec![
                ConnectedDevice::online("emulator-5554"),
                ConnectedDevice::online("R58M123ABC"),
            ],
            ..Default::default()
        };

        ApksInstaller::new(&channel)
            .install_apks(
                &[PathBuf::from("a.apk")],
                &InstallOptions::default(),
                Some("R58M123ABC"),
            )
            .unwrap();

        assert_eq!(channel.installs.borrow()[0].0, "R58M123ABC");
    }

    #[test]
    fn ApksInstaller___install_apks___no_device___never_installs() {
        let channel = RecordingChannel::default();

        let err = ApksInstaller::new(&channel)
            .install_apks(&[PathBuf::from("a.apk")], &InstallOptions::default(), None)
            .unwrap_err();

        assert!(matches!(err, DeviceError::NoDevicesConnected));
        assert!(channel.installs.borrow().is_empty());
    }
}
