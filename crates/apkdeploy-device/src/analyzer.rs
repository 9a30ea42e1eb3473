//! Resolves the capability profile of a connected device.

use crate::{DeviceControlChannel, DeviceError, DeviceResult, DeviceSpec, select_device};

const SDK_PROPERTY: &str = "ro.build.version.sdk";
const ABI_LIST_PROPERTY: &str = "ro.product.cpu.abilist";
const ABI_PROPERTY: &str = "ro.product.cpu.abi";
const DENSITY_PROPERTIES: &[&str] = &["ro.sf.lcd_density", "qemu.sf.lcd_density"];
const LOCALE_PROPERTIES: &[&str] = &["persist.sys.locale", "ro.product.locale"];
const LANGUAGE_PROPERTY: &str = "persist.sys.language";
const COUNTRY_PROPERTY: &str = "persist.sys.country";

/// Builds a [`DeviceSpec`] by querying device properties over a channel.
pub struct DeviceAnalyzer<'a> {
    channel: &'a dyn DeviceControlChannel,
}

impl<'a> DeviceAnalyzer<'a> {
    /// Create an analyzer over an initialized channel.
    pub fn new(channel: &'a dyn DeviceControlChannel) -> Self {
        Self { channel }
    }

    /// Resolve the spec of `device_id`, or of the sole connected device.
    pub fn device_spec(&self, device_id: Option<&str>) -> DeviceResult<DeviceSpec> {
        let devices = self.channel.devices()?;
        let device = select_device(&devices, device_id)?;
        let serial = device.serial.as_str();
        tracing::debug!(serial, "Analyzing device");

        let spec = DeviceSpec {
            supported_abis: self.abis(serial)?,
            supported_locales: self.locales(serial)?,
            screen_density: self.first_number(serial, DENSITY_PROPERTIES)?,
            sdk_version: self.first_number(serial, &[SDK_PROPERTY])?,
        };
        tracing::debug!(serial, ?spec, "Resolved device spec");
        Ok(spec)
    }

    fn first_property(&self, serial: &str, names: &[&str]) -> DeviceResult<Option<String>> {
        for name in names {
            if let Some(value) = self.channel.get_property(serial, name)? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    fn first_number(&self, serial: &str, names: &[&str]) -> DeviceResult<u32> {
        let value =
            self.first_property(serial, names)?
                .ok_or_else(|| DeviceError::MissingProperty {
                    serial: serial.to_string(),
                    property: names.join(" | "),
                })?;

        value
            .parse()
            .ok()
            .filter(|number| *number > 0)
            .ok_or_else(|| DeviceError::InvalidProperty {
                serial: serial.to_string(),
                property: names.join(" | "),
                value,
            })
    }

    fn abis(&self, serial: &str) -> DeviceResult<Vec<String>> {
        let value = self
            .first_property(serial, &[ABI_LIST_PROPERTY, ABI_PROPERTY])?
            .ok_or_else(|| DeviceError::MissingProperty {
                serial: serial.to_string(),
                property: ABI_LIST_PROPERTY.to_string(),
            })?;

        Ok(value
            .split(',')
            .map(str::trim)
            .filter(|abi| !abi.is_empty())
            .map(String::from)
            .collect())
    }

    fn locales(&self, serial: &str) -> DeviceResult<Vec<String>> {
        if let Some(locale) = self.first_property(serial, LOCALE_PROPERTIES)? {
            return Ok(vec![locale]);
        }

        // Pre-Lollipop devices split the locale in two properties.
        let language = self.channel.get_property(serial, LANGUAGE_PROPERTY)?;
        let country = self.channel.get_property(serial, COUNTRY_PROPERTY)?;
        match (language, country) {
            (Some(language), Some(country)) => Ok(vec![format!("{language}-{country}")]),
            (Some(language), None) => Ok(vec![language]),
            _ => Err(DeviceError::MissingProperty {
                serial: serial.to_string(),
                property: LOCALE_PROPERTIES.join(" | "),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::{ConnectedDevice, InstallOptions};
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    struct PropertyChannel {
        devices: Vec<ConnectedDevice>,
        properties: HashMap<(String, String), String>,
    }

    impl PropertyChannel {
        fn new(serials: &[&str]) -> Self {
            Self {
                devices: serials.iter().map(|s| ConnectedDevice::online(s)).collect(),
                properties: HashMap::new(),
            }
        }

        fn with(mut self, serial: &str, name: &str, value: &str) -> Self {
            self.properties
                .insert((serial.to_string(), name.to_string()), value.to_string());
            self
        }

        fn pixel(self, serial: &str) -> Self {
            self.with(serial, SDK_PROPERTY, "34")
                .with(serial, ABI_LIST_PROPERTY, "arm64-v8a,armeabi-v7a,armeabi")
                .with(serial, "ro.sf.lcd_density", "420")
                .with(serial, "persist.sys.locale", "en-US")
        }
    }

    impl DeviceControlChannel for PropertyChannel {
        fn init(&mut self, _executable: &Path) -> DeviceResult<()> {
            Ok(())
        }

        fn devices(&self) -> DeviceResult<Vec<ConnectedDevice>> {
            Ok(self.devices.clone())
        }

        fn get_property(&self, serial: &str, name: &str) -> DeviceResult<Option<String>> {
            Ok(self
                .properties
                .get(&(serial.to_string(), name.to_string()))
                .cloned())
        }

        fn install(&self, _: &str, _: &[PathBuf], _: &InstallOptions) -> DeviceResult<()> {
            unreachable!("analyzer never installs")
        }
    }

    #[test]
    fn DeviceAnalyzer___device_spec___reads_properties() {
        let channel = PropertyChannel::new(&["emulator-5554"]).pixel("emulator-5554");

        let spec = DeviceAnalyzer::new(&channel).device_spec(None).unwrap();

        assert_eq!(
            spec,
            DeviceSpec {
                supported_abis: vec![
                    "arm64-v8a".to_string(),
                    "armeabi-v7a".to_string(),
                    "armeabi".to_string()
                ],
                supported_locales: vec!["en-US".to_string()],
                screen_density: 420,
                sdk_version: 34,
            }
        );
    }

    #[test]
    fn DeviceAnalyzer___device_spec___uses_requested_device() {
        let channel = PropertyChannel::new(&["emulator-5554", "R58M123ABC"])
            .pixel("emulator-5554")
            .pixel("R58M123ABC")
            .with("R58M123ABC", SDK_PROPERTY, "30");

        let spec = DeviceAnalyzer::new(&channel)
            .device_spec(Some("R58M123ABC"))
            .unwrap();

        assert_eq!(spec.sdk_version, 30);
    }

    #[test]
    fn DeviceAnalyzer___device_spec___falls_back_to_legacy_properties() {
        let channel = PropertyChannel::new(&["old"])
            .with("old", SDK_PROPERTY, "19")
            .with("old", ABI_PROPERTY, "armeabi-v7a")
            .with("old", "qemu.sf.lcd_density", "240")
            .with("old", LANGUAGE_PROPERTY, "de")
            .with("old", COUNTRY_PROPERTY, "AT");

        let spec = DeviceAnalyzer::new(&channel).device_spec(None).unwrap();

        assert_eq!(spec.supported_abis, vec!["armeabi-v7a".to_string()]);
        assert_eq!(spec.screen_density, 240);
        assert_eq!(spec.supported_locales, vec!["de-AT".to_string()]);
        assert!(spec.requires_standalone());
    }

    #[test]
    fn DeviceAnalyzer___device_spec___missing_sdk___fails() {
        let channel = PropertyChannel::new(&["emulator-5554"])
            .with("emulator-5554", ABI_LIST_PROPERTY, "x86_64")
            .with("emulator-5554", "ro.sf.lcd_density", "420")
            .with("emulator-5554", "persist.sys.locale", "en-US");

        let err = DeviceAnalyzer::new(&channel).device_spec(None).unwrap_err();

        assert!(matches!(err, DeviceError::MissingProperty { .. }));
    }

    #[test]
    fn DeviceAnalyzer___device_spec___non_numeric_density___fails() {
        let channel = PropertyChannel::new(&["emulator-5554"])
            .pixel("emulator-5554")
            .with("emulator-5554", "ro.sf.lcd_density", "high");

        let err = DeviceAnalyzer::new(&channel).device_spec(None).unwrap_err();

        assert!(matches!(err, DeviceError::InvalidProperty { value, .. } if value == "high"));
    }

    #[test]
    fn DeviceAnalyzer___device_spec___ambiguous_devices___fails() {
        let channel = PropertyChannel::new(&["a", "b"]).pixel("a").pixel("b");

        let err = DeviceAnalyzer::new(&channel).device_spec(None).unwrap_err();

        assert!(matches!(
            err,
            DeviceError::MultipleDevicesConnected { count: 2 }
        ));
    }
}
