//! Device capability description.

use crate::{DeviceError, DeviceResult};
use serde::{Deserialize, Serialize};

/// First SDK level that can install split APKs.
pub const SPLITS_MIN_SDK: u32 = 21;

/// Resolved capabilities of a target device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSpec {
    /// ABIs in the device's order of preference (e.g., ["arm64-v8a", "armeabi-v7a"]).
    pub supported_abis: Vec<String>,

    /// Locales as BCP-47 tags (e.g., ["en-US"]).
    #[serde(default)]
    pub supported_locales: Vec<String>,

    /// Screen density in dpi.
    pub screen_density: u32,

    /// Android SDK level.
    pub sdk_version: u32,
}

impl DeviceSpec {
    /// Whether the device can only install standalone (non-split) APKs.
    #[must_use]
    pub fn requires_standalone(&self) -> bool {
        self.sdk_version < SPLITS_MIN_SDK
    }

    /// Languages of the supported locales (e.g., "en" for "en-US").
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.supported_locales
            .iter()
            .filter_map(|locale| locale.split(['-', '_']).next())
            .filter(|language| !language.is_empty())
    }

    /// Validate a spec read from outside (e.g. a JSON file).
    pub fn validate(&self) -> DeviceResult<()> {
        if self.supported_abis.is_empty() {
            return Err(DeviceError::InvalidDeviceSpec(
                "supported_abis must not be empty".to_string(),
            ));
        }
        if self.screen_density == 0 {
            return Err(DeviceError::InvalidDeviceSpec(
                "screen_density must be positive".to_string(),
            ));
        }
        if self.sdk_version == 0 {
            return Err(DeviceError::InvalidDeviceSpec(
                "sdk_version must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> DeviceResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize and validate from JSON.
    pub fn from_json(json: &str) -> DeviceResult<Self> {
        let spec: Self = serde_json::from_str(json)?;
        spec.validate()?;
        Ok(spec)
    }
}
