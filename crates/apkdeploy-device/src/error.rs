//! Error types for device operations.

use thiserror::Error;

/// Result type alias for device operations.
pub type DeviceResult<T> = Result<T, DeviceError>;

/// Errors raised while talking to devices.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The channel was used before `init`.
    #[error("device channel not initialized; call init with the adb path first")]
    NotInitialized,

    /// The adb executable could not be run or reported an error.
    #[error("adb command failed: {0}")]
    Adb(String),

    /// No device is connected and none was requested.
    #[error("no connected devices found; connect a device or start an emulator")]
    NoDevicesConnected,

    /// Several devices are connected and none was requested.
    #[error(
        "found {count} connected devices; specify one with --device-id or the ANDROID_SERIAL environment variable"
    )]
    MultipleDevicesConnected { count: usize },

    /// The requested device is not connected.
    #[error("device '{serial}' not found among connected devices")]
    DeviceNotFound { serial: String },

    /// The device is connected but cannot accept commands.
    #[error("device '{serial}' is not ready (state: {state})")]
    DeviceNotReady { serial: String, state: String },

    /// A device property needed for the device spec is not set.
    #[error("unable to read property '{property}' from device '{serial}'")]
    MissingProperty { serial: String, property: String },

    /// A device property has an unusable value.
    #[error("property '{property}' of device '{serial}' has invalid value '{value}'")]
    InvalidProperty {
        serial: String,
        property: String,
        value: String,
    },

    /// The device rejected the install; the message is reported verbatim.
    #[error("installation on device '{serial}' failed: {message}")]
    InstallFailed { serial: String, message: String },

    /// Device spec file is not valid.
    #[error("invalid device spec: {0}")]
    InvalidDeviceSpec(String),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DeviceError {
    /// Whether the error is about locating the target device.
    #[must_use]
    pub fn is_device_selection(&self) -> bool {
        matches!(
            self,
            Self::NoDevicesConnected
                | Self::MultipleDevicesConnected { .. }
                | Self::DeviceNotFound { .. }
                | Self::DeviceNotReady { .. }
        )
    }
}
