//! Error types for APK set operations.

use apkdeploy_device::DeviceError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while extracting or installing an APK set.
#[derive(Debug, Error)]
pub enum ApksError {
    /// An input path is missing, unreadable or not executable.
    #[error("Invalid input '{}': {reason}", .path.display())]
    InvalidInput { path: PathBuf, reason: String },

    /// The table of contents violates a structural invariant.
    #[error("Invalid APK set: {0}")]
    InvalidApkSet(String),

    /// A file named by the table of contents is absent.
    #[error("Missing file in APK set: {0}")]
    MissingFile(String),

    /// Checksum mismatch.
    #[error("Checksum mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    /// A requested module does not exist in the selected variant.
    #[error("Unknown module '{0}' requested; it is not part of the APK set")]
    UnknownModule(String),

    /// The APK set is well-formed but nothing in it serves this device.
    #[error("Incompatible device: {0}")]
    IncompatibleDevice(String),

    /// Device selection or install failure, as reported by the device layer.
    #[error(transparent)]
    Device(#[from] DeviceError),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ZIP archive error.
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Which kind of failure ended an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad paths or arguments, detected before touching any device.
    Input,
    /// The archive is malformed.
    Validation,
    /// No device, several devices, or an unknown device id.
    DeviceSelection,
    /// The archive does not serve the device.
    IncompatibleDevice,
    /// The device rejected the install.
    Install,
    /// Other device-channel failures.
    Device,
    /// Host I/O failures.
    Io,
}

impl ApksError {
    /// Classify the error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } | Self::UnknownModule(_) => ErrorCategory::Input,
            Self::InvalidApkSet(_) | Self::MissingFile(_) | Self::ChecksumMismatch { .. } => {
                ErrorCategory::Validation
            }
            Self::IncompatibleDevice(_) => ErrorCategory::IncompatibleDevice,
            Self::Device(DeviceError::InstallFailed { .. }) => ErrorCategory::Install,
            Self::Device(e) if e.is_device_selection() => ErrorCategory::DeviceSelection,
            Self::Device(DeviceError::InvalidDeviceSpec(_)) => ErrorCategory::Input,
            Self::Device(_) => ErrorCategory::Device,
            Self::Io(_) | Self::Json(_) | Self::Zip(_) => ErrorCategory::Io,
        }
    }
}

impl ErrorCategory {
    /// Short label for messages.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Validation => "validation",
            Self::DeviceSelection => "device-selection",
            Self::IncompatibleDevice => "incompatible-device",
            Self::Install => "install",
            Self::Device => "device",
            Self::Io => "io",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
