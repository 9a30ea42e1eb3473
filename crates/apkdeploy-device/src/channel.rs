//! The device-control channel seam.

use crate::{DeviceError, DeviceResult, InstallOptions};
use std::fmt;
use std::path::{Path, PathBuf};

/// Transport used to query and install onto devices.
///
/// Every call is a single blocking call; implementations own their timeout
/// policy. Callers never retry.
pub trait DeviceControlChannel {
    /// Prepare the channel to use the device-control executable at `executable`.
    fn init(&mut self, executable: &Path) -> DeviceResult<()>;

    /// List connected devices.
    fn devices(&self) -> DeviceResult<Vec<ConnectedDevice>>;

    /// Read a system property; `None` when unset.
    fn get_property(&self, serial: &str, name: &str) -> DeviceResult<Option<String>>;

    /// Install `apks` on `serial` as one transaction.
    fn install(&self, serial: &str, apks: &[PathBuf], options: &InstallOptions)
    -> DeviceResult<()>;
}

/// Connection state reported for a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceState {
    /// Connected and accepting commands.
    Online,
    /// Connected but not responding.
    Offline,
    /// Connected but the host key was not accepted on the device.
    Unauthorized,
    /// Any other state string.
    Other(String),
}

impl DeviceState {
    /// Parse a state as printed by `adb devices`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "device" => Self::Online,
            "offline" => Self::Offline,
            "unauthorized" => Self::Unauthorized,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Online => write!(f, "device"),
            Self::Offline => write!(f, "offline"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::Other(state) => write!(f, "{state}"),
        }
    }
}

/// A device visible to the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedDevice {
    /// Serial number used to address the device.
    pub serial: String,
    /// Connection state.
    pub state: DeviceState,
}

impl ConnectedDevice {
    /// Create an online device.
    #[must_use]
    pub fn online(serial: &str) -> Self {
        Self {
            serial: serial.to_string(),
            state: DeviceState::Online,
        }
    }
}

/// Pick the target device.
///
/// With a `device_id`, the matching device is returned. Without one, exactly
/// one device must be connected. The chosen device must be online.
pub fn select_device(
    devices: &[ConnectedDevice],
    device_id: Option<&str>,
) -> DeviceResult<ConnectedDevice> {
    let device = match device_id {
        Some(serial) => devices
            .iter()
            .find(|device| device.serial == serial)
            .ok_or_else(|| DeviceError::DeviceNotFound {
                serial: serial.to_string(),
            })?,
        None => match devices {
            [] => return Err(DeviceError::NoDevicesConnected),
            [device] => device,
            _ => {
                return Err(DeviceError::MultipleDevicesConnected {
                    count: devices.len(),
                });
            }
        },
    };

    if device.state != DeviceState::Online {
        return Err(DeviceError::DeviceNotReady {
            serial: device.serial.clone(),
            state: device.state.to_string(),
        });
    }

    Ok(device.clone())
}
