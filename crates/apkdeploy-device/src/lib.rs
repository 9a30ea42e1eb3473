//! Device side of apkdeploy
//!
//! This crate provides:
//! - [`DeviceControlChannel`] - the seam to whatever talks to devices
//! - [`AdbServer`] - a channel backed by the `adb` executable
//! - [`DeviceAnalyzer`] - resolves a [`DeviceSpec`] for one connected device
//! - [`ApksInstaller`] - issues a single install transaction for a set of APKs

mod adb;
mod analyzer;
mod channel;
mod error;
mod installer;
mod spec;

pub use adb::{AdbServer, parse_devices_output, parse_install_output};
pub use analyzer::DeviceAnalyzer;
pub use channel::{ConnectedDevice, DeviceControlChannel, DeviceState, select_device};
pub use error::{DeviceError, DeviceResult};
pub use installer::{ApksInstaller, InstallOptions};
pub use spec::{DeviceSpec, SPLITS_MIN_SDK};
