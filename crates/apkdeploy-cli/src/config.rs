//! Optional TOML configuration file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Defaults applied when neither a flag nor an environment variable is set.
///
/// ```toml
/// adb = "/opt/android-sdk/platform-tools/adb"
/// device_id = "emulator-5554"
/// log_level = "debug"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Path to the adb executable.
    pub adb: Option<PathBuf>,

    /// Serial of the default device.
    pub device_id: Option<String>,

    /// Tracing filter directive, e.g. "info" or "apkdeploy_apks=debug".
    pub log_level: Option<String>,
}

impl CliConfig {
    /// Load the config file at `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&contents)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parse from TOML.
    pub fn from_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse config")
    }
}
