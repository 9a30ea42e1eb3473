//! Environment-variable discovery of adb and the target device.

use anyhow::{Result, bail};
use std::path::PathBuf;

/// Root of the Android SDK; adb lives in `platform-tools` below it.
pub const ANDROID_HOME: &str = "ANDROID_HOME";

/// Serial of the device to use when none is given on the command line.
pub const ANDROID_SERIAL: &str = "ANDROID_SERIAL";

const ADB_NOT_FOUND: &str = "Unable to determine the location of ADB. Please set the --adb flag or define ANDROID_HOME environment variable.";

/// Source of environment variables.
pub trait EnvironmentVariableProvider {
    /// Value of `name`, if set and valid unicode.
    fn variable(&self, name: &str) -> Option<String>;
}

/// Reads the process environment.
pub struct SystemEnvironment;

impl EnvironmentVariableProvider for SystemEnvironment {
    fn variable(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Fixed set of variables, for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MapEnvironment {
    variables: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl MapEnvironment {
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.variables.insert(name.to_string(), value.to_string());
        self
    }
}

#[cfg(test)]
impl EnvironmentVariableProvider for MapEnvironment {
    fn variable(&self, name: &str) -> Option<String> {
        self.variables.get(name).cloned()
    }
}

/// Resolve the adb executable: the flag, then `$ANDROID_HOME/platform-tools/adb`,
/// then the config file.
pub fn resolve_adb(
    flag: Option<PathBuf>,
    configured: Option<PathBuf>,
    env: &dyn EnvironmentVariableProvider,
) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    if let Some(home) = non_empty(env.variable(ANDROID_HOME)) {
        let adb = if cfg!(windows) { "adb.exe" } else { "adb" };
        return Ok(PathBuf::from(home).join("platform-tools").join(adb));
    }
    match configured {
        Some(path) => Ok(path),
        None => bail!(ADB_NOT_FOUND),
    }
}

/// Resolve the device serial: the flag, then `$ANDROID_SERIAL`, then the
/// config file. `None` means the sole connected device.
pub fn resolve_device_id(
    flag: Option<String>,
    configured: Option<String>,
    env: &dyn EnvironmentVariableProvider,
) -> Option<String> {
    non_empty(flag)
        .or_else(|| non_empty(env.variable(ANDROID_SERIAL)))
        .or_else(|| non_empty(configured))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
