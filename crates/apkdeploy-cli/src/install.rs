//! `apkdeploy install-apks`

use crate::config::CliConfig;
use crate::env::{EnvironmentVariableProvider, resolve_adb, resolve_device_id};
use anyhow::Result;
use apkdeploy_apks::InstallApks;
use apkdeploy_device::AdbServer;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InstallArgs {
    /// Path to the APK set (.apks file or extracted directory)
    #[arg(long)]
    pub apks: PathBuf,

    /// Path to the adb executable (default: $ANDROID_HOME/platform-tools/adb)
    #[arg(long)]
    pub adb: Option<PathBuf>,

    /// Serial of the target device (default: $ANDROID_SERIAL)
    #[arg(long)]
    pub device_id: Option<String>,

    /// Comma-separated modules to install; base is always installed
    #[arg(long, value_delimiter = ',')]
    pub modules: Option<Vec<String>>,

    /// Allow replacing an installed app with a lower version code
    #[arg(long)]
    pub allow_downgrade: bool,
}

/// Resolve flags, environment and config into an install command.
pub fn command(
    args: InstallArgs,
    config: &CliConfig,
    env: &dyn EnvironmentVariableProvider,
) -> Result<InstallApks> {
    let adb = resolve_adb(args.adb, config.adb.clone(), env)?;

    let mut command =
        InstallApks::new(&args.apks, adb).with_allow_downgrade(args.allow_downgrade);
    if let Some(device_id) = resolve_device_id(args.device_id, config.device_id.clone(), env) {
        command = command.with_device_id(device_id);
    }
    if let Some(modules) = crate::module_filter(args.modules) {
        command = command.with_modules(modules);
    }
    Ok(command)
}

/// Install command implementation
pub fn run(
    args: InstallArgs,
    config: &CliConfig,
    env: &dyn EnvironmentVariableProvider,
) -> Result<()> {
    let command = command(args, config, env)?;

    println!("Installing APK set: {}", command.apks_path().display());
    if let Some(device_id) = command.device_id() {
        println!("  Device: {device_id}");
    }

    let mut adb = AdbServer::new();
    command.execute(&mut adb).map_err(crate::categorized)?;

    println!("Installation complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::env::{ANDROID_HOME, ANDROID_SERIAL, MapEnvironment};
    use std::path::Path;

    fn args(apks: &str) -> InstallArgs {
        InstallArgs {
            apks: PathBuf::from(apks),
            adb: None,
            device_id: None,
            modules: None,
            allow_downgrade: false,
        }
    }

    #[test]
    fn command___serial_from_environment() {
        let env = MapEnvironment::default()
            .with(ANDROID_HOME, "/opt/sdk")
            .with(ANDROID_SERIAL, "emulator-5554");

        let command = command(args("app.apks"), &CliConfig::default(), &env).unwrap();

        assert_eq!(command.apks_path(), Path::new("app.apks"));
        assert_eq!(command.device_id(), Some("emulator-5554"));
    }

    #[test]
    fn command___flag_overrides_environment() {
        let env = MapEnvironment::default()
            .with(ANDROID_HOME, "/opt/sdk")
            .with(ANDROID_SERIAL, "emulator-5554");
        let mut args = args("app.apks");
        args.device_id = Some("R58M123ABC".to_string());

        let command = command(args, &CliConfig::default(), &env).unwrap();

        assert_eq!(command.device_id(), Some("R58M123ABC"));
    }

    #[test]
    fn command___no_adb_location___fails() {
        let err = command(
            args("app.apks"),
            &CliConfig::default(),
            &MapEnvironment::default(),
        )
        .unwrap_err();

        assert!(err.to_string().contains("--adb flag or define ANDROID_HOME"));
    }

    #[test]
    fn run___missing_apks___input_error_before_adb_runs() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut args = args("unused");
        args.apks = temp.path().join("missing.apks");
        args.adb = Some(temp.path().join("adb"));

        let err = run(args, &CliConfig::default(), &MapEnvironment::default()).unwrap_err();

        assert!(err.to_string().starts_with("input error"));
        assert!(format!("{err:#}").contains("missing.apks"));
    }
}
