//! `apkdeploy get-device-spec`

use crate::config::CliConfig;
use crate::env::{EnvironmentVariableProvider, resolve_adb, resolve_device_id};
use anyhow::{Context, Result};
use apkdeploy_apks::preconditions::check_file_exists_and_executable;
use apkdeploy_device::{AdbServer, DeviceAnalyzer, DeviceControlChannel};
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct DeviceSpecArgs {
    /// Path to the adb executable (default: $ANDROID_HOME/platform-tools/adb)
    #[arg(long)]
    pub adb: Option<PathBuf>,

    /// Serial of the device to inspect (default: $ANDROID_SERIAL)
    #[arg(long)]
    pub device_id: Option<String>,

    /// Write the spec to this file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Get-device-spec command implementation
pub fn run(
    args: DeviceSpecArgs,
    config: &CliConfig,
    env: &dyn EnvironmentVariableProvider,
) -> Result<()> {
    let adb = resolve_adb(args.adb, config.adb.clone(), env)?;
    check_file_exists_and_executable(&adb).map_err(crate::categorized)?;
    let device_id = resolve_device_id(args.device_id, config.device_id.clone(), env);

    let mut channel = AdbServer::new();
    channel
        .init(&adb)
        .with_context(|| format!("Failed to start adb: {}", adb.display()))?;
    let spec = DeviceAnalyzer::new(&channel)
        .device_spec(device_id.as_deref())
        .context("Failed to read device spec")?;
    let json = spec.to_json()?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, format!("{json}\n"))
                .with_context(|| format!("Failed to write device spec: {}", path.display()))?;
            println!("Device spec written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
