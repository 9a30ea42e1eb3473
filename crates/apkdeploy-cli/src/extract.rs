//! `apkdeploy extract-apks`

use anyhow::{Context, Result, bail};
use apkdeploy_apks::ExtractApks;
use apkdeploy_device::DeviceSpec;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Path to the APK set (.apks file or extracted directory)
    #[arg(long)]
    pub apks: PathBuf,

    /// Device spec JSON file, as written by get-device-spec
    #[arg(long)]
    pub device_spec: PathBuf,

    /// Directory to write the APKs to; required for .apks files
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Comma-separated modules to extract; base is always extracted
    #[arg(long, value_delimiter = ',')]
    pub modules: Option<Vec<String>>,
}

/// Extract command implementation
pub fn run(args: ExtractArgs) -> Result<()> {
    let json = std::fs::read_to_string(&args.device_spec).with_context(|| {
        format!("Failed to read device spec: {}", args.device_spec.display())
    })?;
    let spec = DeviceSpec::from_json(&json)
        .with_context(|| format!("Invalid device spec: {}", args.device_spec.display()))?;

    if args.output_dir.is_none() && !args.apks.is_dir() {
        bail!("--output-dir is required when --apks is an APK set file");
    }

    let mut command = ExtractApks::new(&args.apks, spec);
    if let Some(dir) = &args.output_dir {
        command = command.with_output_dir(dir);
    }
    if let Some(modules) = crate::module_filter(args.modules) {
        command = command.with_modules(modules);
    }

    for path in command.execute().map_err(crate::categorized)? {
        println!("{}", path.display());
    }
    Ok(())
}
