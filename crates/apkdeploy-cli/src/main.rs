//! apkdeploy CLI - Validate bundles and install APK sets
//!
//! Commands:
//! - `apkdeploy install-apks` - Install the APKs of an APK set matching a connected device
//! - `apkdeploy extract-apks` - Extract the APKs of an APK set matching a device spec
//! - `apkdeploy get-device-spec` - Print the spec of a connected device
//! - `apkdeploy validate` - Validate a bundle

use apkdeploy_apks::ApksError;
use clap::{Parser, Subcommand};
use std::collections::BTreeSet;
use std::path::PathBuf;

mod config;
mod device_spec;
mod env;
mod extract;
mod install;
mod logging;
mod validate;

#[derive(Parser)]
#[command(name = "apkdeploy")]
#[command(author, version, about = "Validate bundles and install APK sets on Android devices", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a TOML config file with defaults for adb, device_id and log_level
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install the APKs of an APK set that match a connected device
    InstallApks(install::InstallArgs),

    /// Extract the APKs of an APK set that match a device spec
    ExtractApks(extract::ExtractArgs),

    /// Print the spec of a connected device as JSON
    GetDeviceSpec(device_spec::DeviceSpecArgs),

    /// Validate a bundle
    Validate(validate::ValidateArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = config::CliConfig::load(cli.config.as_deref())?;
    logging::init_logging(cli.verbose, config.log_level.as_deref());
    let env = env::SystemEnvironment;

    match cli.command {
        Commands::InstallApks(args) => install::run(args, &config, &env)?,
        Commands::ExtractApks(args) => extract::run(args)?,
        Commands::GetDeviceSpec(args) => device_spec::run(args, &config, &env)?,
        Commands::Validate(args) => validate::run(args)?,
    }

    Ok(())
}

/// Prefix the error with its category so the first line says what went wrong.
fn categorized(err: ApksError) -> anyhow::Error {
    let category = err.category();
    anyhow::Error::new(err).context(format!("{category} error"))
}

/// Turn a `--modules` list into a filter; blank entries are dropped.
fn module_filter(modules: Option<Vec<String>>) -> Option<BTreeSet<String>> {
    modules.map(|modules| {
        modules
            .into_iter()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect()
    })
}
