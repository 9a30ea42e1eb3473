//! `apkdeploy validate`

use anyhow::{Context, Result};
use apkdeploy_bundle::BundleLoader;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Path to the bundle (zip file or extracted directory)
    #[arg(long)]
    pub bundle: PathBuf,
}

/// Validate command implementation
pub fn run(args: ValidateArgs) -> Result<()> {
    println!("Validating bundle: {}", args.bundle.display());

    let bundle = BundleLoader::open(&args.bundle)
        .with_context(|| format!("Invalid bundle: {}", args.bundle.display()))?;

    println!("Bundle is valid ({} modules)", bundle.modules().len());
    for module in bundle.modules() {
        let kind = if module.is_apex() { "apex" } else { "app" };
        println!(
            "  {} ({kind}, {} files)",
            module.name(),
            module.files().len()
        );
    }
    Ok(())
}
