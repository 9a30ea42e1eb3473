//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

const DEFAULT_DIRECTIVE: &str = "info";

/// Install the global subscriber, writing to stderr.
///
/// `--verbose` forces debug output; otherwise `RUST_LOG` wins over the
/// configured level, which wins over the default.
pub fn init_logging(verbose: bool, configured: Option<&str>) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(configured)))
    };

    // Ignore the error if a subscriber is already installed.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .try_init();
}

fn default_directive(configured: Option<&str>) -> &str {
    configured
        .map(str::trim)
        .filter(|level| !level.is_empty())
        .unwrap_or(DEFAULT_DIRECTIVE)
}
