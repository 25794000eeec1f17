//! Logging setup.
//!
//! Logs go to stderr so stdout only carries reports. `RUST_LOG` overrides the
//! default filter, e.g. `RUST_LOG=garment_productivity=debug` to see encoded
//! feature vectors.

use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber. `verbose` lowers the default filter to `info`.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "info" } else { DEFAULT_FILTER }));

    // A subscriber may already be installed when the library is embedded.
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .try_init();
}
