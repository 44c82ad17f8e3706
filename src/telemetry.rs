//! Logging bootstrap.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter used when neither `RUST_LOG` nor an explicit level is given.
pub const DEFAULT_FILTER: &str = "bibwarden=info";

/// Builds the filter, preferring `level` over `RUST_LOG`.
#[must_use]
pub fn filter(level: Option<&str>) -> EnvFilter {
    level.map_or_else(
        || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        EnvFilter::new,
    )
}

/// Installs the global subscriber writing to stderr.
///
/// Calling it twice leaves the first subscriber in place.
pub fn init(level: Option<&str>) {
    let installed = tracing_subscriber::registry()
        .with(filter(level))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
    if installed.is_err() {
        tracing::debug!("log subscriber already installed");
    }
}
