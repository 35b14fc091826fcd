//! AlgoScope logging setup.
//!
//! Installs a `tracing-subscriber` registry with an [`EnvFilter`] read from
//! `RUST_LOG`, falling back to [`DEFAULT_FILTER`], and a plain fmt layer.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "algoscope=info";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A global subscriber was already installed
    #[error("Logging already initialised: {0}")]
    AlreadyInitialised(#[from] TryInitError),
}

/// Build the filter from `RUST_LOG`, or from `default_filter` if that fails.
pub fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Install the global subscriber.
pub fn try_init(default_filter: &str) -> Result<(), Error> {
    tracing_subscriber::registry()
        .with(env_filter(default_filter))
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;
    Ok(())
}

/// Install the global subscriber with [`DEFAULT_FILTER`]. A second call is a
/// no-op.
pub fn init() {
    if try_init(DEFAULT_FILTER).is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
