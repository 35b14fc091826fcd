//! Runtime configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use algoscope_store::StoreConfig;

use crate::error::{Error, Result};

/// Server address, data directory and playback pacing.
#[derive(Debug, Clone, PartialEq)]
pub struct VisConfig {
    pub api_addr: SocketAddr,
    /// Where visualizer snapshots are kept. `None` disables persistence.
    pub data_dir: Option<PathBuf>,
    /// Tick interval at speed 1.
    pub base_interval: Duration,
}

impl Default for VisConfig {
    fn default() -> Self {
        Self {
            api_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            data_dir: Some(PathBuf::from("./algoscope-data")),
            base_interval: Duration::from_millis(1000),
        }
    }
}

impl VisConfig {
    /// Read `ALGOSCOPE_API_ADDR`, `ALGOSCOPE_DATA_DIR` and
    /// `ALGOSCOPE_BASE_INTERVAL_MS`, using the defaults for unset ones.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup("ALGOSCOPE_API_ADDR") {
            config.api_addr = addr
                .trim()
                .parse()
                .map_err(|e| Error::Config(format!("Invalid ALGOSCOPE_API_ADDR {addr:?}: {e}")))?;
        }

        if let Some(dir) = lookup("ALGOSCOPE_DATA_DIR") {
            let dir = dir.trim();
            // Empty means in-memory only.
            config.data_dir = (!dir.is_empty()).then(|| PathBuf::from(dir));
        }

        if let Some(ms) = lookup("ALGOSCOPE_BASE_INTERVAL_MS") {
            let ms: u64 = ms.trim().parse().map_err(|e| {
                Error::Config(format!("Invalid ALGOSCOPE_BASE_INTERVAL_MS {ms:?}: {e}"))
            })?;
            if ms == 0 {
                return Err(Error::Config(
                    "ALGOSCOPE_BASE_INTERVAL_MS must be positive".to_string(),
                ));
            }
            config.base_interval = Duration::from_millis(ms);
        }

        Ok(config)
    }

    pub fn with_api_addr(mut self, addr: SocketAddr) -> Self {
        self.api_addr = addr;
        self
    }

    pub fn with_data_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.data_dir = dir;
        self
    }

    pub fn with_base_interval(mut self, interval: Duration) -> Self {
        self.base_interval = interval;
        self
    }

    /// Visualizer settings derived from this config.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::default().with_base_interval(self.base_interval)
    }
}
