//! CLI configuration: defaults, then `.env` / environment, then flags.

use std::path::PathBuf;
use std::time::Duration;

use linecache_core::constants::{DEFAULT_CACHE_TTL, DEFAULT_DATA_PATH, DEFAULT_PROGRESS_INTERVAL};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CliConfig {
    pub data_path: PathBuf,
    pub ttl: Duration,
    pub progress_interval: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            ttl: DEFAULT_CACHE_TTL,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl CliConfig {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from a variable lookup. Unparseable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            data_path: lookup("LINECACHE_DATA_PATH")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            ttl: lookup("LINECACHE_TTL_SECS")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.ttl),
            progress_interval: lookup("LINECACHE_PROGRESS_INTERVAL")
                .and_then(|v| v.trim().parse::<usize>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.progress_interval),
        }
    }

    /// Applies command-line overrides.
    pub fn with_overrides(mut self, path: Option<PathBuf>, ttl_secs: Option<u64>) -> Self {
        if let Some(path) = path {
            self.data_path = path;
        }
        if let Some(secs) = ttl_secs {
            self.ttl = Duration::from_secs(secs);
        }
        self
    }
}
