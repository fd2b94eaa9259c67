//! Cache configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use linecache_core::constants::{DEFAULT_CACHE_TTL, DEFAULT_PROGRESS_INTERVAL};
use linecache_core::error::{LineSourceError, Result};

/// Cache configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum age of a cached entry before it is refetched
    pub ttl: Duration,
    /// Lines between progress messages while draining on a miss
    pub progress_interval: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_CACHE_TTL,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl CacheConfig {
    /// Creates a configuration with the given TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            ..Self::default()
        }
    }

    /// Sets the TTL.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Sets the progress interval.
    pub fn progress_interval(mut self, lines: usize) -> Self {
        self.progress_interval = lines;
        self
    }

    /// Checks that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.progress_interval == 0 {
            return Err(LineSourceError::Config(
                "progress interval must be at least one line".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(300));
        assert_eq!(config.progress_interval, 50_000);
        assert!(config.validate().is_ok());
    }

    #[test_case(0, false ; "zero interval rejected")]
    #[test_case(1, true ; "single line interval")]
    #[test_case(50_000, true ; "default interval")]
    fn test_validate_progress_interval(interval: usize, ok: bool) {
        let config = CacheConfig::new(Duration::from_secs(1)).progress_interval(interval);
        assert_eq!(config.validate().is_ok(), ok);
    }

    #[test]
    fn test_zero_ttl_is_valid() {
        assert!(CacheConfig::new(Duration::ZERO).validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: CacheConfig =
            serde_json::from_str(r#"{"ttl":{"secs":600,"nanos":0}}"#).unwrap();
        assert_eq!(config.ttl, Duration::from_secs(600));
        assert_eq!(config.progress_interval, 50_000);
    }
}
