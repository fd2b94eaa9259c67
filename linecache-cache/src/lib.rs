//! # LINECACHE Cache
//!
//! Time-bounded, concurrency-safe caching in front of any [`LineSource`].
//!
//! [`CachedLineSource`] wraps a producer and memoizes its entire result set
//! in a [`CacheStore`]. Calls within the TTL are served from memory without
//! touching the producer; expired or missing entries are refetched, fully
//! materialized and installed with a single atomic replace. Failures are
//! never cached.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use linecache_cache::CachedLineSource;
//! use linecache_source::FileLineSource;
//!
//! let file = Arc::new(FileLineSource::new("data/sample.txt")?);
//! let cached = CachedLineSource::new(file, Duration::from_secs(300));
//!
//! let first = cached.produce_lines()?;  // miss: reads the file
//! let second = cached.produce_lines()?; // hit: served from memory
//! ```
//!
//! [`LineSource`]: linecache_core::LineSource

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod cached;
mod config;
mod metrics;
mod store;

pub use cached::CachedLineSource;
pub use config::CacheConfig;
pub use metrics::{CacheMetrics, MetricsSnapshot};
pub use store::{CacheEntry, CacheKey, CacheStore, StoreStats};
