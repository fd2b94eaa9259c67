//! The caching layer.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, instrument};
use uuid::Uuid;

use linecache_core::constants::REQUEST_ID_LEN;
use linecache_core::error::Result;
use linecache_core::traits::{Clock, LineSource, SharedSink};
use linecache_core::types::{format_count, LineSequence};
use linecache_core::{ConsoleSink, SystemClock};

use crate::config::CacheConfig;
use crate::metrics::{CacheMetrics, MetricsSnapshot};
use crate::store::{CacheEntry, CacheKey, CacheStore};

/// Caches the full output of an inner [`LineSource`] for a fixed TTL.
///
/// # Flow
///
/// 1. Look up the entry for this layer's [`CacheKey`]
/// 2. If it is at most `ttl` old, return its lines without calling the inner source
/// 3. Otherwise drain the inner source into memory, reporting progress
/// 4. Install the new entry, replacing the old one, and return its lines
///
/// A failed fetch installs nothing and returns the inner error unchanged;
/// whatever entry was stored before stays in place.
///
/// # Concurrency
///
/// `produce_lines` may be called from many threads at once. Two threads
/// missing at the same time will both fetch, and the last install wins.
pub struct CachedLineSource {
    inner: Arc<dyn LineSource>,
    key: CacheKey,
    config: CacheConfig,
    store: Arc<CacheStore>,
    clock: Arc<dyn Clock>,
    sink: SharedSink,
    metrics: CacheMetrics,
}

impl CachedLineSource {
    /// Wraps `inner` with the given TTL.
    ///
    /// Uses a private store, the system clock and a console sink.
    pub fn new(inner: Arc<dyn LineSource>, ttl: Duration) -> Self {
        Self::build(inner, CacheConfig::new(ttl))
    }

    /// Wraps `inner` with a full configuration.
    pub fn with_config(inner: Arc<dyn LineSource>, config: CacheConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(inner, config))
    }

    fn build(inner: Arc<dyn LineSource>, config: CacheConfig) -> Self {
        let key = CacheKey::for_source(&inner);
        debug!(%key, source = %inner.describe(), ttl_ms = config.ttl.as_millis() as u64, "Created caching layer");

        Self {
            inner,
            key,
            config,
            store: CacheStore::shared(),
            clock: Arc::new(SystemClock),
            sink: Arc::new(ConsoleSink),
            metrics: CacheMetrics::default(),
        }
    }

    /// Replaces the message sink.
    pub fn with_sink(mut self, sink: SharedSink) -> Self {
        self.sink = sink;
        self
    }

    /// Uses `store` instead of the private one.
    pub fn with_store(mut self, store: Arc<CacheStore>) -> Self {
        self.store = store;
        self
    }

    /// Uses `clock` for TTL checks.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The TTL this layer enforces.
    pub fn ttl(&self) -> Duration {
        self.config.ttl
    }

    /// The layer configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// The slot this layer reads and writes.
    pub fn cache_key(&self) -> CacheKey {
        self.key
    }

    /// The backing store.
    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }

    /// The wrapped source.
    pub fn inner(&self) -> &Arc<dyn LineSource> {
        &self.inner
    }

    /// The current entry for this layer, fresh or expired.
    pub fn cached_entry(&self) -> Option<Arc<CacheEntry>> {
        self.store.get(&self.key)
    }

    /// Hit/miss counters.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    fn drain(&self, request_id: &str) -> Result<Arc<[String]>> {
        let mut lines = Vec::new();
        let mut chunk = 0;

        for line in self.inner.produce_lines()? {
            lines.push(line?);

            if lines.len() % self.config.progress_interval == 0 {
                chunk += 1;
                self.sink.info(&format!(
                    "[{}] Cached chunk {}: {} lines",
                    request_id,
                    chunk,
                    format_count(lines.len())
                ));
            }
        }

        Ok(Arc::from(lines))
    }
}

impl LineSource for CachedLineSource {
    #[instrument(level = "debug", skip(self), fields(key = %self.key))]
    fn produce_lines(&self) -> Result<LineSequence> {
        let request_id = new_request_id();
        let now = self.clock.now();

        if let Some(entry) = self.store.get(&self.key) {
            if entry.is_fresh(now, self.config.ttl) {
                self.metrics.record_hit();
                self.sink.info(&format!(
                    "[{}] Cache HIT - serving {} cached lines",
                    request_id,
                    format_count(entry.line_count())
                ));
                return Ok(LineSequence::shared(Arc::clone(entry.lines())));
            }
            debug!(age_ms = entry.age(now).as_millis() as u64, "Cached entry expired");
        }

        self.metrics.record_miss();
        self.sink
            .info(&format!("[{}] Cache MISS - fetching fresh data", request_id));

        let stopwatch = Instant::now();
        let lines = match self.drain(&request_id) {
            Ok(lines) => lines,
            Err(err) => {
                self.metrics.record_failure();
                self.sink.error(&format!(
                    "[{}] Fetch failed after {}ms: {}",
                    request_id,
                    stopwatch.elapsed().as_millis(),
                    err
                ));
                return Err(err);
            }
        };
        let elapsed = stopwatch.elapsed();

        let entry = self
            .store
            .install(self.key, CacheEntry::new(lines, now, &self.inner));

        self.sink.info(&format!(
            "[{}] Cached {} lines in {}ms (expires in {})",
            request_id,
            format_count(entry.line_count()),
            elapsed.as_millis(),
            describe_ttl(self.config.ttl)
        ));

        Ok(LineSequence::shared(Arc::clone(entry.lines())))
    }

    fn describe(&self) -> String {
        format!("cached({})", self.inner.describe())
    }
}

fn new_request_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(REQUEST_ID_LEN);
    id
}

fn describe_ttl(ttl: Duration) -> String {
    let secs = ttl.as_secs();
    if ttl.subsec_nanos() != 0 {
        format!("{}ms", ttl.as_millis())
    } else if secs >= 60 && secs % 60 == 0 {
        match secs / 60 {
            1 => "1 minute".to_string(),
            minutes => format!("{} minutes", minutes),
        }
    } else {
        match secs {
            1 => "1 second".to_string(),
            _ => format!("{} seconds", secs),
        }
    }
}
