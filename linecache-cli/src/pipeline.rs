//! Pipeline assembly: producer, then optional cache, then optional call log.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::Serialize;

use linecache_cache::{CacheConfig, CachedLineSource, MetricsSnapshot, StoreStats};
use linecache_core::{LineSource, SharedSink, TracingSink};
use linecache_logging::LoggingLineSource;

/// Which layers to stack on top of the producer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Layers {
    pub cache: Option<Duration>,
    pub log: bool,
}

/// A composed pipeline. Keeps a handle on the cache layer for reporting.
pub struct Pipeline {
    head: Arc<dyn LineSource>,
    cache: Option<Arc<CachedLineSource>>,
}

/// Outcome of one call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CallReport {
    pub lines: usize,
    pub elapsed_ms: u128,
}

#[derive(Debug, Serialize)]
pub struct CacheReport {
    pub key: String,
    pub ttl_secs: u64,
    pub metrics: MetricsSnapshot,
    pub store: StoreStats,
}

impl Pipeline {
    /// Stacks the requested layers on `producer`.
    pub fn build(
        producer: Arc<dyn LineSource>,
        layers: Layers,
        progress_interval: usize,
        sink: SharedSink,
    ) -> Result<Self> {
        let mut head = producer;
        let mut cache = None;

        if let Some(ttl) = layers.cache {
            let config = CacheConfig::new(ttl).progress_interval(progress_interval);
            let cached = Arc::new(
                CachedLineSource::with_config(head, config)
                    .context("Invalid cache configuration")?
                    .with_sink(sink.clone()),
            );
            head = cached.clone();
            cache = Some(cached);
        }

        if layers.log {
            head = Arc::new(LoggingLineSource::with_sink(head, sink));
        }

        Ok(Self { head, cache })
    }

    /// Same as [`Pipeline::build`] with messages routed to `tracing`.
    pub fn traced(producer: Arc<dyn LineSource>, layers: Layers, progress_interval: usize) -> Result<Self> {
        Self::build(producer, layers, progress_interval, Arc::new(TracingSink::new("pipeline")))
    }

    pub fn describe(&self) -> String {
        self.head.describe()
    }

    /// Invokes the pipeline once and consumes at most `take` lines.
    pub fn call(&self, take: Option<usize>) -> Result<CallReport> {
        let stopwatch = Instant::now();
        let sequence = self
            .head
            .produce_lines()
            .with_context(|| format!("Failed to read from {}", self.describe()))?;

        let mut lines = 0;
        for line in sequence.take(take.unwrap_or(usize::MAX)) {
            line.with_context(|| format!("Failed while reading {}", self.describe()))?;
            lines += 1;
        }

        Ok(CallReport {
            lines,
            elapsed_ms: stopwatch.elapsed().as_millis(),
        })
    }

    /// Cache metrics and store stats, when the pipeline has a cache layer.
    pub fn cache_report(&self) -> Option<CacheReport> {
        self.cache.as_ref().map(|cached| CacheReport {
            key: cached.cache_key().to_string(),
            ttl_secs: cached.ttl().as_secs(),
            metrics: cached.metrics(),
            store: cached.store().stats(),
        })
    }
}
