//! The call logging layer.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::debug;

use linecache_core::constants::CALL_LOG_TIME_FORMAT;
use linecache_core::error::Result;
use linecache_core::traits::{LineSource, SharedSink};
use linecache_core::types::LineSequence;

/// Receives one plain text message per call.
pub type MessageFn = Arc<dyn Fn(&str) + Send + Sync>;

const DEFAULT_OPERATION: &str = "LineSource.produce_lines()";

/// Records the start, outcome and duration of every call on an inner source.
///
/// Messages have the form:
///
/// ```text
/// [2024-01-01 12:00:00] LineSource.produce_lines() called
/// [2024-01-01 12:00:00] LineSource.produce_lines() completed successfully. Returned 3 lines in 0ms
/// [2024-01-01 12:00:00] LineSource.produce_lines() failed after 0ms. Error: Source unavailable: ...
/// ```
///
/// Errors are logged and then returned exactly as the inner source produced
/// them.
pub struct LoggingLineSource {
    inner: Arc<dyn LineSource>,
    log: MessageFn,
    operation: String,
}

impl LoggingLineSource {
    /// Wraps `inner`, printing messages to standard output.
    pub fn new(inner: Arc<dyn LineSource>) -> Self {
        Self::with_logger(inner, |message| println!("{}", message))
    }

    /// Wraps `inner`, passing every message to `log`.
    pub fn with_logger<F>(inner: Arc<dyn LineSource>, log: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        Self {
            inner,
            log: Arc::new(log),
            operation: DEFAULT_OPERATION.to_string(),
        }
    }

    /// Wraps `inner`, forwarding every message to `sink` at info level.
    pub fn with_sink(inner: Arc<dyn LineSource>, sink: SharedSink) -> Self {
        Self::with_logger(inner, move |message| sink.info(message))
    }

    /// Overrides the operation name used in messages.
    pub fn with_name(mut self, operation: impl Into<String>) -> Self {
        self.operation = operation.into();
        self
    }

    /// The wrapped source.
    pub fn inner(&self) -> &Arc<dyn LineSource> {
        &self.inner
    }

    fn emit(&self, message: String) {
        (self.log)(&format!(
            "[{}] {}",
            Utc::now().format(CALL_LOG_TIME_FORMAT),
            message
        ));
    }
}

impl LineSource for LoggingLineSource {
    fn produce_lines(&self) -> Result<LineSequence> {
        self.emit(format!("{} called", self.operation));
        let stopwatch = Instant::now();

        match self.inner.produce_lines().and_then(LineSequence::into_shared) {
            Ok(lines) => {
                let elapsed = stopwatch.elapsed();
                self.emit(format!(
                    "{} completed successfully. Returned {} lines in {}ms",
                    self.operation,
                    lines.len(),
                    elapsed.as_millis()
                ));
                debug!(source = %self.inner.describe(), lines = lines.len(), "Logged call succeeded");
                Ok(LineSequence::shared(lines))
            }
            Err(err) => {
                self.emit(format!(
                    "{} failed after {}ms. Error: {}",
                    self.operation,
                    stopwatch.elapsed().as_millis(),
                    err
                ));
                Err(err)
            }
        }
    }

    fn describe(&self) -> String {
        format!("logged({})", self.inner.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use linecache_cache::CachedLineSource;
    use linecache_core::error::LineSourceError;
    use linecache_core::traits::LineSourceExt;
    use linecache_core::{ManualClock, MemorySink};
    use linecache_source::MemoryLineSource;
    use parking_lot::Mutex;
    use proptest::prelude::*;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) + Send + Sync + 'static) {
        let messages = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&messages);
        (messages, move |m: &str| sink.lock().push(m.to_string()))
    }

    fn quiet_cache(inner: Arc<dyn LineSource>, ttl: Duration) -> CachedLineSource {
        CachedLineSource::new(inner, ttl).with_sink(Arc::new(MemorySink::new()))
    }

    #[test]
    fn test_success_messages() {
        let source = Arc::new(MemoryLineSource::new(["a", "b", "c"]));
        let (messages, log) = recorder();
        let logged = LoggingLineSource::with_logger(source, log);

        let lines = logged.produce_lines().unwrap().collect_lines().unwrap();
        assert_eq!(lines, vec!["a", "b", "c"]);

        let messages = messages.lock();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].ends_with("] LineSource.produce_lines() called"));
        assert!(messages[1].contains("completed successfully. Returned 3 lines in"));
        assert!(messages[1].ends_with("ms"));
        // "[yyyy-mm-dd HH:MM:SS] "
        assert_eq!(&messages[0][20..22], "] ");
    }

    #[test]
    fn test_failure_logged_then_returned_unchanged() {
        let source = Arc::new(MemoryLineSource::new(["a"]).with_name("data/sample.txt"));
        source.fail_with("File not found");
        let (messages, log) = recorder();
        let logged = LoggingLineSource::with_logger(source, log);

        let err = logged.produce_lines().unwrap_err();
        assert_eq!(
            err,
            LineSourceError::source_unavailable("data/sample.txt", "File not found")
        );

        let messages = messages.lock();
        assert_eq!(messages.len(), 2);
        assert!(messages[1].contains("LineSource.produce_lines() failed after"));
        assert!(messages[1].ends_with(&format!("Error: {}", err)));
    }

    #[test]
    fn test_mid_stream_failure_is_logged() {
        let source = Arc::new(MemoryLineSource::new(["a", "b", "c"]));
        source.fail_after(1, "connection reset");
        let (messages, log) = recorder();
        let logged = LoggingLineSource::with_logger(source, log);

        assert!(logged.produce_lines().unwrap_err().is_source_unavailable());
        assert!(messages.lock()[1].contains("failed after"));
    }

    #[test]
    fn test_result_is_materialized() {
        let source = Arc::new(MemoryLineSource::numbered(4));
        let (_, log) = recorder();
        let logged = LoggingLineSource::with_logger(source, log);

        let seq = logged.produce_lines().unwrap();
        assert!(seq.is_materialized());
        assert_eq!(seq.len_hint(), Some(4));
    }

    #[test]
    fn test_with_sink_and_name() {
        let source = Arc::new(MemoryLineSource::numbered(2));
        let sink = Arc::new(MemorySink::new());
        let logged = LoggingLineSource::with_sink(source, sink.clone()).with_name("Pipeline.read()");

        logged.count_lines().unwrap();
        assert_eq!(sink.len(), 2);
        assert!(sink.contains("Pipeline.read() called"));
        assert!(sink.contains("Pipeline.read() completed successfully. Returned 2 lines"));
        assert_eq!(logged.describe(), "logged(memory)");
    }

    #[test]
    fn test_logging_over_cache_hits_skips_producer() {
        let source = Arc::new(MemoryLineSource::new(["a", "b", "c"]));
        let cached = Arc::new(quiet_cache(source.clone(), Duration::from_secs(600)));
        let (messages, log) = recorder();
        let logged = LoggingLineSource::with_logger(cached.clone(), log);

        let first = logged.produce_lines().unwrap().into_shared().unwrap();
        let second = logged.produce_lines().unwrap().into_shared().unwrap();

        assert_eq!(source.call_count(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(messages.lock().len(), 4);
        assert_eq!(cached.metrics().hits, 1);
    }

    #[test]
    fn test_cache_over_logging_only_logs_misses() {
        let source = Arc::new(MemoryLineSource::new(["x", "y"]));
        let (messages, log) = recorder();
        let logged = Arc::new(LoggingLineSource::with_logger(source.clone(), log));
        let clock = Arc::new(ManualClock::new());
        let cached = quiet_cache(logged, Duration::from_secs(300)).with_clock(clock.clone());

        cached.count_lines().unwrap();
        cached.count_lines().unwrap();
        assert_eq!(messages.lock().len(), 2);

        clock.advance(Duration::from_secs(301));
        cached.count_lines().unwrap();
        assert_eq!(messages.lock().len(), 4);
        assert_eq!(source.call_count(), 2);
    }

    #[test]
    fn test_failure_through_full_pipeline() {
        let source = Arc::new(MemoryLineSource::new(["a"]).with_name("upstream"));
        source.fail_with("unreachable");
        let cached = Arc::new(quiet_cache(source.clone(), Duration::from_secs(300)));
        let (messages, log) = recorder();
        let logged = LoggingLineSource::with_logger(cached.clone(), log);

        let expected = LineSourceError::source_unavailable("upstream", "unreachable");
        assert_eq!(logged.produce_lines().unwrap_err(), expected);
        assert_eq!(logged.produce_lines().unwrap_err(), expected);

        assert_eq!(source.call_count(), 2);
        assert!(cached.cached_entry().is_none());
        assert_eq!(
            messages
                .lock()
                .iter()
                .filter(|m| m.contains("failed after"))
                .count(),
            2
        );
    }

    #[test]
    fn test_layers_nest_in_any_order() {
        let source = Arc::new(MemoryLineSource::new(["1", "2", "3"]));
        let expected = vec!["1".to_string(), "2".to_string(), "3".to_string()];

        let producer_only: Arc<dyn LineSource> = source.clone();
        let cached: Arc<dyn LineSource> = Arc::new(quiet_cache(source.clone(), Duration::from_secs(60)));
        let logged_cached: Arc<dyn LineSource> =
            Arc::new(LoggingLineSource::with_logger(cached.clone(), |_| {}));
        let cached_logged: Arc<dyn LineSource> = Arc::new(quiet_cache(
            Arc::new(LoggingLineSource::with_logger(source.clone(), |_| {})),
            Duration::from_secs(60),
        ));
        let double_logged: Arc<dyn LineSource> = Arc::new(LoggingLineSource::with_logger(
            Arc::new(LoggingLineSource::with_logger(logged_cached.clone(), |_| {})),
            |_| {},
        ));

        for pipeline in [producer_only, cached, logged_cached, cached_logged, double_logged] {
            let lines = pipeline.produce_lines().unwrap().collect_lines().unwrap();
            assert_eq!(lines, expected, "pipeline {}", pipeline.describe());
        }
    }

    proptest! {
        #[test]
        fn prop_logging_preserves_content(lines in proptest::collection::vec(".*", 0..50)) {
            let source = Arc::new(MemoryLineSource::new(lines.clone()));
            let logged = LoggingLineSource::with_logger(source, |_| {});

            let out = logged.produce_lines().unwrap().collect_lines().unwrap();
            prop_assert_eq!(out, lines);
        }
    }
}
