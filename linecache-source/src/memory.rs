//! In-memory line producer.
//!
//! Fast, thread-safe producer suitable for development, testing and demos.
//! The served lines and the failure mode can be changed at runtime, and
//! every invocation is counted.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::RwLock;
use tracing::trace;

use linecache_core::error::{LineSourceError, Result};
use linecache_core::traits::LineSource;
use linecache_core::types::LineSequence;

/// How the next invocations should fail, if at all.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Failure {
    None,
    /// Fail before yielding anything
    Immediate(String),
    /// Yield this many lines, then fail
    AfterLines(usize, String),
}

/// Serves a vector of lines held in memory.
///
/// Lines are handed out as a streaming sequence so that wrapping layers see
/// the same shape they would see from a file.
///
/// # Thread Safety
///
/// All operations are thread-safe and can be called concurrently.
#[derive(Debug)]
pub struct MemoryLineSource {
    name: String,
    lines: RwLock<Vec<String>>,
    failure: RwLock<Failure>,
    delay: Option<Duration>,
    calls: AtomicU64,
}

impl MemoryLineSource {
    /// Creates a producer serving `lines`.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: "memory".into(),
            lines: RwLock::new(lines.into_iter().map(Into::into).collect()),
            failure: RwLock::new(Failure::None),
            delay: None,
            calls: AtomicU64::new(0),
        }
    }

    /// Creates a producer serving `Line 1` through `Line {count}`.
    pub fn numbered(count: usize) -> Self {
        Self::new((1..=count).map(|i| format!("Line {}", i)))
    }

    /// Sets the name used in errors and log messages.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sleeps for `delay` on every invocation, to simulate an expensive upstream.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Replaces the served lines.
    pub fn set_lines<I, S>(&self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.lines.write() = lines.into_iter().map(Into::into).collect();
    }

    /// Makes every following invocation fail with `reason`.
    pub fn fail_with(&self, reason: impl Into<String>) {
        *self.failure.write() = Failure::Immediate(reason.into());
    }

    /// Makes every following invocation yield `lines` lines and then fail.
    pub fn fail_after(&self, lines: usize, reason: impl Into<String>) {
        *self.failure.write() = Failure::AfterLines(lines, reason.into());
    }

    /// Clears any configured failure.
    pub fn recover(&self) {
        *self.failure.write() = Failure::None;
    }

    /// Number of times `produce_lines` was invoked.
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of lines currently served.
    pub fn len(&self) -> usize {
        self.lines.read().len()
    }

    /// Returns true if no lines are served.
    pub fn is_empty(&self) -> bool {
        self.lines.read().is_empty()
    }

    fn unavailable(&self, reason: &str) -> LineSourceError {
        LineSourceError::source_unavailable(self.name.clone(), reason)
    }
}

impl Default for MemoryLineSource {
    fn default() -> Self {
        Self::new(Vec::<String>::new())
    }
}

impl LineSource for MemoryLineSource {
    fn produce_lines(&self) -> Result<LineSequence> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        trace!(call, name = %self.name, "memory source invoked");

        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        let failure = self.failure.read().clone();
        let lines = self.lines.read().clone();

        match failure {
            Failure::None => Ok(LineSequence::streaming(lines.into_iter().map(Ok))),
            Failure::Immediate(reason) => Err(self.unavailable(&reason)),
            Failure::AfterLines(n, reason) => {
                let err = self.unavailable(&reason);
                let head = lines.into_iter().take(n).map(Ok::<String, LineSourceError>);
                Ok(LineSequence::streaming(head.chain(std::iter::once(Err(err)))))
            }
        }
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linecache_core::traits::LineSourceExt;

    #[test]
    fn test_serves_lines_in_order() {
        let source = MemoryLineSource::new(["a", "b", "c"]);
        let lines = source.produce_lines().unwrap().collect_lines().unwrap();
        assert_eq!(lines, vec!["a", "b", "c"]);
        assert_eq!(source.call_count(), 1);
    }

    #[test]
    fn test_numbered() {
        let source = MemoryLineSource::numbered(3);
        let lines = source.produce_lines().unwrap().collect_lines().unwrap();
        assert_eq!(lines, vec!["Line 1", "Line 2", "Line 3"]);
        assert_eq!(source.len(), 3);
    }

    #[test]
    fn test_set_lines() {
        let source = MemoryLineSource::new(["old"]);
        source.set_lines(["new", "newer"]);
        assert_eq!(source.count_lines().unwrap(), 2);
        assert_eq!(source.call_count(), 1);
    }

    #[test]
    fn test_fail_with_and_recover() {
        let source = MemoryLineSource::new(["a"]).with_name("upstream");
        source.fail_with("offline");

        let err = source.produce_lines().unwrap_err();
        assert_eq!(err, LineSourceError::source_unavailable("upstream", "offline"));

        source.recover();
        assert_eq!(source.count_lines().unwrap(), 1);
        assert_eq!(source.call_count(), 2);
    }

    #[test]
    fn test_fail_after_lines() {
        let source = MemoryLineSource::new(["a", "b", "c"]);
        source.fail_after(2, "truncated");

        let mut seq = source.produce_lines().unwrap();
        assert_eq!(seq.next().unwrap().unwrap(), "a");
        assert_eq!(seq.next().unwrap().unwrap(), "b");
        assert!(seq.next().unwrap().unwrap_err().is_source_unavailable());
    }

    #[test]
    fn test_default_is_empty() {
        let source = MemoryLineSource::default();
        assert!(source.is_empty());
        assert_eq!(source.count_lines().unwrap(), 0);
        assert_eq!(source.describe(), "memory");
    }
}
