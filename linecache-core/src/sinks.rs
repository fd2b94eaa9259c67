//! Message sink implementations.
//!
//! - [`ConsoleSink`]: timestamped lines on standard output
//! - [`TracingSink`]: forwards to the `tracing` macros
//! - [`MemorySink`]: records messages for inspection in tests
//! - [`FnSink`]: adapts a closure

use std::fmt;

use chrono::Utc;
use parking_lot::Mutex;

use crate::constants::CONSOLE_TIME_FORMAT;
use crate::traits::{Level, MessageSink};

/// Prints `[HH:MM:SS.fff] [LEVEL] message` to standard output.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    /// Creates a console sink.
    pub fn new() -> Self {
        Self
    }

    /// Renders a message the way this sink prints it.
    pub fn render(level: Level, message: &str) -> String {
        format!("[{}] [{}] {}", Utc::now().format(CONSOLE_TIME_FORMAT), level, message)
    }
}

impl MessageSink for ConsoleSink {
    fn log(&self, level: Level, message: &str) {
        println!("{}", Self::render(level, message));
    }
}

/// Forwards messages to `tracing` under the `linecache` target.
#[derive(Clone, Debug)]
pub struct TracingSink {
    component: String,
}

impl TracingSink {
    /// Creates a sink tagging every event with `component`.
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
        }
    }

    /// The component tag.
    pub fn component(&self) -> &str {
        &self.component
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new("pipeline")
    }
}

impl MessageSink for TracingSink {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::Info => tracing::info!(target: "linecache", component = %self.component, "{}", message),
            Level::Warn => tracing::warn!(target: "linecache", component = %self.component, "{}", message),
            Level::Error => tracing::error!(target: "linecache", component = %self.component, "{}", message),
        }
    }
}

/// Records every message in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<(Level, String)>>,
}

impl MemorySink {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all recorded messages.
    pub fn messages(&self) -> Vec<(Level, String)> {
        self.messages.lock().clone()
    }

    /// Returns the messages recorded at `level`.
    pub fn at_level(&self, level: Level) -> Vec<String> {
        self.messages
            .lock()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Counts messages containing `needle`.
    pub fn count_containing(&self, needle: &str) -> usize {
        self.messages
            .lock()
            .iter()
            .filter(|(_, m)| m.contains(needle))
            .count()
    }

    /// Returns true if any message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.count_containing(needle) > 0
    }

    /// Number of recorded messages.
    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }

    /// Forgets all recorded messages.
    pub fn clear(&self) {
        self.messages.lock().clear();
    }
}

impl MessageSink for MemorySink {
    fn log(&self, level: Level, message: &str) {
        self.messages.lock().push((level, message.to_string()));
    }
}

/// Adapts a closure into a sink.
pub struct FnSink {
    f: Box<dyn Fn(Level, &str) + Send + Sync>,
}

impl FnSink {
    /// Wraps `f`.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Level, &str) + Send + Sync + 'static,
    {
        Self { f: Box::new(f) }
    }
}

impl fmt::Debug for FnSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSink").finish_non_exhaustive()
    }
}

impl MessageSink for FnSink {
    fn log(&self, level: Level, message: &str) {
        (self.f)(level, message);
    }
}
