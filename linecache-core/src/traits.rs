//! Common traits for LINECACHE.
//!
//! These traits define the seams between pipeline stages, so producers,
//! decorators, loggers and clocks can be swapped independently.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::error::Result;
use crate::types::LineSequence;

// ═══════════════════════════════════════════════════════════════════════════════
// READ CONTRACT
// ═══════════════════════════════════════════════════════════════════════════════

/// The read contract implemented by every pipeline stage.
///
/// Producers implement it directly; decorators implement it while holding
/// another `LineSource`, which lets any stage nest inside any other in any
/// order.
pub trait LineSource: Send + Sync {
    /// Produces the ordered lines of this source.
    ///
    /// Fails with [`LineSourceError::SourceUnavailable`](crate::LineSourceError::SourceUnavailable)
    /// when the backing source cannot be read.
    fn produce_lines(&self) -> Result<LineSequence>;

    /// Short name of this source for log messages.
    fn describe(&self) -> String {
        "line source".to_string()
    }
}

impl<T: LineSource + ?Sized> LineSource for Arc<T> {
    fn produce_lines(&self) -> Result<LineSequence> {
        (**self).produce_lines()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<T: LineSource + ?Sized> LineSource for Box<T> {
    fn produce_lines(&self) -> Result<LineSequence> {
        (**self).produce_lines()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Convenience helpers available on every [`LineSource`].
pub trait LineSourceExt: LineSource {
    /// Produces the lines and materializes them into a shared sequence.
    fn read_all(&self) -> Result<LineSequence> {
        let lines = self.produce_lines()?.into_shared()?;
        Ok(LineSequence::shared(lines))
    }

    /// Produces the lines and counts them, failing on the first bad item.
    fn count_lines(&self) -> Result<usize> {
        let mut count = 0;
        for line in self.produce_lines()? {
            line?;
            count += 1;
        }
        Ok(count)
    }
}

impl<T: LineSource + ?Sized> LineSourceExt for T {}

// ═══════════════════════════════════════════════════════════════════════════════
// MESSAGE SINK
// ═══════════════════════════════════════════════════════════════════════════════

/// Severity of a sink message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Level {
    /// Normal operation
    Info,
    /// Unexpected but recoverable
    Warn,
    /// A failed operation
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        };
        f.write_str(label)
    }
}

/// Receives one text message per call.
///
/// Sinks are expected to be fast and non-blocking; stages call them inline.
pub trait MessageSink: Send + Sync {
    /// Records a message at the given level.
    fn log(&self, level: Level, message: &str);

    /// Records an info message.
    fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    /// Records a warning.
    fn warn(&self, message: &str) {
        self.log(Level::Warn, message);
    }

    /// Records an error.
    fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }
}

/// Shared handle to a message sink.
pub type SharedSink = Arc<dyn MessageSink>;

// ═══════════════════════════════════════════════════════════════════════════════
// CLOCK
// ═══════════════════════════════════════════════════════════════════════════════

/// Source of monotonic time for TTL checks.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}
