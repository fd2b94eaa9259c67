//! File-backed line producer.
//!
//! Opens the file on every call and streams it through a buffered reader.
//! Nothing is held between calls, so the file may appear, change or vanish
//! between invocations.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use linecache_core::error::{LineSourceError, Result};
use linecache_core::traits::{LineSource, SharedSink};
use linecache_core::types::LineSequence;
use linecache_core::TracingSink;

/// Streams the lines of a text file.
///
/// Line terminators (`\n` and `\r\n`) are stripped. A file that is missing,
/// is not a regular file, or fails to read mid-stream surfaces as
/// [`LineSourceError::SourceUnavailable`].
pub struct FileLineSource {
    /// Path to the backing file
    path: PathBuf,
    /// Where open/miss messages go
    sink: SharedSink,
}

impl FileLineSource {
    /// Creates a producer for `path`.
    ///
    /// The path is not checked until [`produce_lines`](LineSource::produce_lines)
    /// runs; only an empty path is rejected here.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if path.as_os_str().is_empty() {
            return Err(LineSourceError::Config("file path must not be empty".into()));
        }

        Ok(Self {
            path,
            sink: Arc::new(TracingSink::new("file")),
        })
    }

    /// Replaces the message sink.
    pub fn with_sink(mut self, sink: SharedSink) -> Self {
        self.sink = sink;
        self
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unavailable(&self, reason: impl Into<String>) -> LineSourceError {
        LineSourceError::source_unavailable(self.path.display().to_string(), reason)
    }

    fn open(&self) -> Result<File> {
        let file = File::open(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => self.unavailable("File not found"),
            _ => self.unavailable(format!("Failed to open file: {}", e)),
        })?;

        let metadata = file
            .metadata()
            .map_err(|e| self.unavailable(format!("Failed to stat file: {}", e)))?;
        if !metadata.is_file() {
            return Err(self.unavailable("Not a regular file"));
        }

        Ok(file)
    }
}

impl LineSource for FileLineSource {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn produce_lines(&self) -> Result<LineSequence> {
        let file = match self.open() {
            Ok(file) => file,
            Err(err) => {
                self.sink.error(&err.to_string());
                return Err(err);
            }
        };

        self.sink
            .info(&format!("Reading lines from file: {}", self.path.display()));

        let name = self.path.display().to_string();
        let lines = BufReader::new(file).lines().map(move |line| {
            line.map_err(|e| LineSourceError::source_unavailable(name.clone(), format!("Read failed: {}", e)))
        });

        debug!("Opened file stream");
        Ok(LineSequence::streaming(lines))
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}
