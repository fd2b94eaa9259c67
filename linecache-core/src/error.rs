//! Error types for LINECACHE.
//!
//! Every pipeline stage speaks the same error type so that a failure raised by
//! the innermost producer reaches the outermost caller unchanged.

use thiserror::Error;

/// Result type alias using `LineSourceError`.
pub type Result<T> = std::result::Result<T, LineSourceError>;

/// Main error type for all LINECACHE operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineSourceError {
    /// The backing source could not supply data.
    ///
    /// This is the only failure kind that travels through a pipeline at call
    /// time. Wrapping layers pass it through untouched.
    #[error("Source unavailable: {source_name}: {reason}")]
    SourceUnavailable {
        /// Human-readable name of the failing source (usually a path)
        source_name: String,
        /// What went wrong
        reason: String,
    },

    /// A stage was constructed with an invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LineSourceError {
    /// Builds a `SourceUnavailable` error.
    pub fn source_unavailable(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        LineSourceError::SourceUnavailable {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if the backing source could not be read.
    pub fn is_source_unavailable(&self) -> bool {
        matches!(self, LineSourceError::SourceUnavailable { .. })
    }

    /// Returns true if this is a construction-time configuration error.
    pub fn is_config_error(&self) -> bool {
        matches!(self, LineSourceError::Config(_))
    }
}
