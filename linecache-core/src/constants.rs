//! Pipeline defaults for LINECACHE.

use std::time::Duration;

// ═══════════════════════════════════════════════════════════════════════════════
// CACHING
// ═══════════════════════════════════════════════════════════════════════════════

/// Number of lines between progress messages while a cache miss drains its producer.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 50_000;

/// Default time-to-live for cached line sequences (5 minutes).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Number of hex characters in a request correlation id.
pub const REQUEST_ID_LEN: usize = 8;

/// Prefix used when rendering cache keys.
pub const CACHE_KEY_PREFIX: &str = "lines";

// ═══════════════════════════════════════════════════════════════════════════════
// MESSAGE FORMATTING
// ═══════════════════════════════════════════════════════════════════════════════

/// Timestamp format used by the console sink.
pub const CONSOLE_TIME_FORMAT: &str = "%H:%M:%S%.3f";

/// Timestamp format used by the logging layer.
pub const CALL_LOG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ═══════════════════════════════════════════════════════════════════════════════
// SAMPLE DATA
// ═══════════════════════════════════════════════════════════════════════════════

/// Default location of the generated sample file, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "data/sample.txt";

/// Default number of lines written by the sample generator.
pub const DEFAULT_SAMPLE_LINES: usize = 1_000_000;
