//! # LINECACHE Logging
//!
//! A wrapping layer that records every call on a [`LineSource`]: when it
//! started, how many lines came back and how long it took, or how it failed.
//!
//! The layer never changes what flows through it. To count lines reliably it
//! materializes the inner sequence, which removes any streaming benefit of
//! the layers beneath it.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use linecache_logging::LoggingLineSource;
//!
//! let logged = LoggingLineSource::new(Arc::new(cached));
//! let lines = logged.produce_lines()?;
//! ```
//!
//! [`LineSource`]: linecache_core::LineSource

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod logging;

pub use logging::{LoggingLineSource, MessageFn};
