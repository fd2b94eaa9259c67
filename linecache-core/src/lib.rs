//! # LINECACHE Core
//!
//! Core types, errors, and traits shared by every LINECACHE pipeline stage.
//!
//! This crate provides the foundational building blocks used by all other LINECACHE crates:
//!
//! - **Types**: [`LineSequence`], the unit of data moved through a pipeline
//! - **Errors**: The [`LineSourceError`] taxonomy and `Result` alias
//! - **Traits**: The read contract ([`LineSource`]), message sinks and clocks
//! - **Sinks**: Console, `tracing`, in-memory and closure message sinks
//! - **Constants**: Pipeline defaults
//!
//! ## Example
//!
//! ```rust
//! use linecache_core::{LineSequence, LineSource, LineSourceExt, Result};
//!
//! struct Fixed;
//!
//! impl LineSource for Fixed {
//!     fn produce_lines(&self) -> Result<LineSequence> {
//!         Ok(LineSequence::from_lines(vec!["a".into(), "b".into()]))
//!     }
//! }
//!
//! assert_eq!(Fixed.count_lines().unwrap(), 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod clock;
pub mod constants;
pub mod error;
pub mod sinks;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use clock::{ManualClock, SystemClock};
pub use constants::*;
pub use error::{LineSourceError, Result};
pub use sinks::{ConsoleSink, FnSink, MemorySink, TracingSink};
pub use traits::*;
pub use types::*;
