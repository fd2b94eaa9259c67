//! # LINECACHE Sources
//!
//! Line producers that sit at the bottom of a LINECACHE pipeline.
//!
//! This crate provides two producers:
//!
//! - **File**: Streams newline-delimited text from disk
//! - **Memory**: Serves lines held in memory, for development and testing
//!
//! ## Example
//!
//! ```rust,ignore
//! use linecache_source::FileLineSource;
//! use linecache_core::LineSourceExt;
//!
//! let source = FileLineSource::new("data/sample.txt")?;
//! let count = source.count_lines()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod file;
mod memory;

pub use file::FileLineSource;
pub use memory::MemoryLineSource;
