//! Domain types for LINECACHE.
//!
//! - [`LineSequence`]: Ordered lines moved through every pipeline stage
//! - [`format_count`]: Thousands-grouped rendering of line counts

mod count;
mod lines;

pub use count::*;
pub use lines::*;
