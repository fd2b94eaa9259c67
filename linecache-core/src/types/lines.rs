//! Line sequences.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;

/// Boxed iterator backing a streaming [`LineSequence`].
pub type LineStream = Box<dyn Iterator<Item = Result<String>> + Send>;

/// An ordered sequence of text lines.
///
/// A sequence is either **shared** (backed by an immutable `Arc<[String]>`,
/// as returned by the caching and logging layers) or **streaming** (backed
/// by a lazy producer iterator whose items may fail mid-read).
///
/// Shared sequences hand out clones of their lines; the backing slice is
/// never mutated, so callers holding the same cached lines never observe
/// each other.
pub struct LineSequence {
    repr: Repr,
}

enum Repr {
    Shared { lines: Arc<[String]>, next: usize },
    Streaming(LineStream),
}

impl LineSequence {
    /// Wraps an already materialized, shared set of lines.
    pub fn shared(lines: Arc<[String]>) -> Self {
        Self {
            repr: Repr::Shared { lines, next: 0 },
        }
    }

    /// Materializes a vector of lines into a shared sequence.
    pub fn from_lines(lines: Vec<String>) -> Self {
        Self::shared(Arc::from(lines))
    }

    /// Wraps a lazy iterator of lines.
    pub fn streaming<I>(iter: I) -> Self
    where
        I: Iterator<Item = Result<String>> + Send + 'static,
    {
        Self {
            repr: Repr::Streaming(Box::new(iter)),
        }
    }

    /// An empty, materialized sequence.
    pub fn empty() -> Self {
        Self::from_lines(Vec::new())
    }

    /// Returns true if the lines are held in memory.
    pub fn is_materialized(&self) -> bool {
        matches!(self.repr, Repr::Shared { .. })
    }

    /// Number of lines left, when known without draining.
    pub fn len_hint(&self) -> Option<usize> {
        match &self.repr {
            Repr::Shared { lines, next } => Some(lines.len() - next),
            Repr::Streaming(_) => None,
        }
    }

    /// Drains the sequence into shared storage.
    ///
    /// An unconsumed shared sequence returns its backing slice without
    /// copying. A streaming sequence stops at the first failed item and
    /// returns that error.
    pub fn into_shared(self) -> Result<Arc<[String]>> {
        match self.repr {
            Repr::Shared { lines, next: 0 } => Ok(lines),
            Repr::Shared { lines, next } => Ok(Arc::from(lines[next..].to_vec())),
            Repr::Streaming(iter) => iter.collect::<Result<Vec<String>>>().map(Arc::from),
        }
    }

    /// Drains the sequence into an owned vector.
    pub fn collect_lines(self) -> Result<Vec<String>> {
        match self.repr {
            Repr::Shared { lines, next } => Ok(lines[next..].to_vec()),
            Repr::Streaming(iter) => iter.collect(),
        }
    }
}

impl Iterator for LineSequence {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.repr {
            Repr::Shared { lines, next } => {
                let line = lines.get(*next)?.clone();
                *next += 1;
                Some(Ok(line))
            }
            Repr::Streaming(iter) => iter.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.repr {
            Repr::Shared { lines, next } => {
                let remaining = lines.len() - next;
                (remaining, Some(remaining))
            }
            Repr::Streaming(iter) => iter.size_hint(),
        }
    }
}

impl From<Vec<String>> for LineSequence {
    fn from(lines: Vec<String>) -> Self {
        Self::from_lines(lines)
    }
}

impl From<Arc<[String]>> for LineSequence {
    fn from(lines: Arc<[String]>) -> Self {
        Self::shared(lines)
    }
}

impl fmt::Debug for LineSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Shared { lines, next } => f
                .debug_struct("LineSequence")
                .field("kind", &"shared")
                .field("remaining", &(lines.len() - next))
                .finish(),
            Repr::Streaming(_) => f
                .debug_struct("LineSequence")
                .field("kind", &"streaming")
                .finish_non_exhaustive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LineSourceError;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_shared_iterates_in_order() {
        let seq = LineSequence::from_lines(lines(&["a", "b", "c"]));
        assert!(seq.is_materialized());
        assert_eq!(seq.len_hint(), Some(3));
        assert_eq!(seq.collect_lines().unwrap(), lines(&["a", "b", "c"]));
    }

    #[test]
    fn test_into_shared_does_not_copy() {
        let backing: Arc<[String]> = Arc::from(lines(&["x", "y"]));
        let seq = LineSequence::shared(Arc::clone(&backing));
        let out = seq.into_shared().unwrap();
        assert!(Arc::ptr_eq(&out, &backing));
    }

    #[test]
    fn test_partially_consumed_shared() {
        let mut seq = LineSequence::from_lines(lines(&["a", "b", "c"]));
        assert_eq!(seq.next().unwrap().unwrap(), "a");
        assert_eq!(seq.len_hint(), Some(2));
        assert_eq!(&*seq.into_shared().unwrap(), &lines(&["b", "c"])[..]);
    }

    #[test]
    fn test_streaming_collects() {
        let seq = LineSequence::streaming(lines(&["1", "2"]).into_iter().map(Ok));
        assert!(!seq.is_materialized());
        assert_eq!(seq.len_hint(), None);
        assert_eq!(seq.collect_lines().unwrap(), lines(&["1", "2"]));
    }

    #[test]
    fn test_streaming_stops_at_first_error() {
        let items = vec![
            Ok("1".to_string()),
            Err(LineSourceError::source_unavailable("disk", "read failed")),
            Ok("3".to_string()),
        ];
        let seq = LineSequence::streaming(items.into_iter());
        let err = seq.into_shared().unwrap_err();
        assert!(err.is_source_unavailable());
    }

    #[test]
    fn test_empty() {
        let seq = LineSequence::empty();
        assert_eq!(seq.len_hint(), Some(0));
        assert!(seq.collect_lines().unwrap().is_empty());
    }

    #[test]
    fn test_size_hint_exact_for_shared() {
        let seq = LineSequence::from_lines(lines(&["a", "b"]));
        assert_eq!(seq.size_hint(), (2, Some(2)));
        assert_eq!(seq.count(), 2);
    }
}
