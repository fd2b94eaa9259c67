//! The cache store: one memoized result set per cache key.

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::Serialize;
use tracing::debug;

use linecache_core::constants::CACHE_KEY_PREFIX;
use linecache_core::traits::LineSource;

/// Identifies one cache slot.
///
/// Derived from the allocation address of the wrapped producer, so two
/// layers around distinct producer instances never share a slot, while two
/// layers around the *same* `Arc` do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CacheKey(usize);

impl CacheKey {
    /// Derives the key for a producer instance.
    pub fn for_source(source: &Arc<dyn LineSource>) -> Self {
        Self(Arc::as_ptr(source) as *const () as usize)
    }

    /// Raw identity value.
    pub fn as_usize(&self) -> usize {
        self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:x}", CACHE_KEY_PREFIX, self.0)
    }
}

/// One memoized fetch.
///
/// Holds a weak reference to the producer it was fetched from. The weak
/// reference keeps the producer's allocation reserved, so the address backing
/// the [`CacheKey`] cannot be handed to a different producer while this
/// entry exists.
pub struct CacheEntry {
    lines: Arc<[String]>,
    cached_at: Instant,
    line_count: usize,
    owner: Weak<dyn LineSource>,
}

impl CacheEntry {
    /// Builds an entry for lines fetched from `owner` at `cached_at`.
    pub fn new(lines: Arc<[String]>, cached_at: Instant, owner: &Arc<dyn LineSource>) -> Self {
        Self {
            line_count: lines.len(),
            lines,
            cached_at,
            owner: Arc::downgrade(owner),
        }
    }

    /// The cached lines.
    pub fn lines(&self) -> &Arc<[String]> {
        &self.lines
    }

    /// When the lines were fetched.
    pub fn cached_at(&self) -> Instant {
        self.cached_at
    }

    /// Number of cached lines.
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Age of the entry at `now`. Zero if `now` precedes the fetch.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.cached_at)
    }

    /// Returns true if the entry may still be served at `now`.
    pub fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        self.age(now) <= ttl
    }

    /// Returns true once the producer this entry came from has been dropped.
    pub fn is_orphaned(&self) -> bool {
        self.owner.strong_count() == 0
    }
}

impl fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("line_count", &self.line_count)
            .field("cached_at", &self.cached_at)
            .field("orphaned", &self.is_orphaned())
            .finish()
    }
}

/// Concurrent map from [`CacheKey`] to [`CacheEntry`].
///
/// # Thread Safety
///
/// Entries are stored behind `Arc` and replaced wholesale: a lookup either
/// finds nothing or clones out a complete entry, and an install swaps in a
/// fully built entry with one map insert. Concurrent installs on the same key
/// resolve to the last one to complete.
///
/// A store may be shared by several caching layers through `Arc`. Entries
/// live until replaced, removed, or the store is dropped.
#[derive(Debug, Default)]
pub struct CacheStore {
    entries: DashMap<CacheKey, Arc<CacheEntry>>,
}

impl CacheStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store ready to be shared between layers.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Looks up the entry for `key`, fresh or not.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<CacheEntry>> {
        self.entries.get(key).map(|entry| Arc::clone(entry.value()))
    }

    /// Installs `entry` under `key`, replacing whatever was there.
    ///
    /// Returns the installed entry.
    pub fn install(&self, key: CacheKey, entry: CacheEntry) -> Arc<CacheEntry> {
        let entry = Arc::new(entry);
        let replaced = self.entries.insert(key, Arc::clone(&entry));
        debug!(
            %key,
            lines = entry.line_count(),
            replaced = replaced.is_some(),
            "Installed cache entry"
        );
        entry
    }

    /// Removes the entry for `key`.
    pub fn remove(&self, key: &CacheKey) -> Option<Arc<CacheEntry>> {
        self.entries.remove(key).map(|(_, entry)| entry)
    }

    /// Drops entries whose producer no longer exists.
    ///
    /// Returns the number of entries removed.
    pub fn purge_orphaned(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_orphaned());
        let purged = before.saturating_sub(self.entries.len());
        if purged > 0 {
            debug!(purged, "Purged orphaned cache entries");
        }
        purged
    }

    /// Clears all entries.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns store statistics.
    pub fn stats(&self) -> StoreStats {
        let mut stats = StoreStats::default();
        for entry in self.entries.iter() {
            stats.entries += 1;
            stats.total_lines += entry.line_count();
            if entry.is_orphaned() {
                stats.orphaned_entries += 1;
            }
        }
        stats
    }
}

/// Store statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Number of entries
    pub entries: usize,
    /// Lines held across all entries
    pub total_lines: usize,
    /// Entries whose producer has been dropped
    pub orphaned_entries: usize,
}
