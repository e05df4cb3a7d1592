//! Bounded, TTL-aware cache of range responses.
//!
//! The remote corpus is append-only, so a cached range only ever goes stale
//! by missing newly added suffixes. Entries still expire and the entry count
//! is capped so memory stays bounded in long-running services.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Default maximum number of cached range responses.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Default time-to-live for a cached range response.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Clone)]
struct CachedRange {
    body: Arc<str>,
    fetched_at: Instant,
}

/// Concurrent get/insert cache keyed by digest prefix.
///
/// Duplicate concurrent fetches of the same prefix may race; the GET is
/// idempotent and the last writer wins.
pub struct RangeCache {
    entries: DashMap<String, CachedRange>,
    capacity: usize,
    ttl: Duration,
}

impl RangeCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            capacity,
            ttl,
        }
    }

    /// Returns the cached body for `prefix` when present and within the TTL.
    pub fn get(&self, prefix: &str) -> Option<Arc<str>> {
        let entry = self.entries.get(prefix)?;
        if entry.fetched_at.elapsed() > self.ttl {
            drop(entry);
            self.entries.remove(prefix);
            return None;
        }
        Some(Arc::clone(&entry.body))
    }

    /// Caches `body` for `prefix`.
    ///
    /// At capacity, expired entries are swept first; if the cache is still
    /// full the oldest entry is evicted.
    pub fn insert(&self, prefix: &str, body: Arc<str>) {
        if self.capacity == 0 {
            return;
        }

        if self.entries.len() >= self.capacity && !self.entries.contains_key(prefix) {
            self.entries
                .retain(|_, cached| cached.fetched_at.elapsed() <= self.ttl);
        }
        if self.entries.len() >= self.capacity && !self.entries.contains_key(prefix) {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|entry| entry.value().fetched_at)
                .map(|entry| entry.key().clone());
            if let Some(key) = oldest {
                self.entries.remove(&key);
            }
        }

        self.entries.insert(
            prefix.to_owned(),
            CachedRange {
                body,
                fetched_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
