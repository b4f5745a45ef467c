//! Generic time-expiring result cache
//!
//! Bounded key→value store with per-entry TTL. Three independently configured
//! instances back completion results, retrieval results, and translations.
//! Expiry is lazy: an entry past its TTL behaves as a miss on lookup and is
//! evicted there; inserting beyond capacity evicts the oldest surviving entry
//! first (insertion order).

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct Entry<V> {
    value: V,
    inserted: Instant,
    ttl: Duration,
}

impl<V> Entry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.inserted) > self.ttl
    }
}

struct Inner<V> {
    entries: HashMap<String, Entry<V>>,
    // Insertion order, oldest first. May contain keys already replaced or
    // evicted; those are skipped during eviction.
    order: VecDeque<String>,
}

/// Thread-safe TTL cache with a bounded capacity and a default TTL.
///
/// The lock is held only for map book-keeping; values are cloned out so no
/// caller ever holds the lock across an await point.
pub struct TtlCache<V> {
    inner: Mutex<Inner<V>>,
    capacity: usize,
    default_ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(capacity: usize, default_ttl: Duration) -> Self {
        assert!(capacity > 0, "cache capacity must be non-zero");
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
            capacity,
            default_ttl,
        }
    }

    /// Look up a key. Expired entries are evicted and reported as misses.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        match inner.entries.get(key) {
            Some(entry) if entry.is_expired(now) => {
                inner.entries.remove(key);
                // The queue entry goes too, otherwise expire-then-reinsert
                // cycles would grow it without bound.
                inner.order.retain(|k| k != key);
                None
            }
            Some(entry) => Some(entry.value.clone()),
            None => None,
        }
    }

    /// Insert with the cache's default TTL.
    pub fn put(&self, key: impl Into<String>, value: V) {
        self.put_with_ttl(key, value, self.default_ttl);
    }

    /// Insert with an explicit TTL, evicting the oldest surviving entry when
    /// the capacity bound is reached.
    pub fn put_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();
        let now = Instant::now();
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());

        let replacing = inner.entries.contains_key(&key);
        if replacing {
            // Re-inserting counts as a fresh insertion for eviction order.
            inner.order.retain(|k| k != &key);
        }
        if !replacing && inner.entries.len() >= self.capacity {
            // Walk the insertion order until a still-live key is found.
            while let Some(oldest) = inner.order.pop_front() {
                if inner.entries.remove(&oldest).is_some() {
                    break;
                }
            }
        }

        inner.entries.insert(
            key.clone(),
            Entry {
                value,
                inserted: now,
                ttl,
            },
        );
        inner.order.push_back(key);
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.entries.clear();
        inner.order.clear();
    }

    /// Number of entries currently stored (including not-yet-evicted expired ones).
    pub fn len(&self) -> usize {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
