//! In-memory LRU response cache

use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::traits::ResponseCache;

/// Default number of cached replies
pub const DEFAULT_CAPACITY: usize = 500;

struct CacheEntry {
    value: String,
    last_used: u64,
}

struct Entries {
    map: HashMap<String, CacheEntry>,
    /// Monotonic use counter; higher is more recent
    clock: u64,
}

impl Entries {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn evict_lru(&mut self) -> Option<String> {
        let oldest = self.map
            .iter()
            .min_by_key(|(_, e)| e.last_used)
            .map(|(k, _)| k.clone())?;
        self.map.remove(&oldest);
        Some(oldest)
    }
}

/// Bounded key/value cache with least-recently-used eviction
pub struct LruCache {
    entries: Mutex<Entries>,
    capacity: usize,
}

impl LruCache {
    /// Create a cache holding at most `capacity` entries (at least one)
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(Entries {
                map: HashMap::with_capacity(capacity.min(DEFAULT_CAPACITY)),
                clock: 0,
            }),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a key is present, without touching its recency
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .lock()
            .map(|e| e.map.contains_key(key))
            .unwrap_or(false)
    }
}

impl Default for LruCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ResponseCache for LruCache {
    fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock().ok()?;
        let now = entries.tick();
        let entry = entries.map.get_mut(key)?;
        entry.last_used = now;
        Some(entry.value.clone())
    }

    fn set(&self, key: &str, value: &str) {
        let Ok(mut entries) = self.entries.lock() else {
            tracing::warn!("Response cache lock poisoned, skipping store");
            return;
        };

        let now = entries.tick();
        if let Some(entry) = entries.map.get_mut(key) {
            entry.value = value.to_string();
            entry.last_used = now;
            return;
        }

        while entries.map.len() >= self.capacity {
            match entries.evict_lru() {
                Some(evicted) => tracing::debug!("Evicted cached reply for {:?}", evicted),
                None => break,
            }
        }

        entries.map.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                last_used: now,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_returns_value() {
        let cache = LruCache::new(2);
        cache.set("hello", "hi!");
        assert_eq!(cache.get("hello").as_deref(), Some("hi!"));
        assert_eq!(cache.get("absent"), None);
    }

    #[test]
    fn never_exceeds_capacity() {
        let cache = LruCache::new(3);
        for i in 0..10 {
            cache.set(&format!("k{i}"), "v");
            assert!(cache.len() <= 3);
        }
        assert_eq!(cache.len(), 3);
        assert!(cache.contains("k9") && cache.contains("k8") && cache.contains("k7"));
    }

    #[test]
    fn evicts_least_recently_used() {
        let cache = LruCache::new(2);
        cache.set("a", "1");
        cache.set("b", "2");

        // Touch "a" so "b" becomes the eviction victim.
        assert!(cache.get("a").is_some());
        cache.set("c", "3");

        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
        assert!(cache.contains("c"));
    }

    #[test]
    fn overwrite_does_not_evict() {
        let cache = LruCache::new(2);
        cache.set("a", "1");
        cache.set("b", "2");
        cache.set("a", "updated");

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a").as_deref(), Some("updated"));
        assert_eq!(cache.get("b").as_deref(), Some("2"));
    }

    #[test]
    fn overwrite_refreshes_recency() {
        let cache = LruCache::new(2);
        cache.set("a", "1");
        cache.set("b", "2");
        cache.set("a", "1b");
        cache.set("c", "3");

        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
    }

    #[test]
    fn zero_capacity_still_holds_one() {
        let cache = LruCache::new(0);
        cache.set("a", "1");
        cache.set("b", "2");
        assert_eq!(cache.capacity(), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("b").as_deref(), Some("2"));
    }

    #[test]
    fn keys_are_exact_text() {
        let cache = LruCache::default();
        cache.set("hello ", "with space");
        assert_eq!(cache.get("hello"), None);
        assert_eq!(cache.get("Hello "), None);
        assert_eq!(cache.get("hello ").as_deref(), Some("with space"));
    }
}
