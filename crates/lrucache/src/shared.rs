//! Thread-safe LRU cache handle
//!
//! Both `get` and `put` touch both ends of the recency list, so the whole
//! cache sits behind a single lock.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;
use parking_lot::Mutex;

use crate::error::Result;
use crate::lru::{LruCache, Upsert};
use crate::stats::CacheStats;

/// Cloneable, lock-guarded LRU cache with hit/miss statistics
pub struct SharedLruCache<K, V> {
    /// Cache guarded by one lock
    cache: Arc<Mutex<LruCache<K, V>>>,

    /// Cache statistics
    stats: Arc<CacheStats>,

    /// Cache capacity
    capacity: usize,
}

impl<K, V> Clone for SharedLruCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            stats: Arc::clone(&self.stats),
            capacity: self.capacity,
        }
    }
}

impl<K, V> SharedLruCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Create a new shared cache with the given capacity
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of items in cache
    ///
    /// # Returns
    /// * `Result<SharedLruCache>` - Error if `capacity` is zero
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self {
            cache: Arc::new(Mutex::new(LruCache::new(capacity)?)),
            stats: Arc::new(CacheStats::new()),
            capacity,
        })
    }

    /// Get a copy of the cached value, marking it most recently used
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let value = self.cache.lock().get(key).cloned();

        match value {
            Some(_) => self.stats.record_hit(),
            None => self.stats.record_miss(),
        }
        value
    }

    /// Insert or update a key-value pair
    pub fn put(&self, key: K, value: V) {
        let outcome = self.cache.lock().upsert(key, value);

        match outcome {
            Upsert::Updated => self.stats.record_update(),
            Upsert::Inserted(evicted) => {
                self.stats.record_insert();
                if evicted.is_some() {
                    self.stats.record_eviction();
                }
            }
        }
    }

    /// Check if `key` is cached without touching its recency
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.cache.lock().contains(key)
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Get current cache size
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::thread;

    #[test]
    fn test_shared_zero_capacity() {
        let result = SharedLruCache::<u64, u64>::new(0);
        assert!(matches!(result, Err(Error::InvalidCapacity(0))));
    }

    #[test]
    fn test_shared_hit_miss() {
        let cache = SharedLruCache::new(10).unwrap();

        cache.put("k1".to_string(), b"test data".to_vec());

        assert_eq!(cache.get("k1"), Some(b"test data".to_vec()));
        assert_eq!(cache.get("k2"), None);
        assert_eq!(cache.stats().hits(), 1);
        assert_eq!(cache.stats().misses(), 1);
    }

    #[test]
    fn test_shared_eviction_stats() {
        let cache = SharedLruCache::new(2).unwrap();

        cache.put(0u64, "data 0");
        cache.put(1u64, "data 1");
        cache.put(1u64, "data 1b");
        cache.put(2u64, "data 2"); // Evicts 0

        assert_eq!(cache.len(), 2);
        assert!(!cache.contains(&0));

        let stats = cache.stats().snapshot();
        assert_eq!(stats.inserts, 3);
        assert_eq!(stats.updates, 1);
        assert_eq!(stats.evictions, 1);
    }

    #[test]
    fn test_shared_update_refreshes_without_eviction() {
        let cache = SharedLruCache::new(2).unwrap();

        cache.put("a", 1);
        cache.put("b", 2);
        cache.put("a", 3); // b is now least recently used
        cache.put("c", 4);

        assert_eq!(cache.get("a"), Some(3));
        assert_eq!(cache.get("b"), None);
        let stats = cache.stats().snapshot();
        assert_eq!((stats.inserts, stats.updates, stats.evictions), (3, 1, 1));
    }

    #[test]
    fn test_shared_huge_capacity() {
        let cache = SharedLruCache::new(usize::MAX).unwrap();

        cache.put(1u64, "one");
        assert_eq!(cache.get(&1), Some("one"));
        assert_eq!(cache.capacity(), usize::MAX);
    }

    #[test]
    fn test_shared_across_threads() {
        let cache = SharedLruCache::new(64).unwrap();

        let handles: Vec<_> = (0..4u64)
            .map(|t| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for i in 0..100u64 {
                        let key = t * 1000 + i;
                        cache.put(key, i);
                        cache.get(&key);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 64);
        assert_eq!(cache.capacity(), 64);
        let stats = cache.stats().snapshot();
        assert_eq!(stats.inserts, 400);
        assert_eq!(stats.evictions, 400 - 64);
        assert_eq!(stats.hits + stats.misses, 400);
    }
}
