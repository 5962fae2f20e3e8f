//! Read-through memoization over a slower lookup source

use std::hash::Hash;
use tracing::debug;

use crate::error::Result;
use crate::shared::SharedLruCache;
use crate::stats::CacheStats;

/// Backing lookup consulted on a cache miss
pub trait Source {
    /// Lookup key
    type Key: Hash + Eq + Clone;
    /// Looked-up value
    type Value: Clone;
    /// Failure reported by the source
    type Error;

    /// Load the value for `key`, `Ok(None)` if the source has none
    fn load(&self, key: &Self::Key) -> std::result::Result<Option<Self::Value>, Self::Error>;
}

/// Cache in front of a [`Source`]
pub struct ReadThrough<S: Source> {
    source: S,
    cache: SharedLruCache<S::Key, S::Value>,
}

impl<S: Source> ReadThrough<S> {
    /// Wrap `source` with a cache of `capacity` entries
    pub fn new(source: S, capacity: usize) -> Result<Self> {
        Ok(Self {
            source,
            cache: SharedLruCache::new(capacity)?,
        })
    }

    /// Get a value from cache or source
    ///
    /// Values found in the source are cached; absent keys and source
    /// errors leave the cache unchanged.
    pub fn get(&self, key: &S::Key) -> std::result::Result<Option<S::Value>, S::Error> {
        if let Some(value) = self.cache.get(key) {
            return Ok(Some(value));
        }

        debug!("cache miss, loading from source");
        let value = self.source.load(key)?;
        if let Some(value) = &value {
            self.cache.put(key.clone(), value.clone());
        }
        Ok(value)
    }

    /// Store a value in the cache only
    pub fn put(&self, key: S::Key, value: S::Value) {
        self.cache.put(key, value);
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        self.cache.stats()
    }

    /// Get current cache size
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Underlying source
    pub fn source(&self) -> &S {
        &self.source
    }
}
