//! LRU (Least Recently Used) cache implementation
//!
//! Composes a [`KeyIndex`] with a [`RecencyList`]: the index answers
//! "where is this key" in O(1), the list answers "who is oldest" in O(1).

use std::borrow::Borrow;
use std::hash::Hash;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::index::KeyIndex;
use crate::list::RecencyList;

/// Upper bound on slots reserved up front; larger caches grow on demand
const PREALLOC_LIMIT: usize = 1024;

/// What a put did to the cache
pub(crate) enum Upsert<K, V> {
    /// Existing key, value replaced
    Updated,
    /// New key, with the entry evicted to make room if any
    Inserted(Option<(K, V)>),
}

/// LRU cache with fixed capacity
pub struct LruCache<K, V> {
    index: KeyIndex<K>,
    list: RecencyList<K, V>,
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new LRU cache holding at most `capacity` entries
    ///
    /// # Errors
    /// * [`Error::InvalidCapacity`] if `capacity` is zero
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity(capacity));
        }

        debug!(capacity, "creating lru cache");

        // One spare slot: a new key is linked before the head is evicted.
        let reserve = capacity.saturating_add(1).min(PREALLOC_LIMIT);
        Ok(Self {
            index: KeyIndex::with_capacity(reserve),
            list: RecencyList::with_capacity(reserve),
            capacity,
        })
    }

    /// Get a value from the cache, marking it most recently used
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let handle = self.index.lookup(key)?;
        self.list.move_to_tail(handle);
        self.list.value(handle)
    }

    /// Get a value without touching its recency
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index
            .lookup(key)
            .and_then(|handle| self.list.value(handle))
    }

    /// Check if `key` is cached without touching its recency
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains(key)
    }

    /// Insert or update a key-value pair
    pub fn put(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    /// Insert or update a key-value pair, returning the evicted entry
    ///
    /// An existing key has its value replaced and becomes most recently
    /// used; this never evicts. A new key that pushes the cache over
    /// capacity evicts exactly the least recently used entry.
    pub fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        match self.upsert(key, value) {
            Upsert::Updated => None,
            Upsert::Inserted(evicted) => evicted,
        }
    }

    pub(crate) fn upsert(&mut self, key: K, value: V) -> Upsert<K, V> {
        if let Some(handle) = self.index.lookup(&key) {
            if let Some(slot) = self.list.value_mut(handle) {
                *slot = value;
            }
            self.list.move_to_tail(handle);
            return Upsert::Updated;
        }

        let handle = self.list.push_tail(key.clone(), value);
        self.index.insert(key, handle);

        if self.list.len() > self.capacity {
            Upsert::Inserted(self.evict())
        } else {
            Upsert::Inserted(None)
        }
    }

    /// Current number of entries
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Keys from least to most recently used
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.list.iter().map(|(key, _)| key)
    }

    /// Entries from least to most recently used
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.list.iter()
    }

    fn evict(&mut self) -> Option<(K, V)> {
        let (key, value) = self.list.pop_head()?;
        self.index.remove(&key);
        trace!(len = self.list.len(), "evicted least recently used entry");
        Some((key, value))
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) -> std::result::Result<(), String> {
        self.list.check_links()?;

        if self.index.len() != self.list.len() {
            return Err(format!(
                "index has {} keys, list has {} entries",
                self.index.len(),
                self.list.len()
            ));
        }
        if self.list.len() > self.capacity {
            return Err(format!("len {} exceeds capacity {}", self.list.len(), self.capacity));
        }
        for key in self.keys() {
            let handle = self.index.lookup(key).ok_or("listed key missing from index")?;
            if self.list.key(handle) != Some(key) {
                return Err("index handle points at a different key".to_string());
            }
        }
        Ok(())
    }
}
