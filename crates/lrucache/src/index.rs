//! Key index: key to recency-list handle

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use ahash::RandomState;

use crate::list::Handle;

/// Maps each cached key to the handle of its entry.
///
/// The index never owns entries; the recency list does.
pub struct KeyIndex<K> {
    map: HashMap<K, Handle, RandomState>,
}

impl<K: Hash + Eq> KeyIndex<K> {
    /// Create an index sized for `capacity` keys
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
        }
    }

    /// Look up the handle for `key`
    pub fn lookup<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.get(key).copied()
    }

    /// Check if `key` is indexed
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Record `key` at `handle`, returning the previous handle if any
    pub fn insert(&mut self, key: K, handle: Handle) -> Option<Handle> {
        self.map.insert(key, handle)
    }

    /// Drop `key` from the index
    pub fn remove<Q>(&mut self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.remove(key)
    }

    /// Number of indexed keys
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
