//! Entry Store Module
//!
//! Raw key to entry storage. No capacity or expiration decisions live here;
//! the manager layered on top makes those.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use crate::cache::CacheEntry;

// == Entry Store ==
/// HashMap-backed storage with O(1) average lookup, insertion and removal.
#[derive(Debug)]
pub(crate) struct EntryStore<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
}

impl<K, V> EntryStore<K, V>
where
    K: Eq + Hash,
{
    // == Constructor ==
    #[cfg(test)]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Pre-sizes the map for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
        }
    }

    // == Put ==
    /// Inserts or overwrites unconditionally.
    pub fn put(&mut self, key: K, entry: CacheEntry<V>) {
        self.entries.insert(key, entry);
    }

    // == Get ==
    /// Returns the entry if stored, expired or not.
    pub fn get<Q>(&self, key: &Q) -> Option<&CacheEntry<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut CacheEntry<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get_mut(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    // == Remove ==
    /// Removes and returns the entry if stored.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<CacheEntry<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.remove(key)
    }

    /// Removes every entry matching `predicate`, returning how many went.
    pub fn remove_where(&mut self, mut predicate: impl FnMut(&K, &CacheEntry<V>) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, entry| !predicate(key, entry));
        before - self.entries.len()
    }

    // == Iterate ==
    /// Lazily walks all stored entries in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &CacheEntry<V>)> + '_ {
        self.entries.iter()
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // == Length ==
    /// Stored entry count, including expired entries not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
