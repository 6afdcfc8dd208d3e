//! Shared Cache Module
//!
//! Thread-safe handle around a single `CacheManager`.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::cache::{CacheManager, CacheMetrics, Clock, StatsSnapshot, SystemClock};
use crate::config::CacheConfig;
use crate::error::Result;

// == Shared Cache ==
/// Cloneable handle to one cache guarded by a single mutex.
///
/// Every operation is one critical section, so concurrent `set` calls cannot
/// lose `access_count` updates or race on eviction. Clones share the same
/// underlying cache.
#[derive(Debug)]
pub struct SharedCache<K, V, C = SystemClock> {
    inner: Arc<Mutex<CacheManager<K, V, C>>>,
}

impl<K, V, C> Clone for SharedCache<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> SharedCache<K, V, SystemClock>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a shared cache holding at most `max_size` live entries.
    pub fn new(max_size: usize, ttl: Option<Duration>) -> Result<Self> {
        CacheManager::new(max_size, ttl).map(Self::from_manager)
    }

    pub fn from_config(config: CacheConfig) -> Result<Self> {
        CacheManager::from_config(config).map(Self::from_manager)
    }
}

impl<K, V, C> SharedCache<K, V, C>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Clock,
{
    /// Wraps an existing cache.
    pub fn from_manager(manager: CacheManager<K, V, C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    // Every critical section leaves the manager consistent, so a panic in
    // another holder does not invalidate the data.
    fn lock(&self) -> MutexGuard<'_, CacheManager<K, V, C>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set(&self, key: K, value: V) {
        self.lock().set(key, value);
    }

    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lock().get(key)
    }

    pub fn has<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lock().has(key)
    }

    pub fn delete<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lock().delete(key)
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn size(&self) -> usize {
        self.lock().size()
    }

    pub fn stats(&self) -> StatsSnapshot<K> {
        self.lock().stats()
    }

    pub fn metrics(&self) -> CacheMetrics {
        self.lock().metrics().clone()
    }

    pub fn remove_expired(&self) -> usize {
        self.lock().remove_expired()
    }

    /// Returns the cached value, or computes and stores it while holding the lock.
    ///
    /// `compute` runs inside the critical section, so it must not touch this
    /// cache again.
    pub fn get_or_insert_with<F>(&self, key: K, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        let mut cache = self.lock();
        if let Some(value) = cache.get(&key) {
            return value;
        }
        let value = compute();
        cache.set(key, value.clone());
        value
    }

    /// Runs `f` with exclusive access to the underlying cache.
    pub fn with_manager<R>(&self, f: impl FnOnce(&mut CacheManager<K, V, C>) -> R) -> R {
        f(&mut self.lock())
    }
}
