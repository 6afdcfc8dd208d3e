//! Cache Manager Module
//!
//! Policy layer over the entry store: capacity bound with least-used eviction,
//! TTL expiration, and the public get/set/delete/stats contract.

use std::borrow::Borrow;
use std::cmp::Reverse;
use std::hash::Hash;
use std::time::Duration;

use tracing::debug;

use crate::cache::stats::timestamp_from_ms;
use crate::cache::store::EntryStore;
use crate::cache::{CacheEntry, CacheMetrics, Clock, EntrySnapshot, StatsSnapshot, SystemClock};
use crate::config::{CacheConfig, ExpirationPolicy};
use crate::error::Result;

/// Upper bound on the up-front map allocation for very large capacities.
const MAX_PREALLOCATED_ENTRIES: usize = 1024;

// == Cache Manager ==
/// Bounded, time-aware cache.
///
/// Eviction picks the entry with the lowest `access_count`, breaking ties by
/// the oldest `last_accessed_at` (LFU first, LRU among equals). Expired
/// entries are invisible to reads and are removed lazily on access and by a
/// full sweep before every `set`.
///
/// The sweep is a linear scan of the store, fine for the bounded capacities
/// this cache targets.
///
/// `has` is a pure peek: it never bumps `access_count`, so eviction order
/// reflects values actually consumed through `get`.
///
/// Not synchronised; wrap in [`SharedCache`](crate::cache::SharedCache) to
/// share between threads.
#[derive(Debug)]
pub struct CacheManager<K, V, C = SystemClock> {
    store: EntryStore<K, V>,
    metrics: CacheMetrics,
    max_size: usize,
    ttl_ms: Option<u64>,
    expiration: ExpirationPolicy,
    clock: C,
}

impl<K, V> CacheManager<K, V, SystemClock>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates a cache holding at most `max_size` live entries.
    ///
    /// `ttl` of `None` or zero means entries never expire. Fails when
    /// `max_size` is zero.
    pub fn new(max_size: usize, ttl: Option<Duration>) -> Result<Self> {
        let mut config = CacheConfig::new(max_size);
        config.ttl = ttl;
        Self::from_config(config)
    }

    pub fn from_config(config: CacheConfig) -> Result<Self> {
        Self::with_clock(config, SystemClock)
    }
}

impl<K, V, C> CacheManager<K, V, C>
where
    K: Eq + Hash + Clone,
    V: Clone,
    C: Clock,
{
    /// Creates a cache driven by a custom clock.
    pub fn with_clock(config: CacheConfig, clock: C) -> Result<Self> {
        let config = config.validate()?;
        Ok(Self {
            store: EntryStore::with_capacity(config.max_size.min(MAX_PREALLOCATED_ENTRIES)),
            metrics: CacheMetrics::new(),
            max_size: config.max_size,
            ttl_ms: config.ttl_ms(),
            expiration: config.expiration,
            clock,
        })
    }

    // == Set ==
    /// Stores a value, replacing any previous value for the key.
    ///
    /// Sweeps expired entries first. If the key is new and the cache is
    /// full, exactly one entry is evicted. The stored entry starts with
    /// `access_count == 1`.
    pub fn set(&mut self, key: K, value: V) {
        let now = self.clock.now_ms();
        self.sweep_at(now);

        if !self.store.contains_key(&key) && self.store.len() >= self.max_size {
            self.evict_one();
        }

        let mut entry = CacheEntry::new(value, now);
        entry.touch(now);
        self.store.put(key, entry);
    }

    // == Get ==
    /// Returns a copy of the value if present and not expired.
    ///
    /// A hit bumps `access_count` and `last_accessed_at`. An expired entry
    /// is removed as a side effect.
    pub fn get<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now_ms();

        if self.expire_if_stale(key, now) {
            self.metrics.record_miss();
            return None;
        }

        match self.store.get_mut(key) {
            Some(entry) => {
                entry.touch(now);
                self.metrics.record_hit();
                Some(entry.value.clone())
            }
            None => {
                self.metrics.record_miss();
                None
            }
        }
    }

    // == Has ==
    /// Reports whether a live entry exists, without touching its bookkeeping.
    ///
    /// Expired entries are removed, same as `get`.
    pub fn has<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now_ms();
        !self.expire_if_stale(key, now) && self.store.contains_key(key)
    }

    // == Delete ==
    /// Removes the entry, expired or not. Returns whether anything was removed.
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.remove(key).is_some()
    }

    // == Clear ==
    /// Removes every entry. Metrics are kept.
    pub fn clear(&mut self) {
        let dropped = self.store.len();
        self.store.clear();
        debug!(dropped, "Cache cleared");
    }

    // == Size ==
    /// Number of live entries; expired entries awaiting a sweep are not counted.
    pub fn size(&self) -> usize {
        let now = self.clock.now_ms();
        self.live_entries(now).count()
    }

    /// Number of stored entries including expired ones not yet swept.
    pub fn stored_len(&self) -> usize {
        self.store.len()
    }

    // == Remove Expired ==
    /// Full sweep. Returns the number of entries removed.
    pub fn remove_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        self.sweep_at(now)
    }

    // == Stats ==
    /// Read-only snapshot of the cache, most-used entries first.
    ///
    /// Ties on `access_count` list the most recently accessed entry first.
    pub fn stats(&self) -> StatsSnapshot<K> {
        let now = self.clock.now_ms();

        let mut live: Vec<(&K, &CacheEntry<V>)> = self.live_entries(now).collect();
        live.sort_by_key(|(_, entry)| Reverse((entry.access_count, entry.last_accessed_at)));

        let entries: Vec<EntrySnapshot<K>> = live
            .into_iter()
            .map(|(key, entry)| EntrySnapshot {
                key: key.clone(),
                access_count: entry.access_count,
                last_accessed_at: timestamp_from_ms(entry.last_accessed_at),
                age_ms: entry.age_ms(now),
            })
            .collect();

        StatsSnapshot {
            size: entries.len(),
            max_size: self.max_size,
            ttl_ms: self.ttl_ms,
            expiration: self.expiration,
            metrics: self.metrics.clone(),
            entries,
        }
    }

    /// Cumulative hit/miss/eviction/expiration counters.
    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_ms.map(Duration::from_millis)
    }

    pub fn expiration(&self) -> ExpirationPolicy {
        self.expiration
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    // == Internals ==

    fn live_entries(&self, now: u64) -> impl Iterator<Item = (&K, &CacheEntry<V>)> + '_ {
        let (ttl_ms, expiration) = (self.ttl_ms, self.expiration);
        self.store
            .iter()
            .filter(move |(_, entry)| !entry.is_expired_at(now, ttl_ms, expiration))
    }

    /// Removes the entry under `key` if it has expired. Returns true if it did.
    fn expire_if_stale<Q>(&mut self, key: &Q, now: u64) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (ttl_ms, expiration) = (self.ttl_ms, self.expiration);
        let stale = self
            .store
            .get(key)
            .is_some_and(|entry| entry.is_expired_at(now, ttl_ms, expiration));

        if stale {
            self.store.remove(key);
            self.metrics.record_expirations(1);
            debug!("Expired entry removed on access");
        }
        stale
    }

    fn sweep_at(&mut self, now: u64) -> usize {
        if self.ttl_ms.is_none() {
            return 0;
        }

        let (ttl_ms, expiration) = (self.ttl_ms, self.expiration);
        let removed = self
            .store
            .remove_where(|_, entry| entry.is_expired_at(now, ttl_ms, expiration));

        if removed > 0 {
            self.metrics.record_expirations(removed);
            debug!(removed, "Swept expired entries");
        }
        removed
    }

    /// Evicts the least-used entry (ties: least recently accessed, then oldest).
    fn evict_one(&mut self) {
        let victim = self
            .store
            .iter()
            .min_by_key(|(_, entry)| (entry.access_count, entry.last_accessed_at, entry.inserted_at))
            .map(|(key, entry)| (key.clone(), entry.access_count));

        if let Some((key, access_count)) = victim {
            self.store.remove(&key);
            self.metrics.record_eviction();
            debug!(access_count, "Evicted least-used entry");
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use crate::error::CacheError;

    fn manual_cache(
        max_size: usize,
        ttl_ms: Option<u64>,
    ) -> (CacheManager<String, i32, ManualClock>, ManualClock) {
        let clock = ManualClock::new(1_000_000);
        let mut config = CacheConfig::new(max_size);
        config.ttl = ttl_ms.map(Duration::from_millis);
        let cache = CacheManager::with_clock(config, clock.clone()).unwrap();
        (cache, clock)
    }

    fn key(s: &str) -> String {
        s.to_string()
    }

    #[test]
    fn test_new_rejects_zero_capacity() {
        let result = CacheManager::<String, i32>::new(0, None);
        assert!(matches!(result, Err(CacheError::InvalidConfig(_))));
    }

    #[test]
    fn test_new_with_zero_ttl_never_expires() {
        let cache = CacheManager::<String, i32>::new(4, Some(Duration::ZERO)).unwrap();
        assert_eq!(cache.ttl(), None);
    }

    #[test]
    fn test_set_and_get() {
        let (mut cache, _) = manual_cache(4, None);

        cache.set(key("a"), 1);
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.size(), 1);
    }

    #[test]
    fn test_get_missing() {
        let (mut cache, _) = manual_cache(4, None);
        assert_eq!(cache.get("nope"), None);
        assert_eq!(cache.metrics().misses, 1);
    }

    #[test]
    fn test_falsy_values_are_not_absent() {
        let mut cache: CacheManager<&str, Option<i32>> = CacheManager::new(4, None).unwrap();
        cache.set("zero", Some(0));
        cache.set("none", None);

        assert_eq!(cache.get("zero"), Some(Some(0)));
        assert_eq!(cache.get("none"), Some(None));
        assert_eq!(cache.get("missing"), None);
    }

    #[test]
    fn test_overwrite_replaces_value_and_resets_bookkeeping() {
        let (mut cache, clock) = manual_cache(2, None);

        cache.set(key("a"), 1);
        cache.get("a");
        cache.get("a");
        clock.advance(Duration::from_millis(10));
        cache.set(key("a"), 2);

        assert_eq!(cache.size(), 1);
        let stats = cache.stats();
        assert_eq!(stats.entries[0].access_count, 1);
        assert_eq!(stats.entries[0].age_ms, 0);
        assert_eq!(cache.get("a"), Some(2));
    }

    #[test]
    fn test_overwrite_at_capacity_does_not_evict() {
        let (mut cache, _) = manual_cache(2, None);

        cache.set(key("a"), 1);
        cache.set(key("b"), 2);
        cache.set(key("a"), 3);

        assert_eq!(cache.size(), 2);
        assert_eq!(cache.metrics().evictions, 0);
        assert!(cache.has("b"));
    }

    #[test]
    fn test_eviction_prefers_least_used() {
        let (mut cache, _) = manual_cache(2, None);

        cache.set(key("a"), 1);
        cache.set(key("b"), 2);
        cache.get("a");
        cache.set(key("c"), 3);

        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.get("c"), Some(3));
        assert_eq!(cache.metrics().evictions, 1);
    }

    #[test]
    fn test_eviction_tie_breaks_on_oldest_access() {
        let (mut cache, clock) = manual_cache(3, None);

        cache.set(key("a"), 1);
        clock.advance(Duration::from_millis(1));
        cache.set(key("b"), 2);
        clock.advance(Duration::from_millis(1));
        cache.set(key("c"), 3);
        clock.advance(Duration::from_millis(1));

        // a and c both reach access_count 2; a was accessed longer ago
        cache.get("c");
        clock.advance(Duration::from_millis(1));
        cache.get("a");
        clock.advance(Duration::from_millis(1));
        cache.get("b");
        clock.advance(Duration::from_millis(1));
        cache.get("b");
        clock.advance(Duration::from_millis(1));

        cache.set(key("d"), 4);

        assert!(!cache.has("c"));
        assert!(cache.has("a"));
        assert!(cache.has("b"));
        assert!(cache.has("d"));
    }

    #[test]
    fn test_has_does_not_bump_access_count() {
        let (mut cache, _) = manual_cache(2, None);

        cache.set(key("a"), 1);
        cache.set(key("b"), 2);
        for _ in 0..5 {
            assert!(cache.has("a"));
        }
        cache.get("b");
        cache.set(key("c"), 3);

        assert!(!cache.has("a"), "peeks must not protect an entry from eviction");
        assert_eq!(cache.metrics().hits, 1);
    }

    #[test]
    fn test_ttl_boundary() {
        let (mut cache, clock) = manual_cache(4, Some(100));

        cache.set(key("x"), 1);
        clock.advance(Duration::from_millis(99));
        assert_eq!(cache.get("x"), Some(1));
        assert!(cache.has("x"));

        clock.advance(Duration::from_millis(1));
        assert!(!cache.has("x"));
        assert_eq!(cache.get("x"), None);
        assert_eq!(cache.stored_len(), 0);
    }

    #[test]
    fn test_ttl_is_measured_from_insertion() {
        let (mut cache, clock) = manual_cache(4, Some(100));

        cache.set(key("x"), 1);
        for _ in 0..9 {
            clock.advance(Duration::from_millis(10));
            assert_eq!(cache.get("x"), Some(1));
        }
        clock.advance(Duration::from_millis(10));
        assert_eq!(cache.get("x"), None);
    }

    #[test]
    fn test_huge_ttl_never_wraps_to_immediate_expiry() {
        let clock = ManualClock::new(1_000_000);
        let config = CacheConfig::new(4).with_ttl(Duration::from_secs(1 << 61));
        let mut cache: CacheManager<&str, i32, _> =
            CacheManager::with_clock(config, clock.clone()).unwrap();

        assert_eq!(cache.ttl(), Some(Duration::from_millis(u64::MAX)));
        cache.set("k", 1);
        clock.advance(Duration::from_millis(2));
        assert_eq!(cache.get("k"), Some(1));
        assert_eq!(cache.remove_expired(), 0);
    }

    #[test]
    fn test_sliding_ttl_extends_on_get() {
        let clock = ManualClock::new(0);
        let config = CacheConfig::new(4)
            .with_ttl(Duration::from_millis(100))
            .with_expiration(ExpirationPolicy::Sliding);
        let mut cache: CacheManager<&str, i32, _> =
            CacheManager::with_clock(config, clock.clone()).unwrap();

        cache.set("x", 1);
        for _ in 0..5 {
            clock.advance(Duration::from_millis(80));
            assert_eq!(cache.get("x"), Some(1));
        }
        // has() is a peek and does not extend the lifetime
        clock.advance(Duration::from_millis(80));
        assert!(cache.has("x"));
        clock.advance(Duration::from_millis(20));
        assert!(!cache.has("x"));
    }

    #[test]
    fn test_expired_get_counts_miss_and_expiration() {
        let (mut cache, clock) = manual_cache(4, Some(50));

        cache.set(key("x"), 1);
        clock.advance(Duration::from_millis(50));
        assert_eq!(cache.get("x"), None);

        let metrics = cache.metrics();
        assert_eq!(metrics.misses, 1);
        assert_eq!(metrics.expirations, 1);
    }

    #[test]
    fn test_size_ignores_unswept_expired_entries() {
        let (mut cache, clock) = manual_cache(4, Some(100));

        cache.set(key("old"), 1);
        clock.advance(Duration::from_millis(60));
        cache.set(key("new"), 2);
        clock.advance(Duration::from_millis(60));

        assert_eq!(cache.stored_len(), 2);
        assert_eq!(cache.size(), 1);
    }

    #[test]
    fn test_set_sweeps_before_evicting() {
        let (mut cache, clock) = manual_cache(2, Some(100));

        cache.set(key("old"), 1);
        clock.advance(Duration::from_millis(50));
        cache.set(key("keep"), 2);
        clock.advance(Duration::from_millis(60));

        cache.set(key("fresh"), 3);

        assert_eq!(cache.metrics().evictions, 0);
        assert_eq!(cache.metrics().expirations, 1);
        assert_eq!(cache.get("keep"), Some(2));
        assert_eq!(cache.get("fresh"), Some(3));
    }

    #[test]
    fn test_remove_expired() {
        let (mut cache, clock) = manual_cache(8, Some(100));

        cache.set(key("a"), 1);
        cache.set(key("b"), 2);
        clock.advance(Duration::from_millis(50));
        cache.set(key("c"), 3);
        clock.advance(Duration::from_millis(50));

        assert_eq!(cache.remove_expired(), 2);
        assert_eq!(cache.stored_len(), 1);
        assert_eq!(cache.remove_expired(), 0);
    }

    #[test]
    fn test_delete() {
        let (mut cache, _) = manual_cache(4, None);

        cache.set(key("a"), 1);
        assert!(cache.delete("a"));
        assert_eq!(cache.get("a"), None);
        assert!(!cache.delete("a"));
    }

    #[test]
    fn test_delete_expired_entry_still_reports_removal() {
        let (mut cache, clock) = manual_cache(4, Some(10));

        cache.set(key("a"), 1);
        clock.advance(Duration::from_millis(20));
        assert!(cache.delete("a"));
    }

    #[test]
    fn test_clear_keeps_metrics() {
        let (mut cache, _) = manual_cache(4, None);

        cache.set(key("a"), 1);
        cache.set(key("b"), 2);
        cache.get("a");
        cache.clear();

        assert_eq!(cache.size(), 0);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.metrics().hits, 1);
    }

    #[test]
    fn test_stats_sorted_by_access_count() {
        let (mut cache, clock) = manual_cache(4, Some(1_000));

        cache.set(key("a"), 1);
        cache.set(key("b"), 2);
        cache.set(key("c"), 3);
        clock.advance(Duration::from_millis(5));
        cache.get("b");
        cache.get("b");
        cache.get("c");

        let stats = cache.stats();
        assert_eq!(stats.size, 3);
        assert_eq!(stats.max_size, 4);
        assert_eq!(stats.ttl_ms, Some(1_000));
        let keys: Vec<&str> = stats.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "c", "a"]);
        assert_eq!(stats.entries[0].access_count, 3);
        assert_eq!(stats.entries[2].age_ms, 5);
        assert_eq!(
            stats.entries[0].last_accessed_at.timestamp_millis(),
            1_000_005
        );
    }

    #[test]
    fn test_stats_is_read_only_and_skips_expired() {
        let (mut cache, clock) = manual_cache(4, Some(100));

        cache.set(key("a"), 1);
        clock.advance(Duration::from_millis(100));

        let stats = cache.stats();
        assert_eq!(stats.size, 0);
        assert!(stats.entries.is_empty());
        assert_eq!(cache.stored_len(), 1);
        assert_eq!(cache.metrics().expirations, 0);
    }

    #[test]
    fn test_capacity_one() {
        let (mut cache, _) = manual_cache(1, None);

        cache.set(key("a"), 1);
        cache.set(key("b"), 2);

        assert_eq!(cache.size(), 1);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2));
    }
}
