//! Cache Statistics Module
//!
//! Cumulative counters and the read-only snapshot returned by `stats()`.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::ExpirationPolicy;

// == Cache Metrics ==
/// Cumulative cache counters. Survive `clear()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheMetrics {
    /// Number of `get` calls that returned a value
    pub hits: u64,
    /// Number of `get` calls on absent or expired keys
    pub misses: u64,
    /// Number of entries removed to make room
    pub evictions: u64,
    /// Number of entries removed because their TTL ran out
    pub expirations: u64,
}

impl CacheMetrics {
    // == Constructor ==
    /// Creates a new CacheMetrics with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub(crate) fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub(crate) fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub(crate) fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub(crate) fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }
}

// == Entry Snapshot ==
/// Introspection view of one live entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntrySnapshot<K> {
    pub key: K,
    pub access_count: u64,
    pub last_accessed_at: DateTime<Utc>,
    /// Milliseconds since insertion
    pub age_ms: u64,
}

// == Stats Snapshot ==
/// Point-in-time view of a cache, most-used entries first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSnapshot<K> {
    /// Live entry count
    pub size: usize,
    pub max_size: usize,
    /// Configured TTL in milliseconds, None = no expiration
    pub ttl_ms: Option<u64>,
    pub expiration: ExpirationPolicy,
    pub metrics: CacheMetrics,
    pub entries: Vec<EntrySnapshot<K>>,
}

impl<K> StatsSnapshot<K> {
    /// Keys in snapshot order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries.iter().map(|entry| &entry.key)
    }
}

/// Converts a Unix-millisecond timestamp for display, clamping out-of-range values to the epoch.
pub(crate) fn timestamp_from_ms(ms: u64) -> DateTime<Utc> {
    i64::try_from(ms)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or(DateTime::UNIX_EPOCH)
}
