//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with usage bookkeeping.

use crate::config::ExpirationPolicy;

// == Cache Entry ==
/// A stored value plus the bookkeeping eviction and expiration rely on.
///
/// Timestamps are Unix milliseconds taken from the owning cache's clock.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Creation timestamp
    pub inserted_at: u64,
    /// Last successful read or write
    pub last_accessed_at: u64,
    /// Number of successful reads and writes
    pub access_count: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry that has not been accessed yet (`access_count == 0`).
    pub fn new(value: V, now: u64) -> Self {
        Self {
            value,
            inserted_at: now,
            last_accessed_at: now,
            access_count: 0,
        }
    }

    // == Touch ==
    /// Records one access at `now`.
    ///
    /// `last_accessed_at` never moves backwards, even if the clock does.
    pub fn touch(&mut self, now: u64) {
        self.last_accessed_at = self.last_accessed_at.max(now);
        self.access_count = self.access_count.saturating_add(1);
    }

    // == Is Expired ==
    /// Checks whether the entry has outlived `ttl_ms` at time `now`.
    ///
    /// Boundary condition: an entry inserted at T with TTL D is live strictly
    /// before T + D and expired at or after it. No TTL means never expired.
    pub fn is_expired_at(&self, now: u64, ttl_ms: Option<u64>, policy: ExpirationPolicy) -> bool {
        match ttl_ms {
            Some(ttl) => now >= self.expires_at(ttl, policy),
            None => false,
        }
    }

    /// Timestamp at which the entry expires under the given TTL.
    pub fn expires_at(&self, ttl_ms: u64, policy: ExpirationPolicy) -> u64 {
        let anchor = match policy {
            ExpirationPolicy::Absolute => self.inserted_at,
            ExpirationPolicy::Sliding => self.last_accessed_at,
        };
        anchor.saturating_add(ttl_ms)
    }

    /// Milliseconds since insertion.
    pub fn age_ms(&self, now: u64) -> u64 {
        now.saturating_sub(self.inserted_at)
    }
}
