//! Cache Module
//!
//! Provides a bounded in-memory cache with TTL expiration and least-used eviction.

mod clock;
mod entry;
mod manager;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use manager::CacheManager;
pub use shared::SharedCache;
pub use stats::{CacheMetrics, EntrySnapshot, StatsSnapshot};
