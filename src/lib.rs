//! Memo Cache - A bounded, time-aware in-memory cache
//!
//! Least-used eviction, TTL expiration and function memoization for a single
//! process. Construct a [`CacheManager`] (or a [`SharedCache`] for use across
//! threads) and optionally wrap functions with [`memoize`] or
//! [`memoize_recursive`].

pub mod cache;
pub mod config;
pub mod error;
pub mod memo;
pub mod tasks;

pub use cache::{CacheManager, SharedCache, StatsSnapshot};
pub use config::{CacheConfig, ExpirationPolicy};
pub use error::{CacheError, Result};
pub use memo::{memoize, memoize_recursive, MemoArgs, MemoKey, Memoized, RecursiveMemoized};
pub use tasks::spawn_sweep_task;
