//! TTL Sweep Task
//!
//! Background task that periodically removes expired cache entries, so
//! memory held by entries nobody reads again is released.

use std::hash::Hash;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{Clock, SharedCache};

/// Spawns a background task that periodically sweeps expired entries.
///
/// The task runs in an infinite loop, sleeping for `interval` between sweeps.
/// Each sweep holds the cache lock only for the duration of the scan.
///
/// Must be called from within a tokio runtime. The returned handle can be
/// used to abort the task during shutdown.
///
/// # Example
/// ```ignore
/// let cache: SharedCache<String, String> = SharedCache::from_config(config.clone())?;
/// let sweep_handle = spawn_sweep_task(cache.clone(), config.sweep_interval);
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task<K, V, C>(cache: SharedCache<K, V, C>, interval: Duration) -> JoinHandle<()>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + 'static,
    C: Clock + Send + 'static,
{
    tokio::spawn(async move {
        info!(
            interval_ms = interval.as_millis() as u64,
            "Starting TTL sweep task"
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.remove_expired();

            if removed > 0 {
                info!("TTL sweep: removed {} expired entries", removed);
            } else {
                debug!("TTL sweep: no expired entries found");
            }
        }
    })
}
