//! TTL Cleanup Task
//!
//! Background task that periodically reclaims expired cache entries.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::Cache;

/// Spawns a task that calls [`Cache::cleanup_expired`] every `interval`.
///
/// Reads already treat expired entries as absent; the sweep only returns
/// their memory sooner. The returned handle is aborted by
/// [`Cache::shutdown`] when the task was started through
/// [`Cache::with_cleanup`].
///
/// # Example
/// ```ignore
/// let cache = Cache::<String>::new(CacheConfig::default());
/// let handle = spawn_cleanup_task(cache.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_cleanup_task<V>(cache: Cache<V>, interval: Duration) -> JoinHandle<()>
where
    V: Clone + Send + 'static,
{
    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} ms",
            interval.as_millis()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.cleanup_expired();

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
