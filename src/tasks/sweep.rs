//! Expiry Sweep Task
//!
//! Background task that periodically removes expired cache entries.
//! Only useful when at least one store runs a TTL policy; expired entries
//! are otherwise dropped lazily on lookup.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::MetadataCache;

/// Spawns a task that calls [`MetadataCache::cleanup_expired`] every
/// `interval`.
///
/// The sweep runs on the tokio runtime; the cache operations it calls are
/// synchronous and short. Abort the returned handle to stop it.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(MetadataCache::from_config(&config)?);
/// let sweep = spawn_sweep_task(cache.clone(), config.sweep_interval());
/// // Later, during shutdown:
/// sweep.abort();
/// ```
pub fn spawn_sweep_task<D, T>(cache: Arc<MetadataCache<D, T>>, interval: Duration) -> JoinHandle<()>
where
    D: Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!("Starting expiry sweep task with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.cleanup_expired();
            if removed > 0 {
                info!("Expiry sweep: removed {} expired entries", removed);
            } else {
                debug!("Expiry sweep: no expired entries found");
            }
        }
    })
}
