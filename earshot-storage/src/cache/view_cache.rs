//! Cache-aside coordinator for dashboard views.
//!
//! Wraps each view computation with get-or-compute-and-store semantics and
//! owns the invalidation protocol triggered by record writes.

use super::traits::CacheBackend;
use chrono::Utc;
use earshot_core::EarshotResult;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// The fixed set of cache keys deleted after every successful write batch.
///
/// `recent-issues` is deliberately absent: that view is never cached, so
/// there is never an entry to invalidate.
pub const INVALIDATED_VIEW_KEYS: [&str; 5] = [
    "stats",
    "top-issues",
    "repeat-users",
    "longest-unresolved",
    "ai-insights",
];

/// Cache-aside coordinator.
///
/// Owns the cache entry lifecycle: entries are created on miss after a
/// successful computation, overwritten on recomputation, deleted by
/// invalidation, and otherwise expire passively. An expired entry is never
/// returned to a caller.
///
/// Concurrent misses on the same key are tolerated: both callers compute
/// and both write back; computations are pure, so last-write-wins only
/// costs redundant work.
pub struct ViewCache<C: CacheBackend> {
    backend: Arc<C>,
}

impl<C: CacheBackend> ViewCache<C> {
    /// Create a new coordinator over the given backend.
    pub fn new(backend: Arc<C>) -> Self {
        Self { backend }
    }

    /// Get a reference to the cache backend.
    pub fn backend(&self) -> &C {
        &self.backend
    }

    /// Return the cached payload for `key` if present and unexpired,
    /// otherwise run `compute`, store its result under `key` with `ttl`,
    /// and return it.
    ///
    /// Failure posture:
    /// - backend read failure degrades to a miss
    /// - `compute` failure propagates and is never cached
    /// - backend write failure is logged and discarded; the freshly
    ///   computed payload is still returned
    pub async fn get_or_compute<F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        compute: F,
    ) -> EarshotResult<Vec<u8>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = EarshotResult<Vec<u8>>> + Send,
    {
        match self.backend.get(key).await {
            Ok(Some(entry)) if entry.is_fresh_at(Utc::now()) => {
                return Ok(entry.payload);
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(key, error = %e, "cache read failed, treating as miss");
            }
        }

        let payload = compute().await?;

        // Fire-and-forget write-back: this is the one place a cache write
        // error is deliberately discarded.
        if let Err(e) = self.backend.put(key, payload.clone(), ttl).await {
            tracing::warn!(key, error = %e, "cache write-back failed, serving computed payload");
        }

        Ok(payload)
    }

    /// Delete each listed key from the cache, unconditionally and
    /// idempotently. Deleting an absent key is a no-op.
    ///
    /// Backend failures propagate: a write must not be acknowledged while
    /// a stale entry may still be served.
    pub async fn invalidate(&self, keys: &[&str]) -> EarshotResult<()> {
        for key in keys {
            self.backend.delete(key).await?;
        }
        Ok(())
    }

    /// Invalidate the fixed cached-view key set after a record write.
    pub async fn invalidate_after_write(&self) -> EarshotResult<()> {
        self.invalidate(&INVALIDATED_VIEW_KEYS).await
    }
}

impl<C: CacheBackend> Clone for ViewCache<C> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}
