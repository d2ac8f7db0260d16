//! Cache layer for precomputed dashboard views.
//!
//! The external cache service is modeled by [`CacheBackend`]: a key-value
//! store with per-entry TTLs. [`ViewCache`] layers the cache-aside protocol
//! on top: get-or-compute-and-store reads, and unconditional invalidation
//! of the cached view keys after every successful write batch.
//!
//! # Failure posture
//!
//! The cache is an accelerator, never an authority. A backend read failure
//! degrades to a miss; a write-back failure is logged and the freshly
//! computed payload is returned anyway. Only `invalidate` propagates
//! backend errors, because a write must not be acknowledged while stale
//! entries may still be served.

pub mod memory;
pub mod traits;
pub mod view_cache;

pub use memory::InMemoryCacheBackend;
pub use traits::{CacheBackend, CacheStats, CachedEntry};
pub use view_cache::{ViewCache, INVALIDATED_VIEW_KEYS};
