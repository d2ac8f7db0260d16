//! Cache backend trait and entry types

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use earshot_core::{EarshotResult, Timestamp};
use std::time::Duration;

/// A stored cache entry: opaque serialized payload plus the timing data
/// needed to decide freshness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedEntry {
    pub payload: Vec<u8>,
    pub inserted_at: Timestamp,
    pub ttl: Duration,
}

impl CachedEntry {
    /// Create an entry inserted now.
    pub fn new(payload: Vec<u8>, ttl: Duration) -> Self {
        Self {
            payload,
            inserted_at: Utc::now(),
            ttl,
        }
    }

    /// An entry is valid for reads iff `now < inserted_at + ttl`.
    pub fn is_fresh_at(&self, now: Timestamp) -> bool {
        match ChronoDuration::from_std(self.ttl) {
            Ok(ttl) => now < self.inserted_at + ttl,
            // A TTL too large for chrono arithmetic never expires in practice.
            Err(_) => true,
        }
    }
}

/// Cache backend trait for pluggable cache services.
///
/// Implementations must be thread-safe and atomic at key granularity.
/// Keys are the view identifier strings; values are opaque bytes.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Get the entry stored under `key`, if any.
    ///
    /// Backends return entries as stored; deciding whether an entry is
    /// still fresh is the coordinator's job.
    async fn get(&self, key: &str) -> EarshotResult<Option<CachedEntry>>;

    /// Store `payload` under `key` with the given TTL, overwriting any
    /// previous entry.
    async fn put(&self, key: &str, payload: Vec<u8>, ttl: Duration) -> EarshotResult<()>;

    /// Delete the entry under `key`. Deleting an absent key is a no-op.
    async fn delete(&self, key: &str) -> EarshotResult<()>;

    /// Get cache statistics.
    async fn stats(&self) -> EarshotResult<CacheStats>;
}

/// Statistics about cache usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of reads that found a stored entry.
    pub hits: u64,
    /// Number of reads that found nothing.
    pub misses: u64,
    /// Number of entries currently stored.
    pub entry_count: u64,
    /// Number of entries removed by passive expiry.
    pub expirations: u64,
}

impl CacheStats {
    /// Calculate the hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_fresh_within_ttl() {
        let entry = CachedEntry::new(b"payload".to_vec(), Duration::from_secs(300));
        assert!(entry.is_fresh_at(Utc::now()));
        assert!(entry.is_fresh_at(entry.inserted_at + ChronoDuration::seconds(299)));
    }

    #[test]
    fn test_entry_expired_at_and_after_deadline() {
        let entry = CachedEntry::new(b"payload".to_vec(), Duration::from_secs(300));
        // Validity is strict: at exactly inserted_at + ttl the entry is expired.
        assert!(!entry.is_fresh_at(entry.inserted_at + ChronoDuration::seconds(300)));
        assert!(!entry.is_fresh_at(entry.inserted_at + ChronoDuration::seconds(301)));
    }

    #[test]
    fn test_cache_stats_hit_rate() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            ..Default::default()
        };
        assert!((stats.hit_rate() - 0.8).abs() < 0.001);

        let empty = CacheStats::default();
        assert!((empty.hit_rate() - 0.0).abs() < 0.001);
    }

    #[cfg(test)]
    mod prop_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// An entry is fresh strictly before its deadline and expired
            /// at or beyond it, for any TTL and offset.
            #[test]
            fn prop_freshness_boundary(
                ttl_secs in 1u64..100_000u64,
                offset_secs in 0i64..200_000i64,
            ) {
                let entry = CachedEntry::new(vec![1], Duration::from_secs(ttl_secs));
                let probe = entry.inserted_at + ChronoDuration::seconds(offset_secs);
                let expected = (offset_secs as u64) < ttl_secs;
                prop_assert_eq!(entry.is_fresh_at(probe), expected);
            }
        }
    }
}
