//! In-memory cache backend

use super::traits::{CacheBackend, CacheStats, CachedEntry};
use async_trait::async_trait;
use chrono::Utc;
use earshot_core::EarshotResult;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

/// In-memory key-value cache with per-entry TTLs.
///
/// Stands in for the external cache service in tests and single-process
/// deployments. Expired entries are dropped lazily when a read touches
/// them; there is no background sweep.
#[derive(Debug, Default)]
pub struct InMemoryCacheBackend {
    entries: RwLock<HashMap<String, CachedEntry>>,
    stats: RwLock<CacheStats>,
}

impl InMemoryCacheBackend {
    /// Create a new empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// Whether the backend holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheBackend for InMemoryCacheBackend {
    async fn get(&self, key: &str) -> EarshotResult<Option<CachedEntry>> {
        let now = Utc::now();

        // Lazy expiry: an expired entry is removed on touch and reported
        // as absent, matching what an external TTL cache would do.
        let expired = {
            let entries = self.entries.read().unwrap();
            matches!(entries.get(key), Some(entry) if !entry.is_fresh_at(now))
        };

        if expired {
            self.entries.write().unwrap().remove(key);
            let mut stats = self.stats.write().unwrap();
            stats.expirations += 1;
            stats.misses += 1;
            return Ok(None);
        }

        let entry = self.entries.read().unwrap().get(key).cloned();
        let mut stats = self.stats.write().unwrap();
        match entry {
            Some(entry) => {
                stats.hits += 1;
                Ok(Some(entry))
            }
            None => {
                stats.misses += 1;
                Ok(None)
            }
        }
    }

    async fn put(&self, key: &str, payload: Vec<u8>, ttl: Duration) -> EarshotResult<()> {
        self.entries
            .write()
            .unwrap()
            .insert(key.to_string(), CachedEntry::new(payload, ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> EarshotResult<()> {
        self.entries.write().unwrap().remove(key);
        Ok(())
    }

    async fn stats(&self) -> EarshotResult<CacheStats> {
        let mut stats = self.stats.read().unwrap().clone();
        stats.entry_count = self.entries.read().unwrap().len() as u64;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_round_trip() {
        let backend = InMemoryCacheBackend::new();
        backend
            .put("stats", b"{\"total\":3}".to_vec(), Duration::from_secs(300))
            .await
            .unwrap();

        let entry = backend.get("stats").await.unwrap().unwrap();
        assert_eq!(entry.payload, b"{\"total\":3}");
        assert_eq!(entry.ttl, Duration::from_secs(300));
    }

    #[tokio::test]
    async fn test_get_absent_key_is_miss() {
        let backend = InMemoryCacheBackend::new();
        assert!(backend.get("top-issues").await.unwrap().is_none());

        let stats = backend.stats().await.unwrap();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 0);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let backend = InMemoryCacheBackend::new();
        backend
            .put("stats", vec![1, 2, 3], Duration::from_secs(60))
            .await
            .unwrap();

        backend.delete("stats").await.unwrap();
        assert!(backend.get("stats").await.unwrap().is_none());

        // Deleting an absent key is a no-op, not an error.
        backend.delete("stats").await.unwrap();
        backend.delete("never-existed").await.unwrap();
    }

    #[tokio::test]
    async fn test_expired_entry_reads_as_absent() {
        let backend = InMemoryCacheBackend::new();
        backend
            .put("ai-insights", vec![7], Duration::ZERO)
            .await
            .unwrap();

        assert!(backend.get("ai-insights").await.unwrap().is_none());
        let stats = backend.stats().await.unwrap();
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.entry_count, 0);
    }

    #[tokio::test]
    async fn test_put_overwrites_existing_entry() {
        let backend = InMemoryCacheBackend::new();
        backend
            .put("stats", b"old".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();
        backend
            .put("stats", b"new".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();

        let entry = backend.get("stats").await.unwrap().unwrap();
        assert_eq!(entry.payload, b"new");
        assert_eq!(backend.len(), 1);
    }
}
