//! Earshot Storage - Record Store Adapters and View Cache
//!
//! Defines the record store abstraction over the feedback relation, an
//! in-memory implementation for tests and small deployments, a pooled
//! Postgres adapter, and the cache-aside coordinator under [`cache`].

pub mod cache;
pub mod pg;

pub use cache::{
    CacheBackend, CacheStats, CachedEntry, InMemoryCacheBackend, ViewCache, INVALIDATED_VIEW_KEYS,
};
pub use pg::PgFeedbackStore;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use earshot_core::{EarshotResult, FeedbackId, FeedbackRecord, NewRecord, Timestamp};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;

// ============================================================================
// STORE TRAIT
// ============================================================================

/// Record store adapter for the feedback relation.
///
/// All queries are read-only projections except the single insert path.
/// Implementations assign `feedback_id` and `created_at`, both monotonic
/// per insertion order.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Insert a new record, returning it with store-assigned fields.
    async fn insert(&self, record: NewRecord) -> EarshotResult<FeedbackRecord>;

    /// All records, in insertion order.
    async fn fetch_all(&self) -> EarshotResult<Vec<FeedbackRecord>>;

    /// Unresolved records (no resolution timestamp), in insertion order.
    async fn fetch_unresolved(&self) -> EarshotResult<Vec<FeedbackRecord>>;

    /// The most recently created records, newest first.
    async fn fetch_recent(&self, limit: usize) -> EarshotResult<Vec<FeedbackRecord>>;

    /// Records created at or after `cutoff`, newest first, capped at `limit`.
    async fn fetch_created_since(
        &self,
        cutoff: Timestamp,
        limit: usize,
    ) -> EarshotResult<Vec<FeedbackRecord>>;

    /// Total number of records, resolved and unresolved.
    async fn count(&self) -> EarshotResult<i64>;
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

/// In-memory record store for tests and single-process deployments.
///
/// IDs come from an atomic counter; creation timestamps are forced to be
/// strictly increasing even when inserts land within the same clock tick,
/// preserving the monotonic-per-insertion-order contract.
#[derive(Debug)]
pub struct InMemoryFeedbackStore {
    records: RwLock<Vec<FeedbackRecord>>,
    next_id: AtomicI64,
}

impl InMemoryFeedbackStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Set the resolution timestamp on a record.
    ///
    /// Resolution is owned by an external process in production; this
    /// hook exists so tests can build resolved fixtures. The timestamp is
    /// clamped to `created_at` to keep the resolution invariant.
    pub fn mark_resolved(&self, id: FeedbackId, at: Timestamp) -> bool {
        let mut records = self.records.write().unwrap();
        if let Some(record) = records.iter_mut().find(|r| r.feedback_id == id) {
            record.resolved_at = Some(at.max(record.created_at));
            true
        } else {
            false
        }
    }

    /// Backdate a record's creation timestamp (test fixture hook for
    /// age-dependent views). Keeps `resolved_at >= created_at`.
    pub fn backdate(&self, id: FeedbackId, created_at: Timestamp) -> bool {
        let mut records = self.records.write().unwrap();
        if let Some(record) = records.iter_mut().find(|r| r.feedback_id == id) {
            record.created_at = created_at;
            if let Some(resolved) = record.resolved_at {
                record.resolved_at = Some(resolved.max(created_at));
            }
            true
        } else {
            false
        }
    }
}

impl Default for InMemoryFeedbackStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedbackStore for InMemoryFeedbackStore {
    async fn insert(&self, record: NewRecord) -> EarshotResult<FeedbackRecord> {
        let mut records = self.records.write().unwrap();

        let mut created_at = Utc::now();
        if let Some(last) = records.last() {
            if created_at <= last.created_at {
                created_at = last.created_at + ChronoDuration::microseconds(1);
            }
        }

        let stored = FeedbackRecord {
            feedback_id: self.next_id.fetch_add(1, Ordering::SeqCst),
            title: record.title,
            description: record.description,
            source: record.source,
            user_id: record.user_id,
            sentiment: record.sentiment,
            category: record.category,
            created_at,
            resolved_at: None,
            priority: record.priority,
        };

        records.push(stored.clone());
        Ok(stored)
    }

    async fn fetch_all(&self) -> EarshotResult<Vec<FeedbackRecord>> {
        Ok(self.records.read().unwrap().clone())
    }

    async fn fetch_unresolved(&self) -> EarshotResult<Vec<FeedbackRecord>> {
        Ok(self
            .records
            .read()
            .unwrap()
            .iter()
            .filter(|r| r.is_unresolved())
            .cloned()
            .collect())
    }

    async fn fetch_recent(&self, limit: usize) -> EarshotResult<Vec<FeedbackRecord>> {
        let records = self.records.read().unwrap();
        let mut sorted: Vec<FeedbackRecord> = records.clone();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        sorted.truncate(limit);
        Ok(sorted)
    }

    async fn fetch_created_since(
        &self,
        cutoff: Timestamp,
        limit: usize,
    ) -> EarshotResult<Vec<FeedbackRecord>> {
        let records = self.records.read().unwrap();
        let mut recent: Vec<FeedbackRecord> = records
            .iter()
            .filter(|r| r.created_at >= cutoff)
            .cloned()
            .collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(limit);
        Ok(recent)
    }

    async fn count(&self) -> EarshotResult<i64> {
        Ok(self.records.read().unwrap().len() as i64)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use earshot_core::{Priority, Sentiment};

    fn new_record(title: &str) -> NewRecord {
        NewRecord {
            title: title.to_string(),
            description: None,
            source: "widget".to_string(),
            user_id: None,
            sentiment: Sentiment::Neutral,
            category: None,
            priority: Priority::Medium,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_monotonic_ids_and_timestamps() {
        let store = InMemoryFeedbackStore::new();
        let a = store.insert(new_record("first")).await.unwrap();
        let b = store.insert(new_record("second")).await.unwrap();
        let c = store.insert(new_record("third")).await.unwrap();

        assert!(a.feedback_id < b.feedback_id);
        assert!(b.feedback_id < c.feedback_id);
        assert!(a.created_at < b.created_at);
        assert!(b.created_at < c.created_at);
        assert!(a.is_unresolved());
    }

    #[tokio::test]
    async fn test_fetch_unresolved_excludes_resolved() {
        let store = InMemoryFeedbackStore::new();
        let a = store.insert(new_record("open")).await.unwrap();
        let b = store.insert(new_record("closed")).await.unwrap();
        assert!(store.mark_resolved(b.feedback_id, Utc::now()));

        let unresolved = store.fetch_unresolved().await.unwrap();
        assert_eq!(unresolved.len(), 1);
        assert_eq!(unresolved[0].feedback_id, a.feedback_id);

        let all = store.fetch_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_mark_resolved_clamps_to_created_at() {
        let store = InMemoryFeedbackStore::new();
        let record = store.insert(new_record("clamped")).await.unwrap();
        let before_creation = record.created_at - ChronoDuration::hours(1);
        store.mark_resolved(record.feedback_id, before_creation);

        let all = store.fetch_all().await.unwrap();
        let resolved_at = all[0].resolved_at.unwrap();
        assert!(resolved_at >= all[0].created_at);
    }

    #[tokio::test]
    async fn test_fetch_recent_orders_newest_first() {
        let store = InMemoryFeedbackStore::new();
        for i in 0..8 {
            store.insert(new_record(&format!("issue {}", i))).await.unwrap();
        }

        let recent = store.fetch_recent(5).await.unwrap();
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].title, "issue 7");
        assert_eq!(recent[4].title, "issue 3");
        for pair in recent.windows(2) {
            assert!(pair[0].created_at > pair[1].created_at);
        }
    }

    #[tokio::test]
    async fn test_fetch_created_since_filters_and_caps() {
        let store = InMemoryFeedbackStore::new();
        let old = store.insert(new_record("ancient")).await.unwrap();
        store.backdate(old.feedback_id, Utc::now() - ChronoDuration::days(30));
        for i in 0..3 {
            store.insert(new_record(&format!("fresh {}", i))).await.unwrap();
        }

        let cutoff = Utc::now() - ChronoDuration::days(7);
        let window = store.fetch_created_since(cutoff, 20).await.unwrap();
        assert_eq!(window.len(), 3);
        assert!(window.iter().all(|r| r.title.starts_with("fresh")));

        let capped = store.fetch_created_since(cutoff, 2).await.unwrap();
        assert_eq!(capped.len(), 2);
        assert_eq!(capped[0].title, "fresh 2");
    }
}
