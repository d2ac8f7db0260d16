//! Earshot Test Utils - Shared Fixtures and Instrumented Fakes
//!
//! Helpers used by integration-style tests across the workspace: record
//! fixtures with controllable sentiment and age, and a counting store
//! wrapper for asserting how often the view engine actually hits the store.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use earshot_core::{
    EarshotResult, FeedbackRecord, NewRecord, Priority, Sentiment, Timestamp,
};
use earshot_storage::{FeedbackStore, InMemoryFeedbackStore};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// ============================================================================
// FIXTURES
// ============================================================================

/// A minimal record with the given title, neutral sentiment, no user.
pub fn record(title: &str) -> NewRecord {
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

/// A record with an explicit sentiment.
pub fn record_with_sentiment(title: &str, sentiment: Sentiment) -> NewRecord {
    NewRecord {
        sentiment,
        ..record(title)
    }
}

/// A record attributed to a user.
pub fn record_from_user(title: &str, user_id: &str) -> NewRecord {
    NewRecord {
        user_id: Some(user_id.to_string()),
        ..record(title)
    }
}

/// Seed a store with `titles`, returning the inserted records.
pub async fn seed<S: FeedbackStore>(
    store: &S,
    titles: &[&str],
) -> EarshotResult<Vec<FeedbackRecord>> {
    let mut inserted = Vec::with_capacity(titles.len());
    for title in titles {
        inserted.push(store.insert(record(title)).await?);
    }
    Ok(inserted)
}

/// Seed a store with one record backdated by `days`. Requires the
/// in-memory store, which exposes the backdating hook.
pub async fn seed_aged(
    store: &InMemoryFeedbackStore,
    title: &str,
    days: i64,
) -> EarshotResult<FeedbackRecord> {
    let inserted = store.insert(record(title)).await?;
    store.backdate(inserted.feedback_id, Utc::now() - ChronoDuration::days(days));
    Ok(inserted)
}

// ============================================================================
// COUNTING STORE
// ============================================================================

/// Store wrapper that counts read operations.
///
/// Used to prove cache behavior from the outside: a cache hit shows up as
/// an unchanged read count.
pub struct CountingFeedbackStore<S: FeedbackStore> {
    inner: Arc<S>,
    reads: AtomicU64,
    inserts: AtomicU64,
}

impl<S: FeedbackStore> CountingFeedbackStore<S> {
    pub fn new(inner: Arc<S>) -> Self {
        Self {
            inner,
            reads: AtomicU64::new(0),
            inserts: AtomicU64::new(0),
        }
    }

    /// Total fetch operations of any kind.
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn inserts(&self) -> u64 {
        self.inserts.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: FeedbackStore> FeedbackStore for CountingFeedbackStore<S> {
    async fn insert(&self, record: NewRecord) -> EarshotResult<FeedbackRecord> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(record).await
    }

    async fn fetch_all(&self) -> EarshotResult<Vec<FeedbackRecord>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_all().await
    }

    async fn fetch_unresolved(&self) -> EarshotResult<Vec<FeedbackRecord>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_unresolved().await
    }

    async fn fetch_recent(&self, limit: usize) -> EarshotResult<Vec<FeedbackRecord>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_recent(limit).await
    }

    async fn fetch_created_since(
        &self,
        cutoff: Timestamp,
        limit: usize,
    ) -> EarshotResult<Vec<FeedbackRecord>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_created_since(cutoff, limit).await
    }

    async fn count(&self) -> EarshotResult<i64> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.count().await
    }
}
