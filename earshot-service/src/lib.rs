//! Earshot Service - System Boundary
//!
//! The surface the transport layer talks to: one query operation per view
//! name returning a serialized JSON payload, and one batch ingestion
//! operation returning per-record outcomes plus aggregate counts. Wires
//! the view engine, the cache coordinator, and the ingestion pipeline
//! together from injected dependencies.

pub mod telemetry;

use earshot_core::{
    CacheTtlConfig, ClassifierConfig, EarshotResult, FeedbackId, NewFeedback, Sentiment,
    SummarizerConfig, ViewName,
};
use earshot_ingest::{IngestOutcome, IngestionPipeline};
use earshot_llm::{InsightSummarizer, ProviderRegistry};
use earshot_storage::{CacheBackend, FeedbackStore, ViewCache};
use earshot_views::ViewEngine;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Bundled configuration for the service boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub cache_ttls: CacheTtlConfig,
    pub classifier: ClassifierConfig,
    pub summarizer: SummarizerConfig,
}

impl ServiceConfig {
    /// Create from environment variables with fallback to defaults.
    pub fn from_env() -> Self {
        Self {
            cache_ttls: CacheTtlConfig::from_env(),
            classifier: ClassifierConfig::default(),
            summarizer: SummarizerConfig::default(),
        }
    }

    /// Validate all sections.
    pub fn validate(&self) -> EarshotResult<()> {
        self.cache_ttls.validate()?;
        self.classifier.validate()?;
        self.summarizer.validate()?;
        Ok(())
    }
}

// ============================================================================
// INGESTION REPORT
// ============================================================================

/// Per-record ingestion outcome in its serialized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum IngestEntry {
    Inserted {
        feedback_id: FeedbackId,
        sentiment: Sentiment,
    },
    Failed {
        error: String,
    },
}

impl From<IngestOutcome> for IngestEntry {
    fn from(outcome: IngestOutcome) -> Self {
        match outcome {
            IngestOutcome::Inserted {
                feedback_id,
                sentiment,
            } => IngestEntry::Inserted {
                feedback_id,
                sentiment,
            },
            IngestOutcome::Failed { error } => IngestEntry::Failed {
                error: error.to_string(),
            },
        }
    }
}

/// Batch ingestion result: one entry per input tuple, in input order,
/// plus aggregate counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestReport {
    pub succeeded: usize,
    pub failed: usize,
    pub outcomes: Vec<IngestEntry>,
}

// ============================================================================
// DASHBOARD SERVICE
// ============================================================================

/// The dashboard core behind the transport layer.
///
/// All collaborators are injected; the service owns no ambient state.
pub struct DashboardService<S: FeedbackStore, C: CacheBackend> {
    engine: ViewEngine<S>,
    cache: ViewCache<C>,
    pipeline: IngestionPipeline<S, C>,
    summarizer: Arc<dyn InsightSummarizer>,
    ttls: CacheTtlConfig,
}

impl<S: FeedbackStore, C: CacheBackend> DashboardService<S, C> {
    /// Wire a service from a store, a cache backend, and registered
    /// model providers.
    ///
    /// Fails if the configuration is invalid or a provider is missing.
    pub fn new(
        store: Arc<S>,
        cache_backend: Arc<C>,
        registry: &ProviderRegistry,
        config: ServiceConfig,
    ) -> EarshotResult<Self> {
        config.validate()?;
        let classifier = registry.classifier()?;
        let summarizer = registry.summarizer()?;

        let cache = ViewCache::new(cache_backend);
        let engine =
            ViewEngine::with_summarizer_config(Arc::clone(&store), config.summarizer.clone());
        let pipeline =
            IngestionPipeline::new(store, cache.clone(), classifier, config.classifier.clone());

        Ok(Self {
            engine,
            cache,
            pipeline,
            summarizer,
            ttls: config.cache_ttls,
        })
    }

    /// Serve one dashboard view as a serialized JSON payload.
    ///
    /// Cached views go through the cache-aside coordinator with the
    /// per-view TTL; `recent-issues` is recomputed on every call.
    pub async fn query(&self, view: ViewName) -> EarshotResult<Vec<u8>> {
        let request_id = Uuid::now_v7();
        let span = tracing::info_span!("query", %request_id, view = view.as_str());

        async {
            match view.ttl(&self.ttls) {
                Some(ttl) => {
                    self.cache
                        .get_or_compute(view.as_str(), ttl, || self.compute(view))
                        .await
                }
                None => self.compute(view).await,
            }
        }
        .instrument(span)
        .await
    }

    /// Ingest a batch of raw feedback tuples.
    pub async fn ingest(&self, batch: Vec<NewFeedback>) -> EarshotResult<IngestReport> {
        let request_id = Uuid::now_v7();
        let span = tracing::info_span!("ingest", %request_id, batch_size = batch.len());

        async {
            let outcomes = self.pipeline.ingest_batch(batch).await?;
            let succeeded = outcomes.iter().filter(|o| o.is_inserted()).count();
            let failed = outcomes.len() - succeeded;
            tracing::info!(succeeded, failed, "batch ingested");

            Ok(IngestReport {
                succeeded,
                failed,
                outcomes: outcomes.into_iter().map(IngestEntry::from).collect(),
            })
        }
        .instrument(span)
        .await
    }

    async fn compute(&self, view: ViewName) -> EarshotResult<Vec<u8>> {
        let payload = match view {
            ViewName::Stats => serde_json::to_vec(&self.engine.stats().await?)?,
            ViewName::TopIssues => serde_json::to_vec(&self.engine.top_issues().await?)?,
            ViewName::RecentIssues => serde_json::to_vec(&self.engine.recent_issues().await?)?,
            ViewName::RepeatUsers => serde_json::to_vec(&self.engine.repeat_users().await?)?,
            ViewName::LongestUnresolved => {
                serde_json::to_vec(&self.engine.longest_unresolved().await?)?
            }
            ViewName::AiInsights => {
                serde_json::to_vec(&self.engine.ai_insights(self.summarizer.as_ref()).await?)?
            }
        };
        Ok(payload)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use earshot_llm::{FixedSentimentClassifier, MockInsightSummarizer, SentimentLabel};
    use earshot_storage::{FeedbackStore, InMemoryCacheBackend, InMemoryFeedbackStore};
    use earshot_test_utils::{record_from_user, record_with_sentiment, CountingFeedbackStore};
    use serde_json::Value;

    type TestService =
        DashboardService<CountingFeedbackStore<InMemoryFeedbackStore>, InMemoryCacheBackend>;

    fn service() -> (TestService, Arc<CountingFeedbackStore<InMemoryFeedbackStore>>) {
        let store = Arc::new(CountingFeedbackStore::new(Arc::new(
            InMemoryFeedbackStore::new(),
        )));
        let mut registry = ProviderRegistry::new();
        registry.register_classifier(Box::new(FixedSentimentClassifier::new(
            SentimentLabel::Positive,
            0.9,
        )));
        registry.register_summarizer(Box::new(MockInsightSummarizer::new()));

        let service = DashboardService::new(
            Arc::clone(&store),
            Arc::new(InMemoryCacheBackend::new()),
            &registry,
            ServiceConfig::default(),
        )
        .unwrap();
        (service, store)
    }

    fn parse(payload: &[u8]) -> Value {
        serde_json::from_slice(payload).unwrap()
    }

    #[test]
    fn test_service_requires_providers() {
        let registry = ProviderRegistry::new();
        let result = DashboardService::new(
            Arc::new(InMemoryFeedbackStore::new()),
            Arc::new(InMemoryCacheBackend::new()),
            &registry,
            ServiceConfig::default(),
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_repeated_read_is_byte_identical_and_computes_once() {
        let (service, store) = service();
        service
            .ingest(vec![NewFeedback::new("first", "widget")])
            .await
            .unwrap();
        let reads_before = store.reads();

        let first = service.query(ViewName::Stats).await.unwrap();
        let second = service.query(ViewName::Stats).await.unwrap();

        assert_eq!(first, second);
        // Only the first request hit the store.
        assert_eq!(store.reads(), reads_before + 1);
    }

    #[tokio::test]
    async fn test_cached_view_reflects_write_on_next_read() {
        let (service, _) = service();
        let before = parse(&service.query(ViewName::Stats).await.unwrap());
        assert_eq!(before["total"], 0);

        service
            .ingest(vec![NewFeedback::new("new issue", "widget")])
            .await
            .unwrap();

        let after = parse(&service.query(ViewName::Stats).await.unwrap());
        assert_eq!(after["total"], 1);
    }

    #[tokio::test]
    async fn test_recent_issues_always_reflects_latest_write() {
        let (service, store) = service();
        service.query(ViewName::RecentIssues).await.unwrap();
        let reads_before = store.reads();

        service
            .ingest(vec![NewFeedback::new("just landed", "widget")])
            .await
            .unwrap();

        let payload = parse(&service.query(ViewName::RecentIssues).await.unwrap());
        assert_eq!(payload["issues"][0]["title"], "just landed");
        // Every read recomputes; nothing was cached.
        assert!(store.reads() > reads_before);
    }

    #[tokio::test]
    async fn test_avg_sentiment_one_positive_one_negative_is_five() {
        let (service, store) = service();
        store
            .insert(record_with_sentiment("good", Sentiment::Positive))
            .await
            .unwrap();
        store
            .insert(record_with_sentiment("bad", Sentiment::Negative))
            .await
            .unwrap();

        let stats = parse(&service.query(ViewName::Stats).await.unwrap());
        assert_eq!(stats["avg_sentiment"], "5.0");
    }

    #[tokio::test]
    async fn test_repeat_users_threshold_at_two() {
        let (service, store) = service();
        store.insert(record_from_user("once", "solo")).await.unwrap();
        store.insert(record_from_user("a", "repeat")).await.unwrap();
        store.insert(record_from_user("b", "repeat")).await.unwrap();

        let payload = parse(&service.query(ViewName::RepeatUsers).await.unwrap());
        let users = payload["users"].as_array().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0]["user_id"], "repeat");
        assert_eq!(users[0]["count"], 2);
    }

    #[tokio::test]
    async fn test_top_issues_equal_counts_both_appear() {
        let (service, store) = service();
        for _ in 0..3 {
            store.insert(record_with_sentiment("tie one", Sentiment::Neutral)).await.unwrap();
            store.insert(record_with_sentiment("tie two", Sentiment::Neutral)).await.unwrap();
        }

        let payload = parse(&service.query(ViewName::TopIssues).await.unwrap());
        let titles: Vec<&str> = payload["issues"]
            .as_array()
            .unwrap()
            .iter()
            .map(|issue| issue["title"].as_str().unwrap())
            .collect();
        assert!(titles.contains(&"tie one"));
        assert!(titles.contains(&"tie two"));
    }

    #[tokio::test]
    async fn test_ai_insights_payload_and_caching() {
        let (service, store) = service();
        service
            .ingest(vec![
                NewFeedback::new("love the export", "widget"),
                NewFeedback::new("great dashboard", "widget"),
            ])
            .await
            .unwrap();
        let reads_before = store.reads();

        let first = parse(&service.query(ViewName::AiInsights).await.unwrap());
        assert_eq!(first["summary"], "Insights: 2 items analyzed");

        let second = parse(&service.query(ViewName::AiInsights).await.unwrap());
        assert_eq!(first, second);
        assert_eq!(store.reads(), reads_before + 1);
    }

    #[tokio::test]
    async fn test_ingest_report_counts_and_order() {
        let (service, _) = service();
        let report = service
            .ingest(vec![
                NewFeedback::new("valid", "widget"),
                NewFeedback::new("", "widget"),
                NewFeedback::new("also valid", "email"),
            ])
            .await
            .unwrap();

        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.outcomes.len(), 3);
        assert!(matches!(report.outcomes[0], IngestEntry::Inserted { .. }));
        assert!(matches!(report.outcomes[1], IngestEntry::Failed { .. }));
        assert!(matches!(
            report.outcomes[2],
            IngestEntry::Inserted {
                sentiment: Sentiment::Positive,
                ..
            }
        ));
    }
}
