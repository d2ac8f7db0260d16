//! Earshot Ingest - Feedback Ingestion Pipeline
//!
//! Turns raw feedback tuples into classified, persisted records. The
//! pipeline validates, classifies sentiment (hosted model with a keyword
//! fallback), derives priority and category from the rule tables, writes
//! through the record store, and invalidates the cached views before the
//! batch is acknowledged.

pub mod rules;

pub use rules::{derive_category, derive_priority, fallback_sentiment};

use earshot_core::{
    ClassifierConfig, EarshotError, EarshotResult, FeedbackId, NewFeedback, NewRecord, Sentiment,
    ValidationError,
};
use earshot_llm::{SentimentClassifier, SentimentLabel};
use earshot_storage::{CacheBackend, FeedbackStore, ViewCache};
use std::sync::Arc;

// ============================================================================
// OUTCOME TYPES
// ============================================================================

/// Per-record result of a batch ingestion.
///
/// A failed record never aborts its batch; the caller gets one outcome per
/// input tuple, in input order.
#[derive(Debug)]
pub enum IngestOutcome {
    Inserted {
        feedback_id: FeedbackId,
        sentiment: Sentiment,
    },
    Failed {
        error: EarshotError,
    },
}

impl IngestOutcome {
    pub fn is_inserted(&self) -> bool {
        matches!(self, IngestOutcome::Inserted { .. })
    }
}

// ============================================================================
// PIPELINE
// ============================================================================

/// The ingestion pipeline. Dependencies are injected, never ambient.
pub struct IngestionPipeline<S: FeedbackStore, C: CacheBackend> {
    store: Arc<S>,
    cache: ViewCache<C>,
    classifier: Arc<dyn SentimentClassifier>,
    config: ClassifierConfig,
}

impl<S: FeedbackStore, C: CacheBackend> IngestionPipeline<S, C> {
    pub fn new(
        store: Arc<S>,
        cache: ViewCache<C>,
        classifier: Arc<dyn SentimentClassifier>,
        config: ClassifierConfig,
    ) -> Self {
        Self {
            store,
            cache,
            classifier,
            config,
        }
    }

    /// Ingest a batch of raw feedback tuples.
    ///
    /// Records are processed independently; a validation or store failure
    /// on one record does not stop the rest. If at least one insert
    /// succeeded, the cached view keys are invalidated before the batch
    /// returns, so no later read can serve a payload predating the write.
    /// Invalidation failure fails the whole batch call.
    pub async fn ingest_batch(&self, batch: Vec<NewFeedback>) -> EarshotResult<Vec<IngestOutcome>> {
        let mut outcomes = Vec::with_capacity(batch.len());
        for feedback in batch {
            outcomes.push(self.ingest_one(feedback).await);
        }

        if outcomes.iter().any(IngestOutcome::is_inserted) {
            self.cache.invalidate_after_write().await?;
        }

        Ok(outcomes)
    }

    async fn ingest_one(&self, feedback: NewFeedback) -> IngestOutcome {
        if let Err(e) = validate(&feedback) {
            return IngestOutcome::Failed { error: e.into() };
        }

        let text = classification_text(&feedback, self.config.max_input_chars);
        let sentiment = self.classify(&text).await;
        let priority = rules::derive_priority(sentiment, &feedback.title);
        let category = rules::derive_category(&text);

        let record = NewRecord {
            title: feedback.title,
            description: feedback.description,
            source: feedback.source,
            user_id: feedback.user_id,
            sentiment,
            category: Some(category),
            priority,
        };

        match self.store.insert(record).await {
            Ok(stored) => {
                tracing::debug!(
                    feedback_id = stored.feedback_id,
                    sentiment = %stored.sentiment,
                    priority = %stored.priority,
                    "feedback record inserted"
                );
                IngestOutcome::Inserted {
                    feedback_id: stored.feedback_id,
                    sentiment: stored.sentiment,
                }
            }
            Err(error) => IngestOutcome::Failed { error },
        }
    }

    /// Run the classification state machine. Never fails.
    ///
    /// Primary: a confident positive or negative label maps directly, and
    /// anything below the threshold is neutral. The keyword fallback fires
    /// only when the classifier call itself fails or times out.
    async fn classify(&self, text: &str) -> Sentiment {
        let call = self.classifier.classify(text);
        match tokio::time::timeout(self.config.call_timeout, call).await {
            Ok(Ok(score)) => {
                if score.confidence > self.config.confidence_threshold {
                    match score.label {
                        SentimentLabel::Positive => Sentiment::Positive,
                        SentimentLabel::Negative => Sentiment::Negative,
                    }
                } else {
                    Sentiment::Neutral
                }
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "classifier failed, using keyword fallback");
                rules::fallback_sentiment(text)
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.config.call_timeout.as_millis() as u64,
                    "classifier timed out, using keyword fallback"
                );
                rules::fallback_sentiment(text)
            }
        }
    }
}

/// Validate a raw feedback tuple at the ingestion boundary.
pub fn validate(feedback: &NewFeedback) -> Result<(), ValidationError> {
    if feedback.title.trim().is_empty() {
        return Err(ValidationError::RequiredFieldMissing {
            field: "title".to_string(),
        });
    }
    if feedback.source.trim().is_empty() {
        return Err(ValidationError::RequiredFieldMissing {
            field: "source".to_string(),
        });
    }
    Ok(())
}

/// Concatenate title and description, truncated to the classifier's
/// accepted input length. Truncation counts characters, not bytes, so it
/// can never split a multi-byte character.
pub fn classification_text(feedback: &NewFeedback, max_chars: usize) -> String {
    let mut text = feedback.title.clone();
    if let Some(description) = &feedback.description {
        text.push(' ');
        text.push_str(description);
    }
    if text.chars().count() > max_chars {
        text = text.chars().take(max_chars).collect();
    }
    text
}

// ============================================================================
// TESTS
// ============================================================================
