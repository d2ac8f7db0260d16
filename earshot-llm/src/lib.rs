//! Earshot LLM - Hosted Model Abstraction Layer
//!
//! Provider-agnostic traits for sentiment classification and insight
//! summarization. This crate defines the interfaces the core depends on;
//! the hosted HTTP implementations live under [`providers`].

use async_trait::async_trait;
use earshot_core::{ClassifierError, EarshotResult, SummarizerError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub mod providers;

pub use providers::hosted::{HttpInsightSummarizer, HttpSentimentClassifier, InferenceClient};

// ============================================================================
// SENTIMENT CLASSIFIER TRAIT
// ============================================================================

/// Label produced by the primary classifier.
///
/// The classifier only ever asserts positive or negative; "neutral" is a
/// decision the ingestion pipeline makes when confidence is low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
}

/// Classifier output: a label and its confidence in [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    pub label: SentimentLabel,
    pub confidence: f32,
}

/// Trait for sentiment classification providers.
/// Implementations must be thread-safe (Send + Sync).
///
/// # Example
/// ```ignore
/// struct MyClassifier { /* ... */ }
///
/// #[async_trait]
/// impl SentimentClassifier for MyClassifier {
///     async fn classify(&self, text: &str) -> EarshotResult<SentimentScore> {
///         // Call the hosted model
///     }
/// }
/// ```
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    /// Classify a bounded-length text.
    ///
    /// # Returns
    /// * `Ok(SentimentScore)` - label and confidence
    /// * `Err(EarshotError::Classifier)` - if classification fails
    async fn classify(&self, text: &str) -> EarshotResult<SentimentScore>;
}

// ============================================================================
// INSIGHT SUMMARIZER TRAIT
// ============================================================================

/// One feedback item fed to the summarizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightItem {
    pub title: String,
    pub description: Option<String>,
}

impl InsightItem {
    /// Render as the "title: description" line format the summarizer
    /// prompt is built from.
    pub fn as_line(&self) -> String {
        format!("{}: {}", self.title, self.description.as_deref().unwrap_or(""))
    }
}

/// Trait for insight summarization providers.
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait InsightSummarizer: Send + Sync {
    /// Summarize a batch of recent feedback items into free text.
    ///
    /// # Returns
    /// * `Ok(String)` - the insight text
    /// * `Err(EarshotError::Summarizer)` - if summarization fails
    async fn summarize(&self, items: &[InsightItem]) -> EarshotResult<String>;
}

// ============================================================================
// PROVIDER REGISTRY
// ============================================================================

/// Registry for model providers.
/// Providers must be explicitly registered - no auto-discovery.
///
/// # Example
/// ```ignore
/// let mut registry = ProviderRegistry::new();
/// registry.register_classifier(Box::new(my_classifier));
/// registry.register_summarizer(Box::new(my_summarizer));
///
/// let score = registry.classifier()?.classify("love the new export").await?;
/// ```
pub struct ProviderRegistry {
    classifier: Option<Arc<dyn SentimentClassifier>>,
    summarizer: Option<Arc<dyn InsightSummarizer>>,
}

impl ProviderRegistry {
    /// Create a new empty provider registry.
    pub fn new() -> Self {
        Self {
            classifier: None,
            summarizer: None,
        }
    }

    /// Register a sentiment classifier, replacing any previous one.
    pub fn register_classifier(&mut self, provider: Box<dyn SentimentClassifier>) {
        self.classifier = Some(Arc::from(provider));
    }

    /// Register an insight summarizer, replacing any previous one.
    pub fn register_summarizer(&mut self, provider: Box<dyn InsightSummarizer>) {
        self.summarizer = Some(Arc::from(provider));
    }

    /// Get the registered classifier.
    pub fn classifier(&self) -> EarshotResult<Arc<dyn SentimentClassifier>> {
        self.classifier
            .clone()
            .ok_or_else(|| ClassifierError::ProviderNotConfigured.into())
    }

    /// Get the registered summarizer.
    pub fn summarizer(&self) -> EarshotResult<Arc<dyn InsightSummarizer>> {
        self.summarizer
            .clone()
            .ok_or_else(|| SummarizerError::ProviderNotConfigured.into())
    }

    /// Check if a classifier is registered.
    pub fn has_classifier(&self) -> bool {
        self.classifier.is_some()
    }

    /// Check if a summarizer is registered.
    pub fn has_summarizer(&self) -> bool {
        self.summarizer.is_some()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("classifier", &self.classifier.is_some())
            .field("summarizer", &self.summarizer.is_some())
            .finish()
    }
}

// ============================================================================
// MOCK PROVIDERS FOR TESTING
// ============================================================================

/// Mock classifier that always returns the same score.
#[derive(Debug, Clone)]
pub struct FixedSentimentClassifier {
    score: SentimentScore,
}

impl FixedSentimentClassifier {
    pub fn new(label: SentimentLabel, confidence: f32) -> Self {
        Self {
            score: SentimentScore { label, confidence },
        }
    }
}

#[async_trait]
impl SentimentClassifier for FixedSentimentClassifier {
    async fn classify(&self, _text: &str) -> EarshotResult<SentimentScore> {
        Ok(self.score)
    }
}

/// Mock classifier that always fails, for exercising the fallback path.
#[derive(Debug, Clone, Default)]
pub struct FailingSentimentClassifier;

#[async_trait]
impl SentimentClassifier for FailingSentimentClassifier {
    async fn classify(&self, _text: &str) -> EarshotResult<SentimentScore> {
        Err(ClassifierError::RequestFailed {
            provider: "mock".to_string(),
            status: 503,
            message: "mock classifier down".to_string(),
        }
        .into())
    }
}

/// Mock classifier that never responds within any reasonable timeout.
#[derive(Debug, Clone)]
pub struct StalledSentimentClassifier {
    delay: std::time::Duration,
}

impl StalledSentimentClassifier {
    pub fn new(delay: std::time::Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl SentimentClassifier for StalledSentimentClassifier {
    async fn classify(&self, _text: &str) -> EarshotResult<SentimentScore> {
        tokio::time::sleep(self.delay).await;
        Ok(SentimentScore {
            label: SentimentLabel::Positive,
            confidence: 1.0,
        })
    }
}

/// Mock summarizer that echoes a deterministic summary of its input.
#[derive(Debug, Clone)]
pub struct MockInsightSummarizer {
    prefix: String,
}

impl MockInsightSummarizer {
    pub fn new() -> Self {
        Self {
            prefix: "Insights: ".to_string(),
        }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for MockInsightSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InsightSummarizer for MockInsightSummarizer {
    async fn summarize(&self, items: &[InsightItem]) -> EarshotResult<String> {
        Ok(format!("{}{} items analyzed", self.prefix, items.len()))
    }
}

/// Mock summarizer that never responds within any reasonable timeout.
#[derive(Debug, Clone)]
pub struct StalledInsightSummarizer {
    delay: std::time::Duration,
}

impl StalledInsightSummarizer {
    pub fn new(delay: std::time::Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl InsightSummarizer for StalledInsightSummarizer {
    async fn summarize(&self, items: &[InsightItem]) -> EarshotResult<String> {
        tokio::time::sleep(self.delay).await;
        Ok(format!("{} items analyzed", items.len()))
    }
}

/// Mock summarizer that always fails, for exercising the fixed fallback.
#[derive(Debug, Clone, Default)]
pub struct FailingInsightSummarizer;

#[async_trait]
impl InsightSummarizer for FailingInsightSummarizer {
    async fn summarize(&self, _items: &[InsightItem]) -> EarshotResult<String> {
        Err(SummarizerError::RequestFailed {
            provider: "mock".to_string(),
            status: 503,
            message: "mock summarizer down".to_string(),
        }
        .into())
    }
}

// ============================================================================
// UNIT TESTS
// ============================================================================
