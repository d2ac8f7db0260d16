//! Model provider implementations
//!
//! Concrete implementations of the SentimentClassifier and InsightSummarizer
//! traits against hosted inference services.

pub mod hosted;

pub use hosted::{HttpInsightSummarizer, HttpSentimentClassifier, InferenceClient};
