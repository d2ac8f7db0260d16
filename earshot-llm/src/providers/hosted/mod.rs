//! Hosted inference gateway providers
//!
//! Talks to an HTTP inference gateway exposing `/v1/classify` and
//! `/v1/summarize`. The gateway's model internals are out of scope; only
//! the request/response contract matters here.

mod classification;
mod client;
mod summarization;
mod types;

pub use classification::HttpSentimentClassifier;
pub use client::{ApiCallError, InferenceClient};
pub use summarization::HttpInsightSummarizer;
