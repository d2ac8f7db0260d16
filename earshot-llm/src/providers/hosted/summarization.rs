//! Hosted insight summarization provider

use super::client::{ApiCallError, InferenceClient};
use super::types::{SummarizeRequest, SummarizeResponse};
use crate::{InsightItem, InsightSummarizer};
use async_trait::async_trait;
use earshot_core::{EarshotResult, SummarizerError};

const PROVIDER: &str = "inference-gateway";

/// Insight summarizer backed by the hosted inference gateway.
pub struct HttpInsightSummarizer {
    client: InferenceClient,
    model: String,
    max_tokens: i32,
}

impl HttpInsightSummarizer {
    /// Create a new summarizer provider.
    pub fn new(client: InferenceClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            max_tokens: 400,
        }
    }

    /// Override the summary length budget.
    pub fn with_max_tokens(mut self, max_tokens: i32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn map_error(err: ApiCallError) -> SummarizerError {
        match err {
            ApiCallError::Status { status, message } => SummarizerError::RequestFailed {
                provider: PROVIDER.to_string(),
                status,
                message,
            },
            ApiCallError::Transport(message) => SummarizerError::RequestFailed {
                provider: PROVIDER.to_string(),
                status: 0,
                message,
            },
            ApiCallError::Decode(reason) => SummarizerError::InvalidResponse {
                provider: PROVIDER.to_string(),
                reason,
            },
        }
    }
}

#[async_trait]
impl InsightSummarizer for HttpInsightSummarizer {
    async fn summarize(&self, items: &[InsightItem]) -> EarshotResult<String> {
        let request = SummarizeRequest {
            model: self.model.clone(),
            input: build_input(items),
            max_tokens: self.max_tokens,
        };

        let response: SummarizeResponse = self
            .client
            .request("summarize", request)
            .await
            .map_err(Self::map_error)?;

        Ok(response.summary)
    }
}

impl std::fmt::Debug for HttpInsightSummarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpInsightSummarizer")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

/// Render the summarizer input: one "title: description" line per item.
fn build_input(items: &[InsightItem]) -> String {
    items
        .iter()
        .map(InsightItem::as_line)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_is_joined_title_description_lines() {
        let items = vec![
            InsightItem {
                title: "Login fails".to_string(),
                description: Some("500 on submit".to_string()),
            },
            InsightItem {
                title: "Slow export".to_string(),
                description: None,
            },
        ];
        assert_eq!(
            build_input(&items),
            "Login fails: 500 on submit\nSlow export: "
        );
        assert_eq!(build_input(&[]), "");
    }
}
