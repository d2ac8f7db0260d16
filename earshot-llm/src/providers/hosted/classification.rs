//! Hosted sentiment classification provider

use super::client::{ApiCallError, InferenceClient};
use super::types::{ClassifyRequest, ClassifyResponse};
use crate::{SentimentClassifier, SentimentLabel, SentimentScore};
use async_trait::async_trait;
use earshot_core::{ClassifierError, EarshotResult};

const PROVIDER: &str = "inference-gateway";

/// Sentiment classifier backed by the hosted inference gateway.
pub struct HttpSentimentClassifier {
    client: InferenceClient,
    model: String,
}

impl HttpSentimentClassifier {
    /// Create a new classifier provider.
    pub fn new(client: InferenceClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    fn map_error(err: ApiCallError) -> ClassifierError {
        match err {
            ApiCallError::Status { status, message } => ClassifierError::RequestFailed {
                provider: PROVIDER.to_string(),
                status,
                message,
            },
            ApiCallError::Transport(message) => ClassifierError::RequestFailed {
                provider: PROVIDER.to_string(),
                status: 0,
                message,
            },
            ApiCallError::Decode(reason) => ClassifierError::InvalidResponse {
                provider: PROVIDER.to_string(),
                reason,
            },
        }
    }
}

#[async_trait]
impl SentimentClassifier for HttpSentimentClassifier {
    async fn classify(&self, text: &str) -> EarshotResult<SentimentScore> {
        let request = ClassifyRequest {
            model: self.model.clone(),
            text: text.to_string(),
        };

        let response: ClassifyResponse = self
            .client
            .request("classify", request)
            .await
            .map_err(Self::map_error)?;

        let label = match response.label.as_str() {
            "positive" => SentimentLabel::Positive,
            "negative" => SentimentLabel::Negative,
            other => {
                return Err(ClassifierError::InvalidResponse {
                    provider: PROVIDER.to_string(),
                    reason: format!("unexpected label: {}", other),
                }
                .into())
            }
        };

        Ok(SentimentScore {
            label,
            confidence: response.confidence.clamp(0.0, 1.0),
        })
    }
}

impl std::fmt::Debug for HttpSentimentClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSentimentClassifier")
            .field("model", &self.model)
            .finish()
    }
}
