//! HTTP client for the inference gateway, with request limiting

use super::types::ApiError;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Failure of a single gateway call, before being mapped to the caller's
/// error taxonomy (classifier vs summarizer).
#[derive(Debug, Clone)]
pub enum ApiCallError {
    /// Gateway answered with a non-success status.
    Status { status: i32, message: String },
    /// Transport-level failure (DNS, connect, TLS, body read).
    Transport(String),
    /// 2xx response that did not parse as the expected type.
    Decode(String),
}

/// Inference gateway client with a concurrent-request cap.
pub struct InferenceClient {
    client: Client,
    api_key: String,
    base_url: String,
    limiter: Arc<Semaphore>,
}

impl InferenceClient {
    /// Create a new gateway client.
    ///
    /// # Arguments
    /// * `base_url` - gateway base URL, e.g. "https://inference.example.com/v1"
    /// * `api_key` - bearer token for the gateway
    /// * `max_in_flight` - maximum concurrent requests
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        max_in_flight: usize,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
            limiter: Arc::new(Semaphore::new(max_in_flight.max(1))),
        }
    }

    /// Make a gateway request under the in-flight limit.
    pub async fn request<Req: Serialize, Res: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: Req,
    ) -> Result<Res, ApiCallError> {
        let _permit = self
            .limiter
            .acquire()
            .await
            .map_err(|e| ApiCallError::Transport(format!("limiter closed: {}", e)))?;

        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiCallError::Transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| ApiCallError::Decode(format!("failed to parse response: {}", e)))
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            let message = if let Ok(api_error) = serde_json::from_str::<ApiError>(&error_text) {
                api_error.error.message
            } else {
                error_text
            };

            Err(ApiCallError::Status {
                status: status_code(status),
                message,
            })
        }
    }
}

fn status_code(status: StatusCode) -> i32 {
    status.as_u16() as i32
}

impl std::fmt::Debug for InferenceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}
