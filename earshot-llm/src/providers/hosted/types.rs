//! Wire types for the hosted inference gateway

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct ClassifyRequest {
    pub model: String,
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifyResponse {
    /// "positive" or "negative".
    pub label: String,
    pub confidence: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummarizeRequest {
    pub model: String,
    /// Newline-joined "title: description" lines.
    pub input: String,
    pub max_tokens: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummarizeResponse {
    pub summary: String,
}

/// Error envelope the gateway returns on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
}
