//! Error types for earshot operations

use thiserror::Error;

/// Record store errors. Surfaced to the caller of the failing view or
/// ingestion call; never retried automatically by the core.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Insert failed: {reason}")]
    InsertFailed { reason: String },

    #[error("Query failed for {view}: {reason}")]
    QueryFailed { view: String, reason: String },

    #[error("Connection failed: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Row decode failed on column {column}: {reason}")]
    DecodeFailed { column: String, reason: String },
}

/// Sentiment classifier errors. Always recovered locally via the keyword
/// fallback; never surfaced to an ingestion caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClassifierError {
    #[error("No classifier provider configured")]
    ProviderNotConfigured,

    #[error("Request to {provider} failed with status {status}: {message}")]
    RequestFailed {
        provider: String,
        status: i32,
        message: String,
    },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Classification timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

/// Insight summarizer errors. Recovered locally with a fixed fallback
/// message; never surfaced to a view caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SummarizerError {
    #[error("No summarizer provider configured")]
    ProviderNotConfigured,

    #[error("Request to {provider} failed with status {status}: {message}")]
    RequestFailed {
        provider: String,
        status: i32,
        message: String,
    },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Summarization timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

/// Cache service errors.
///
/// A read error is treated as a miss; a write-back error is logged and
/// discarded. Only invalidation propagates these to a caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache read failed for {key}: {reason}")]
    ReadFailed { key: String, reason: String },

    #[error("Cache write failed for {key}: {reason}")]
    WriteFailed { key: String, reason: String },

    #[error("Cache delete failed for {key}: {reason}")]
    DeleteFailed { key: String, reason: String },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Per-record ingestion validation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Master error type for all earshot errors.
///
/// Not `Clone`/`PartialEq`: the serialization variant wraps an opaque
/// source error.
#[derive(Debug, Error)]
pub enum EarshotError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("Summarizer error: {0}")]
    Summarizer(#[from] SummarizerError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for earshot operations.
pub type EarshotResult<T> = Result<T, EarshotError>;

// =============================================================================
// TESTS
// =============================================================================
