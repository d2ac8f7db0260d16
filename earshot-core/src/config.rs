//! Configuration types

use crate::{ConfigError, EarshotResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-view cache TTL policy.
///
/// TTLs are configuration, not hardcoded at call sites: the four dashboard
/// aggregate views share one TTL, AI insights get a longer one because the
/// summarizer is expensive to re-run and acceptable to be staler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheTtlConfig {
    /// TTL for stats, top-issues, repeat-users, longest-unresolved.
    pub dashboard: Duration,
    /// TTL for ai-insights.
    pub insights: Duration,
}

impl Default for CacheTtlConfig {
    fn default() -> Self {
        Self {
            dashboard: Duration::from_secs(300),
            insights: Duration::from_secs(600),
        }
    }
}

impl CacheTtlConfig {
    /// Create from environment variables with fallback to defaults.
    ///
    /// Environment variables:
    /// - `EARSHOT_CACHE_DASHBOARD_TTL_SECS`: dashboard view TTL (default: 300)
    /// - `EARSHOT_CACHE_INSIGHTS_TTL_SECS`: ai-insights TTL (default: 600)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            dashboard: std::env::var("EARSHOT_CACHE_DASHBOARD_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.dashboard),
            insights: std::env::var("EARSHOT_CACHE_INSIGHTS_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.insights),
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> EarshotResult<()> {
        if self.dashboard.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "dashboard".to_string(),
                value: format!("{:?}", self.dashboard),
                reason: "dashboard TTL must be positive".to_string(),
            }
            .into());
        }
        if self.insights.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "insights".to_string(),
                value: format!("{:?}", self.insights),
                reason: "insights TTL must be positive".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Sentiment classification settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Minimum confidence for the primary label to be accepted.
    /// Below this the record is classified neutral (not the fallback path).
    pub confidence_threshold: f32,
    /// Maximum input length accepted by the classifier, in characters.
    /// Title + description is truncated to this before the call.
    pub max_input_chars: usize,
    /// Upper bound on a single classifier call. Expiry is a failure and
    /// triggers the keyword fallback.
    pub call_timeout: Duration,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.6,
            max_input_chars: 1000,
            call_timeout: Duration::from_secs(5),
        }
    }
}

impl ClassifierConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> EarshotResult<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ConfigError::InvalidValue {
                field: "confidence_threshold".to_string(),
                value: self.confidence_threshold.to_string(),
                reason: "must be between 0.0 and 1.0".to_string(),
            }
            .into());
        }
        if self.max_input_chars == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_input_chars".to_string(),
                value: "0".to_string(),
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.call_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "call_timeout".to_string(),
                value: format!("{:?}", self.call_timeout),
                reason: "must be positive".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Insight summarization settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarizerConfig {
    /// Trailing window of records fed to the summarizer.
    pub window: Duration,
    /// Maximum number of records in one summarization batch.
    pub max_records: usize,
    /// Upper bound on a single summarizer call. Expiry is a failure and
    /// yields the fallback message.
    pub call_timeout: Duration,
    /// Message served when the summarizer fails or times out.
    pub fallback_message: String,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(7 * 24 * 3600),
            max_records: 20,
            call_timeout: Duration::from_secs(15),
            fallback_message: "AI insights are temporarily unavailable. Check back shortly."
                .to_string(),
        }
    }
}

impl SummarizerConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> EarshotResult<()> {
        if self.window.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "window".to_string(),
                value: format!("{:?}", self.window),
                reason: "must be positive".to_string(),
            }
            .into());
        }
        if self.max_records == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_records".to_string(),
                value: "0".to_string(),
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.fallback_message.is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "fallback_message".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Database connection pool configuration for the Postgres record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
    pub max_size: usize,
    pub timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "earshot".to_string(),
            user: "postgres".to_string(),
            password: "".to_string(),
            max_size: 16,
            timeout: Duration::from_secs(30),
        }
    }
}

impl DbConfig {
    /// Create from environment variables with fallback to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: std::env::var("EARSHOT_DB_HOST").unwrap_or(defaults.host),
            port: std::env::var("EARSHOT_DB_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            dbname: std::env::var("EARSHOT_DB_NAME").unwrap_or(defaults.dbname),
            user: std::env::var("EARSHOT_DB_USER").unwrap_or(defaults.user),
            password: std::env::var("EARSHOT_DB_PASSWORD").unwrap_or_default(),
            max_size: std::env::var("EARSHOT_DB_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_size),
            timeout: std::env::var("EARSHOT_DB_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }
}
