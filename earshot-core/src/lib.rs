//! Earshot Core - Entity Types
//!
//! Pure data structures with no behavior. All other crates depend on this.
//! This crate contains ONLY data types - no business logic.

use chrono::{DateTime, Utc};

pub mod config;
pub mod entities;
pub mod enums;
pub mod error;
pub mod views;

pub use config::{CacheTtlConfig, ClassifierConfig, DbConfig, SummarizerConfig};
pub use entities::{FeedbackRecord, NewFeedback, NewRecord};
pub use enums::{Priority, Sentiment, ViewName, ViewNameParseError};
pub use error::{
    CacheError, ClassifierError, ConfigError, EarshotError, EarshotResult, StoreError,
    SummarizerError, ValidationError,
};
pub use views::{
    AiInsightsView, LongestUnresolvedView, RecentIssuesView, RepeatUserEntry, RepeatUsersView,
    StatsView, TopIssueEntry, TopIssuesView, UnresolvedEntry,
};

// ============================================================================
// IDENTITY TYPES
// ============================================================================

/// Record identifier. Store-assigned, monotonic per insertion order.
pub type FeedbackId = i64;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;
