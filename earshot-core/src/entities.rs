//! Core entity structures

use crate::{FeedbackId, Priority, Sentiment, Timestamp};
use serde::{Deserialize, Serialize};

/// A single piece of user feedback as persisted in the record store.
///
/// Records are created once by the ingestion pipeline and never deleted in
/// normal operation. `resolved_at` may be set later by an external process;
/// when present it is always >= `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// Store-assigned identifier, monotonic per insertion order.
    pub feedback_id: FeedbackId,
    pub title: String,
    pub description: Option<String>,
    /// Where this feedback came from (e.g. "widget", "email", "intercom").
    pub source: String,
    /// Optional user identifier, typically an email address.
    pub user_id: Option<String>,
    pub sentiment: Sentiment,
    pub category: Option<String>,
    /// Assigned at write time, monotonic per insertion order.
    pub created_at: Timestamp,
    /// Presence means the feedback is resolved.
    pub resolved_at: Option<Timestamp>,
    pub priority: Priority,
}

impl FeedbackRecord {
    /// Whether this record is still unresolved.
    pub fn is_unresolved(&self) -> bool {
        self.resolved_at.is_none()
    }
}

/// Raw feedback tuple accepted by the ingestion boundary.
///
/// Sentiment, category, and priority are derived by the pipeline and are
/// never caller-supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFeedback {
    pub title: String,
    pub description: Option<String>,
    pub source: String,
    pub user_id: Option<String>,
}

impl NewFeedback {
    pub fn new(title: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            source: source.into(),
            user_id: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

/// Fully-derived record fields handed to the store for insertion.
///
/// The store assigns `feedback_id` and `created_at` and returns the
/// completed [`FeedbackRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRecord {
    pub title: String,
    pub description: Option<String>,
    pub source: String,
    pub user_id: Option<String>,
    pub sentiment: Sentiment,
    pub category: Option<String>,
    pub priority: Priority,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_is_unresolved() {
        let mut record = FeedbackRecord {
            feedback_id: 1,
            title: "Dashboard is blank".to_string(),
            description: None,
            source: "widget".to_string(),
            user_id: None,
            sentiment: Sentiment::Unset,
            category: None,
            created_at: Utc::now(),
            resolved_at: None,
            priority: Priority::Medium,
        };
        assert!(record.is_unresolved());

        record.resolved_at = Some(Utc::now());
        assert!(!record.is_unresolved());
    }

    #[test]
    fn test_new_feedback_builder() {
        let feedback = NewFeedback::new("Login fails", "email")
            .with_description("500 on submit")
            .with_user("ada@example.com");
        assert_eq!(feedback.title, "Login fails");
        assert_eq!(feedback.source, "email");
        assert_eq!(feedback.description.as_deref(), Some("500 on submit"));
        assert_eq!(feedback.user_id.as_deref(), Some("ada@example.com"));
    }
}
