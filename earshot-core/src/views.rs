//! Derived view payload types
//!
//! Views carry no identity beyond their computed content; freshness is
//! governed entirely by the cache entry wrapping them. These types are the
//! serialized shapes handed up to the dashboard client.

use crate::{FeedbackRecord, Sentiment, Timestamp};
use serde::{Deserialize, Serialize};

/// Aggregate counters for the dashboard header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsView {
    /// Total record count, resolved and unresolved.
    pub total: i64,
    /// Records with no resolution timestamp.
    pub unresolved: i64,
    /// Average sentiment score over ALL records (including resolved ones -
    /// a deliberate asymmetry with the unresolved-only views), formatted to
    /// one decimal. Positive=8.0, neutral=5.0, anything else=2.0.
    pub avg_sentiment: String,
    /// Distinct user identifiers appearing on two or more records,
    /// regardless of resolution state.
    pub repeat_users: i64,
}

/// One title group in the top-issues ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopIssueEntry {
    pub title: String,
    pub count: i64,
    /// A representative sentiment taken from one record in the group.
    pub sentiment: Sentiment,
}

/// Unresolved records grouped by exact title, top 5 by group size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopIssuesView {
    pub issues: Vec<TopIssueEntry>,
}

/// The five most recently created records, newest first. Never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentIssuesView {
    pub issues: Vec<FeedbackRecord>,
}

/// One user in the repeat-users ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepeatUserEntry {
    pub user_id: String,
    pub count: i64,
    /// Distinct titles from the user's unresolved records, joined by "; ".
    pub titles: String,
}

/// Users with two or more unresolved records, top 5 by record count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepeatUsersView {
    pub users: Vec<RepeatUserEntry>,
}

/// An unresolved record annotated with how long it has been open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnresolvedEntry {
    #[serde(flatten)]
    pub record: FeedbackRecord,
    /// Integer floor of (now - created_at) in days.
    pub days_open: i64,
}

/// The five oldest unresolved records, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongestUnresolvedView {
    pub issues: Vec<UnresolvedEntry>,
}

/// Free-text insight over the trailing seven days of feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiInsightsView {
    pub summary: String,
    pub generated_at: Timestamp,
}
