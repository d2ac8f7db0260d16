//! Enum types for earshot entities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::config::CacheTtlConfig;

/// Sentiment assigned to a feedback record.
///
/// `Unset` is the state of a record before (or without) classification;
/// the ingestion pipeline normally replaces it with one of the other three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    #[default]
    Unset,
}

impl Sentiment {
    /// Score used by the Stats view average.
    /// Positive = 8.0, Neutral = 5.0, anything else (Negative, Unset) = 2.0.
    pub fn score(&self) -> f64 {
        match self {
            Sentiment::Positive => 8.0,
            Sentiment::Neutral => 5.0,
            _ => 2.0,
        }
    }

    /// Database string representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
            Sentiment::Unset => "unset",
        }
    }

    /// Parse from database string representation.
    /// Unknown values map to `Unset` rather than erroring; the store is the
    /// source of truth and older rows may predate classification.
    pub fn from_db_str(s: &str) -> Self {
        match s {
            "positive" => Sentiment::Positive,
            "negative" => Sentiment::Negative,
            "neutral" => Sentiment::Neutral,
            _ => Sentiment::Unset,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_db_str())
    }
}

/// Priority of a feedback record. Defaults to `Medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Database string representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Parse from database string representation.
    pub fn from_db_str(s: &str) -> Self {
        match s {
            "low" => Priority::Low,
            "high" => Priority::High,
            _ => Priority::Medium,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_db_str())
    }
}

/// The six dashboard views served by the query boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewName {
    Stats,
    TopIssues,
    RecentIssues,
    RepeatUsers,
    LongestUnresolved,
    AiInsights,
}

impl ViewName {
    /// All views, in dashboard order.
    pub const ALL: [ViewName; 6] = [
        ViewName::Stats,
        ViewName::TopIssues,
        ViewName::RecentIssues,
        ViewName::RepeatUsers,
        ViewName::LongestUnresolved,
        ViewName::AiInsights,
    ];

    /// Wire identifier, doubling as the cache key for cached views.
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewName::Stats => "stats",
            ViewName::TopIssues => "top-issues",
            ViewName::RecentIssues => "recent-issues",
            ViewName::RepeatUsers => "repeat-users",
            ViewName::LongestUnresolved => "longest-unresolved",
            ViewName::AiInsights => "ai-insights",
        }
    }

    /// Whether this view participates in the cache at all.
    ///
    /// `recent-issues` is intentionally never cached: its defining property
    /// is recency, so it is recomputed on every read.
    pub fn is_cached(&self) -> bool {
        !matches!(self, ViewName::RecentIssues)
    }

    /// TTL for this view's cache entry under the given policy.
    /// Returns `None` for the uncached view.
    pub fn ttl(&self, ttls: &CacheTtlConfig) -> Option<Duration> {
        match self {
            ViewName::RecentIssues => None,
            ViewName::AiInsights => Some(ttls.insights),
            _ => Some(ttls.dashboard),
        }
    }
}

impl fmt::Display for ViewName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a view name string is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown view name: {0}")]
pub struct ViewNameParseError(pub String);

impl FromStr for ViewName {
    type Err = ViewNameParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stats" => Ok(ViewName::Stats),
            "top-issues" => Ok(ViewName::TopIssues),
            "recent-issues" => Ok(ViewName::RecentIssues),
            "repeat-users" => Ok(ViewName::RepeatUsers),
            "longest-unresolved" => Ok(ViewName::LongestUnresolved),
            "ai-insights" => Ok(ViewName::AiInsights),
            other => Err(ViewNameParseError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentiment_scores() {
        assert_eq!(Sentiment::Positive.score(), 8.0);
        assert_eq!(Sentiment::Neutral.score(), 5.0);
        assert_eq!(Sentiment::Negative.score(), 2.0);
        assert_eq!(Sentiment::Unset.score(), 2.0);
    }

    #[test]
    fn test_sentiment_db_round_trip() {
        for s in [
            Sentiment::Positive,
            Sentiment::Negative,
            Sentiment::Neutral,
            Sentiment::Unset,
        ] {
            assert_eq!(Sentiment::from_db_str(s.as_db_str()), s);
        }
        // Unknown strings degrade to Unset rather than failing the read.
        assert_eq!(Sentiment::from_db_str("mixed"), Sentiment::Unset);
    }

    #[test]
    fn test_priority_default_is_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
        assert_eq!(Priority::from_db_str("nonsense"), Priority::Medium);
    }

    #[test]
    fn test_view_name_round_trip() {
        for view in ViewName::ALL {
            assert_eq!(view.as_str().parse::<ViewName>().unwrap(), view);
        }
        assert!("nope".parse::<ViewName>().is_err());
    }

    #[test]
    fn test_recent_issues_is_never_cached() {
        let ttls = CacheTtlConfig::default();
        assert!(!ViewName::RecentIssues.is_cached());
        assert_eq!(ViewName::RecentIssues.ttl(&ttls), None);
        for view in ViewName::ALL {
            if view != ViewName::RecentIssues {
                assert!(view.is_cached());
                assert!(view.ttl(&ttls).is_some());
            }
        }
    }

    #[test]
    fn test_view_ttl_policy() {
        let ttls = CacheTtlConfig::default();
        assert_eq!(
            ViewName::Stats.ttl(&ttls),
            Some(std::time::Duration::from_secs(300))
        );
        assert_eq!(
            ViewName::AiInsights.ttl(&ttls),
            Some(std::time::Duration::from_secs(600))
        );
    }
}
