//! Earshot Views - Derived Dashboard Computations
//!
//! Each view is a pure function from the current record set to a payload
//! type from `earshot_core::views`. The store is the only input; nothing
//! here reads the cache or mutates records. Caching and invalidation live
//! one layer up, in the service coordinator.

use chrono::{Duration as ChronoDuration, Utc};
use earshot_core::{
    AiInsightsView, EarshotResult, FeedbackRecord, LongestUnresolvedView, RecentIssuesView,
    RepeatUserEntry, RepeatUsersView, StatsView, SummarizerConfig, TopIssueEntry, TopIssuesView,
    UnresolvedEntry,
};
use earshot_llm::{InsightItem, InsightSummarizer};
use earshot_storage::FeedbackStore;
use std::collections::HashMap;
use std::sync::Arc;

/// Ranked views return at most this many entries.
pub const VIEW_LIMIT: usize = 5;

/// Computes dashboard views from the record store.
pub struct ViewEngine<S: FeedbackStore> {
    store: Arc<S>,
    summarizer_config: SummarizerConfig,
}

impl<S: FeedbackStore> ViewEngine<S> {
    /// Create an engine over the given store with default summarizer settings.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            summarizer_config: SummarizerConfig::default(),
        }
    }

    /// Create an engine with explicit summarizer settings.
    pub fn with_summarizer_config(store: Arc<S>, config: SummarizerConfig) -> Self {
        Self {
            store,
            summarizer_config: config,
        }
    }

    /// Aggregate counters for the dashboard header.
    ///
    /// The average and the repeat-user count run over ALL records,
    /// resolved ones included; only the `unresolved` counter filters.
    pub async fn stats(&self) -> EarshotResult<StatsView> {
        let records = self.store.fetch_all().await?;

        let total = records.len() as i64;
        let unresolved = records.iter().filter(|r| r.is_unresolved()).count() as i64;

        let avg_sentiment = if records.is_empty() {
            "0.0".to_string()
        } else {
            let sum: f64 = records.iter().map(|r| r.sentiment.score()).sum();
            format!("{:.1}", sum / records.len() as f64)
        };

        let mut per_user: HashMap<&str, i64> = HashMap::new();
        for record in &records {
            if let Some(user_id) = record.user_id.as_deref() {
                *per_user.entry(user_id).or_default() += 1;
            }
        }
        let repeat_users = per_user.values().filter(|&&count| count >= 2).count() as i64;

        Ok(StatsView {
            total,
            unresolved,
            avg_sentiment,
            repeat_users,
        })
    }

    /// Unresolved records grouped by exact title, ranked by group size.
    ///
    /// Groups are collected in first-seen order and the sort is stable on
    /// count alone, so ties rank older groups first. The sentiment shown
    /// for a group is the one from its earliest record.
    pub async fn top_issues(&self) -> EarshotResult<TopIssuesView> {
        let records = self.store.fetch_unresolved().await?;

        let mut order: Vec<&str> = Vec::new();
        let mut groups: HashMap<&str, TopIssueEntry> = HashMap::new();
        for record in &records {
            match groups.get_mut(record.title.as_str()) {
                Some(entry) => entry.count += 1,
                None => {
                    order.push(&record.title);
                    groups.insert(
                        &record.title,
                        TopIssueEntry {
                            title: record.title.clone(),
                            count: 1,
                            sentiment: record.sentiment,
                        },
                    );
                }
            }
        }

        let mut issues: Vec<TopIssueEntry> = order
            .into_iter()
            .filter_map(|title| groups.remove(title))
            .collect();
        issues.sort_by(|a, b| b.count.cmp(&a.count));
        issues.truncate(VIEW_LIMIT);

        Ok(TopIssuesView { issues })
    }

    /// The most recently created records, newest first.
    pub async fn recent_issues(&self) -> EarshotResult<RecentIssuesView> {
        let issues = self.store.fetch_recent(VIEW_LIMIT).await?;
        Ok(RecentIssuesView { issues })
    }

    /// Users with two or more unresolved records, ranked by record count.
    ///
    /// The titles line joins each user's distinct unresolved titles in
    /// first-seen order. Records without a user identifier never count.
    pub async fn repeat_users(&self) -> EarshotResult<RepeatUsersView> {
        let records = self.store.fetch_unresolved().await?;

        struct UserGroup {
            count: i64,
            titles: Vec<String>,
        }

        let mut order: Vec<&str> = Vec::new();
        let mut groups: HashMap<&str, UserGroup> = HashMap::new();
        for record in &records {
            let Some(user_id) = record.user_id.as_deref() else {
                continue;
            };
            match groups.get_mut(user_id) {
                Some(group) => {
                    group.count += 1;
                    if !group.titles.contains(&record.title) {
                        group.titles.push(record.title.clone());
                    }
                }
                None => {
                    order.push(user_id);
                    groups.insert(
                        user_id,
                        UserGroup {
                            count: 1,
                            titles: vec![record.title.clone()],
                        },
                    );
                }
            }
        }

        let mut users: Vec<RepeatUserEntry> = order
            .into_iter()
            .filter_map(|user_id| {
                let group = groups.remove(user_id)?;
                (group.count >= 2).then(|| RepeatUserEntry {
                    user_id: user_id.to_string(),
                    count: group.count,
                    titles: group.titles.join("; "),
                })
            })
            .collect();
        users.sort_by(|a, b| b.count.cmp(&a.count));
        users.truncate(VIEW_LIMIT);

        Ok(RepeatUsersView { users })
    }

    /// The oldest unresolved records, oldest first, annotated with whole
    /// days open.
    pub async fn longest_unresolved(&self) -> EarshotResult<LongestUnresolvedView> {
        let now = Utc::now();
        let mut records = self.store.fetch_unresolved().await?;
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        records.truncate(VIEW_LIMIT);

        let issues = records
            .into_iter()
            .map(|record| {
                let days_open = (now - record.created_at).num_days().max(0);
                UnresolvedEntry { record, days_open }
            })
            .collect();

        Ok(LongestUnresolvedView { issues })
    }

    /// Free-text summary of the trailing feedback window.
    ///
    /// Store failures propagate; summarizer failures (including timeout)
    /// degrade to the configured fallback message and never error out.
    pub async fn ai_insights(
        &self,
        summarizer: &dyn InsightSummarizer,
    ) -> EarshotResult<AiInsightsView> {
        let config = &self.summarizer_config;
        let cutoff = Utc::now()
            - ChronoDuration::from_std(config.window).unwrap_or_else(|_| ChronoDuration::days(7));
        let records = self
            .store
            .fetch_created_since(cutoff, config.max_records)
            .await?;

        let items: Vec<InsightItem> = records.iter().map(insight_item).collect();

        let summary = match tokio::time::timeout(config.call_timeout, summarizer.summarize(&items))
            .await
        {
            Ok(Ok(summary)) => summary,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "insight summarization failed, serving fallback");
                config.fallback_message.clone()
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = config.call_timeout.as_millis() as u64,
                    "insight summarization timed out, serving fallback"
                );
                config.fallback_message.clone()
            }
        };

        Ok(AiInsightsView {
            summary,
            generated_at: Utc::now(),
        })
    }
}

fn insight_item(record: &FeedbackRecord) -> InsightItem {
    InsightItem {
        title: record.title.clone(),
        description: record.description.clone(),
    }
}

// ============================================================================
// TESTS
// ============================================================================
