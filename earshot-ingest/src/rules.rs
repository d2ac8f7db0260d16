//! Keyword rule tables for sentiment fallback, priority, and category.
//!
//! Each derivation is an ordered table of (predicate, outcome) pairs
//! evaluated in a fixed order; the first match wins. Keeping the rules
//! declarative makes each table independently testable.

use earshot_core::{Priority, Sentiment};

/// Keywords signalling positive sentiment in the fallback classifier.
pub const POSITIVE_KEYWORDS: [&str; 7] = [
    "love",
    "great",
    "awesome",
    "excellent",
    "amazing",
    "perfect",
    "thank",
];

/// Keywords signalling negative sentiment in the fallback classifier.
pub const NEGATIVE_KEYWORDS: [&str; 8] = [
    "broken",
    "slow",
    "crash",
    "error",
    "fail",
    "bug",
    "terrible",
    "awful",
];

/// Title keywords that escalate a negative record to high priority.
pub const ESCALATION_KEYWORDS: [&str; 3] = ["error", "fail", "crash"];

/// Ordered keyword-to-category table. First matching row wins; a record
/// matching no row gets "general".
///
/// Rows match whole words, not substrings: "ai" must not fire on "fail"
/// or "email".
pub const CATEGORY_RULES: [(&[&str], &str); 7] = [
    (&["ui", "ux", "dashboard", "design", "layout"], "ux"),
    (&["ai", "llm", "model", "insight"], "ai"),
    (&["database", "migration", "sql", "postgres"], "database"),
    (&["cache", "kv", "storage"], "storage"),
    (&["api", "performance", "slow", "latency", "timeout"], "performance"),
    (&["cli", "tooling", "build", "install"], "tooling"),
    (&["docs", "documentation", "readme", "cors"], "docs"),
];

/// Category assigned when no rule matches.
pub const DEFAULT_CATEGORY: &str = "general";

/// Keyword-based sentiment fallback.
///
/// Used only when the primary classifier fails or times out, never on low
/// confidence. Positive keywords are checked before negative ones, and the
/// match is substring containment over the lowercased text. Never fails.
pub fn fallback_sentiment(text: &str) -> Sentiment {
    let lowered = text.to_lowercase();
    if POSITIVE_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        Sentiment::Positive
    } else if NEGATIVE_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

/// Priority from classified sentiment and title.
///
/// Negative sentiment with an escalation keyword in the title is high;
/// positive sentiment is low; everything else keeps the medium default.
pub fn derive_priority(sentiment: Sentiment, title: &str) -> Priority {
    let lowered = title.to_lowercase();
    match sentiment {
        Sentiment::Negative if ESCALATION_KEYWORDS.iter().any(|k| lowered.contains(k)) => {
            Priority::High
        }
        Sentiment::Positive => Priority::Low,
        _ => Priority::Medium,
    }
}

/// Category from the concatenated record text, via [`CATEGORY_RULES`].
pub fn derive_category(text: &str) -> String {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    for (keywords, category) in CATEGORY_RULES {
        if keywords.iter().any(|k| words.contains(k)) {
            return category.to_string();
        }
    }
    DEFAULT_CATEGORY.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_negative_keywords() {
        assert_eq!(
            fallback_sentiment("this is broken and slow"),
            Sentiment::Negative
        );
        assert_eq!(fallback_sentiment("Export CRASHES on save"), Sentiment::Negative);
    }

    #[test]
    fn test_fallback_positive_wins_over_negative() {
        // Positive keywords are checked first by the fixed rule order.
        assert_eq!(
            fallback_sentiment("love it, even though export is slow"),
            Sentiment::Positive
        );
    }

    #[test]
    fn test_fallback_no_keywords_is_neutral() {
        assert_eq!(
            fallback_sentiment("the widget changed color"),
            Sentiment::Neutral
        );
    }

    #[test]
    fn test_priority_escalates_negative_with_title_keyword() {
        assert_eq!(
            derive_priority(Sentiment::Negative, "Login error on submit"),
            Priority::High
        );
        assert_eq!(
            derive_priority(Sentiment::Negative, "Export crashes"),
            Priority::High
        );
    }

    #[test]
    fn test_priority_negative_without_keyword_stays_medium() {
        assert_eq!(
            derive_priority(Sentiment::Negative, "Dashboard is confusing"),
            Priority::Medium
        );
    }

    #[test]
    fn test_priority_positive_is_low_even_with_keyword() {
        // The sentiment rule is ordered: escalation only applies to
        // negative records.
        assert_eq!(
            derive_priority(Sentiment::Positive, "No more crash on save!"),
            Priority::Low
        );
    }

    #[test]
    fn test_priority_neutral_and_unset_are_medium() {
        assert_eq!(derive_priority(Sentiment::Neutral, "crash"), Priority::Medium);
        assert_eq!(derive_priority(Sentiment::Unset, "crash"), Priority::Medium);
    }

    #[test]
    fn test_category_first_match_wins() {
        // "dashboard" (ux) appears before "slow" (performance) in the table.
        assert_eq!(derive_category("dashboard is slow"), "ux");
        assert_eq!(derive_category("API latency regressed"), "performance");
        assert_eq!(derive_category("migration script dies"), "database");
    }

    #[test]
    fn test_category_matches_words_not_substrings() {
        // "fail" and "email" contain "ai" but must not match the ai rule.
        assert_eq!(derive_category("fail to send email"), "general");
        assert_eq!(derive_category("ai summary is wrong"), "ai");
    }

    #[test]
    fn test_category_defaults_to_general() {
        assert_eq!(derive_category("something unusual happened"), "general");
    }

    #[cfg(test)]
    mod prop_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// The fallback never panics and always lands on one of the
            /// three derivable sentiments.
            #[test]
            fn prop_fallback_total(text in ".{0,200}") {
                let s = fallback_sentiment(&text);
                prop_assert!(matches!(
                    s,
                    Sentiment::Positive | Sentiment::Negative | Sentiment::Neutral
                ));
            }

            /// Category derivation is total and only produces table outcomes.
            #[test]
            fn prop_category_total(text in ".{0,200}") {
                let category = derive_category(&text);
                let known: Vec<&str> = CATEGORY_RULES
                    .iter()
                    .map(|(_, c)| *c)
                    .chain([DEFAULT_CATEGORY])
                    .collect();
                prop_assert!(known.contains(&category.as_str()));
            }
        }
    }
}
