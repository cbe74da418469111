//! Conversation aggregation over buyer questions.
//!
//! Collapses a store's message history into one summary row per buyer.
//! The grouping is a pure function over rows the repository already
//! fetched, recomputed on every request.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::questions::ConversationRow;

/// One buyer's conversation window with a store.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationSummary {
    /// Marketplace identity, or the synthetic `user_{id}` fallback.
    pub external_id: String,
    /// Timestamp of the buyer's earliest message across all questions.
    pub first_message_at: DateTime<Utc>,
    /// Timestamp of the buyer's latest message across all questions.
    pub last_message_at: DateTime<Utc>,
}

/// Group message rows per buyer and compute each buyer's window.
///
/// Messages from all of a buyer's questions fold into one summary:
/// `first_message_at` is the minimum and `last_message_at` the maximum
/// timestamp across them. Buyers with no messages produce no rows to
/// begin with. Output is ordered by `first_message_at`, label as a
/// tie-break.
#[must_use]
pub fn summarize_store_conversations(rows: &[ConversationRow]) -> Vec<ConversationSummary> {
    let mut windows: HashMap<String, (DateTime<Utc>, DateTime<Utc>)> = HashMap::new();

    for row in rows {
        let label = row
            .external_id
            .clone()
            .unwrap_or_else(|| format!("user_{}", row.user_id));

        windows
            .entry(label)
            .and_modify(|(first, last)| {
                *first = (*first).min(row.sent_at);
                *last = (*last).max(row.sent_at);
            })
            .or_insert((row.sent_at, row.sent_at));
    }

    let mut summaries: Vec<ConversationSummary> = windows
        .into_iter()
        .map(|(external_id, (first, last))| ConversationSummary {
            external_id,
            first_message_at: first,
            last_message_at: last,
        })
        .collect();

    summaries.sort_by(|a, b| {
        a.first_message_at
            .cmp(&b.first_message_at)
            .then_with(|| a.external_id.cmp(&b.external_id))
    });

    summaries
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeDelta;
    use sellerdesk_core::UserId;

    use super::*;

    fn at(base: DateTime<Utc>, minutes: i64) -> DateTime<Utc> {
        base + TimeDelta::minutes(minutes)
    }

    fn row(user_id: i32, external_id: Option<&str>, sent_at: DateTime<Utc>) -> ConversationRow {
        ConversationRow {
            user_id: UserId::new(user_id),
            external_id: external_id.map(str::to_owned),
            sent_at,
        }
    }

    #[test]
    fn test_messages_across_questions_fold_into_one_window() {
        let base = Utc::now();
        // One buyer, two questions: messages at t=1 and t=5 on the first,
        // t=3 on the second. The window spans min and max.
        let rows = vec![
            row(1, Some("u1"), at(base, 1)),
            row(1, Some("u1"), at(base, 5)),
            row(1, Some("u1"), at(base, 3)),
        ];

        let summaries = summarize_store_conversations(&rows);
        assert_eq!(summaries.len(), 1);
        let window = summaries.first().unwrap();
        assert_eq!(window.external_id, "u1");
        assert_eq!(window.first_message_at, at(base, 1));
        assert_eq!(window.last_message_at, at(base, 5));
    }

    #[test]
    fn test_no_rows_produces_no_summaries() {
        assert!(summarize_store_conversations(&[]).is_empty());
    }

    #[test]
    fn test_missing_external_id_falls_back_to_synthetic_label() {
        let base = Utc::now();
        let rows = vec![row(42, None, base)];

        let summaries = summarize_store_conversations(&rows);
        assert_eq!(summaries.first().unwrap().external_id, "user_42");
    }

    #[test]
    fn test_output_ordered_by_first_message() {
        let base = Utc::now();
        let rows = vec![
            row(2, Some("late"), at(base, 10)),
            row(1, Some("early"), at(base, 1)),
            row(2, Some("late"), at(base, 2)),
            row(3, Some("middle"), at(base, 4)),
        ];

        let labels: Vec<String> = summarize_store_conversations(&rows)
            .into_iter()
            .map(|s| s.external_id)
            .collect();
        // "late" starts at t=2 after the fold, so it sorts second
        assert_eq!(labels, ["early", "late", "middle"]);
    }

    #[test]
    fn test_single_message_window_is_degenerate() {
        let base = Utc::now();
        let summaries = summarize_store_conversations(&[row(7, Some("solo"), base)]);
        let window = summaries.first().unwrap();
        assert_eq!(window.first_message_at, window.last_message_at);
    }
}
