//! Bounded, caller-owned conversation history.
//!
//! History is never shared process-wide: the transport (WebSocket client,
//! CLI) keeps its own list and passes an immutable snapshot with each
//! exchange. Entries always come in user/assistant pairs, appended only
//! after a cleanly finished exchange and truncated from the oldest end.

use serde::{Deserialize, Serialize};

/// Role of a retained history entry. System messages are never retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryRole {
    User,
    Assistant,
}

/// One retained message of a past exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: HistoryRole,
    pub content: String,
}

impl HistoryEntry {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: HistoryRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: HistoryRole::Assistant,
            content: content.into(),
        }
    }
}

/// Returns the most recent `max_exchanges` pairs (2·N entries) of `history`.
///
/// `max_exchanges == 0` yields the empty slice regardless of stored entries.
pub fn clamp(history: &[HistoryEntry], max_exchanges: usize) -> &[HistoryEntry] {
    let keep = max_exchanges.saturating_mul(2).min(history.len());
    &history[history.len() - keep..]
}

/// True when the entries form complete `(user, assistant)` pairs.
///
/// The empty history is trivially paired.
pub fn is_paired(history: &[HistoryEntry]) -> bool {
    history.len() % 2 == 0
        && history.chunks(2).all(|pair| {
            pair[0].role == HistoryRole::User && pair[1].role == HistoryRole::Assistant
        })
}

/// Appends one completed exchange to a caller-owned history list.
pub fn push_exchange(history: &mut Vec<HistoryEntry>, prompt: &str, answer: &str) {
    history.push(HistoryEntry::user(prompt));
    history.push(HistoryEntry::assistant(answer));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(n: usize) -> Vec<HistoryEntry> {
        let mut out = Vec::new();
        for i in 0..n {
            push_exchange(&mut out, &format!("q{i}"), &format!("a{i}"));
        }
        out
    }

    #[test]
    fn clamp_keeps_most_recent_pairs() {
        let h = pairs(4);
        let kept = clamp(&h, 2);
        assert_eq!(kept.len(), 4);
        assert_eq!(kept[0].content, "q2");
        assert_eq!(kept[3].content, "a3");
    }

    #[test]
    fn clamp_zero_is_empty() {
        let h = pairs(3);
        assert!(clamp(&h, 0).is_empty());
    }

    #[test]
    fn clamp_larger_than_history_keeps_all() {
        let h = pairs(2);
        assert_eq!(clamp(&h, 10).len(), 4);
    }

    #[test]
    fn pairing_invariant() {
        assert!(is_paired(&[]));
        assert!(is_paired(&pairs(2)));
        assert!(!is_paired(&[HistoryEntry::user("q")]));
        assert!(!is_paired(&[
            HistoryEntry::assistant("a"),
            HistoryEntry::user("q"),
        ]));
    }
}
