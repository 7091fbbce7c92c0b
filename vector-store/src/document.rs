//! Document payloads and result shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of leading words kept in a document's short description.
const SHORT_DESCRIPTION_WORDS: usize = 15;

/// Payload stored alongside each vector point.
///
/// Immutable once stored (except for deletion): uploads never update an
/// existing point in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentPayload {
    /// Full document text.
    pub content: String,
    /// Preview built from the first words of `content`.
    pub short_description: String,
    /// Upload timestamp; also the scroll ordering key.
    pub uploaded_at: DateTime<Utc>,
}

impl DocumentPayload {
    /// Builds a payload, deriving the short description from the content.
    pub fn new(content: impl Into<String>, uploaded_at: DateTime<Utc>) -> Self {
        let content = content.into();
        let short_description = short_description(&content);
        Self {
            content,
            short_description,
            uploaded_at,
        }
    }
}

/// A stored document with its similarity score for one query.
#[derive(Debug, Clone)]
pub struct ScoredDocument {
    pub id: Uuid,
    pub content: String,
    pub score: f32,
    pub uploaded_at: DateTime<Utc>,
}

/// A listing row returned by scroll: the preview fields without the vector.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentRecord {
    pub id: Uuid,
    pub short_description: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Returns the first [`SHORT_DESCRIPTION_WORDS`] words of `content`,
/// followed by an ellipsis when the text was truncated.
pub fn short_description(content: &str) -> String {
    let mut words = content.split_whitespace();
    let head: Vec<&str> = words.by_ref().take(SHORT_DESCRIPTION_WORDS).collect();
    let mut out = head.join(" ");
    if words.next().is_some() {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_kept_verbatim() {
        assert_eq!(short_description("Paris is nice"), "Paris is nice");
    }

    #[test]
    fn long_text_is_truncated_with_ellipsis() {
        let content = (1..=20)
            .map(|i| format!("w{i}"))
            .collect::<Vec<_>>()
            .join(" ");
        let desc = short_description(&content);
        assert!(desc.ends_with("w15…"));
        assert!(!desc.contains("w16"));
    }

    #[test]
    fn payload_derives_description() {
        let p = DocumentPayload::new("hello world", Utc::now());
        assert_eq!(p.short_description, "hello world");
    }
}
