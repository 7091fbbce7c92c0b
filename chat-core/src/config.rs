//! Retrieval knobs loaded from environment variables.

/// Default number of neighbors requested from the index.
pub const DEFAULT_TOP_K: usize = 5;

/// Default similarity floor applied to search hits.
pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.8;

/// Default number of user/assistant pairs injected from history.
pub const DEFAULT_HISTORY_LIMIT: usize = 5;

/// Per-process retrieval settings.
#[derive(Debug, Clone)]
pub struct RagSettings {
    /// Neighbors requested per retrieval. `0` disables retrieval output
    /// entirely (an empty context block is still emitted when RAG is on).
    pub top_k: usize,
    /// Hits scoring below this are discarded; `None` keeps everything.
    pub score_threshold: Option<f32>,
    /// Most recent exchanges (pairs) taken from the caller's history.
    pub history_limit: usize,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            score_threshold: Some(DEFAULT_SCORE_THRESHOLD),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl RagSettings {
    /// Builds settings from environment variables with documented defaults:
    ///
    /// - `RAG_TOP_K`            (default `5`)
    /// - `RAG_SCORE_THRESHOLD`  (default `0.8`; any value `<= 0` disables
    ///   the floor)
    /// - `CHAT_HISTORY_LIMIT`   (default `5` pairs)
    pub fn from_env() -> Self {
        let top_k = parse("RAG_TOP_K", DEFAULT_TOP_K);
        let threshold = parse("RAG_SCORE_THRESHOLD", DEFAULT_SCORE_THRESHOLD);
        let history_limit = parse("CHAT_HISTORY_LIMIT", DEFAULT_HISTORY_LIMIT);

        Self {
            top_k,
            score_threshold: (threshold > 0.0).then_some(threshold),
            history_limit,
        }
    }
}

fn parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
