//! Error taxonomy of the chat pipeline.
//!
//! No retries happen anywhere in this crate: every failure is surfaced to
//! the caller, never silently swallowed. A retry policy, if desired, belongs
//! to the caller or the upstream provider client.

use thiserror::Error;

/// Failures of one chat exchange.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Embedding provider unreachable or returned malformed data.
    /// Retrieval aborts; no generation is attempted.
    #[error("embedding failed: {0}")]
    Embedding(String),

    /// Vector index query failed. Retrieval aborts; no generation is
    /// attempted.
    #[error("index query failed: {0}")]
    IndexQuery(String),

    /// Completion stream interrupted after zero or more chunks. Chunks
    /// already delivered to the sink are not retracted, but the exchange is
    /// failed and no history entry may be recorded for it.
    #[error("generation interrupted after {chunks_sent} chunks: {reason}")]
    Generation { reason: String, chunks_sent: usize },

    /// Ingress payload rejected before any external call was made.
    #[error("malformed exchange request: {0}")]
    MalformedInput(&'static str),

    /// The delivery channel closed mid-stream (client disconnect). The
    /// upstream provider stream was released without pulling further chunks.
    #[error("delivery channel closed mid-stream")]
    Disconnected,
}
