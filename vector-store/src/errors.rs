//! Unified error types for the crate.

use thiserror::Error;
use uuid::Uuid;

/// Top-level error for vector-store operations.
#[derive(Debug, Error)]
pub enum VectorStoreError {
    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Qdrant client errors (wrapped).
    #[error("qdrant error: {0}")]
    Qdrant(String),

    /// Delete/get targeted an id that is not in the collection.
    #[error("document not found: {0}")]
    NotFound(Uuid),

    /// Mismatch between a vector and the collection dimensionality.
    #[error("vector size mismatch: got {got}, want {want}")]
    DimensionMismatch { got: usize, want: usize },

    /// A stored point came back without the expected payload fields.
    #[error("malformed payload for point {id}: {reason}")]
    MalformedPayload { id: String, reason: String },
}
