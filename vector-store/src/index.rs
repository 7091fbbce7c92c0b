//! The vector-index seam.

use async_trait::async_trait;
use uuid::Uuid;

use crate::document::{DocumentPayload, DocumentRecord, ScoredDocument};
use crate::errors::VectorStoreError;

/// Read/write contract required from a vector index.
///
/// Implementations must treat each operation as atomic at the granularity of
/// a single document; no cross-document transactions are assumed by callers.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Returns up to `top_k` documents ranked by descending similarity.
    ///
    /// When `score_threshold` is set, neighbors below it are discarded,
    /// which may reduce the result to the empty sequence.
    async fn search(
        &self,
        embedding: Vec<f32>,
        top_k: usize,
        score_threshold: Option<f32>,
    ) -> Result<Vec<ScoredDocument>, VectorStoreError>;

    /// Stores `(id, embedding, payload)` as one point.
    async fn insert(
        &self,
        id: Uuid,
        embedding: Vec<f32>,
        payload: DocumentPayload,
    ) -> Result<(), VectorStoreError>;

    /// Removes the document with `id`.
    ///
    /// # Errors
    /// Returns [`VectorStoreError::NotFound`] when `id` is absent; the index
    /// is left unchanged in that case.
    async fn delete(&self, id: Uuid) -> Result<(), VectorStoreError>;

    /// Lists up to `limit` documents ordered by upload time (oldest first).
    async fn scroll(&self, limit: usize) -> Result<Vec<DocumentRecord>, VectorStoreError>;
}
