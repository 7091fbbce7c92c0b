//! Retrieval: embed the prompt, query the index, rank the hits.

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, trace};

use vector_store::VectorIndex;

use crate::errors::ChatError;

/// Embedding seam: converts text to a fixed-length vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ChatError>;
}

/// Read-only retrieval over an [`Embedder`] and a [`VectorIndex`].
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn Embedder>, index: Arc<dyn VectorIndex>) -> Self {
        Self { embedder, index }
    }

    /// Returns the contents of the documents most similar to `prompt`,
    /// ranked by descending similarity. Ties are broken by upload time,
    /// oldest first, so repeated calls against an unchanged index return
    /// the same ranking.
    ///
    /// `top_k == 0` short-circuits to the empty result without calling the
    /// embedding provider or the index.
    ///
    /// # Errors
    /// - [`ChatError::Embedding`] when the provider fails
    /// - [`ChatError::IndexQuery`] when the index query fails
    pub async fn retrieve(
        &self,
        prompt: &str,
        top_k: usize,
        score_threshold: Option<f32>,
    ) -> Result<Vec<String>, ChatError> {
        if top_k == 0 {
            trace!("top_k is 0; skipping retrieval entirely");
            return Ok(Vec::new());
        }

        let embedding = self.embedder.embed(prompt).await?;

        let mut hits = self
            .index
            .search(embedding, top_k, score_threshold)
            .await
            .map_err(|e| ChatError::IndexQuery(e.to_string()))?;

        // The index already ranks by score; upload time settles equal scores.
        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.uploaded_at.cmp(&b.uploaded_at))
        });

        debug!(hits = hits.len(), top_k, "retrieval completed");
        Ok(hits.into_iter().map(|h| h.content).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    use chrono::{TimeZone, Utc};
    use uuid::Uuid;
    use vector_store::{DocumentPayload, DocumentRecord, ScoredDocument, VectorStoreError};

    struct FixedEmbedder {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, ChatError> {
            self.calls.fetch_add(1, AtomicOrdering::SeqCst);
            Ok(vec![0.1, 0.2, 0.3])
        }
    }

    struct FixedIndex {
        hits: Vec<ScoredDocument>,
        searches: AtomicUsize,
    }

    #[async_trait]
    impl VectorIndex for FixedIndex {
        async fn search(
            &self,
            _embedding: Vec<f32>,
            top_k: usize,
            _score_threshold: Option<f32>,
        ) -> Result<Vec<ScoredDocument>, VectorStoreError> {
            self.searches.fetch_add(1, AtomicOrdering::SeqCst);
            Ok(self.hits.iter().take(top_k).cloned().collect())
        }

        async fn insert(
            &self,
            _id: Uuid,
            _embedding: Vec<f32>,
            _payload: DocumentPayload,
        ) -> Result<(), VectorStoreError> {
            unreachable!("retrieval is read-only")
        }

        async fn delete(&self, _id: Uuid) -> Result<(), VectorStoreError> {
            unreachable!("retrieval is read-only")
        }

        async fn scroll(&self, _limit: usize) -> Result<Vec<DocumentRecord>, VectorStoreError> {
            unreachable!("retrieval is read-only")
        }
    }

    fn doc(content: &str, score: f32, uploaded_secs: i64) -> ScoredDocument {
        ScoredDocument {
            id: Uuid::new_v4(),
            content: content.to_string(),
            score,
            uploaded_at: Utc.timestamp_opt(uploaded_secs, 0).unwrap(),
        }
    }

    fn retriever(hits: Vec<ScoredDocument>) -> (Retriever, Arc<FixedIndex>) {
        let index = Arc::new(FixedIndex {
            hits,
            searches: AtomicUsize::new(0),
        });
        let embedder = Arc::new(FixedEmbedder {
            calls: AtomicUsize::new(0),
        });
        (Retriever::new(embedder, index.clone()), index)
    }

    #[tokio::test]
    async fn ranks_by_score_then_upload_time() {
        let (retriever, _) = retriever(vec![
            doc("newer tie", 0.9, 200),
            doc("older tie", 0.9, 100),
            doc("best", 0.95, 300),
        ]);

        let out = retriever.retrieve("q", 3, None).await.unwrap();

        assert_eq!(out, vec!["best", "older tie", "newer tie"]);
    }

    #[tokio::test]
    async fn retrieval_is_idempotent() {
        let (retriever, _) = retriever(vec![doc("a", 0.9, 1), doc("b", 0.8, 2)]);

        let first = retriever.retrieve("q", 2, None).await.unwrap();
        let second = retriever.retrieve("q", 2, None).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn zero_top_k_skips_the_index() {
        let (retriever, index) = retriever(vec![doc("a", 0.9, 1)]);

        let out = retriever.retrieve("q", 0, None).await.unwrap();

        assert!(out.is_empty());
        assert_eq!(index.searches.load(AtomicOrdering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_index_yields_empty_result() {
        let (retriever, _) = retriever(Vec::new());

        let out = retriever.retrieve("q", 5, Some(0.8)).await.unwrap();

        assert!(out.is_empty());
    }
}
