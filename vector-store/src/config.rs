//! Runtime and collection configuration.

use crate::errors::VectorStoreError;

/// Distance function used for the vector space.
#[derive(Clone, Copy, Debug)]
pub enum DistanceKind {
    /// Cosine distance (recommended for most embeddings).
    Cosine,
    /// Dot product (useful for normalized vectors).
    Dot,
    /// Euclidean distance (L2).
    Euclid,
}

/// Configuration for the Qdrant-backed vector index.
#[derive(Clone, Debug)]
pub struct VectorStoreConfig {
    /// Qdrant gRPC endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Target collection name. Collections isolate tenants: a search never
    /// leaves the configured collection.
    pub collection: String,
    /// Dimensionality of stored vectors.
    pub dim: usize,
    /// Distance function (Cosine by default).
    pub distance: DistanceKind,
}

impl VectorStoreConfig {
    /// Builds a config from environment variables with documented defaults.
    ///
    /// - `QDRANT_URL`        (default `http://localhost:6334`)
    /// - `QDRANT_API_KEY`    (optional)
    /// - `QDRANT_COLLECTION` (default `documents`)
    /// - `EMBEDDING_DIM`     (default `1024`)
    pub fn from_env() -> Self {
        let dim = std::env::var("EMBEDDING_DIM")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(1024);

        Self {
            qdrant_url: std::env::var("QDRANT_URL")
                .unwrap_or_else(|_| "http://localhost:6334".into()),
            qdrant_api_key: std::env::var("QDRANT_API_KEY").ok(),
            collection: std::env::var("QDRANT_COLLECTION")
                .unwrap_or_else(|_| "documents".into()),
            dim,
            distance: DistanceKind::Cosine,
        }
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), VectorStoreError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(VectorStoreError::Config("qdrant_url is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(VectorStoreError::Config("collection is empty".into()));
        }
        if self.dim == 0 {
            return Err(VectorStoreError::Config("dim must be > 0".into()));
        }
        Ok(())
    }
}
