//! Vector index for chat documents over Qdrant.
//!
//! This crate isolates every vector-store concern behind the
//! [`VectorIndex`] trait:
//! - k-NN search by cosine similarity with an optional score threshold
//! - insert of `(id, embedding, payload)` triples — content and embedding
//!   are always written together, never separately
//! - delete-by-id with a `NotFound` failure when the id is absent
//! - paginated scroll ordered by upload time
//!
//! The Qdrant implementation lives in [`store::QdrantVectorStore`]; the rest
//! of the application only sees the trait, so an in-memory index can stand in
//! for tests.

mod config;
mod document;
mod errors;
mod index;
mod store;

pub use config::{DistanceKind, VectorStoreConfig};
pub use document::{DocumentPayload, DocumentRecord, ScoredDocument, short_description};
pub use errors::VectorStoreError;
pub use index::VectorIndex;
pub use store::QdrantVectorStore;
