//! Thin adapter around `qdrant-client` to isolate API usage.
//!
//! This facade concentrates all Qdrant interactions behind the
//! [`VectorIndex`] trait, hiding away the verbose builder pattern and keeping
//! the rest of the application decoupled from `qdrant-client`.

use async_trait::async_trait;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, CreateFieldIndexCollectionBuilder, DeletePointsBuilder, Direction,
    Distance, FieldType, GetPointsBuilder, OrderBy, PointStruct, PointsIdsList,
    ScrollPointsBuilder, SearchPointsBuilder, VectorParamsBuilder, point_id::PointIdOptions,
};
use qdrant_client::{Payload, Qdrant};
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{DistanceKind, VectorStoreConfig};
use crate::document::{DocumentPayload, DocumentRecord, ScoredDocument};
use crate::errors::VectorStoreError;
use crate::index::VectorIndex;

/// Payload field used for insertion-time ordering.
const UPLOADED_AT_FIELD: &str = "uploaded_at";

/// Qdrant-backed implementation of [`VectorIndex`].
///
/// Encapsulates the underlying client, the target collection name, and the
/// configured vector dimensionality.
pub struct QdrantVectorStore {
    client: Qdrant,
    collection: String,
    dim: usize,
    distance: DistanceKind,
}

impl QdrantVectorStore {
    /// Creates a new store from the given configuration.
    ///
    /// This call does not touch any collections; use
    /// [`QdrantVectorStore::ensure_collection`] at startup.
    ///
    /// # Errors
    /// Returns `VectorStoreError::Config` on invalid config and
    /// `VectorStoreError::Qdrant` if the client cannot be constructed.
    pub fn new(cfg: &VectorStoreConfig) -> Result<Self, VectorStoreError> {
        cfg.validate()?;

        let mut builder = Qdrant::from_url(&cfg.qdrant_url);
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| VectorStoreError::Qdrant(format!("client build: {e}")))?;

        Ok(Self {
            client,
            collection: cfg.collection.clone(),
            dim: cfg.dim,
            distance: cfg.distance,
        })
    }

    /// Ensures that the collection exists in Qdrant.
    ///
    /// - If the collection already exists → no-op.
    /// - If missing → creates it with the configured dimension/distance and
    ///   a datetime payload index on `uploaded_at` (required for ordered
    ///   scroll).
    pub async fn ensure_collection(&self) -> Result<(), VectorStoreError> {
        info!(
            "Ensuring collection '{}' with dim={} distance={:?}",
            self.collection, self.dim, self.distance
        );

        match self.client.collection_info(&self.collection).await {
            Ok(_) => {
                debug!("Collection '{}' already exists", self.collection);
                return Ok(());
            }
            Err(err) => {
                warn!(
                    "Collection '{}' not found, will be created (error={})",
                    self.collection, err
                );
            }
        }

        let distance = match self.distance {
            DistanceKind::Cosine => Distance::Cosine,
            DistanceKind::Dot => Distance::Dot,
            DistanceKind::Euclid => Distance::Euclid,
        };

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(self.dim as u64, distance)),
            )
            .await
            .map_err(|e| VectorStoreError::Qdrant(format!("create_collection: {e}")))?;

        self.client
            .create_field_index(CreateFieldIndexCollectionBuilder::new(
                &self.collection,
                UPLOADED_AT_FIELD,
                FieldType::Datetime,
            ))
            .await
            .map_err(|e| VectorStoreError::Qdrant(format!("create_field_index: {e}")))?;

        info!("Collection '{}' created successfully", self.collection);
        Ok(())
    }

    fn check_dim(&self, got: usize) -> Result<(), VectorStoreError> {
        if got != self.dim {
            return Err(VectorStoreError::DimensionMismatch {
                got,
                want: self.dim,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl VectorIndex for QdrantVectorStore {
    async fn search(
        &self,
        embedding: Vec<f32>,
        top_k: usize,
        score_threshold: Option<f32>,
    ) -> Result<Vec<ScoredDocument>, VectorStoreError> {
        if top_k == 0 {
            return Ok(Vec::new());
        }
        self.check_dim(embedding.len())?;

        debug!(
            "Searching in '{}' with top_k={} threshold={:?}",
            self.collection, top_k, score_threshold
        );

        let mut builder = SearchPointsBuilder::new(&self.collection, embedding, top_k as u64)
            .with_payload(true);
        if let Some(t) = score_threshold {
            builder = builder.score_threshold(t);
        }

        let resp = self
            .client
            .search_points(builder)
            .await
            .map_err(|e| VectorStoreError::Qdrant(format!("search_points: {e}")))?;

        let mut out = Vec::with_capacity(resp.result.len());
        for point in resp.result {
            let id = parse_point_id(point.id.as_ref())?;
            let payload = parse_payload(&id.to_string(), point.payload)?;
            out.push(ScoredDocument {
                id,
                content: payload.content,
                score: point.score,
                uploaded_at: payload.uploaded_at,
            });
        }

        debug!("Search completed: {} hits returned", out.len());
        Ok(out)
    }

    async fn insert(
        &self,
        id: Uuid,
        embedding: Vec<f32>,
        payload: DocumentPayload,
    ) -> Result<(), VectorStoreError> {
        self.check_dim(embedding.len())?;

        let q_payload: Payload = json!({
            "content": payload.content,
            "short_description": payload.short_description,
            "uploaded_at": payload.uploaded_at,
        })
        .try_into()
        .map_err(|e| VectorStoreError::Qdrant(format!("payload convert: {e}")))?;

        let point = PointStruct::new(id.to_string(), embedding, q_payload);

        self.client
            .upsert_points(qdrant_client::qdrant::UpsertPointsBuilder::new(
                &self.collection,
                vec![point],
            ))
            .await
            .map_err(|e| VectorStoreError::Qdrant(format!("upsert_points: {e}")))?;

        info!("Inserted document {} into '{}'", id, self.collection);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), VectorStoreError> {
        // Qdrant's delete is a silent no-op for unknown ids; probe first so
        // callers get a NotFound they can act on.
        let existing = self
            .client
            .get_points(GetPointsBuilder::new(
                &self.collection,
                vec![id.to_string().into()],
            ))
            .await
            .map_err(|e| VectorStoreError::Qdrant(format!("get_points: {e}")))?;

        if existing.result.is_empty() {
            return Err(VectorStoreError::NotFound(id));
        }

        self.client
            .delete_points(
                DeletePointsBuilder::new(&self.collection).points(PointsIdsList {
                    ids: vec![id.to_string().into()],
                }),
            )
            .await
            .map_err(|e| VectorStoreError::Qdrant(format!("delete_points: {e}")))?;

        info!("Deleted document {} from '{}'", id, self.collection);
        Ok(())
    }

    async fn scroll(&self, limit: usize) -> Result<Vec<DocumentRecord>, VectorStoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let order_by = OrderBy {
            key: UPLOADED_AT_FIELD.to_string(),
            direction: Some(Direction::Asc as i32),
            start_from: None,
        };

        let resp = self
            .client
            .scroll(
                ScrollPointsBuilder::new(&self.collection)
                    .limit(limit as u32)
                    .with_payload(true)
                    .with_vectors(false)
                    .order_by(order_by),
            )
            .await
            .map_err(|e| VectorStoreError::Qdrant(format!("scroll: {e}")))?;

        let mut out = Vec::with_capacity(resp.result.len());
        for point in resp.result {
            let id = parse_point_id(point.id.as_ref())?;
            let payload = parse_payload(&id.to_string(), point.payload)?;
            out.push(DocumentRecord {
                id,
                short_description: payload.short_description,
                uploaded_at: payload.uploaded_at,
            });
        }

        Ok(out)
    }
}

/// Extracts a UUID from a Qdrant point id.
fn parse_point_id(
    id: Option<&qdrant_client::qdrant::PointId>,
) -> Result<Uuid, VectorStoreError> {
    let options = id.and_then(|p| p.point_id_options.as_ref());
    match options {
        Some(PointIdOptions::Uuid(s)) => {
            Uuid::parse_str(s).map_err(|e| VectorStoreError::MalformedPayload {
                id: s.clone(),
                reason: format!("point id is not a UUID: {e}"),
            })
        }
        Some(PointIdOptions::Num(n)) => Err(VectorStoreError::MalformedPayload {
            id: n.to_string(),
            reason: "numeric point id where UUID expected".into(),
        }),
        None => Err(VectorStoreError::MalformedPayload {
            id: String::new(),
            reason: "point without id".into(),
        }),
    }
}

/// Converts a Qdrant payload (`HashMap<String, qdrant::Value>`) back into a
/// [`DocumentPayload`].
fn parse_payload(
    id: &str,
    mut raw: std::collections::HashMap<String, qdrant_client::qdrant::Value>,
) -> Result<DocumentPayload, VectorStoreError> {
    use qdrant_client::qdrant::value::Kind as K;

    let mut map = serde_json::Map::new();
    for (k, v) in raw.drain() {
        let j = match v.kind {
            Some(K::StringValue(s)) => serde_json::Value::String(s),
            Some(K::IntegerValue(i)) => serde_json::Value::Number(i.into()),
            Some(K::DoubleValue(f)) => json!(f),
            Some(K::BoolValue(b)) => serde_json::Value::Bool(b),
            // Nested types are never written by this crate.
            _ => serde_json::Value::Null,
        };
        map.insert(k, j);
    }

    serde_json::from_value(serde_json::Value::Object(map)).map_err(|e| {
        VectorStoreError::MalformedPayload {
            id: id.to_string(),
            reason: e.to_string(),
        }
    })
}
