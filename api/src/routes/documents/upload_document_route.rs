//! POST /documents — embed and store one document.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::Response};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use vector_store::{DocumentPayload, DocumentRecord};

use crate::core::app_state::AppState;
use crate::core::http::response_envelope::ApiResponse;
use crate::error_handler::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct UploadDocumentRequest {
    #[serde(default)]
    pub content: Option<String>,
}

/// Handler: POST /documents
///
/// The embedding is computed before anything is written, so no document is
/// ever stored without its vector.
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UploadDocumentRequest>,
) -> AppResult<Response> {
    let content = body
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("missing `content` field".into()))?;

    let embedding = state
        .llm
        .embed(&content)
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    let id = Uuid::new_v4();
    let payload = DocumentPayload::new(content, Utc::now());
    let record = DocumentRecord {
        id,
        short_description: payload.short_description.clone(),
        uploaded_at: payload.uploaded_at,
    };

    state.index.insert(id, embedding, payload).await?;

    Ok(ApiResponse::success(record).into_response_with_status(StatusCode::CREATED))
}
