//! GET /documents — list stored documents, oldest first.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Response,
};
use serde::Deserialize;

use crate::core::app_state::AppState;
use crate::core::http::response_envelope::ApiResponse;
use crate::error_handler::AppResult;

/// Page size used when the client does not ask for one.
const DEFAULT_SCROLL_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub struct ListDocumentsQuery {
    pub limit: Option<usize>,
}

/// Handler: GET /documents?limit=N
///
/// Returns `{id, short_description, uploaded_at}` rows ordered by upload
/// time; vectors and full contents are never exposed here.
pub async fn list_documents(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListDocumentsQuery>,
) -> AppResult<Response> {
    let limit = query.limit.unwrap_or(DEFAULT_SCROLL_LIMIT);
    let records = state.index.scroll(limit).await?;
    Ok(ApiResponse::success(records).into_response_with_status(StatusCode::OK))
}
