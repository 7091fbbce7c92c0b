//! DELETE /documents/{id} — remove one document.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::core::app_state::AppState;
use crate::error_handler::AppResult;

/// Handler: DELETE /documents/{id}
///
/// Responds 204 on success and 404 when the id is not in the index; the
/// index is unchanged in the latter case.
pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.index.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
