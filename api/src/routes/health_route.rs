//! GET /health — provider health snapshot.

use std::sync::Arc;

use axum::{Json, extract::State};

use ai_llm_service::health_service::HealthStatus;

use crate::core::app_state::AppState;

/// Handler: GET /health
///
/// Probes the chat and embedding profiles; a failing probe is reported in
/// the body, never as an HTTP error.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Vec<HealthStatus>> {
    Json(state.llm.health_all().await)
}
