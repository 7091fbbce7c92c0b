//! POST /send_message — one chat exchange, full answer in one response.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use tracing::error;

use chat_core::{ChatError, NullSink};

use crate::core::app_state::AppState;
use crate::routes::chat::chat_request::{ChatAnswer, ChatPayload};

/// Handler: POST /send_message
///
/// Failures surface as a bare status code with an empty body: 400 for a
/// malformed payload, 502 when retrieval or generation fails.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8000/send_message \
///   -H 'content-type: application/json' \
///   -d '{"prompt":"What is the capital of France?","ragEnabled":true,"history":[]}'
/// ```
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatPayload>,
) -> Result<Json<ChatAnswer>, StatusCode> {
    let request = payload
        .into_request()
        .map_err(|_| StatusCode::BAD_REQUEST)?;

    match state.session.run_exchange(&request, &mut NullSink).await {
        Ok(text) => Ok(Json(ChatAnswer { text })),
        Err(ChatError::MalformedInput(_)) => Err(StatusCode::BAD_REQUEST),
        Err(err) => {
            error!(error = %err, "exchange failed");
            Err(StatusCode::BAD_GATEWAY)
        }
    }
}
