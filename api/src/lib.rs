//! HTTP and WebSocket delivery layer.
//!
//! Routes:
//! - `POST /send_message`   — one chat exchange, full answer in one response
//! - `GET  /ws`             — one chat exchange, answer streamed frame by frame
//! - `POST /documents`      — embed and store a document
//! - `GET  /documents`      — list stored documents, oldest first
//! - `DELETE /documents/{id}` — remove a document
//! - `GET  /health`         — LLM provider health snapshot

use std::{env, sync::Arc};

mod core;
mod error_handler;
mod routes;

pub use error_handler::{AppError, AppResult};

use axum::{
    Router,
    routing::{delete, get, post},
};
use tokio::signal;

use crate::core::app_state::AppState;
use crate::routes::{
    chat::{chat_ws_route::chat_ws, send_message_route::send_message},
    documents::{
        delete_document_route::delete_document, list_documents_route::list_documents,
        upload_document_route::upload_document,
    },
    health_route::health,
};

pub async fn start() -> Result<(), AppError> {
    let state = Arc::new(AppState::from_env().await?);

    let host_url = env::var("API_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8000".into());

    let app = Router::new()
        .route("/send_message", post(send_message))
        .route("/ws", get(chat_ws))
        .route("/documents", post(upload_document).get(list_documents))
        .route("/documents/{id}", delete(delete_document))
        .route("/health", get(health))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(AppError::Bind)?;
    tracing::info!("listening on {host_url}");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");
}
