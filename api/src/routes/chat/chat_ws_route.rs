//! GET /ws — one chat exchange streamed over a WebSocket.
//!
//! Protocol: the client's first text frame carries the same JSON payload as
//! `POST /send_message`. The server answers with one `{"text": chunk}` frame
//! per delta, then closes the socket with code 1000 and reason
//! `"End of Message"`. Failures close the socket abnormally — 1007 for a
//! malformed payload, 1011 after a pipeline error — leaving any already
//! delivered chunks with the client.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{CloseFrame, Message, WebSocket, close_code},
    },
    response::IntoResponse,
};
use serde_json::json;
use tracing::{debug, warn};

use chat_core::{ChatError, ChunkSink, SinkClosed};

use crate::core::app_state::AppState;
use crate::routes::chat::chat_request::ChatPayload;

/// Handler: GET /ws
pub async fn chat_ws(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    // The first text frame carries the exchange payload.
    let raw = loop {
        match socket.recv().await {
            Some(Ok(Message::Text(text))) => break text,
            Some(Ok(Message::Close(_))) | None => return,
            Some(Ok(_)) => continue,
            Some(Err(_)) => return,
        }
    };

    let request = match serde_json::from_str::<ChatPayload>(&raw)
        .map_err(|_| ChatError::MalformedInput("invalid JSON payload"))
        .and_then(ChatPayload::into_request)
    {
        Ok(request) => request,
        Err(err) => {
            debug!(error = %err, "rejecting malformed exchange payload");
            close_with(socket, close_code::INVALID, "malformed exchange payload").await;
            return;
        }
    };

    let result = {
        let mut sink = WsChunkSink {
            socket: &mut socket,
        };
        state.session.run_exchange(&request, &mut sink).await
    };

    match result {
        Ok(_) => close_with(socket, close_code::NORMAL, "End of Message").await,
        // The client went away; there is nobody left to notify.
        Err(ChatError::Disconnected) => {}
        Err(ChatError::MalformedInput(reason)) => {
            close_with(socket, close_code::INVALID, reason).await;
        }
        Err(err) => {
            warn!(error = %err, "exchange failed mid-stream");
            close_with(socket, close_code::ERROR, "exchange failed").await;
        }
    }
}

/// Frames each chunk as `{"text": chunk}`, matching the non-streaming reply
/// shape. A send failure means the peer closed the connection.
struct WsChunkSink<'a> {
    socket: &'a mut WebSocket,
}

#[async_trait]
impl ChunkSink for WsChunkSink<'_> {
    async fn deliver(&mut self, chunk: &str) -> Result<(), SinkClosed> {
        let frame = json!({ "text": chunk }).to_string();
        self.socket
            .send(Message::Text(frame.into()))
            .await
            .map_err(|_| SinkClosed)
    }
}

async fn close_with(mut socket: WebSocket, code: u16, reason: &'static str) {
    let _ = socket
        .send(Message::Close(Some(CloseFrame {
            code,
            reason: reason.into(),
        })))
        .await;
}
