//! Transport legs of the CLI: WebSocket streaming and single-shot HTTP.

use futures::{SinkExt, StreamExt};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{Message, protocol::frame::coding::CloseCode},
};

use chat_core::history::HistoryEntry;

/// Runs one exchange over a WebSocket, invoking `on_chunk` for every frame
/// as it arrives. Returns the accumulated answer once the server closes the
/// stream normally.
///
/// # Errors
/// Fails on connection problems, malformed frames, or an abnormal close
/// (the server's signal that the exchange failed mid-stream).
pub async fn websocket_request(
    endpoint: &str,
    prompt: &str,
    rag_enabled: bool,
    history: &[HistoryEntry],
    mut on_chunk: impl FnMut(&str),
) -> anyhow::Result<String> {
    let (mut socket, _response) = connect_async(endpoint).await?;

    let payload = serde_json::json!({
        "prompt": prompt,
        "ragEnabled": rag_enabled,
        "history": history,
    });
    socket.send(Message::text(payload.to_string())).await?;

    let mut answer = String::new();
    while let Some(frame) = socket.next().await {
        match frame? {
            Message::Text(text) => {
                let value: serde_json::Value = serde_json::from_str(&text)?;
                let chunk = value.get("text").and_then(|t| t.as_str()).unwrap_or_default();
                on_chunk(chunk);
                answer.push_str(chunk);
            }
            Message::Close(close) => {
                if let Some(frame) = close {
                    if frame.code != CloseCode::Normal {
                        anyhow::bail!(
                            "server closed the stream abnormally ({}): {}",
                            frame.code,
                            frame.reason
                        );
                    }
                }
                break;
            }
            _ => {}
        }
    }

    Ok(answer)
}

/// Runs one exchange over HTTP and returns the full answer.
pub async fn http_request(
    endpoint: &str,
    prompt: &str,
    rag_enabled: bool,
    history: &[HistoryEntry],
) -> anyhow::Result<String> {
    let client = reqwest::Client::new();

    let response = client
        .post(endpoint)
        .json(&serde_json::json!({
            "prompt": prompt,
            "ragEnabled": rag_enabled,
            "history": history,
        }))
        .send()
        .await?
        .error_for_status()?;

    let body: serde_json::Value = response.json().await?;
    body.get("text")
        .and_then(|t| t.as_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("response missing `text` field"))
}
