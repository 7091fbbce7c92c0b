//! Completion streaming: producer/consumer with caller-observable order.
//!
//! The provider is the producer, the delivery transport is the consumer.
//! Chunks cross a capacity-1 channel, so at most one chunk sits between the
//! two and backpressure from the transport reaches the provider directly.
//! Cancellation propagates the same way: the consumer closing its end makes
//! the producer's next send fail, which stops it from pulling further
//! chunks upstream.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use ai_llm_service::chat::ChatMessage;
use ai_llm_service::services::DeltaResult;

use crate::errors::ChatError;

/// The delivery channel refused a chunk: the consumer is gone.
#[derive(Debug)]
pub struct SinkClosed;

/// Destination for incremental chunks of one exchange.
///
/// Implementations must deliver chunks in call order.
#[async_trait]
pub trait ChunkSink: Send {
    /// Delivers one chunk (possibly the empty string).
    async fn deliver(&mut self, chunk: &str) -> Result<(), SinkClosed>;
}

/// Sink that discards chunks.
///
/// Used by the non-streaming transport, where only the accumulated answer
/// matters.
#[derive(Debug, Default)]
pub struct NullSink;

#[async_trait]
impl ChunkSink for NullSink {
    async fn deliver(&mut self, _chunk: &str) -> Result<(), SinkClosed> {
        Ok(())
    }
}

/// Provider seam: opens a finite, non-restartable stream of text deltas.
///
/// The returned receiver yields `Ok(delta)` per provider event and at most
/// one final `Err(reason)` when the stream breaks. Dropping the receiver
/// must stop the producer from pulling further data upstream.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn open_stream(
        &self,
        messages: &[ChatMessage],
    ) -> Result<mpsc::Receiver<DeltaResult>, ChatError>;
}

/// Drives one completion call and forwards chunks to a sink as they arrive.
pub struct CompletionStreamer {
    backend: Arc<dyn CompletionBackend>,
}

impl CompletionStreamer {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    /// Streams one completion.
    ///
    /// Every delta is forwarded to `sink` in arrival order and appended to
    /// the accumulator; the returned string equals the concatenation of all
    /// chunks the sink received. On a provider-side interruption the chunks
    /// already sent stand and [`ChatError::Generation`] is returned. When
    /// the sink reports closure, the receiver is dropped — which releases
    /// the provider stream — and [`ChatError::Disconnected`] is returned.
    pub async fn stream(
        &self,
        messages: &[ChatMessage],
        sink: &mut dyn ChunkSink,
    ) -> Result<String, ChatError> {
        let mut rx = self.backend.open_stream(messages).await?;

        let mut answer = String::new();
        let mut chunks_sent = 0usize;

        while let Some(event) = rx.recv().await {
            match event {
                Ok(delta) => {
                    if sink.deliver(&delta).await.is_err() {
                        debug!(chunks_sent, "sink closed; releasing provider stream");
                        return Err(ChatError::Disconnected);
                    }
                    answer.push_str(&delta);
                    chunks_sent += 1;
                    trace!(chunks_sent, delta_len = delta.len(), "chunk forwarded");
                }
                Err(reason) => {
                    return Err(ChatError::Generation {
                        reason,
                        chunks_sent,
                    });
                }
            }
        }

        debug!(chunks_sent, chars = answer.len(), "stream completed");
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    /// Backend replaying a fixed script of events.
    struct ScriptedBackend {
        script: Vec<DeltaResult>,
    }

    #[async_trait]
    impl CompletionBackend for ScriptedBackend {
        async fn open_stream(
            &self,
            _messages: &[ChatMessage],
        ) -> Result<mpsc::Receiver<DeltaResult>, ChatError> {
            let (tx, rx) = mpsc::channel(1);
            let script = self.script.clone();
            tokio::spawn(async move {
                for event in script {
                    if tx.send(event).await.is_err() {
                        return;
                    }
                }
            });
            Ok(rx)
        }
    }

    /// Backend producing five chunks while counting successful sends.
    struct CountingBackend {
        sent: Arc<AtomicUsize>,
        done: Arc<Mutex<Option<tokio::sync::oneshot::Sender<()>>>>,
    }

    #[async_trait]
    impl CompletionBackend for CountingBackend {
        async fn open_stream(
            &self,
            _messages: &[ChatMessage],
        ) -> Result<mpsc::Receiver<DeltaResult>, ChatError> {
            let (tx, rx) = mpsc::channel(1);
            let sent = self.sent.clone();
            let done = self.done.lock().await.take().expect("single use");
            tokio::spawn(async move {
                for i in 0..5 {
                    if tx.send(Ok(format!("chunk{i}"))).await.is_err() {
                        break;
                    }
                    sent.fetch_add(1, Ordering::SeqCst);
                }
                let _ = done.send(());
            });
            Ok(rx)
        }
    }

    /// Sink recording everything it receives.
    #[derive(Default)]
    struct VecSink {
        chunks: Vec<String>,
    }

    #[async_trait]
    impl ChunkSink for VecSink {
        async fn deliver(&mut self, chunk: &str) -> Result<(), SinkClosed> {
            self.chunks.push(chunk.to_string());
            Ok(())
        }
    }

    /// Sink accepting a fixed number of chunks, then reporting closure.
    struct ClosingSink {
        accepted: usize,
        limit: usize,
    }

    #[async_trait]
    impl ChunkSink for ClosingSink {
        async fn deliver(&mut self, _chunk: &str) -> Result<(), SinkClosed> {
            if self.accepted >= self.limit {
                return Err(SinkClosed);
            }
            self.accepted += 1;
            Ok(())
        }
    }

    fn streamer(script: Vec<DeltaResult>) -> CompletionStreamer {
        CompletionStreamer::new(Arc::new(ScriptedBackend { script }))
    }

    #[tokio::test]
    async fn answer_equals_concatenation_of_sunk_chunks() {
        let streamer = streamer(vec![Ok("Par".into()), Ok("is.".into())]);
        let mut sink = VecSink::default();

        let answer = streamer.stream(&[], &mut sink).await.unwrap();

        assert_eq!(answer, "Paris.");
        assert_eq!(sink.chunks, vec!["Par", "is."]);
    }

    #[tokio::test]
    async fn empty_deltas_are_forwarded() {
        let streamer = streamer(vec![Ok(String::new()), Ok("x".into())]);
        let mut sink = VecSink::default();

        let answer = streamer.stream(&[], &mut sink).await.unwrap();

        assert_eq!(answer, "x");
        assert_eq!(sink.chunks.len(), 2);
    }

    #[tokio::test]
    async fn interruption_keeps_delivered_chunks() {
        let streamer = streamer(vec![Ok("Par".into()), Err("connection reset".into())]);
        let mut sink = VecSink::default();

        let err = streamer.stream(&[], &mut sink).await.unwrap_err();

        assert!(matches!(
            err,
            ChatError::Generation { chunks_sent: 1, .. }
        ));
        assert_eq!(sink.chunks, vec!["Par"]);
    }

    #[tokio::test]
    async fn closed_sink_stops_the_producer() {
        let sent = Arc::new(AtomicUsize::new(0));
        let (done_tx, done_rx) = tokio::sync::oneshot::channel();
        let backend = CountingBackend {
            sent: sent.clone(),
            done: Arc::new(Mutex::new(Some(done_tx))),
        };
        let streamer = CompletionStreamer::new(Arc::new(backend));
        let mut sink = ClosingSink {
            accepted: 0,
            limit: 1,
        };

        let err = streamer.stream(&[], &mut sink).await.unwrap_err();
        assert!(matches!(err, ChatError::Disconnected));

        // The producer must bail out on its next send instead of running the
        // script to the end.
        done_rx.await.unwrap();
        assert!(sent.load(Ordering::SeqCst) < 5);
    }
}
