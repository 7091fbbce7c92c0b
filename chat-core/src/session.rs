//! Per-exchange orchestration: retrieve → assemble → generate.

use tracing::{debug, info, instrument};

use crate::config::RagSettings;
use crate::errors::ChatError;
use crate::history::{self, HistoryEntry};
use crate::prompt::{self, AugmentMode};
use crate::retrieve::Retriever;
use crate::streamer::{ChunkSink, CompletionStreamer};

/// Ingress payload for one exchange.
///
/// The history snapshot is owned by the transport/client; this crate only
/// reads it.
#[derive(Debug, Clone)]
pub struct ExchangeRequest {
    pub prompt: String,
    pub rag_enabled: bool,
    pub history: Vec<HistoryEntry>,
}

/// Stages an exchange moves through, strictly in order. Used for logging
/// and failure context; `Errored` is reachable from every non-idle stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Retrieving,
    Assembling,
    Generating,
    Completed,
    Errored,
}

/// Coordinates one exchange at a time over the shared retriever and
/// streamer.
///
/// Exactly one generation is in flight per session: the transport drives
/// exchanges sequentially, so no internal locking is needed — the only
/// shared resources (index, LLM client) synchronize themselves.
pub struct ChatSession {
    retriever: Retriever,
    streamer: CompletionStreamer,
    settings: RagSettings,
}

impl ChatSession {
    pub fn new(retriever: Retriever, streamer: CompletionStreamer, settings: RagSettings) -> Self {
        Self {
            retriever,
            streamer,
            settings,
        }
    }

    /// Validates an ingress payload without touching any external service.
    ///
    /// # Errors
    /// Returns [`ChatError::MalformedInput`] for an empty prompt or a
    /// history that is not complete user/assistant pairs.
    pub fn validate(request: &ExchangeRequest) -> Result<(), ChatError> {
        if request.prompt.trim().is_empty() {
            return Err(ChatError::MalformedInput("prompt must not be empty"));
        }
        if !history::is_paired(&request.history) {
            return Err(ChatError::MalformedInput(
                "history must be complete user/assistant pairs",
            ));
        }
        Ok(())
    }

    /// Runs one exchange end to end, streaming chunks into `sink`.
    ///
    /// Returns the full accumulated answer; recording it as a history pair
    /// is up to the caller and must only happen on success. Retrieval
    /// failures abort the exchange before any generation is attempted.
    #[instrument(skip_all, fields(rag = request.rag_enabled, prompt_len = request.prompt.len()))]
    pub async fn run_exchange(
        &self,
        request: &ExchangeRequest,
        sink: &mut dyn ChunkSink,
    ) -> Result<String, ChatError> {
        Self::validate(request)?;

        let history = history::clamp(&request.history, self.settings.history_limit);

        let mode = if request.rag_enabled {
            debug!(phase = ?Phase::Retrieving, top_k = self.settings.top_k, "retrieving context");
            let documents = self
                .retriever
                .retrieve(
                    &request.prompt,
                    self.settings.top_k,
                    self.settings.score_threshold,
                )
                .await?;
            AugmentMode::Augmented(documents)
        } else {
            AugmentMode::Plain
        };

        debug!(phase = ?Phase::Assembling, history_len = history.len(), "assembling messages");
        let messages = prompt::assemble(
            prompt::FORMATTING_INSTRUCTION,
            &request.prompt,
            history,
            &mode,
        );

        debug!(phase = ?Phase::Generating, messages = messages.len(), "starting generation");
        let answer = self.streamer.stream(&messages, sink).await?;

        info!(phase = ?Phase::Completed, chars = answer.len(), "exchange completed");
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use tokio::sync::{Mutex, mpsc};
    use uuid::Uuid;

    use ai_llm_service::chat::{ChatMessage, ChatRole};
    use ai_llm_service::services::DeltaResult;
    use vector_store::{
        DocumentPayload, DocumentRecord, ScoredDocument, VectorIndex, VectorStoreError,
    };

    use crate::retrieve::Embedder;
    use crate::streamer::{CompletionBackend, NullSink};

    /// Backend replying with a fixed answer and capturing the messages.
    struct CapturingBackend {
        seen: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
        called: Arc<AtomicBool>,
    }

    #[async_trait]
    impl CompletionBackend for CapturingBackend {
        async fn open_stream(
            &self,
            messages: &[ChatMessage],
        ) -> Result<mpsc::Receiver<DeltaResult>, ChatError> {
            self.called.store(true, Ordering::SeqCst);
            self.seen.lock().await.push(messages.to_vec());
            let (tx, rx) = mpsc::channel(1);
            tokio::spawn(async move {
                let _ = tx.send(Ok("it ".to_string())).await;
                let _ = tx.send(Ok("depends".to_string())).await;
            });
            Ok(rx)
        }
    }

    struct OkEmbedder;

    #[async_trait]
    impl Embedder for OkEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, ChatError> {
            Ok(vec![1.0, 0.0])
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, ChatError> {
            Err(ChatError::Embedding("provider unreachable".into()))
        }
    }

    /// Minimal in-memory index: content is returned for every query.
    #[derive(Default)]
    struct InMemoryIndex {
        docs: Mutex<Vec<(Uuid, DocumentPayload)>>,
    }

    #[async_trait]
    impl VectorIndex for InMemoryIndex {
        async fn search(
            &self,
            _embedding: Vec<f32>,
            top_k: usize,
            _score_threshold: Option<f32>,
        ) -> Result<Vec<ScoredDocument>, VectorStoreError> {
            Ok(self
                .docs
                .lock()
                .await
                .iter()
                .take(top_k)
                .map(|(id, p)| ScoredDocument {
                    id: *id,
                    content: p.content.clone(),
                    score: 1.0,
                    uploaded_at: p.uploaded_at,
                })
                .collect())
        }

        async fn insert(
            &self,
            id: Uuid,
            _embedding: Vec<f32>,
            payload: DocumentPayload,
        ) -> Result<(), VectorStoreError> {
            self.docs.lock().await.push((id, payload));
            Ok(())
        }

        async fn delete(&self, id: Uuid) -> Result<(), VectorStoreError> {
            let mut docs = self.docs.lock().await;
            let before = docs.len();
            docs.retain(|(existing, _)| *existing != id);
            if docs.len() == before {
                return Err(VectorStoreError::NotFound(id));
            }
            Ok(())
        }

        async fn scroll(&self, limit: usize) -> Result<Vec<DocumentRecord>, VectorStoreError> {
            Ok(self
                .docs
                .lock()
                .await
                .iter()
                .take(limit)
                .map(|(id, p)| DocumentRecord {
                    id: *id,
                    short_description: p.short_description.clone(),
                    uploaded_at: p.uploaded_at,
                })
                .collect())
        }
    }

    struct Harness {
        session: ChatSession,
        seen: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
        called: Arc<AtomicBool>,
    }

    fn harness(embedder: Arc<dyn Embedder>, index: Arc<dyn VectorIndex>) -> Harness {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let called = Arc::new(AtomicBool::new(false));
        let backend = CapturingBackend {
            seen: seen.clone(),
            called: called.clone(),
        };
        let session = ChatSession::new(
            Retriever::new(embedder, index),
            CompletionStreamer::new(Arc::new(backend)),
            RagSettings {
                top_k: 5,
                score_threshold: None,
                history_limit: 5,
            },
        );
        Harness {
            session,
            seen,
            called,
        }
    }

    fn request(prompt: &str, rag_enabled: bool) -> ExchangeRequest {
        ExchangeRequest {
            prompt: prompt.to_string(),
            rag_enabled,
            history: Vec::new(),
        }
    }

    #[tokio::test]
    async fn plain_exchange_returns_accumulated_answer() {
        let h = harness(Arc::new(OkEmbedder), Arc::new(InMemoryIndex::default()));

        let answer = h
            .session
            .run_exchange(&request("What is 2+2?", false), &mut NullSink)
            .await
            .unwrap();

        assert_eq!(answer, "it depends");
        let seen = h.seen.lock().await;
        assert_eq!(seen[0].len(), 2);
        assert_eq!(seen[0][1], ChatMessage::user("What is 2+2?"));
    }

    #[tokio::test]
    async fn augmented_exchange_injects_retrieved_context() {
        let index = Arc::new(InMemoryIndex::default());
        index
            .insert(
                Uuid::new_v4(),
                vec![1.0, 0.0],
                DocumentPayload::new("Paris is the capital of France.", chrono::Utc::now()),
            )
            .await
            .unwrap();
        let h = harness(Arc::new(OkEmbedder), index);

        h.session
            .run_exchange(&request("What is the capital of France?", true), &mut NullSink)
            .await
            .unwrap();

        let seen = h.seen.lock().await;
        let context = &seen[0][1];
        assert_eq!(context.role, ChatRole::System);
        assert!(context.content.contains("Paris is the capital of France."));
    }

    #[tokio::test]
    async fn empty_index_still_emits_context_block() {
        let h = harness(Arc::new(OkEmbedder), Arc::new(InMemoryIndex::default()));

        h.session
            .run_exchange(&request("anything", true), &mut NullSink)
            .await
            .unwrap();

        let seen = h.seen.lock().await;
        assert_eq!(seen[0][1].content, "Relevant context: ");
    }

    #[tokio::test]
    async fn retrieval_failure_prevents_generation() {
        let h = harness(Arc::new(FailingEmbedder), Arc::new(InMemoryIndex::default()));

        let err = h
            .session
            .run_exchange(&request("q", true), &mut NullSink)
            .await
            .unwrap_err();

        assert!(matches!(err, ChatError::Embedding(_)));
        assert!(!h.called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn empty_prompt_is_rejected_before_any_call() {
        let h = harness(Arc::new(FailingEmbedder), Arc::new(InMemoryIndex::default()));

        let err = h
            .session
            .run_exchange(&request("   ", true), &mut NullSink)
            .await
            .unwrap_err();

        assert!(matches!(err, ChatError::MalformedInput(_)));
        assert!(!h.called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn unpaired_history_is_rejected() {
        let h = harness(Arc::new(OkEmbedder), Arc::new(InMemoryIndex::default()));
        let mut req = request("q", false);
        req.history = vec![HistoryEntry::user("dangling")];

        let err = h
            .session
            .run_exchange(&req, &mut NullSink)
            .await
            .unwrap_err();

        assert!(matches!(err, ChatError::MalformedInput(_)));
    }

    #[tokio::test]
    async fn history_limit_zero_drops_all_history() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let called = Arc::new(AtomicBool::new(false));
        let backend = CapturingBackend {
            seen: seen.clone(),
            called,
        };
        let session = ChatSession::new(
            Retriever::new(Arc::new(OkEmbedder), Arc::new(InMemoryIndex::default())),
            CompletionStreamer::new(Arc::new(backend)),
            RagSettings {
                top_k: 5,
                score_threshold: None,
                history_limit: 0,
            },
        );

        let mut req = request("q", false);
        history::push_exchange(&mut req.history, "old q", "old a");

        session.run_exchange(&req, &mut NullSink).await.unwrap();

        let seen = seen.lock().await;
        // System instruction + user turn only; no history entries.
        assert_eq!(seen[0].len(), 2);
    }

    #[tokio::test]
    async fn delete_missing_id_reports_not_found_and_keeps_index() {
        let index = InMemoryIndex::default();
        let kept = Uuid::new_v4();
        index
            .insert(
                kept,
                vec![1.0, 0.0],
                DocumentPayload::new("keep me", chrono::Utc::now()),
            )
            .await
            .unwrap();

        let missing = Uuid::new_v4();
        let err = index.delete(missing).await.unwrap_err();

        assert!(matches!(err, VectorStoreError::NotFound(id) if id == missing));
        assert_eq!(index.scroll(10).await.unwrap().len(), 1);
    }
}
