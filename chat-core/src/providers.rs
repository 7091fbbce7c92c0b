//! Adapters wiring the shared LLM service into the pipeline seams.

use async_trait::async_trait;
use tokio::sync::mpsc;

use ai_llm_service::chat::ChatMessage;
use ai_llm_service::service_profiles::LlmServiceProfiles;
use ai_llm_service::services::DeltaResult;

use crate::errors::ChatError;
use crate::retrieve::Embedder;
use crate::streamer::CompletionBackend;

#[async_trait]
impl Embedder for LlmServiceProfiles {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ChatError> {
        LlmServiceProfiles::embed(self, text)
            .await
            .map_err(|e| ChatError::Embedding(e.to_string()))
    }
}

#[async_trait]
impl CompletionBackend for LlmServiceProfiles {
    async fn open_stream(
        &self,
        messages: &[ChatMessage],
    ) -> Result<mpsc::Receiver<DeltaResult>, ChatError> {
        self.chat_stream(messages)
            .await
            .map_err(|e| ChatError::Generation {
                reason: e.to_string(),
                chunks_sent: 0,
            })
    }
}
