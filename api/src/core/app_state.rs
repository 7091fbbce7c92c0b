use std::sync::Arc;

use ai_llm_service::config::default_config::{config_chat, config_embedding};
use ai_llm_service::service_profiles::LlmServiceProfiles;
use chat_core::retrieve::Retriever;
use chat_core::{ChatSession, CompletionStreamer, RagSettings};
use vector_store::{QdrantVectorStore, VectorIndex, VectorStoreConfig};

use crate::error_handler::AppError;

/// Shared state for all HTTP handlers.
///
/// The LLM profiles and the vector index are process-wide and safe to share
/// across concurrent exchanges; per-exchange state (accumulator, history
/// snapshot) is owned by each request task.
pub struct AppState {
    /// Chat + embedding profiles over the configured provider.
    pub llm: Arc<LlmServiceProfiles>,
    /// The document index; handlers only see the trait.
    pub index: Arc<dyn VectorIndex>,
    /// Orchestrator shared by both chat transports.
    pub session: ChatSession,
}

impl AppState {
    /// Loads shared state from environment variables and prepares the
    /// vector collection.
    pub async fn from_env() -> Result<Self, AppError> {
        let chat_cfg = config_chat()?;
        let embedding_cfg = config_embedding()?;
        let llm = Arc::new(LlmServiceProfiles::new(chat_cfg, embedding_cfg, Some(10))?);

        let store = QdrantVectorStore::new(&VectorStoreConfig::from_env())?;
        store.ensure_collection().await?;
        let index: Arc<dyn VectorIndex> = Arc::new(store);

        let settings = RagSettings::from_env();
        let session = ChatSession::new(
            Retriever::new(llm.clone(), index.clone()),
            CompletionStreamer::new(llm.clone()),
            settings,
        );

        Ok(Self {
            llm,
            index,
            session,
        })
    }
}
