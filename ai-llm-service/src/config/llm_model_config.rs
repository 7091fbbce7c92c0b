use crate::config::llm_provider::LlmProvider;

/// Configuration for an LLM model invocation.
///
/// One instance describes a single (provider, endpoint, model) target plus
/// the sampling knobs sent with each request. The same struct is used for
/// chat models and embedding models; fields that do not apply (e.g.
/// `temperature` for embeddings) are simply left `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// The LLM provider/backend (e.g., Ollama, OpenAI).
    pub provider: LlmProvider,

    /// Model identifier string (e.g., `"gpt-4o-mini"`, `"qwen3:14b"`).
    pub model: String,

    /// Inference endpoint base URL (local socket/URL or remote API URL).
    pub endpoint: String,

    /// Optional API key for authentication (OpenAI-compatible providers).
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Optional request timeout (in seconds). For streaming chat calls this
    /// bounds connection setup only, not the lifetime of the stream.
    pub timeout_secs: Option<u64>,
}
