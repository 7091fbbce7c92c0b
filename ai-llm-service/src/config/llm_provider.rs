/// Represents the provider (backend) used for LLM inference and embeddings.
///
/// The chat service speaks two dialects: the local Ollama API and
/// OpenAI-compatible REST APIs (OpenAI itself, Azure-style gateways,
/// LM Studio and friends).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Local Ollama runtime for on-device inference.
    Ollama,
    /// OpenAI-compatible chat completion API.
    OpenAi,
}
