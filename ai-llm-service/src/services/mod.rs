pub mod ollama_service;
pub mod open_ai_service;

/// One streamed completion delta, or the reason the stream broke.
///
/// Providers push these through a capacity-1 channel: at most one chunk is
/// buffered between the provider task and the consumer, and dropping the
/// receiver stops the producer at its next send.
pub type DeltaResult = std::result::Result<String, String>;
