//! The retrieval-augmented generation pipeline and its streaming contract.
//!
//! One exchange flows through three stages, strictly in order:
//!
//! 1. [`retrieve::Retriever`] — embed the prompt and query the vector index
//!    (skipped when RAG is disabled for the exchange);
//! 2. [`prompt::assemble`] — build the ordered message sequence (pure);
//! 3. [`streamer::CompletionStreamer`] — drive the provider stream, forward
//!    each delta to a [`streamer::ChunkSink`], and accumulate the answer.
//!
//! [`session::ChatSession`] wires the stages together and owns the
//! failure/cancellation contract exposed to the delivery transport.
//! Conversation history is caller-owned: each exchange receives an immutable
//! snapshot, and the caller records the new pair only after a clean finish.

pub mod config;
pub mod errors;
pub mod history;
pub mod prompt;
pub mod providers;
pub mod retrieve;
pub mod session;
pub mod streamer;

pub use config::RagSettings;
pub use errors::ChatError;
pub use history::{HistoryEntry, HistoryRole};
pub use prompt::AugmentMode;
pub use session::{ChatSession, ExchangeRequest};
pub use streamer::{ChunkSink, CompletionBackend, CompletionStreamer, NullSink, SinkClosed};
