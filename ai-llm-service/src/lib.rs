//! Shared LLM service with two active profiles: **chat** and **embedding**.
//!
//! The crate wraps two provider backends behind one facade:
//! - Ollama (`/api/chat` streaming NDJSON, `/api/embeddings`)
//! - OpenAI-compatible APIs (`/v1/chat/completions` streaming SSE, `/v1/embeddings`)
//!
//! Construct [`service_profiles::LlmServiceProfiles`] once, wrap it in `Arc`,
//! and pass clones to dependents. HTTP clients are cached per config so
//! repeated calls do not rebuild connections.

pub mod chat;
pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod service_profiles;
pub mod services;
