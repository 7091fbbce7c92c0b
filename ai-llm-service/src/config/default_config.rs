//! Default LLM configs loaded strictly from environment variables.
//!
//! This module provides convenience constructors for [`LlmModelConfig`],
//! grouped by role:
//!
//! - **Chat**      → conversational model used for answer generation
//! - **Embedding** → embedding generator used for retrieval
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND`       = provider kind (`ollama` (default) or `openai`)
//! - `LLM_MAX_TOKENS` = optional generation cap (u32)
//!
//! Ollama-specific:
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (mandatory)
//!
//! OpenAI-specific:
//! - `OPENAI_API_KEY`  = API key (mandatory)
//! - `OPENAI_API_BASE` = endpoint base (default `https://api.openai.com`)
//!
//! Role models:
//! - `CHAT_MODEL`      = chat model (mandatory)
//! - `EMBEDDING_MODEL` = embedding model (mandatory)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, ConfigError, env_opt_u32, must_env},
};

/// Generation temperature used for every chat completion.
pub const CHAT_TEMPERATURE: f32 = 0.7;

/// Resolves the provider kind from `LLM_KIND` (defaults to Ollama).
///
/// # Errors
/// - [`ConfigError::UnsupportedProvider`] for unknown values
pub fn provider_from_env() -> Result<LlmProvider, AiLlmError> {
    match std::env::var("LLM_KIND") {
        Ok(v) => match v.trim().to_ascii_lowercase().as_str() {
            "" | "ollama" => Ok(LlmProvider::Ollama),
            "openai" | "azure-openai" => Ok(LlmProvider::OpenAi),
            other => Err(ConfigError::UnsupportedProvider(other.to_string()).into()),
        },
        Err(_) => Ok(LlmProvider::Ollama),
    }
}

/// Resolves the endpoint for the configured provider.
///
/// Ollama precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
///
/// OpenAI: `OPENAI_API_BASE` or the public API base.
fn endpoint_for(provider: LlmProvider) -> Result<String, AiLlmError> {
    match provider {
        LlmProvider::Ollama => {
            if let Ok(url) = std::env::var("OLLAMA_URL") {
                if !url.trim().is_empty() {
                    return Ok(url);
                }
            }
            if let Ok(port) = std::env::var("OLLAMA_PORT") {
                if !port.trim().is_empty() {
                    let _ = port
                        .parse::<u16>()
                        .map_err(|_| ConfigError::InvalidNumber {
                            var: "OLLAMA_PORT",
                            reason: "expected u16 (1..=65535)",
                        })?;
                    return Ok(format!("http://localhost:{port}"));
                }
            }
            Err(AiLlmError::Config(ConfigError::MissingVar(
                "OLLAMA_URL or OLLAMA_PORT",
            )))
        }
        LlmProvider::OpenAi => Ok(std::env::var("OPENAI_API_BASE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "https://api.openai.com".to_string())),
    }
}

fn api_key_for(provider: LlmProvider) -> Result<Option<String>, AiLlmError> {
    match provider {
        LlmProvider::Ollama => Ok(None),
        LlmProvider::OpenAi => Ok(Some(must_env("OPENAI_API_KEY")?)),
    }
}

/// Constructs the config for the **chat** model.
///
/// # Env
/// - `CHAT_MODEL` (required)
/// - `LLM_MAX_TOKENS` (optional)
///
/// # Defaults
/// - `temperature = Some(0.7)` — the fixed generation temperature
/// - `timeout_secs = Some(120)` — connection setup bound for streams
pub fn config_chat() -> Result<LlmModelConfig, AiLlmError> {
    let provider = provider_from_env()?;
    let endpoint = endpoint_for(provider)?;
    let api_key = api_key_for(provider)?;
    let model = must_env("CHAT_MODEL")?;
    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?;

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key,
        max_tokens,
        temperature: Some(CHAT_TEMPERATURE),
        top_p: None,
        timeout_secs: Some(120),
    })
}

/// Constructs the config for the **embedding** model.
///
/// # Env
/// - `EMBEDDING_MODEL` (required)
///
/// # Defaults
/// - `timeout_secs = Some(30)`
pub fn config_embedding() -> Result<LlmModelConfig, AiLlmError> {
    let provider = provider_from_env()?;
    let endpoint = endpoint_for(provider)?;
    let api_key = api_key_for(provider)?;
    let model = must_env("EMBEDDING_MODEL")?;

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key,
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: Some(30),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_kind_is_rejected() {
        unsafe { std::env::set_var("LLM_KIND", "bard") };
        let err = provider_from_env().unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Config(ConfigError::UnsupportedProvider(_))
        ));
        unsafe { std::env::remove_var("LLM_KIND") };
    }
}
