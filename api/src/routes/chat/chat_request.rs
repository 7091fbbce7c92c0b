//! Wire payload shared by the HTTP and WebSocket chat transports.

use serde::{Deserialize, Serialize};

use chat_core::{ChatError, ExchangeRequest, HistoryEntry};

/// Ingress body of one exchange:
/// `{"prompt": "...", "ragEnabled": true, "history": [...]}`.
///
/// `prompt` is optional at the serde level so that its absence surfaces as a
/// [`ChatError::MalformedInput`] instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPayload {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub rag_enabled: bool,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl ChatPayload {
    /// Converts the wire payload into a pipeline request.
    ///
    /// # Errors
    /// Returns [`ChatError::MalformedInput`] when `prompt` is absent. Deeper
    /// validation (empty prompt, unpaired history) happens in the session,
    /// still before any external call.
    pub fn into_request(self) -> Result<ExchangeRequest, ChatError> {
        let prompt = self
            .prompt
            .ok_or(ChatError::MalformedInput("missing `prompt` field"))?;
        Ok(ExchangeRequest {
            prompt,
            rag_enabled: self.rag_enabled,
            history: self.history,
        })
    }
}

/// Non-streaming reply body; the WebSocket transport frames each chunk the
/// same way.
#[derive(Debug, Serialize)]
pub struct ChatAnswer {
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_core::HistoryRole;

    #[test]
    fn parses_camel_case_payload() {
        let payload: ChatPayload = serde_json::from_str(
            r#"{"prompt":"hi","ragEnabled":true,"history":[
                {"role":"user","content":"q"},
                {"role":"assistant","content":"a"}
            ]}"#,
        )
        .unwrap();

        let request = payload.into_request().unwrap();
        assert_eq!(request.prompt, "hi");
        assert!(request.rag_enabled);
        assert_eq!(request.history.len(), 2);
        assert_eq!(request.history[0].role, HistoryRole::User);
    }

    #[test]
    fn missing_fields_default_off() {
        let payload: ChatPayload = serde_json::from_str(r#"{"prompt":"hi"}"#).unwrap();
        let request = payload.into_request().unwrap();
        assert!(!request.rag_enabled);
        assert!(request.history.is_empty());
    }

    #[test]
    fn absent_prompt_is_malformed() {
        let payload: ChatPayload = serde_json::from_str(r#"{"ragEnabled":false}"#).unwrap();
        assert!(matches!(
            payload.into_request(),
            Err(ChatError::MalformedInput(_))
        ));
    }
}
