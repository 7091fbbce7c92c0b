//! Prompt assembly: fixed instructions plus optional context and history.
//!
//! Assembly is pure and deterministic; identical inputs always produce an
//! identical message sequence. Whether the exchange is augmented is a tagged
//! variant, not an `Option` — an empty retrieval result still emits the
//! context block, which keeps "RAG found nothing" distinguishable from
//! "RAG disabled".

use ai_llm_service::chat::ChatMessage;

use crate::history::{HistoryEntry, HistoryRole};

/// Formatting instruction that opens every message sequence.
pub const FORMATTING_INSTRUCTION: &str =
    "You are a multilingual virtual assistant. Respond using Markdown if formatting is needed.";

/// Policy prefixed to the user turn when the exchange is augmented.
pub const RAG_POLICY_INSTRUCTION: &str = "Do not justify your answers. Forget the information \
you have outside of context and conversation history. If the answer to the question is not \
provided in the context, say I don't know the answer to this question in the appropriate \
language. Do not mention that context is provided to the user. Based on these instructions, \
and the relevant context, answer the following question: ";

/// Separator emitted between retrieved documents in the context block.
pub const DOCUMENT_SEPARATOR: &str = "[NEW DOCUMENT]: ";

/// Label that opens the context block.
const CONTEXT_PREFIX: &str = "Relevant context: ";

/// Whether an exchange carries retrieved context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AugmentMode {
    /// RAG disabled: the prompt goes to the model as-is.
    Plain,
    /// RAG enabled: carries the retrieved document contents, possibly empty.
    Augmented(Vec<String>),
}

/// Builds the ordered message sequence for one completion call.
///
/// Ordering:
/// 1. system `instruction`;
/// 2. in augmented mode, a second system message with the joined documents;
/// 3. the history snapshot, verbatim;
/// 4. the user turn — raw in plain mode, policy-prefixed when augmented.
pub fn assemble(
    instruction: &str,
    prompt: &str,
    history: &[HistoryEntry],
    mode: &AugmentMode,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 3);

    messages.push(ChatMessage::system(instruction));

    if let AugmentMode::Augmented(documents) = mode {
        let mut context = String::from(CONTEXT_PREFIX);
        context.push_str(&documents.join(DOCUMENT_SEPARATOR));
        messages.push(ChatMessage::system(context));
    }

    for entry in history {
        messages.push(match entry.role {
            HistoryRole::User => ChatMessage::user(entry.content.clone()),
            HistoryRole::Assistant => ChatMessage::assistant(entry.content.clone()),
        });
    }

    messages.push(match mode {
        AugmentMode::Plain => ChatMessage::user(prompt),
        AugmentMode::Augmented(_) => {
            ChatMessage::user(format!("{RAG_POLICY_INSTRUCTION}{prompt}"))
        }
    });

    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::push_exchange;
    use ai_llm_service::chat::ChatRole;

    #[test]
    fn plain_prompt_yields_instruction_and_user_turn() {
        let messages = assemble(FORMATTING_INSTRUCTION, "What is 2+2?", &[], &AugmentMode::Plain);

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], ChatMessage::system(FORMATTING_INSTRUCTION));
        assert_eq!(messages[1], ChatMessage::user("What is 2+2?"));
    }

    #[test]
    fn augmented_prompt_carries_context_and_policy() {
        let retrieved = vec!["Paris is the capital of France.".to_string()];
        let messages = assemble(
            FORMATTING_INSTRUCTION,
            "What is the capital of France?",
            &[],
            &AugmentMode::Augmented(retrieved),
        );

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, ChatRole::System);
        assert_eq!(
            messages[1].content,
            "Relevant context: Paris is the capital of France."
        );
        assert_eq!(messages[2].role, ChatRole::User);
        assert!(messages[2].content.starts_with(RAG_POLICY_INSTRUCTION));
        assert!(messages[2].content.ends_with("What is the capital of France?"));
    }

    #[test]
    fn documents_are_joined_with_separator() {
        let retrieved = vec!["one".to_string(), "two".to_string(), "three".to_string()];
        let messages = assemble(FORMATTING_INSTRUCTION, "q", &[], &AugmentMode::Augmented(retrieved));

        assert_eq!(
            messages[1].content,
            "Relevant context: one[NEW DOCUMENT]: two[NEW DOCUMENT]: three"
        );
    }

    #[test]
    fn empty_retrieval_still_differs_from_plain() {
        let plain = assemble(FORMATTING_INSTRUCTION, "q", &[], &AugmentMode::Plain);
        let empty = assemble(
            FORMATTING_INSTRUCTION,
            "q",
            &[],
            &AugmentMode::Augmented(Vec::new()),
        );

        assert_ne!(plain, empty);
        assert_eq!(empty.len(), 3);
        assert_eq!(empty[1].content, "Relevant context: ");
    }

    #[test]
    fn history_sits_between_context_and_user_turn() {
        let mut history = Vec::new();
        push_exchange(&mut history, "hi", "hello");

        let messages = assemble(
            FORMATTING_INSTRUCTION,
            "q",
            &history,
            &AugmentMode::Augmented(vec!["doc".into()]),
        );

        assert_eq!(messages.len(), 5);
        assert_eq!(messages[2], ChatMessage::user("hi"));
        assert_eq!(messages[3], ChatMessage::assistant("hello"));
        assert_eq!(messages[4].role, ChatRole::User);
    }

    #[test]
    fn assembly_is_pure() {
        let mut history = Vec::new();
        push_exchange(&mut history, "hi", "hello");
        let mode = AugmentMode::Augmented(vec!["doc".into()]);

        let first = assemble(FORMATTING_INSTRUCTION, "q", &history, &mode);
        let second = assemble(FORMATTING_INSTRUCTION, "q", &history, &mode);

        assert_eq!(first, second);
    }
}
