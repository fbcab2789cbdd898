use serde_json::Value;

use super::conversation::{Conversation, Message};

/// Input to a generation call
///
/// Either a bare string (a single user turn), a structured conversation, or
/// untyped JSON that is decoded into one of those during normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// A single user message
    Text(String),
    /// A full multi-turn conversation
    Conversation(Conversation),
    /// Undecoded input: a JSON string or an object with a `messages` array
    Json(Value),
}

impl From<&str> for Prompt {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for Prompt {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Conversation> for Prompt {
    fn from(conversation: Conversation) -> Self {
        Self::Conversation(conversation)
    }
}

impl From<Vec<Message>> for Prompt {
    fn from(messages: Vec<Message>) -> Self {
        Self::Conversation(Conversation::new(messages))
    }
}

impl From<Value> for Prompt {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}
