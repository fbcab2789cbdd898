//! Ollama `/api/chat` wire format types

use serde::{Deserialize, Serialize};

// -- Request types --

/// Ollama chat request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model identifier
    pub model: String,
    /// Flat conversation messages
    pub messages: Vec<ChatMessage>,
    /// Whether the reply is newline-delimited chunks or a single object
    pub stream: bool,
}

impl ChatRequest {
    /// Build a request for the given model
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>, stream: bool) -> Self {
        Self {
            model: model.into(),
            messages,
            stream,
        }
    }
}

/// Roles accepted by the chat endpoint
///
/// There is no tool role on this wire; tool output travels as assistant text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// System instruction
    System,
    /// User turn
    User,
    /// Assistant turn
    Assistant,
}

/// Flat role/content message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author role
    pub role: ChatRole,
    /// Text content
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

// -- Response types --

/// Reply object, either the whole non-streaming reply or one streamed chunk
///
/// Every field is optional: counters typically arrive only on the final
/// chunk, and an error line carries nothing but `error`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Model that produced the reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Generated message (or the next fragment of it)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<ResponseMessage>,
    /// Set on the last chunk of a stream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
    /// Why the server stopped (e.g. "stop", "length")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done_reason: Option<String>,
    /// Tokens in the evaluated prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_eval_count: Option<u64>,
    /// Tokens generated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eval_count: Option<u64>,
    /// Error reported by the server instead of a reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatResponse {
    /// Text carried by this reply, empty if none
    pub fn content(&self) -> &str {
        self.message.as_ref().map_or("", |m| m.content.as_str())
    }
}

/// Message within a reply
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMessage {
    /// Role (always "assistant" in practice)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Text content
    #[serde(default)]
    pub content: String,
}

impl ResponseMessage {
    /// Assistant message with the given text
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Some("assistant".to_owned()),
            content: content.into(),
        }
    }
}
