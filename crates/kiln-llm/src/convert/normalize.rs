//! Flattening of prompts into the chat endpoint's role/content messages
//!
//! Tool messages are sent with the assistant role because the wire has no
//! tool role. This narrows information: the model sees tool results as text
//! it wrote itself.

use std::borrow::Cow;

use serde_json::Value;

use crate::error::InvalidPrompt;
use crate::protocol::ollama::{ChatMessage, ChatRole};
use crate::types::{Conversation, Message, Part, Prompt};

/// Normalize a prompt and optional system instruction into chat messages
///
/// A non-empty system instruction becomes the first message. Each source
/// message becomes at most one chat message; messages whose parts render to
/// nothing are dropped. The result depends only on the inputs.
pub fn normalize(prompt: &Prompt, system: Option<&str>) -> Result<Vec<ChatMessage>, InvalidPrompt> {
    let mut messages = Vec::new();

    if let Some(system) = system.filter(|s| !s.is_empty()) {
        messages.push(ChatMessage::system(system));
    }

    match prompt {
        Prompt::Text(text) => push_text(&mut messages, text),
        Prompt::Conversation(conversation) => push_conversation(&mut messages, conversation),
        Prompt::Json(value) => match decode_json(value)? {
            Decoded::Text(text) => push_text(&mut messages, text),
            Decoded::Conversation(conversation) => push_conversation(&mut messages, &conversation),
        },
    }

    tracing::debug!(count = messages.len(), "normalized prompt");

    Ok(messages)
}

fn push_text(messages: &mut Vec<ChatMessage>, text: &str) {
    if !text.is_empty() {
        messages.push(ChatMessage::user(text));
    }
}

fn push_conversation(messages: &mut Vec<ChatMessage>, conversation: &Conversation) {
    messages.extend(conversation.messages.iter().filter_map(render_message));
}

/// Render one message, or `None` if it has no textual content
fn render_message(message: &Message) -> Option<ChatMessage> {
    let (role, content): (ChatRole, String) = match message {
        Message::User { parts } => (ChatRole::User, parts.iter().filter_map(render_user_part).collect()),
        Message::Assistant { parts } => (
            ChatRole::Assistant,
            parts.iter().filter_map(render_assistant_part).collect(),
        ),
        Message::Tool { parts } => (ChatRole::Assistant, parts.iter().filter_map(render_tool_part).collect()),
    };

    (!content.is_empty()).then_some(ChatMessage { role, content })
}

fn render_user_part(part: &Part) -> Option<Cow<'_, str>> {
    match part {
        Part::Text { text } => Some(Cow::Borrowed(text)),
        Part::ToolCall { .. } | Part::ToolCallResult { .. } | Part::Unknown => None,
    }
}

fn render_assistant_part(part: &Part) -> Option<Cow<'_, str>> {
    match part {
        Part::Text { text } => Some(Cow::Borrowed(text)),
        Part::ToolCall { name, params, .. } => Some(Cow::Owned(format!("[Tool Call: {name}({params})]"))),
        Part::ToolCallResult { .. } | Part::Unknown => None,
    }
}

fn render_tool_part(part: &Part) -> Option<Cow<'_, str>> {
    match part {
        Part::ToolCallResult { result, .. } => Some(Cow::Owned(format!("[Tool Result: {result}]"))),
        Part::Text { .. } | Part::ToolCall { .. } | Part::Unknown => None,
    }
}

enum Decoded<'a> {
    Text(&'a str),
    Conversation(Conversation),
}

/// Interpret untyped input as text or a conversation
fn decode_json(value: &Value) -> Result<Decoded<'_>, InvalidPrompt> {
    match value {
        Value::String(text) => Ok(Decoded::Text(text)),
        Value::Object(map) if map.get("messages").is_some_and(Value::is_array) => serde_json::from_value(value.clone())
            .map(Decoded::Conversation)
            .map_err(|e| InvalidPrompt(format!("malformed conversation: {e}"))),
        other => Err(InvalidPrompt(format!(
            "expected a string or an object with a `messages` array, got {}",
            json_kind(other)
        ))),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object without `messages`",
    }
}
