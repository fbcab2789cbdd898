use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered multi-turn dialogue
///
/// Turn order is meaningful and is preserved through normalization. An empty
/// conversation is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    /// Messages in turn order
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Conversation {
    /// Create a conversation from messages in turn order
    pub const fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// Whether the conversation has no messages
    pub const fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl From<Vec<Message>> for Conversation {
    fn from(messages: Vec<Message>) -> Self {
        Self::new(messages)
    }
}

impl FromIterator<Message> for Conversation {
    fn from_iter<I: IntoIterator<Item = Message>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A single turn, tagged by its author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    /// Input from the user
    User {
        /// Content parts in order
        #[serde(default)]
        parts: Vec<Part>,
    },
    /// Earlier output from the model
    Assistant {
        /// Content parts in order
        #[serde(default)]
        parts: Vec<Part>,
    },
    /// Results returned by tools the model asked to call
    Tool {
        /// Content parts in order
        #[serde(default)]
        parts: Vec<Part>,
    },
}

impl Message {
    /// User message holding a single text part
    pub fn user(text: impl Into<String>) -> Self {
        Self::User {
            parts: vec![Part::text(text)],
        }
    }

    /// Assistant message holding a single text part
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::Assistant {
            parts: vec![Part::text(text)],
        }
    }

    /// Tool message holding the given parts
    pub const fn tool(parts: Vec<Part>) -> Self {
        Self::Tool { parts }
    }

    /// Content parts of this message, whatever its role
    pub fn parts(&self) -> &[Part] {
        match self {
            Self::User { parts } | Self::Assistant { parts } | Self::Tool { parts } => parts,
        }
    }
}

/// Smallest unit of message content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Part {
    /// Literal text
    Text {
        /// The text
        text: String,
    },
    /// A request from the assistant to invoke a tool
    ToolCall {
        /// Identifier of this call
        id: String,
        /// Tool name
        name: String,
        /// Arguments for the tool
        params: Value,
    },
    /// The outcome of a tool invocation
    ToolCallResult {
        /// Identifier of this result
        id: String,
        /// Tool name
        name: String,
        /// Identifier of the call this answers
        tool_call_id: String,
        /// Value the tool produced
        result: Value,
    },
    /// A part kind this crate does not know; ignored during normalization
    #[serde(other)]
    Unknown,
}

impl Part {
    /// Text part
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Tool call part
    pub fn tool_call(id: impl Into<String>, name: impl Into<String>, params: Value) -> Self {
        Self::ToolCall {
            id: id.into(),
            name: name.into(),
            params,
        }
    }

    /// Tool result part
    pub fn tool_result(
        id: impl Into<String>,
        name: impl Into<String>,
        tool_call_id: impl Into<String>,
        result: Value,
    ) -> Self {
        Self::ToolCallResult {
            id: id.into(),
            name: name.into(),
            tool_call_id: tool_call_id.into(),
            result,
        }
    }
}
