//! Caller-facing types: the structured conversation going in and the
//! responses coming out
//!
//! These are provider-agnostic; `convert` maps them to and from the Ollama
//! wire format.

pub mod conversation;
pub mod prompt;
pub mod response;

pub use conversation::{Conversation, Message, Part};
pub use prompt::Prompt;
pub use response::{FinishReason, Response, ResponsePart, Usage};
