//! Ollama language model adapter for Kiln
//!
//! Normalizes structured conversations into the flat role/content messages
//! the Ollama chat endpoint expects, and turns its replies into responses
//! with a single terminal finish part. Streaming replies are re-emitted as
//! cumulative text so a consumer can always render the latest response alone.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod convert;
pub mod error;
pub mod model;
pub mod protocol;
pub mod provider;
pub mod stream;
pub mod types;

pub use error::{AiError, ErrorKind, InvalidPrompt, Method, ProviderError};
pub use model::{LanguageModel, OllamaLanguageModel};
pub use provider::{ChatProvider, ChunkStream, OllamaProvider};
pub use stream::{ResponseStream, StreamAccumulator};
pub use types::{Conversation, FinishReason, Message, Part, Prompt, Response, ResponsePart, Usage};
