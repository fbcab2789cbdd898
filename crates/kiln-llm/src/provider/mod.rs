//! Call boundary to the inference server

pub mod ollama;

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;

pub use self::ollama::OllamaProvider;
use crate::error::ProviderError;
use crate::protocol::ollama::{ChatRequest, ChatResponse};

/// Incremental reply chunks from a streaming call
///
/// Dropping the stream releases the underlying connection.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<ChatResponse, ProviderError>> + Send>>;

/// Chat capability of an inference server
///
/// The language model only talks to the server through this trait, so it
/// can be driven by a fake in tests.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Human-readable provider name
    fn name(&self) -> &'static str;

    /// Send a request and wait for the complete reply
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError>;

    /// Send a request and return its reply as a chunk stream
    async fn chat_stream(&self, request: &ChatRequest) -> Result<ChunkStream, ProviderError>;
}
