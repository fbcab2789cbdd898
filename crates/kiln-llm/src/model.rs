//! Caller-facing language model operations

use std::sync::Arc;

use async_trait::async_trait;
use kiln_config::OllamaConfig;
use serde_json::Value;

use crate::convert::normalize::normalize;
use crate::convert::ollama::reply_to_response;
use crate::error::{AiError, Method};
use crate::protocol::ollama::ChatRequest;
use crate::provider::{ChatProvider, OllamaProvider};
use crate::stream::{ResponseStream, response_stream};
use crate::types::{Prompt, Response};

/// Text generation over a conversation
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate a complete reply in one call
    async fn generate_text(&self, prompt: Prompt, system: Option<&str>) -> Result<Response, AiError>;

    /// Stream a reply as cumulative responses ending in one terminal response
    ///
    /// The stream is lazy. Errors, including an invalid prompt, surface as
    /// the stream's last item.
    fn stream_text(&self, prompt: Prompt, system: Option<&str>) -> ResponseStream;

    /// Generate a value matching `schema`
    async fn generate_object(&self, prompt: Prompt, system: Option<&str>, schema: &Value)
    -> Result<Value, AiError>;
}

/// Language model backed by an Ollama chat endpoint
pub struct OllamaLanguageModel {
    provider: Arc<dyn ChatProvider>,
    model: String,
}

impl OllamaLanguageModel {
    /// Create a model talking to the configured server
    pub fn new(config: &OllamaConfig) -> Self {
        tracing::debug!(url = %config.url, model = %config.model, "creating ollama language model");
        Self::with_provider(Arc::new(OllamaProvider::new(config.url.clone())), config.model.clone())
    }

    /// Create a model over an arbitrary provider
    pub fn with_provider(provider: Arc<dyn ChatProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Model identifier sent with every request
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LanguageModel for OllamaLanguageModel {
    async fn generate_text(&self, prompt: Prompt, system: Option<&str>) -> Result<Response, AiError> {
        let method = Method::GenerateText;
        let messages = normalize(&prompt, system).map_err(|e| AiError::invalid_input(method, &e))?;
        let request = ChatRequest::new(&self.model, messages, false);

        tracing::debug!(method = %method, model = %self.model, provider = self.provider.name(), "sending request");

        let reply = self
            .provider
            .chat(&request)
            .await
            .map_err(|e| AiError::provider(method, &e))?;

        let response = reply_to_response(&reply);
        tracing::debug!(
            method = %method,
            model = %self.model,
            served_by = reply.model.as_deref(),
            done_reason = reply.done_reason.as_deref(),
            chars = response.text().len(),
            "request complete"
        );

        Ok(response)
    }

    fn stream_text(&self, prompt: Prompt, system: Option<&str>) -> ResponseStream {
        let request = normalize(&prompt, system).map(|messages| ChatRequest::new(&self.model, messages, true));
        response_stream(Arc::clone(&self.provider), request)
    }

    async fn generate_object(
        &self,
        _prompt: Prompt,
        _system: Option<&str>,
        _schema: &Value,
    ) -> Result<Value, AiError> {
        Err(AiError::not_implemented(Method::GenerateObject))
    }
}
