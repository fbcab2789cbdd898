use std::fmt::Display;

use thiserror::Error;

/// Module name reported on every [`AiError`]
pub const MODULE: &str = "OllamaLanguageModel";

/// Caller-facing operation an error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr)]
pub enum Method {
    #[strum(serialize = "generateText")]
    GenerateText,
    #[strum(serialize = "streamText")]
    StreamText,
    #[strum(serialize = "generateObject")]
    GenerateObject,
}

/// What went wrong, independent of which operation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// The prompt could not be interpreted; no request was sent
    InvalidInput,
    /// A one-shot call to the inference server failed
    ProviderCall,
    /// A streaming call failed, before the first chunk or mid-stream
    ProviderStream,
    /// The operation is deliberately unsupported
    NotImplemented,
}

/// The single error kind surfaced by the language model
///
/// `description` carries the full text of the underlying cause.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{module}.{method}: {description}")]
pub struct AiError {
    /// Always [`MODULE`]
    pub module: &'static str,
    /// Operation that failed
    pub method: Method,
    /// Failure category
    pub kind: ErrorKind,
    /// Human-readable cause
    pub description: String,
}

impl AiError {
    /// Wrap a cause, logging it once at this boundary
    pub fn new(method: Method, kind: ErrorKind, cause: impl Display) -> Self {
        let description = cause.to_string();
        tracing::warn!(module = MODULE, method = %method, kind = %kind, error = %description, "language model call failed");

        Self {
            module: MODULE,
            method,
            kind,
            description,
        }
    }

    /// Prompt rejected before any network call
    pub fn invalid_input(method: Method, cause: &InvalidPrompt) -> Self {
        Self::new(method, ErrorKind::InvalidInput, cause)
    }

    /// Failure from the provider client; the kind follows the operation
    pub fn provider(method: Method, cause: &ProviderError) -> Self {
        let kind = match method {
            Method::StreamText => ErrorKind::ProviderStream,
            Method::GenerateText | Method::GenerateObject => ErrorKind::ProviderCall,
        };
        Self::new(method, kind, cause)
    }

    /// Structured output generation is not supported
    pub fn not_implemented(method: Method) -> Self {
        Self::new(method, ErrorKind::NotImplemented, "Not implemented")
    }
}

/// A prompt that is neither text nor a conversation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid prompt: {0}")]
pub struct InvalidPrompt(pub String);

/// Errors from the inference server call boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Transport failure or non-success status
    #[error("upstream error: {0}")]
    Upstream(String),

    /// The streaming body failed or reported an error mid-stream
    #[error("streaming error: {0}")]
    Streaming(String),

    /// The reply body was not the expected shape
    #[error("failed to parse response: {0}")]
    Parse(String),
}
