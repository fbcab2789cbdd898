//! Ollama HTTP provider

use async_trait::async_trait;
use bytes::Buf;
use futures_util::{Stream, StreamExt, TryStreamExt};
use reqwest::Client;
use tokio_util::codec::{FramedRead, LinesCodec};
use tokio_util::io::StreamReader;
use url::Url;

use super::{ChatProvider, ChunkStream};
use crate::error::ProviderError;
use crate::protocol::ollama::{ChatRequest, ChatResponse};

/// Longest accepted line of a streamed reply, in bytes
const MAX_LINE_LENGTH: usize = 4 * 1024 * 1024;

/// Provider speaking the native Ollama chat API
pub struct OllamaProvider {
    client: Client,
    base_url: Url,
}

impl OllamaProvider {
    /// Create a provider for the server at `base_url`
    pub fn new(base_url: Url) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a provider reusing an existing HTTP client
    pub const fn with_client(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// Build the chat endpoint URL
    fn chat_url(&self) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/api/chat")
    }

    /// POST the request and check the status
    async fn send(&self, request: &ChatRequest) -> Result<reqwest::Response, ProviderError> {
        let response = self
            .client
            .post(self.chat_url())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                let description = describe(&e);
                tracing::error!(provider = "ollama", error = %description, "upstream request failed");
                ProviderError::Upstream(description)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(provider = "ollama", status = %status, "upstream returned error");
            return Err(ProviderError::Upstream(format!("provider returned {status}: {body}")));
        }

        Ok(response)
    }
}

#[async_trait]
impl ChatProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError> {
        let response = self.send(request).await?;

        let reply: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(describe(&e)))?;

        check_reply(reply)
    }

    async fn chat_stream(&self, request: &ChatRequest) -> Result<ChunkStream, ProviderError> {
        let response = self.send(request).await?;

        Ok(decode_lines(response.bytes_stream().map_err(std::io::Error::other)))
    }
}

/// Split a streamed body into chunks, one JSON object per line
///
/// Blank lines are skipped. A line longer than [`MAX_LINE_LENGTH`] fails the
/// stream instead of buffering further.
fn decode_lines<S, B>(body: S) -> ChunkStream
where
    S: Stream<Item = std::io::Result<B>> + Send + 'static,
    B: Buf + Send + 'static,
{
    let lines = FramedRead::new(
        StreamReader::new(body),
        LinesCodec::new_with_max_length(MAX_LINE_LENGTH),
    );

    Box::pin(lines.filter_map(|line| async move {
        match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(parse_chunk(&line)),
            Err(e) => Some(Err(ProviderError::Streaming(describe(&e)))),
        }
    }))
}

/// Render an error with its whole source chain
fn describe(error: &dyn std::error::Error) -> String {
    let mut description = error.to_string();
    let mut source = error.source();

    while let Some(cause) = source {
        description.push_str(": ");
        description.push_str(&cause.to_string());
        source = cause.source();
    }

    description
}

/// Reject a complete reply that reports an error or carries no message
fn check_reply(reply: ChatResponse) -> Result<ChatResponse, ProviderError> {
    if let Some(error) = reply.error {
        return Err(ProviderError::Upstream(error));
    }

    if reply.message.is_none() {
        return Err(ProviderError::Parse("reply has no message".to_owned()));
    }

    Ok(reply)
}

/// Decode one newline-delimited JSON chunk
fn parse_chunk(line: &str) -> Result<ChatResponse, ProviderError> {
    let chunk: ChatResponse = serde_json::from_str(line).map_err(|e| {
        tracing::debug!(error = %e, data = %line, "unparseable stream chunk");
        ProviderError::Streaming(format!("invalid chunk: {e}"))
    })?;

    match chunk.error {
        Some(error) => Err(ProviderError::Streaming(error)),
        None => Ok(chunk),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_url_handles_trailing_slash() {
        let bare = OllamaProvider::new(Url::parse("http://localhost:11434").unwrap());
        assert_eq!(bare.chat_url(), "http://localhost:11434/api/chat");

        let prefixed = OllamaProvider::new(Url::parse("http://gateway/ollama/").unwrap());
        assert_eq!(prefixed.chat_url(), "http://gateway/ollama/api/chat");
    }

    #[test]
    fn reply_without_message_is_rejected() {
        let reply: ChatResponse = serde_json::from_str(r#"{"done":true,"prompt_eval_count":3}"#).unwrap();

        let err = check_reply(reply).unwrap_err();
        assert_eq!(err, ProviderError::Parse("reply has no message".to_owned()));
    }

    #[test]
    fn reply_error_field_wins() {
        let err = check_reply(ChatResponse {
            error: Some("model 'nope' not found".to_owned()),
            ..Default::default()
        })
        .unwrap_err();

        assert_eq!(err, ProviderError::Upstream("model 'nope' not found".to_owned()));
    }

    #[test]
    fn reply_with_empty_message_is_accepted() {
        let reply: ChatResponse =
            serde_json::from_str(r#"{"message":{"role":"assistant","content":""},"done":true}"#).unwrap();

        assert_eq!(check_reply(reply).unwrap().content(), "");
    }

    #[test]
    fn parse_chunk_reads_content() {
        let chunk = parse_chunk(r#"{"message":{"role":"assistant","content":"lo"},"done":false}"#).unwrap();
        assert_eq!(chunk.content(), "lo");
    }

    #[test]
    fn parse_chunk_surfaces_server_errors() {
        let err = parse_chunk(r#"{"error":"out of memory"}"#).unwrap_err();
        assert_eq!(err, ProviderError::Streaming("out of memory".to_owned()));
    }

    #[test]
    fn describe_includes_sources() {
        #[derive(Debug, thiserror::Error)]
        #[error("request failed")]
        struct Outer(#[source] ProviderError);

        let plain = ProviderError::Streaming("body closed".to_owned());
        assert_eq!(describe(&plain), "streaming error: body closed");

        let chained = Outer(plain);
        assert_eq!(describe(&chained), "request failed: streaming error: body closed");
    }

    fn body(lines: &[&str]) -> impl Stream<Item = std::io::Result<bytes::Bytes>> + Send + 'static {
        let lines: Vec<std::io::Result<bytes::Bytes>> =
            lines.iter().map(|line| Ok(bytes::Bytes::copy_from_slice(line.as_bytes()))).collect();
        futures_util::stream::iter(lines)
    }

    #[tokio::test]
    async fn decode_lines_skips_blank_lines() {
        let chunks: Vec<_> = decode_lines(body(&[
            "{\"message\":{\"content\":\"Hel\"}}\n\n",
            "{\"message\":{\"content\":\"lo\"},\"done\":true}\n",
        ]))
        .collect()
        .await;

        let texts: Vec<&str> = chunks.iter().map(|c| c.as_ref().unwrap().content()).collect();
        assert_eq!(texts, vec!["Hel", "lo"]);
    }

    #[tokio::test]
    async fn decode_lines_rejects_oversized_line() {
        let endless = "a".repeat(MAX_LINE_LENGTH + 1);

        let mut chunks = decode_lines(body(&[&endless]));

        let err = chunks.next().await.unwrap().unwrap_err();
        assert!(
            matches!(&err, ProviderError::Streaming(msg) if msg.contains("max line length")),
            "{err}"
        );
    }

    #[test]
    fn parse_chunk_rejects_garbage() {
        let err = parse_chunk("not json").unwrap_err();
        assert!(matches!(err, ProviderError::Streaming(msg) if msg.starts_with("invalid chunk")));
    }
}
