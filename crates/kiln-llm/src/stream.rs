//! Re-assembly of streamed chunks into cumulative responses
//!
//! Every chunk that carries text produces a response holding the whole text
//! so far. When the chunk stream ends, one terminal response follows with
//! the final text and usage. A failed stream ends with an error and no
//! terminal response.

use std::pin::Pin;
use std::sync::Arc;

use futures_util::{Stream, StreamExt, stream};

use crate::error::{AiError, InvalidPrompt, Method};
use crate::protocol::ollama::{ChatRequest, ChatResponse};
use crate::provider::{ChatProvider, ChunkStream};
use crate::types::{FinishReason, Response, Usage};

/// Responses produced by a streaming generation
pub type ResponseStream = Pin<Box<dyn Stream<Item = Result<Response, AiError>> + Send>>;

/// Running text and token counters for one stream
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    text: String,
    prompt_eval_count: Option<u64>,
    eval_count: Option<u64>,
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in a chunk, returning the cumulative response if it added text
    ///
    /// Counters keep the latest value the server reported, whether or not
    /// the chunk carried text.
    pub fn push(&mut self, chunk: &ChatResponse) -> Option<Response> {
        if let Some(count) = chunk.prompt_eval_count {
            self.prompt_eval_count = Some(count);
        }
        if let Some(count) = chunk.eval_count {
            self.eval_count = Some(count);
        }

        let delta = chunk.content();
        if delta.is_empty() {
            return None;
        }

        self.text.push_str(delta);
        Some(Response::partial(self.text.clone()))
    }

    /// Text accumulated so far
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Terminal response with the final text and usage
    pub fn finish(self) -> Response {
        let usage = Usage::from_counts(self.prompt_eval_count, self.eval_count);
        Response::finished(self.text, FinishReason::Stop, usage)
    }
}

/// Progress of a response stream
enum State {
    /// Prompt failed normalization; report it on first poll
    Rejected(InvalidPrompt),
    /// Request not yet sent
    Connect {
        provider: Arc<dyn ChatProvider>,
        request: ChatRequest,
    },
    /// Reading chunks
    Receive {
        chunks: ChunkStream,
        accumulator: StreamAccumulator,
    },
    Done,
}

/// Build a lazy response stream
///
/// Nothing is sent until the stream is first polled. Dropping the stream
/// drops the chunk stream with it, closing the connection.
pub(crate) fn response_stream(
    provider: Arc<dyn ChatProvider>,
    request: Result<ChatRequest, InvalidPrompt>,
) -> ResponseStream {
    let initial = match request {
        Ok(request) => State::Connect { provider, request },
        Err(err) => State::Rejected(err),
    };

    Box::pin(stream::unfold(initial, advance))
}

async fn advance(mut state: State) -> Option<(Result<Response, AiError>, State)> {
    loop {
        state = match state {
            State::Done => return None,
            State::Rejected(err) => {
                return Some((Err(AiError::invalid_input(Method::StreamText, &err)), State::Done));
            }
            State::Connect { provider, request } => {
                tracing::debug!(
                    method = %Method::StreamText,
                    model = %request.model,
                    provider = provider.name(),
                    "opening stream"
                );

                match provider.chat_stream(&request).await {
                    Ok(chunks) => State::Receive {
                        chunks,
                        accumulator: StreamAccumulator::new(),
                    },
                    Err(e) => return Some((Err(AiError::provider(Method::StreamText, &e)), State::Done)),
                }
            }
            State::Receive {
                mut chunks,
                mut accumulator,
            } => match chunks.next().await {
                Some(Ok(chunk)) => {
                    if chunk.done == Some(true) {
                        tracing::debug!(
                            served_by = chunk.model.as_deref(),
                            done_reason = chunk.done_reason.as_deref(),
                            "server finished generating"
                        );
                    }

                    match accumulator.push(&chunk) {
                        Some(response) => return Some((Ok(response), State::Receive { chunks, accumulator })),
                        None => State::Receive { chunks, accumulator },
                    }
                }
                Some(Err(e)) => return Some((Err(AiError::provider(Method::StreamText, &e)), State::Done)),
                None => {
                    let response = accumulator.finish();
                    tracing::debug!(
                        chars = response.text().len(),
                        total_tokens = response.usage().map_or(0, Usage::total_tokens),
                        "stream finished"
                    );
                    return Some((Ok(response), State::Done));
                }
            },
        };
    }
}
