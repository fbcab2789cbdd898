//! Conversion from Ollama replies to responses

use crate::protocol::ollama::ChatResponse;
use crate::types::{FinishReason, Response, Usage};

/// Token usage reported on a reply
pub fn reply_usage(reply: &ChatResponse) -> Usage {
    Usage::from_counts(reply.prompt_eval_count, reply.eval_count)
}

/// Terminal response for a complete, non-streamed reply
///
/// The finish reason is always `stop`; the server's `done_reason` is not
/// surfaced.
pub fn reply_to_response(reply: &ChatResponse) -> Response {
    Response::finished(reply.content(), FinishReason::Stop, reply_usage(reply))
}
