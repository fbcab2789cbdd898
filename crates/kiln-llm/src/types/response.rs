use serde::{Deserialize, Serialize};

/// Why the model stopped generating
///
/// The Ollama adapter only ever reports [`FinishReason::Stop`]; the other
/// reasons complete the set a response can carry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::AsRefStr, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FinishReason {
    /// Natural end of generation
    Stop,
    /// Hit the token limit
    Length,
    /// Model decided to call a tool
    ToolCalls,
    /// Output was filtered
    ContentFilter,
}

/// Token accounting for one generation
///
/// Only constructible through [`Usage::from_counts`], so `total_tokens` is
/// always the sum of input and output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[allow(clippy::struct_field_names)]
pub struct Usage {
    input_tokens: u64,
    output_tokens: u64,
    total_tokens: u64,
    reasoning_tokens: u64,
    cache_read_input_tokens: u64,
    cache_write_input_tokens: u64,
}

impl Usage {
    /// Build usage from the server's prompt and completion counters
    ///
    /// Missing counters count as zero. The server's own total, if any, is
    /// never consulted. This provider reports no reasoning or cache tokens.
    pub fn from_counts(prompt_eval_count: Option<u64>, eval_count: Option<u64>) -> Self {
        let input_tokens = prompt_eval_count.unwrap_or(0);
        let output_tokens = eval_count.unwrap_or(0);

        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens.saturating_add(output_tokens),
            reasoning_tokens: 0,
            cache_read_input_tokens: 0,
            cache_write_input_tokens: 0,
        }
    }

    /// Tokens consumed by the prompt
    pub const fn input_tokens(&self) -> u64 {
        self.input_tokens
    }

    /// Tokens generated
    pub const fn output_tokens(&self) -> u64 {
        self.output_tokens
    }

    /// Input plus output
    pub const fn total_tokens(&self) -> u64 {
        self.total_tokens
    }

    pub const fn reasoning_tokens(&self) -> u64 {
        self.reasoning_tokens
    }

    pub const fn cache_read_input_tokens(&self) -> u64 {
        self.cache_read_input_tokens
    }

    pub const fn cache_write_input_tokens(&self) -> u64 {
        self.cache_write_input_tokens
    }
}

/// One element of a response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponsePart {
    /// Generated text; cumulative when part of a stream
    Text {
        /// The text
        text: String,
    },
    /// Terminal marker with completion reason and usage
    Finish {
        /// Why generation stopped
        reason: FinishReason,
        /// Token accounting
        usage: Usage,
    },
}

/// Output of a generation call or one step of a stream
///
/// Holds a single text part, optionally followed by one finish part. There
/// is no way to build a response with the finish part anywhere but last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    parts: Vec<ResponsePart>,
}

impl Response {
    /// Non-terminal response carrying text only
    pub fn partial(text: impl Into<String>) -> Self {
        Self {
            parts: vec![ResponsePart::Text { text: text.into() }],
        }
    }

    /// Terminal response: text followed by the finish part
    pub fn finished(text: impl Into<String>, reason: FinishReason, usage: Usage) -> Self {
        Self {
            parts: vec![ResponsePart::Text { text: text.into() }, ResponsePart::Finish { reason, usage }],
        }
    }

    pub fn parts(&self) -> &[ResponsePart] {
        &self.parts
    }

    /// Text of this response
    pub fn text(&self) -> &str {
        self.parts
            .iter()
            .find_map(|part| match part {
                ResponsePart::Text { text } => Some(text.as_str()),
                ResponsePart::Finish { .. } => None,
            })
            .unwrap_or_default()
    }

    /// Finish reason, present only on terminal responses
    pub fn finish_reason(&self) -> Option<FinishReason> {
        self.finish().map(|(reason, _)| reason)
    }

    /// Usage, present only on terminal responses
    pub fn usage(&self) -> Option<&Usage> {
        self.finish().map(|(_, usage)| usage)
    }

    /// Whether this response ends its stream
    pub fn is_finished(&self) -> bool {
        self.finish().is_some()
    }

    fn finish(&self) -> Option<(FinishReason, &Usage)> {
        match self.parts.last() {
            Some(ResponsePart::Finish { reason, usage }) => Some((*reason, usage)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_total_is_recomputed() {
        let usage = Usage::from_counts(Some(12), Some(30));
        assert_eq!(usage.input_tokens(), 12);
        assert_eq!(usage.output_tokens(), 30);
        assert_eq!(usage.total_tokens(), 42);
    }

    #[test]
    fn missing_counts_default_to_zero() {
        let only_prompt = Usage::from_counts(Some(7), None);
        assert_eq!(only_prompt.total_tokens(), 7);

        let none = Usage::from_counts(None, None);
        assert_eq!(none, Usage::default());
        assert_eq!(none.total_tokens(), 0);
    }

    #[test]
    fn provider_specific_counters_are_zero() {
        let usage = Usage::from_counts(Some(1), Some(1));
        assert_eq!(usage.reasoning_tokens(), 0);
        assert_eq!(usage.cache_read_input_tokens(), 0);
        assert_eq!(usage.cache_write_input_tokens(), 0);
    }

    #[test]
    fn partial_response_has_no_finish() {
        let response = Response::partial("Hel");
        assert_eq!(response.text(), "Hel");
        assert_eq!(response.parts().len(), 1);
        assert!(!response.is_finished());
        assert_eq!(response.finish_reason(), None);
        assert!(response.usage().is_none());
    }

    #[test]
    fn finish_part_is_last() {
        let response = Response::finished("Hello", FinishReason::Stop, Usage::from_counts(Some(3), Some(2)));

        assert_eq!(response.text(), "Hello");
        assert_eq!(response.finish_reason(), Some(FinishReason::Stop));
        assert_eq!(response.usage().map(Usage::total_tokens), Some(5));
        assert!(matches!(response.parts().last(), Some(ResponsePart::Finish { .. })));
        assert_eq!(
            response
                .parts()
                .iter()
                .filter(|p| matches!(p, ResponsePart::Finish { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn finish_reason_renders_snake_case() {
        assert_eq!(FinishReason::Stop.to_string(), "stop");
        assert_eq!(FinishReason::ToolCalls.as_ref(), "tool_calls");
        assert_eq!("content_filter".parse::<FinishReason>().unwrap(), FinishReason::ContentFilter);
    }

    #[test]
    fn serializes_with_tagged_parts() {
        let response = Response::finished("ok", FinishReason::Stop, Usage::from_counts(Some(1), Some(2)));
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["parts"][0], serde_json::json!({"type": "text", "text": "ok"}));
        assert_eq!(value["parts"][1]["type"], "finish");
        assert_eq!(value["parts"][1]["reason"], "stop");
        assert_eq!(value["parts"][1]["usage"]["total_tokens"], 3);
    }
}
