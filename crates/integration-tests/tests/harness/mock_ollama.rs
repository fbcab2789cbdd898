//! Mock Ollama server for integration tests
//!
//! Serves `/api/chat` with scripted replies: one JSON object when the
//! request has `stream: false`, newline-delimited chunks otherwise

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use bytes::Bytes;
use futures::{StreamExt, stream};
use serde_json::{Map, Value, json};
use tokio_util::sync::CancellationToken;

/// Mock Ollama server returning scripted replies
pub struct MockOllama {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

/// Scripted behavior for a [`MockOllama`]
#[derive(Default)]
pub struct MockBuilder {
    chunks: Vec<String>,
    counts: Option<(u64, u64)>,
    failure: Option<(StatusCode, String)>,
    error_line: Option<String>,
    blank_lines: bool,
    hang: bool,
    without_message: bool,
}

struct MockState {
    script: MockBuilder,
    request_count: AtomicU32,
    requests: Mutex<Vec<Value>>,
    stream_closed: Arc<AtomicBool>,
}

impl MockBuilder {
    /// Text fragments; joined for non-streaming replies
    pub fn chunks<I, S>(mut self, chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chunks = chunks.into_iter().map(Into::into).collect();
        self
    }

    /// Report `prompt_eval_count` and `eval_count` on the final object
    pub const fn counts(mut self, prompt_eval_count: u64, eval_count: u64) -> Self {
        self.counts = Some((prompt_eval_count, eval_count));
        self
    }

    /// Answer every request with this status and body
    pub fn failure(mut self, status: StatusCode, body: &str) -> Self {
        self.failure = Some((status, body.to_owned()));
        self
    }

    /// Replace the final object with an `error` object
    pub fn error_line(mut self, error: &str) -> Self {
        self.error_line = Some(error.to_owned());
        self
    }

    /// Emit an empty line between streamed chunks
    pub const fn blank_lines(mut self) -> Self {
        self.blank_lines = true;
        self
    }

    /// Leave `message` out of the non-streaming reply
    pub const fn without_message(mut self) -> Self {
        self.without_message = true;
        self
    }

    /// Keep the stream open after the chunks instead of finishing
    pub const fn hang(mut self) -> Self {
        self.hang = true;
        self
    }

    /// Start the mock server, returning immediately
    pub async fn start(self) -> anyhow::Result<MockOllama> {
        let state = Arc::new(MockState {
            script: self,
            request_count: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
            stream_closed: Arc::new(AtomicBool::new(false)),
        });

        let app = Router::new()
            .route("/api/chat", routing::post(handle_chat))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(MockOllama { addr, shutdown, state })
    }
}

impl MockOllama {
    pub fn builder() -> MockBuilder {
        MockBuilder::default()
    }

    /// Start a server replying with `text` in a single chunk
    pub async fn start(text: &str) -> anyhow::Result<Self> {
        Self::builder().chunks([text]).start().await
    }

    /// Base URL for configuring the language model
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of chat requests received
    pub fn request_count(&self) -> u32 {
        self.state.request_count.load(Ordering::Relaxed)
    }

    /// Request bodies received, oldest first
    pub fn requests(&self) -> Vec<Value> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Whether a streamed body was dropped by the server
    pub fn stream_closed(&self) -> bool {
        self.state.stream_closed.load(Ordering::SeqCst)
    }
}

impl Drop for MockOllama {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Sets its flag when the response body is dropped
struct CloseFlag(Arc<AtomicBool>);

impl Drop for CloseFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

// -- Reply objects --

fn chunk_object(text: &str) -> Value {
    json!({
        "model": "qwen3:32b",
        "created_at": "2025-01-01T00:00:00Z",
        "message": {"role": "assistant", "content": text},
        "done": false
    })
}

fn final_object(text: &str, counts: Option<(u64, u64)>) -> Value {
    let mut object = Map::new();
    object.insert("model".to_owned(), json!("qwen3:32b"));
    object.insert("created_at".to_owned(), json!("2025-01-01T00:00:00Z"));
    object.insert("message".to_owned(), json!({"role": "assistant", "content": text}));
    object.insert("done".to_owned(), json!(true));
    object.insert("done_reason".to_owned(), json!("stop"));

    if let Some((prompt_eval_count, eval_count)) = counts {
        object.insert("prompt_eval_count".to_owned(), json!(prompt_eval_count));
        object.insert("eval_count".to_owned(), json!(eval_count));
    }

    Value::Object(object)
}

fn line(value: &Value) -> Result<Bytes, std::io::Error> {
    Ok(Bytes::from(format!("{value}\n")))
}

// -- Handlers --

async fn handle_chat(State(state): State<Arc<MockState>>, Json(req): Json<Value>) -> Response {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    state.requests.lock().unwrap().push(req.clone());

    let script = &state.script;

    if let Some((status, body)) = &script.failure {
        return (*status, body.clone()).into_response();
    }

    if req["stream"].as_bool().unwrap_or(true) {
        return build_streaming_response(&state);
    }

    let reply = match &script.error_line {
        Some(error) => json!({"error": error}),
        None if script.without_message => json!({"done": true, "prompt_eval_count": 3}),
        None => final_object(&script.chunks.concat(), script.counts),
    };

    Json(reply).into_response()
}

/// Build an NDJSON streaming response body
fn build_streaming_response(state: &MockState) -> Response {
    let script = &state.script;
    let mut lines = Vec::new();

    for text in &script.chunks {
        lines.push(line(&chunk_object(text)));
        if script.blank_lines {
            lines.push(Ok(Bytes::from_static(b"\n")));
        }
    }

    if let Some(error) = &script.error_line {
        lines.push(line(&json!({"error": error})));
    } else if !script.hang {
        lines.push(line(&final_object("", script.counts)));
    }

    let guard = CloseFlag(Arc::clone(&state.stream_closed));
    let scripted = stream::iter(lines);
    let body = if script.hang {
        Body::from_stream(scripted.chain(stream::pending()).map(move |l| {
            let _guard = &guard;
            l
        }))
    } else {
        Body::from_stream(scripted.map(move |l| {
            let _guard = &guard;
            l
        }))
    };

    ([(header::CONTENT_TYPE, "application/x-ndjson")], body).into_response()
}
