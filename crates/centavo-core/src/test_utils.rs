//! Test utilities for centavo-core
//!
//! Provides a mock LLM server speaking the three HTTP dialects the backends
//! use (Gemini `generateContent`, OpenAI chat completions and Ollama
//! `/api/generate`), so backends and the CLI can be tested without network.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

/// Text returned by `MockLlmServer::start`
pub const DEFAULT_REPLY: &str = "## Resumo\n\nContinue acompanhando seus gastos.";

/// How the mock server answers generation requests
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Successful completion with this text
    Text(String),
    /// Fail with this HTTP status
    Status(u16),
    /// 200 with a body that is not valid JSON
    Malformed,
}

#[derive(Default)]
struct Recorded {
    last_prompt: Option<String>,
    last_api_key: Option<String>,
}

#[derive(Clone)]
struct ServerState {
    reply: MockReply,
    requests: Arc<AtomicUsize>,
    recorded: Arc<Mutex<Recorded>>,
}

impl ServerState {
    fn record(&self, headers: &HeaderMap, prompt: Option<String>) {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut recorded) = self.recorded.lock() {
            recorded.last_prompt = prompt;
            recorded.last_api_key = api_key_from(headers);
        }
    }

    /// Turn the configured reply into a response, using `body` for text
    fn respond(&self, body: impl FnOnce(&str) -> Value) -> Response {
        match &self.reply {
            MockReply::Text(text) => Json(body(text)).into_response(),
            MockReply::Status(code) => {
                let status = StatusCode::from_u16(*code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (status, "mock failure").into_response()
            }
            MockReply::Malformed => (StatusCode::OK, "{not json").into_response(),
        }
    }
}

fn api_key_from(headers: &HeaderMap) -> Option<String> {
    if let Some(key) = headers.get("x-goog-api-key") {
        return key.to_str().ok().map(String::from);
    }
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(String::from)
}

/// Mock LLM server for tests
pub struct MockLlmServer {
    addr: SocketAddr,
    state: ServerState,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockLlmServer {
    /// Start a server that answers every prompt with `DEFAULT_REPLY`
    pub async fn start() -> Self {
        Self::start_with(MockReply::Text(DEFAULT_REPLY.to_string())).await
    }

    /// Start the mock server on an available port
    pub async fn start_with(reply: MockReply) -> Self {
        let state = ServerState {
            reply,
            requests: Arc::new(AtomicUsize::new(0)),
            recorded: Arc::new(Mutex::new(Recorded::default())),
        };

        let app = Router::new()
            .route(
                "/v1beta/models/:call",
                get(handle_gemini_model).post(handle_gemini_generate),
            )
            .route("/v1/chat/completions", post(handle_chat_completions))
            .route("/v1/models", get(handle_list_models))
            .route("/api/generate", post(handle_ollama_generate))
            .route("/api/tags", get(handle_ollama_tags))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of generation requests served (health checks excluded)
    pub fn request_count(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }

    /// Prompt of the most recent generation request
    pub fn last_prompt(&self) -> Option<String> {
        self.state
            .recorded
            .lock()
            .ok()
            .and_then(|r| r.last_prompt.clone())
    }

    /// API key sent with the most recent generation request
    pub fn last_api_key(&self) -> Option<String> {
        self.state
            .recorded
            .lock()
            .ok()
            .and_then(|r| r.last_api_key.clone())
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockLlmServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Gemini model lookup (health check)
async fn handle_gemini_model(axum::extract::Path(model): axum::extract::Path<String>) -> Json<Value> {
    Json(json!({ "name": format!("models/{}", model) }))
}

/// Gemini generateContent
async fn handle_gemini_generate(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(request): Json<Value>,
) -> Response {
    let prompt = request["contents"][0]["parts"][0]["text"]
        .as_str()
        .map(String::from);
    state.record(&headers, prompt);
    state.respond(|text| {
        json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }]
        })
    })
}

/// OpenAI chat completions
async fn handle_chat_completions(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(request): Json<Value>,
) -> Response {
    let prompt = request["messages"]
        .as_array()
        .and_then(|messages| messages.last())
        .and_then(|m| m["content"].as_str())
        .map(String::from);
    state.record(&headers, prompt);
    state.respond(|text| {
        json!({
            "id": "chatcmpl-mock",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": text },
                "finish_reason": "stop"
            }]
        })
    })
}

/// OpenAI model listing (health check)
async fn handle_list_models() -> Json<Value> {
    Json(json!({ "object": "list", "data": [{ "id": "gpt-4o-mini", "object": "model" }] }))
}

/// Ollama generate endpoint
async fn handle_ollama_generate(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(request): Json<Value>,
) -> Response {
    let prompt = request["prompt"].as_str().map(String::from);
    let model = request["model"].as_str().unwrap_or("llama3.2").to_string();
    state.record(&headers, prompt);
    state.respond(|text| json!({ "model": model, "response": text, "done": true }))
}

/// Ollama tags endpoint (health check)
async fn handle_ollama_tags() -> Json<Value> {
    Json(json!({
        "models": [{
            "name": "llama3.2:latest",
            "modified_at": "2024-01-01T00:00:00Z",
            "size": 4_000_000_000u64
        }]
    }))
}
