//! Shared test utilities: a local stand-in for the Responses API
#![allow(dead_code)]

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use rag_search::{ApiKey, HttpTransport, QueryClient};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

pub const VECTOR_STORE: &str = "vs_integration";
pub const API_KEY: &str = "sk-integration-test";

/// How the fake provider answers every request.
#[derive(Clone)]
pub enum Behavior {
    Reply(StatusCode, String),
    Delay(Duration),
}

#[derive(Clone)]
pub struct MockProvider {
    behavior: Behavior,
    calls: Arc<AtomicUsize>,
    last_auth: Arc<Mutex<Option<String>>>,
    last_body: Arc<Mutex<Option<Value>>>,
}

impl MockProvider {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_auth(&self) -> Option<String> {
        self.last_auth.lock().unwrap().clone()
    }

    pub fn last_body(&self) -> Option<Value> {
        self.last_body.lock().unwrap().clone()
    }
}

async fn responses(
    State(provider): State<MockProvider>,
    headers: HeaderMap,
    body: String,
) -> Response {
    provider.calls.fetch_add(1, Ordering::SeqCst);
    *provider.last_auth.lock().unwrap() = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *provider.last_body.lock().unwrap() = serde_json::from_str(&body).ok();

    match provider.behavior {
        Behavior::Reply(status, body) => (
            status,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Behavior::Delay(delay) => {
            tokio::time::sleep(delay).await;
            (StatusCode::OK, cited_answer(&["late.pdf"]).to_string()).into_response()
        }
    }
}

/// Serves `POST /v1/responses` on an ephemeral port and returns its base url.
pub async fn spawn_provider(behavior: Behavior) -> (String, MockProvider) {
    let provider = MockProvider {
        behavior,
        calls: Arc::new(AtomicUsize::new(0)),
        last_auth: Arc::new(Mutex::new(None)),
        last_body: Arc::new(Mutex::new(None)),
    };

    let app = Router::new()
        .route("/v1/responses", post(responses))
        .with_state(provider.clone());

    let base_url = serve(app).await;
    (format!("{}/v1", base_url), provider)
}

/// Binds an ephemeral port and serves `app` in the background.
pub async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

pub fn client_for(base_url: &str, timeout: Duration) -> QueryClient {
    let transport = HttpTransport::new(base_url, ApiKey::new(API_KEY), timeout).unwrap();
    QueryClient::new(Arc::new(transport), VECTOR_STORE)
}

pub fn ok(body: Value) -> Behavior {
    Behavior::Reply(StatusCode::OK, body.to_string())
}

/// A completed response citing `files` in order, with one raw result per file.
pub fn cited_answer(files: &[&str]) -> Value {
    let answer = "Deep research is an agent that finds, analyzes and synthesizes sources.";
    let annotations: Vec<Value> = files
        .iter()
        .enumerate()
        .map(|(i, file)| {
            json!({
                "type": "file_citation",
                "index": 20 + i * 10,
                "file_id": format!("file-{}", i),
                "filename": file
            })
        })
        .collect();
    let results: Vec<Value> = files
        .iter()
        .enumerate()
        .map(|(i, file)| {
            json!({
                "file_id": format!("file-{}", i),
                "filename": file,
                "score": 0.9 - i as f64 * 0.1,
                "text": format!("Passage from {}", file)
            })
        })
        .collect();

    json!({
        "id": "resp_test",
        "object": "response",
        "status": "completed",
        "error": null,
        "output": [
            {
                "type": "file_search_call",
                "id": "fs_test",
                "status": "completed",
                "queries": ["deep research"],
                "results": results
            },
            {
                "type": "message",
                "id": "msg_test",
                "role": "assistant",
                "status": "completed",
                "content": [{"type": "output_text", "text": answer, "annotations": annotations}]
            }
        ]
    })
}

pub fn error_body(message: &str, code: &str) -> String {
    json!({"error": {"message": message, "type": "invalid_request_error", "code": code}}).to_string()
}
