//! In-process stand-in for the Azure chat completions API.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tokio::sync::Mutex;

use crate::config::Settings;

#[derive(Clone)]
pub enum MockReply {
    Json(Value),
    Status(StatusCode),
}

impl MockReply {
    pub fn content(text: &str) -> Self {
        MockReply::Json(json!({
            "id": "chatcmpl-mock",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": text},
                "finish_reason": "stop"
            }]
        }))
    }

    pub fn json(value: Value) -> Self {
        MockReply::Json(value)
    }

    pub fn status(status: StatusCode) -> Self {
        MockReply::Status(status)
    }
}

#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub path: String,
    pub api_version: Option<String>,
    pub api_key: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct MockState {
    reply: MockReply,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

pub struct MockAzure {
    addr: SocketAddr,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl MockAzure {
    pub async fn start(reply: MockReply) -> Self {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            reply,
            seen: seen.clone(),
        };
        let app = Router::new().fallback(record).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock upstream");
        let addr = listener.local_addr().expect("mock upstream address");
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("mock upstream error: {}", e);
            }
        });

        Self { addr, seen }
    }

    pub fn endpoint(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().await.clone()
    }
}

async fn record(
    State(state): State<MockState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let api_version = uri.query().and_then(|q| {
        q.split('&')
            .find_map(|kv| kv.strip_prefix("api-version="))
            .map(String::from)
    });
    let api_key = headers
        .get("api-key")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);

    state.seen.lock().await.push(SeenRequest {
        path: uri.path().to_string(),
        api_version,
        api_key,
        body,
    });

    match state.reply {
        MockReply::Json(value) => Json(value).into_response(),
        MockReply::Status(status) => {
            (status, Json(json!({"error": {"message": "mock failure"}}))).into_response()
        }
    }
}

pub fn settings_for(mock: &MockAzure) -> Settings {
    Settings {
        api_key: "test-key".to_string(),
        deployment: "gpt-4o".to_string(),
        endpoint: Some(mock.endpoint()),
        host: "127.0.0.1".to_string(),
        port: 0,
    }
}
