//! Mock upstream server standing in for the catalog and employee APIs.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::{watch, Mutex};

/// What the mock saw, kept for assertions.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body is not JSON")
    }
}

/// A canned reply.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
    pub delay: Duration,
}

impl Default for MockResponse {
    fn default() -> Self {
        Self::json(r#"{"ok": true}"#)
    }
}

impl MockResponse {
    /// 200 with a raw JSON body. An empty string sends an empty body.
    pub fn json(body: &str) -> Self {
        Self {
            status: 200,
            content_type: "application/json",
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn value(body: &Value) -> Self {
        Self::json(&body.to_string())
    }

    /// Error status with a `{"message": ..}` body, the shape both upstreams use.
    pub fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            ..Self::value(&json!({ "message": message }))
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/html",
            ..Self::json(body)
        }
    }

    pub fn with_delay(mut self, ms: u64) -> Self {
        self.delay = Duration::from_millis(ms);
        self
    }
}

#[derive(Default)]
struct Recorded {
    requests: Vec<CapturedRequest>,
    queue: VecDeque<MockResponse>,
}

type Shared = Arc<Mutex<Recorded>>;

/// Upstream stub on an ephemeral port.
///
/// Replies are served in the order they were enqueued; with an empty queue
/// every request gets [`MockResponse::default`].
pub struct MockBackend {
    pub addr: SocketAddr,
    recorded: Shared,
    stop: watch::Sender<bool>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let recorded = Shared::default();
        let app = Router::new()
            .route("/", any(reply))
            .route("/{*path}", any(reply))
            .with_state(recorded.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let addr = listener.local_addr().unwrap();

        let (stop, mut stopped) = watch::channel(false);
        tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = stopped.changed().await;
                })
                .await;
        });

        Self {
            addr,
            recorded,
            stop,
        }
    }

    pub async fn enqueue_response(&self, response: MockResponse) {
        self.recorded.lock().await.queue.push_back(response);
    }

    pub async fn captured_requests(&self) -> Vec<CapturedRequest> {
        self.recorded.lock().await.requests.clone()
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Base URL with a path suffix, e.g. `/api/talento/employee`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// Forgets captured requests and any replies still queued.
    pub async fn clear(&self) {
        let mut recorded = self.recorded.lock().await;
        recorded.requests.clear();
        recorded.queue.clear();
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        let _ = self.stop.send(true);
    }
}

async fn reply(
    State(recorded): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let response = {
        let mut recorded = recorded.lock().await;
        recorded.requests.push(CapturedRequest {
            method: method.to_string(),
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_string()))
                .collect(),
            body: body.to_vec(),
        });
        recorded.queue.pop_front().unwrap_or_default()
    };

    if !response.delay.is_zero() {
        tokio::time::sleep(response.delay).await;
    }

    let status = StatusCode::from_u16(response.status).unwrap();
    (
        status,
        [("content-type", response.content_type)],
        Body::from(response.body),
    )
        .into_response()
}
