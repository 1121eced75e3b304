use std::sync::Arc;

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tracing::Instrument;
use uuid::Uuid;

use crate::client::EmployeeApi;
use crate::server::{employees, health};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
pub struct AppState {
    pub employees: Arc<dyn EmployeeApi>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route(
            "/api/employees",
            get(employees::get)
                .post(employees::create)
                .put(employees::update)
                .delete(employees::delete),
        )
        .route("/api/employees/debug", get(employees::debug))
        .layer(middleware::from_fn(request_span))
        .with_state(state)
}

/// Runs each request inside a span tagged with a fresh request id, echoed
/// back as `x-request-id`.
async fn request_span(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    );

    let mut response = next.run(request).instrument(span.clone()).await;
    span.in_scope(|| {
        tracing::info!(status = response.status().as_u16(), "Request completed");
    });
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::StatusCode;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::client::{ClientError, UpstreamProbe};
    use crate::resource::{PersonPage, PersonProfile, PersonRecord};

    /// Directory that is always empty and refuses single-record calls.
    struct EmptyDirectory;

    fn unavailable() -> ClientError {
        ClientError::Fetch {
            status: 503,
            message: "Directory unavailable".to_string(),
        }
    }

    #[async_trait]
    impl EmployeeApi for EmptyDirectory {
        async fn list(&self, _skip: usize, _limit: usize) -> Result<PersonPage, ClientError> {
            Ok(PersonPage {
                employees: Vec::new(),
                total: 0,
            })
        }

        async fn get(&self, _id: &str) -> Result<PersonRecord, ClientError> {
            Err(unavailable())
        }

        async fn create(&self, _profile: &PersonProfile) -> Result<PersonRecord, ClientError> {
            Err(unavailable())
        }

        async fn update(&self, _record: &PersonRecord) -> Result<serde_json::Value, ClientError> {
            Err(unavailable())
        }

        async fn delete(&self, _id: &str) -> Result<(), ClientError> {
            Err(unavailable())
        }

        async fn probe(&self) -> Result<UpstreamProbe, ClientError> {
            Err(unavailable())
        }
    }

    fn router() -> Router {
        build_router(AppState {
            employees: Arc::new(EmptyDirectory),
        })
    }

    async fn call(uri: &str) -> (StatusCode, Option<String>, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = router().oneshot(request).await.unwrap();
        let status = response.status();
        let request_id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, request_id, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn list_returns_empty_page() {
        let (status, request_id, body) = call("/api/employees").await;
        assert_eq!(status, StatusCode::OK);
        assert!(request_id.is_some());
        assert_eq!(body, serde_json::json!({"employees": [], "total": 0}));
    }

    #[tokio::test]
    async fn upstream_failure_keeps_its_status() {
        let (status, _, body) = call("/api/employees?id=1").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "Directory unavailable");
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let request = Request::builder().uri("/nope").body(Body::empty()).unwrap();
        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }
}
