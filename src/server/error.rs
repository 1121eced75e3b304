//! Error types and response mapping for the HTTP surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::client::ClientError;
use crate::resource::ValidationError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body was not JSON.
    #[error("Invalid JSON")]
    Parse,

    /// Request body was JSON but not a valid employee.
    #[error("Invalid employee data")]
    Validation(ValidationError),

    #[error("id required")]
    MissingId,

    #[error("Invalid value for '{name}': {value}")]
    InvalidQuery { name: &'static str, value: String },

    /// Upstream call failed. `context` is used when the failure carries no
    /// message of its own.
    #[error("{}", upstream_message(.source, .context))]
    Upstream {
        context: &'static str,
        #[source]
        source: ClientError,
    },
}

fn upstream_message(source: &ClientError, context: &str) -> String {
    let message = source.to_string();
    if message.is_empty() {
        context.to_string()
    } else {
        message
    }
}

impl ApiError {
    pub fn upstream(context: &'static str) -> impl FnOnce(ClientError) -> Self {
        move |source| ApiError::Upstream { context, source }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Parse
            | ApiError::Validation(_)
            | ApiError::MissingId
            | ApiError::InvalidQuery { .. } => StatusCode::BAD_REQUEST,
            ApiError::Upstream { source, .. } => source
                .upstream_status()
                .and_then(|status| StatusCode::from_u16(status).ok())
                .filter(|status| status.is_client_error() || status.is_server_error())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = match &self {
            ApiError::Validation(details) => json!({
                "error": self.to_string(),
                "details": details,
            }),
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}
