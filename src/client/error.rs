//! Errors raised while talking to the upstream APIs.

use thiserror::Error;

use crate::resource::ValidationError;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Upstream answered with a non-2xx status.
    #[error("{message}")]
    Fetch { status: u16, message: String },

    /// Upstream payload failed the record schema.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Request never produced a response.
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Response body was not the JSON we expected.
    #[error("Malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Response was JSON but not shaped like a record or collection.
    #[error("Unexpected response from {url}: {message}")]
    UnexpectedShape { url: String, message: String },

    #[error("Invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Invalid value for header '{name}': {message}")]
    InvalidHeader { name: String, message: String },

    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

impl ClientError {
    /// Upstream status, for non-2xx responses only.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            ClientError::Fetch { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn not_found(what: &str) -> Self {
        ClientError::Fetch {
            status: 404,
            message: format!("{} not found", what),
        }
    }
}
