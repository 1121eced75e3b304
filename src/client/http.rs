//! Plumbing shared by the catalog and employee clients.

use reqwest::{Client, RequestBuilder, Response, Url};
use serde_json::Value;

use crate::client::error::ClientError;
use crate::config::Defaults;

pub(crate) fn build_http_client(defaults: &Defaults) -> Result<Client, ClientError> {
    let mut builder = Client::builder().connect_timeout(defaults.connect_timeout());
    if let Some(timeout) = defaults.request_timeout() {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(ClientError::Build)
}

pub(crate) fn parse_base(url: &str) -> Result<Url, ClientError> {
    Url::parse(url).map_err(|e| ClientError::InvalidUrl {
        url: url.to_string(),
        message: e.to_string(),
    })
}

/// Appends path segments to `base`, tolerating a trailing slash.
pub(crate) fn join(base: &Url, segments: &[&str]) -> Result<Url, ClientError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ClientError::InvalidUrl {
            url: base.to_string(),
            message: "cannot be a base".to_string(),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

pub(crate) async fn send(builder: RequestBuilder, url: &Url) -> Result<Response, ClientError> {
    builder.send().await.map_err(|source| ClientError::Transport {
        url: url.to_string(),
        source,
    })
}

/// Reads a JSON body, turning non-2xx statuses into [`ClientError::Fetch`].
///
/// An empty 2xx body reads as `null`.
pub(crate) async fn read_json(
    response: Response,
    url: &Url,
    failure: &str,
) -> Result<Value, ClientError> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|source| ClientError::Transport {
            url: url.to_string(),
            source,
        })?;

    if !status.is_success() {
        return Err(ClientError::Fetch {
            status: status.as_u16(),
            message: failure_message(failure, &body),
        });
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    serde_json::from_slice(&body).map_err(|source| ClientError::Decode {
        url: url.to_string(),
        source,
    })
}

/// Upstream errors carry at most a message; append it when there is one.
fn failure_message(failure: &str, body: &[u8]) -> String {
    let detail = serde_json::from_slice::<Value>(body).ok().and_then(|v| {
        ["message", "error"]
            .iter()
            .find_map(|key| v.get(*key).and_then(Value::as_str).map(str::to_string))
    });
    match detail {
        Some(detail) if !detail.trim().is_empty() => format!("{}: {}", failure, detail),
        _ => failure.to_string(),
    }
}
