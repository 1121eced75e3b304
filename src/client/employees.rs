use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::Serialize;
use serde_json::{json, Value};

use crate::client::error::ClientError;
use crate::client::http::{build_http_client, parse_base, read_json, send};
use crate::client::EmployeeApi;
use crate::config::{Config, EmployeeApiConfig};
use crate::resource::{dedupe_by_id, PersonPage, PersonProfile, PersonRecord};

/// Keys under which the directory may wrap its collection.
const COLLECTION_KEYS: [&str; 4] = ["data", "employees", "items", "result"];
const PROBE_SNIPPET_CHARS: usize = 500;

/// Raw view of the upstream collection response, for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamProbe {
    pub status: u16,
    pub ok: bool,
    pub status_text: String,
    pub headers: BTreeMap<String, String>,
    pub raw: Value,
    pub keys: Vec<String>,
}

/// Client for the internal employee directory.
///
/// Every call carries the tenant headers from `[employees]`.
#[derive(Clone)]
pub struct EmployeeClient {
    http: Client,
    base_url: Url,
    headers: HeaderMap,
}

impl EmployeeClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let http = build_http_client(&config.defaults)?;
        Self::with_client(http, &config.employees)
    }

    pub fn with_client(http: Client, api: &EmployeeApiConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        for (name, value) in [
            (ACCEPT_LANGUAGE, &api.accept_language),
            (HeaderName::from_static("x-tenant-name"), &api.tenant),
            (HeaderName::from_static("x-environment"), &api.environment),
            (HeaderName::from_static("x-time-zone"), &api.time_zone),
        ] {
            let value = HeaderValue::from_str(value).map_err(|e| ClientError::InvalidHeader {
                name: name.to_string(),
                message: e.to_string(),
            })?;
            headers.insert(name, value);
        }

        Ok(Self {
            http,
            base_url: parse_base(&api.base_url)?,
            headers,
        })
    }

    fn request(&self, method: Method, url: &Url) -> RequestBuilder {
        self.http
            .request(method, url.clone())
            .headers(self.headers.clone())
    }

    fn url_with_id(&self, id: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut().append_pair("id", id);
        url
    }

    async fn fetch_collection(&self) -> Result<Vec<Value>, ClientError> {
        let url = &self.base_url;
        let response = send(self.request(Method::GET, url), url).await?;
        let value = read_json(response, url, "Failed to fetch employees").await?;
        unwrap_collection(value, url)
    }
}

#[async_trait]
impl EmployeeApi for EmployeeClient {
    async fn list(&self, skip: usize, limit: usize) -> Result<PersonPage, ClientError> {
        // The directory has no paging parameters; slice locally.
        let records = ingest_records(self.fetch_collection().await?);
        let total = records.len();
        let employees = records.into_iter().skip(skip).take(limit).collect();
        Ok(PersonPage { employees, total })
    }

    async fn get(&self, id: &str) -> Result<PersonRecord, ClientError> {
        let url = self.url_with_id(id);
        let response = send(self.request(Method::GET, &url), &url).await?;
        let value = read_json(response, &url, "Failed to fetch employee").await?;
        let value = unwrap_record(value);
        if value.is_null() {
            return Err(ClientError::not_found("Employee"));
        }
        Ok(PersonRecord::validate(&value)?)
    }

    async fn create(&self, profile: &PersonProfile) -> Result<PersonRecord, ClientError> {
        let url = &self.base_url;
        let response = send(self.request(Method::POST, url).json(profile), url).await?;
        let value = read_json(response, url, "Failed to create employee").await?;
        let record = PersonRecord::validate(&unwrap_record(value))?;
        tracing::info!(id = %record.id, "Created employee");
        Ok(record)
    }

    async fn update(&self, record: &PersonRecord) -> Result<Value, ClientError> {
        let url = &self.base_url;
        let response = send(self.request(Method::PUT, url).json(record), url).await?;
        let value = read_json(response, url, "Failed to update employee").await?;
        tracing::info!(id = %record.id, "Updated employee");
        Ok(value)
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        let url = self.url_with_id(id);
        let response = send(self.request(Method::DELETE, &url), &url).await?;
        read_json(response, &url, "Failed to delete employee").await?;
        tracing::info!(id, "Deleted employee");
        Ok(())
    }

    async fn probe(&self) -> Result<UpstreamProbe, ClientError> {
        let url = &self.base_url;
        let response = send(self.request(Method::GET, url), url).await?;
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();
        let text = response
            .text()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.to_string(),
                source,
            })?;

        let raw = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or_else(|_| {
                json!({
                    "_raw": text.chars().take(PROBE_SNIPPET_CHARS).collect::<String>(),
                    "_note": "Response was not JSON",
                })
            })
        };
        let keys = match &raw {
            Value::Object(map) => map.keys().cloned().collect(),
            _ => Vec::new(),
        };

        Ok(UpstreamProbe {
            status: status.as_u16(),
            ok: status.is_success(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            headers,
            raw,
            keys,
        })
    }
}

/// Validates raw directory entries into a working set.
///
/// Invalid entries and repeated identifiers are dropped and logged; they
/// never fail the listing.
pub fn ingest_records(raw: Vec<Value>) -> Vec<PersonRecord> {
    let received = raw.len();
    let valid: Vec<PersonRecord> = raw
        .into_iter()
        .filter_map(|value| match PersonRecord::validate(&value) {
            Ok(record) => Some(record),
            Err(err) => {
                let id = value.get("id").map(Value::to_string).unwrap_or_default();
                tracing::warn!(id = %id, errors = %err, "Dropped invalid employee record");
                None
            }
        })
        .collect();

    let (records, duplicates) = dedupe_by_id(valid);
    if !duplicates.is_empty() {
        tracing::warn!(?duplicates, "Dropped duplicate employee ids");
    }
    tracing::debug!(received, kept = records.len(), "Ingested employee records");
    records
}

fn unwrap_collection(value: Value, url: &Url) -> Result<Vec<Value>, ClientError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => COLLECTION_KEYS
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .ok_or_else(|| ClientError::UnexpectedShape {
                url: url.to_string(),
                message: format!(
                    "no employee array under any of {:?}; keys: {:?}",
                    COLLECTION_KEYS,
                    map.keys().collect::<Vec<_>>()
                ),
            }),
        other => Err(ClientError::UnexpectedShape {
            url: url.to_string(),
            message: format!("expected array or object, got {}", other),
        }),
    }
}

/// A single record may arrive bare or wrapped under `data`.
fn unwrap_record(value: Value) -> Value {
    match value {
        Value::Object(mut map) if !map.contains_key("id") && map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}
