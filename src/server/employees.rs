//! `/api/employees` handlers, relaying to the employee directory.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::Json;
use serde_json::{json, Value};

use crate::client::UpstreamProbe;
use crate::resource::{PersonPage, PersonProfile, PersonRecord};
use crate::server::error::ApiError;
use crate::server::router::AppState;

const DEFAULT_SKIP: usize = 0;
const DEFAULT_LIMIT: usize = 10;

type Params = Query<HashMap<String, String>>;

/// `GET /api/employees` returns one record when `id` is given, otherwise a
/// `skip`/`limit` page.
pub async fn get(State(state): State<AppState>, Query(params): Params) -> Result<Json<Value>, ApiError> {
    if let Some(id) = non_empty(&params, "id") {
        let record = state
            .employees
            .get(id)
            .await
            .map_err(ApiError::upstream("Failed to fetch employee"))?;
        return Ok(Json(to_json(&record)));
    }

    let skip = parse_usize(&params, "skip", DEFAULT_SKIP)?;
    let limit = parse_usize(&params, "limit", DEFAULT_LIMIT)?;
    let page: PersonPage = state
        .employees
        .list(skip, limit)
        .await
        .map_err(ApiError::upstream("Failed to fetch employees"))?;
    Ok(Json(to_json(&page)))
}

pub async fn create(State(state): State<AppState>, body: Bytes) -> Result<Json<PersonRecord>, ApiError> {
    let value = parse_body(&body)?;
    let profile = PersonProfile::validate(&value).map_err(ApiError::Validation)?;
    let record = state
        .employees
        .create(&profile)
        .await
        .map_err(ApiError::upstream("Failed to create employee"))?;
    Ok(Json(record))
}

pub async fn update(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, ApiError> {
    let value = parse_body(&body)?;
    let record = PersonRecord::validate(&value).map_err(ApiError::Validation)?;
    let response = state
        .employees
        .update(&record)
        .await
        .map_err(ApiError::upstream("Failed to update employee"))?;
    Ok(Json(response))
}

pub async fn delete(State(state): State<AppState>, Query(params): Params) -> Result<Json<Value>, ApiError> {
    let id = non_empty(&params, "id").ok_or(ApiError::MissingId)?;
    state
        .employees
        .delete(id)
        .await
        .map_err(ApiError::upstream("Failed to delete employee"))?;
    Ok(Json(json!({ "success": true })))
}

/// `GET /api/employees/debug` exposes the raw upstream collection response.
pub async fn debug(State(state): State<AppState>) -> Result<Json<UpstreamProbe>, ApiError> {
    let probe = state
        .employees
        .probe()
        .await
        .map_err(ApiError::upstream("Debug fetch failed"))?;
    Ok(Json(probe))
}

fn parse_body(body: &[u8]) -> Result<Value, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "Rejected request body");
        ApiError::Parse
    })
}

fn non_empty<'a>(params: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    params.get(name).map(String::as_str).filter(|v| !v.is_empty())
}

fn parse_usize(params: &HashMap<String, String>, name: &'static str, default: usize) -> Result<usize, ApiError> {
    match non_empty(params, name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ApiError::InvalidQuery {
            name,
            value: raw.to_string(),
        }),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}
