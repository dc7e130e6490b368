//! API route handlers.

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use beacon_core::Acknowledgement;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, TEXT_PLAIN_UTF8};
use crate::state::AppState;

type Result<T> = std::result::Result<T, ApiError>;

/// Body of `GET /status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Most recently reported address
    pub ip: String,
    /// When the address was accepted
    pub updated_at: DateTime<Utc>,
}

/// POST /update
///
/// The body is taken raw so that unparseable JSON is answered with 401
/// like a wrong key, not with the extractor's own rejection. A body that
/// is not declared as JSON counts as unparseable.
pub async fn update(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Acknowledgement>> {
    if !is_json_content_type(&headers) {
        return Err(ApiError::unauthorized());
    }

    let ack = state.registry.report_body(&body).await?;
    Ok(Json(ack))
}

/// `application/json` or any `+json` suffix, parameters ignored
fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };

    let essence = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.split_once('/') {
        Some((_, "json")) => essence == "application/json",
        Some((kind, subtype)) => !kind.is_empty() && subtype.ends_with("+json"),
        None => false,
    }
}

/// GET /
pub async fn current_ip(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse> {
    let stored = state.registry.fetch().await?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, TEXT_PLAIN_UTF8)],
        stored.ip,
    ))
}

/// GET /status
pub async fn status(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>> {
    let stored = state.registry.fetch().await?;
    Ok(Json(StatusResponse {
        ip: stored.ip,
        updated_at: stored.updated_at,
    }))
}

/// GET /health
pub async fn health_check() -> &'static str {
    "ok"
}

/// Anything not routed
pub async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn with_content_type(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_json_content_types() {
        for value in [
            "application/json",
            "application/json; charset=utf-8",
            "Application/JSON",
            "application/merge-patch+json",
            "application/vnd.beacon+json; charset=utf-8",
        ] {
            assert!(is_json_content_type(&with_content_type(value)), "{value}");
        }
    }

    #[test]
    fn test_non_json_content_types() {
        assert!(!is_json_content_type(&HeaderMap::new()));

        for value in [
            "text/plain",
            "text/json",
            "application/x-www-form-urlencoded",
            "multipart/form-data; boundary=x",
            "application/jsonx",
            "json",
            "",
        ] {
            assert!(!is_json_content_type(&with_content_type(value)), "{value}");
        }
    }
}
