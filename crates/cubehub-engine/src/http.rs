//! Blocking HTTP plumbing shared by the catalog, manifest and classifier clients

#![allow(clippy::result_large_err)]

use std::time::Duration;

use cubehub_core::errors::{ExError, ExErrorKind, Result};
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const CLIENT_USER_AGENT: &str = concat!("cubehub/", env!("CARGO_PKG_VERSION"));

/// Build a JSON client with the given timeout
pub fn build_client(timeout: Duration) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    Client::builder()
        .timeout(timeout)
        .default_headers(headers)
        .build()
        .map_err(|e| from_reqwest("build_http_client", e))
}

/// Classify a transport error: timeouts are `Timeout`, bad bodies are
/// `Serialization`, everything else is `ExternalService`
pub fn from_reqwest(op: &str, err: reqwest::Error) -> ExError {
    let kind = if err.is_timeout() {
        ExErrorKind::Timeout
    } else if err.is_decode() {
        ExErrorKind::Serialization
    } else {
        ExErrorKind::ExternalService
    };
    let mut ex = ExError::new(kind).with_op(op).with_message(err.to_string());
    if let Some(url) = err.url() {
        ex = ex.with_entity_id(url.as_str());
    }
    ex
}

/// Turn a non-success status into an `ExternalService` error carrying the body
pub fn ensure_success(op: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let url = response.url().to_string();
    let body = response.text().unwrap_or_default();
    tracing::warn!(op, %status, %url, "HTTP request failed");
    Err(ExError::new(ExErrorKind::ExternalService)
        .with_op(op)
        .with_entity_id(url)
        .with_message(format!("HTTP {}: {}", status, truncate(&body, 200))))
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Decode a JSON body, reporting failures as `Serialization`
pub fn decode_json<T: serde::de::DeserializeOwned>(op: &str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| {
        ExError::new(ExErrorKind::Serialization)
            .with_op(op)
            .with_message(e.to_string())
    })
}
