use reqwest::{Client, StatusCode};
use scan_core::FetchError;
use serde_json::Value;
use std::time::Duration;

/// Per-call timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Shared HTTP client. Every request is bounded by `timeout`.
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
}

/// GET `url` and decode the JSON body, classifying failures.
pub(crate) async fn get_json(
    client: &Client,
    url: &str,
    query: &[(&str, &str)],
) -> Result<Value, FetchError> {
    let response = client
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(transport)?;

    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(FetchError::RateLimited(format!("HTTP {}", status)));
    }
    if !status.is_success() {
        return Err(FetchError::Transport(format!("HTTP {}", status)));
    }

    response.json::<Value>().await.map_err(transport)
}

/// Convert a reqwest error, dropping the URL so API keys never reach logs.
pub(crate) fn transport(err: reqwest::Error) -> FetchError {
    let detail = if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_decode() {
        format!("invalid response body: {}", err.without_url())
    } else {
        err.without_url().to_string()
    };
    FetchError::Transport(detail)
}

pub(crate) fn require_credential(credential: Option<&str>) -> Result<&str, FetchError> {
    match credential {
        Some(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(FetchError::MissingCredential),
    }
}

/// True when a JSON value carries no data (`null`, `[]`, `{}`, `""`).
pub(crate) fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}
