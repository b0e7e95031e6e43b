use reqwest::Client;
use scan_core::{FetchError, RawFields};
use serde_json::Value;

use crate::http::get_json;

const BASE_URL: &str = "https://query1.finance.yahoo.com/v7/finance";

/// Keyless Yahoo Finance quote client.
#[derive(Clone)]
pub struct YahooFinanceClient {
    client: Client,
    base_url: String,
}

impl YahooFinanceClient {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Get quote data for a symbol
    pub async fn fetch_quote(&self, symbol: &str) -> Result<RawFields, FetchError> {
        let url = format!("{}/quote", self.base_url);
        let json = get_json(&self.client, &url, &[("symbols", symbol)]).await?;
        parse_quote(json)
    }
}

pub fn parse_quote(json: Value) -> Result<RawFields, FetchError> {
    if let Some(description) = json
        .pointer("/finance/error/description")
        .and_then(|v| v.as_str())
    {
        return Err(FetchError::Transport(format!("Yahoo error: {}", description)));
    }

    let quote = json
        .get("quoteResponse")
        .and_then(|v| v.get("result"))
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .cloned();

    match quote {
        Some(Value::Object(fields)) if !fields.is_empty() => Ok(RawFields::from(fields)),
        _ => Err(FetchError::EmptyPayload),
    }
}
