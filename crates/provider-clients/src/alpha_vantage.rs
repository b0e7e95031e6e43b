use reqwest::Client;
use scan_core::{FetchError, RawFields};
use serde_json::{Map, Value};

use crate::http::{get_json, is_blank};

const BASE_URL: &str = "https://www.alphavantage.co/query";

#[derive(Clone)]
pub struct AlphaVantageClient {
    client: Client,
    base_url: String,
}

impl AlphaVantageClient {
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

    /// Company overview followed by the global quote; both must succeed.
    pub async fn fetch_overview_and_quote(
        &self,
        symbol: &str,
        api_key: &str,
    ) -> Result<RawFields, FetchError> {
        let overview = self.query("OVERVIEW", symbol, api_key).await?;
        let mut fields = parse_overview(overview)?;

        let quote = self.query("GLOBAL_QUOTE", symbol, api_key).await?;
        fields.merge(parse_global_quote(quote)?);

        Ok(fields)
    }

    async fn query(&self, function: &str, symbol: &str, api_key: &str) -> Result<Value, FetchError> {
        let json = get_json(
            &self.client,
            &self.base_url,
            &[("function", function), ("symbol", symbol), ("apikey", api_key)],
        )
        .await?;

        check_api_message(&json)?;
        Ok(json)
    }
}

/// Alpha Vantage reports errors and throttling with HTTP 200 and a message body.
fn check_api_message(json: &Value) -> Result<(), FetchError> {
    if let Some(error) = json.get("Error Message") {
        return Err(FetchError::Transport(format!("Alpha Vantage error: {}", error)));
    }

    for key in ["Note", "Information"] {
        if let Some(note) = json.get(key).and_then(|v| v.as_str()) {
            return Err(FetchError::RateLimited(note.to_string()));
        }
    }

    Ok(())
}

pub fn parse_overview(json: Value) -> Result<RawFields, FetchError> {
    check_api_message(&json)?;

    match json {
        Value::Object(overview) if overview.get("Name").is_some_and(|n| !is_blank(n)) => {
            Ok(RawFields::from(overview))
        }
        _ => Err(FetchError::EmptyPayload),
    }
}

/// The `Global Quote` object; keys look like `"05. price"`.
pub fn parse_global_quote(json: Value) -> Result<Map<String, Value>, FetchError> {
    check_api_message(&json)?;

    match json.get("Global Quote") {
        Some(Value::Object(quote)) if !quote.is_empty() => Ok(quote.clone()),
        _ => Err(FetchError::EmptyPayload),
    }
}
