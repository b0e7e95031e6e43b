use reqwest::Client;
use scan_core::{FetchError, RawFields};
use serde_json::{Map, Value};

use crate::http::{get_json, is_blank};

const BASE_URL: &str = "https://finnhub.io/api/v1";

#[derive(Clone)]
pub struct FinnhubClient {
    client: Client,
    base_url: String,
}

impl FinnhubClient {
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

    /// Company profile, then the latest quote. Finnhub has no price targets.
    pub async fn fetch_profile_and_quote(
        &self,
        symbol: &str,
        token: &str,
    ) -> Result<RawFields, FetchError> {
        let profile_url = format!("{}/stock/profile2", self.base_url);
        let profile = get_json(&self.client, &profile_url, &[("symbol", symbol), ("token", token)]).await?;
        let mut fields = parse_profile(profile)?;

        let quote_url = format!("{}/quote", self.base_url);
        let quote = get_json(&self.client, &quote_url, &[("symbol", symbol), ("token", token)]).await?;
        fields.merge(parse_quote(quote)?);

        Ok(fields)
    }
}

fn check_error(json: &Value) -> Result<(), FetchError> {
    match json.get("error").and_then(|v| v.as_str()) {
        Some(msg) if msg.to_lowercase().contains("limit") => {
            Err(FetchError::RateLimited(msg.to_string()))
        }
        Some(msg) => Err(FetchError::Transport(format!("Finnhub error: {}", msg))),
        None => Ok(()),
    }
}

pub fn parse_profile(json: Value) -> Result<RawFields, FetchError> {
    check_error(&json)?;

    match json {
        Value::Object(profile) if profile.get("name").is_some_and(|n| !is_blank(n)) => {
            Ok(RawFields::from(profile))
        }
        _ => Err(FetchError::EmptyPayload),
    }
}

/// Quote body (`c` = current price). Unknown symbols come back with `t == 0`.
pub fn parse_quote(json: Value) -> Result<Map<String, Value>, FetchError> {
    check_error(&json)?;

    match json {
        Value::Object(quote)
            if quote.contains_key("c") && quote.get("t").and_then(|t| t.as_i64()) != Some(0) =>
        {
            Ok(quote)
        }
        _ => Err(FetchError::EmptyPayload),
    }
}
