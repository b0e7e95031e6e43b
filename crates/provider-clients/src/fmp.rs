use reqwest::Client;
use scan_core::{FetchError, RawFields};
use serde_json::Value;

use crate::http::{get_json, is_blank};

const BASE_URL: &str = "https://financialmodelingprep.com/api/v3";

/// Financial Modeling Prep company profile client.
#[derive(Clone)]
pub struct FmpClient {
    client: Client,
    base_url: String,
}

impl FmpClient {
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

    /// Fetch the company profile, which carries price, valuation and rating.
    pub async fn fetch_profile(&self, symbol: &str, api_key: &str) -> Result<RawFields, FetchError> {
        let url = format!("{}/profile/{}", self.base_url, symbol);
        let json = get_json(&self.client, &url, &[("apikey", api_key)]).await?;
        parse_profile(json)
    }
}

/// Extract the first profile record from a `/profile/{symbol}` body.
pub fn parse_profile(json: Value) -> Result<RawFields, FetchError> {
    if let Some(message) = json.get("Error Message").and_then(|v| v.as_str()) {
        // Free plan quota exhaustion comes back as "Limit Reach ..."
        if message.to_lowercase().contains("limit") {
            return Err(FetchError::RateLimited(message.to_string()));
        }
        return Err(FetchError::Transport(format!("FMP error: {}", message)));
    }

    let item = match json {
        Value::Array(items) => items.into_iter().next(),
        other => Some(other),
    };

    match item {
        Some(Value::Object(profile))
            if profile.get("companyName").is_some_and(|name| !is_blank(name)) =>
        {
            Ok(RawFields::from(profile))
        }
        _ => Err(FetchError::EmptyPayload),
    }
}
