use async_trait::async_trait;
use reqwest::Client;
use scan_core::{FetchError, Provider, QuoteAdapter, RawFields, Symbol};
use std::time::Duration;

use crate::http::{build_client, require_credential};
use crate::{AlphaVantageClient, FinnhubClient, FmpClient, YahooFinanceClient};

/// One configured data source. Variants are plain provider clients; the
/// router only sees the `QuoteAdapter` capability.
#[derive(Clone)]
pub enum ProviderAdapter {
    Fmp(FmpClient),
    AlphaVantage(AlphaVantageClient),
    Finnhub(FinnhubClient),
    Yahoo(YahooFinanceClient),
}

impl ProviderAdapter {
    pub fn new(provider: Provider, client: Client) -> Self {
        match provider {
            Provider::Fmp => ProviderAdapter::Fmp(FmpClient::new(client)),
            Provider::AlphaVantage => ProviderAdapter::AlphaVantage(AlphaVantageClient::new(client)),
            Provider::Finnhub => ProviderAdapter::Finnhub(FinnhubClient::new(client)),
            Provider::Yahoo => ProviderAdapter::Yahoo(YahooFinanceClient::new(client)),
        }
    }

    /// Adapters for `order`, sharing one HTTP client with the given timeout.
    pub fn for_providers(order: &[Provider], timeout: Duration) -> Result<Vec<Self>, reqwest::Error> {
        let client = build_client(timeout)?;
        Ok(order
            .iter()
            .map(|provider| Self::new(*provider, client.clone()))
            .collect())
    }
}

#[async_trait]
impl QuoteAdapter for ProviderAdapter {
    fn provider(&self) -> Provider {
        match self {
            ProviderAdapter::Fmp(_) => Provider::Fmp,
            ProviderAdapter::AlphaVantage(_) => Provider::AlphaVantage,
            ProviderAdapter::Finnhub(_) => Provider::Finnhub,
            ProviderAdapter::Yahoo(_) => Provider::Yahoo,
        }
    }

    async fn fetch(&self, symbol: &Symbol, credential: Option<&str>) -> Result<RawFields, FetchError> {
        let symbol = symbol.as_str();
        let result = match self {
            ProviderAdapter::Fmp(client) => {
                client.fetch_profile(symbol, require_credential(credential)?).await
            }
            ProviderAdapter::AlphaVantage(client) => {
                client
                    .fetch_overview_and_quote(symbol, require_credential(credential)?)
                    .await
            }
            ProviderAdapter::Finnhub(client) => {
                client
                    .fetch_profile_and_quote(symbol, require_credential(credential)?)
                    .await
            }
            ProviderAdapter::Yahoo(client) => client.fetch_quote(symbol).await,
        };

        if let Ok(fields) = &result {
            tracing::debug!(
                provider = self.provider().as_str(),
                symbol,
                fields = fields.len(),
                "Fetched provider fields"
            );
        }
        result
    }
}
