//! Priority-ordered provider failover for a single symbol.

use scan_core::{
    normalize, ConfigError, Credentials, FailureRecord, Provider, QuoteAdapter, RouterOutcome,
    Symbol,
};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Configuration for the source router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Minimum gap between two provider calls for the same symbol
    pub adapter_delay: Duration,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            adapter_delay: Duration::from_millis(500),
        }
    }
}

/// Tries adapters in a fixed priority order until one succeeds.
///
/// The order is set once at construction. Only the first success is used;
/// later providers are never consulted for a symbol that already resolved.
pub struct SourceRouter<A> {
    adapters: Vec<A>,
    credentials: Credentials,
    config: RouterConfig,
}

impl<A: QuoteAdapter> SourceRouter<A> {
    pub fn new(adapters: Vec<A>, credentials: Credentials) -> Result<Self, ConfigError> {
        Self::with_config(adapters, credentials, RouterConfig::default())
    }

    pub fn with_config(
        adapters: Vec<A>,
        credentials: Credentials,
        config: RouterConfig,
    ) -> Result<Self, ConfigError> {
        if adapters.is_empty() {
            return Err(ConfigError::NoProviders);
        }

        Ok(Self {
            adapters,
            credentials,
            config,
        })
    }

    /// Providers in priority order.
    pub fn providers(&self) -> Vec<Provider> {
        self.adapters.iter().map(|a| a.provider()).collect()
    }

    /// Resolve one symbol. Never fails: exhaustion is reported in the outcome.
    pub async fn resolve(&self, symbol: &Symbol) -> RouterOutcome {
        let mut failures = Vec::new();
        let mut pending_gap = false;

        for adapter in &self.adapters {
            let provider = adapter.provider();

            if pending_gap && !self.config.adapter_delay.is_zero() {
                tokio::time::sleep(self.config.adapter_delay).await;
            }

            debug!(%symbol, provider = provider.as_str(), "Trying provider");
            let credential = self.credentials.get(provider);

            match adapter.fetch(symbol, credential).await {
                Ok(raw) => {
                    let quote = normalize(symbol, &raw, provider);
                    info!(
                        %symbol,
                        provider = provider.as_str(),
                        fallbacks = failures.len(),
                        "Resolved quote"
                    );
                    return RouterOutcome::Resolved { quote, failures };
                }
                Err(error) => {
                    warn!(%symbol, provider = provider.as_str(), %error, "Provider failed");
                    // Skipped providers made no call, so no gap is owed for them
                    pending_gap = error.reached_network();
                    failures.push(FailureRecord::new(provider, error));
                }
            }
        }

        warn!(%symbol, attempts = failures.len(), "All sources failed");
        RouterOutcome::AllSourcesFailed {
            symbol: symbol.clone(),
            failures,
        }
    }
}
