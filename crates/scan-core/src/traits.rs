use async_trait::async_trait;

use crate::{FetchError, Provider, RawFields, Symbol};

/// Capability shared by every data source: fetch one symbol's provider-native fields.
///
/// Implementations make one or more external calls per invocation and never
/// retry; failover is the router's job.
#[async_trait]
pub trait QuoteAdapter: Send + Sync {
    fn provider(&self) -> Provider;

    async fn fetch(&self, symbol: &Symbol, credential: Option<&str>) -> Result<RawFields, FetchError>;
}
