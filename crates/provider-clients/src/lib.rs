//! HTTP adapters for the supported market data providers.
//!
//! Each client turns one provider's responses into provider-native
//! `RawFields`; `ProviderAdapter` selects among them by `Provider`.

pub mod adapter;
pub mod alpha_vantage;
pub mod finnhub;
pub mod fmp;
pub mod http;
pub mod yahoo_finance;

pub use adapter::ProviderAdapter;
pub use alpha_vantage::AlphaVantageClient;
pub use finnhub::FinnhubClient;
pub use fmp::FmpClient;
pub use http::{build_client, DEFAULT_TIMEOUT};
pub use yahoo_finance::YahooFinanceClient;
