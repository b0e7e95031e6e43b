use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{AllSourcesFailed, ConfigError, FetchError};

/// Ticker symbol, the unit of iteration for a scan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Symbol::new)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Market data providers known to the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Fmp,
    AlphaVantage,
    Finnhub,
    Yahoo,
}

impl Provider {
    /// Default priority order.
    pub const ALL: [Provider; 4] = [
        Provider::Fmp,
        Provider::AlphaVantage,
        Provider::Finnhub,
        Provider::Yahoo,
    ];

    /// Name used for credentials and configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Fmp => "fmp",
            Provider::AlphaVantage => "alphavantage",
            Provider::Finnhub => "finnhub",
            Provider::Yahoo => "yahoo",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::Fmp => "FMP",
            Provider::AlphaVantage => "AlphaVantage",
            Provider::Finnhub => "Finnhub",
            Provider::Yahoo => "Yahoo",
        }
    }

    pub fn requires_credential(&self) -> bool {
        !matches!(self, Provider::Yahoo)
    }

    /// Environment variable holding this provider's key, if it takes one.
    pub fn credential_env_var(&self) -> Option<&'static str> {
        match self {
            Provider::Fmp => Some("FMP_API_KEY"),
            Provider::AlphaVantage => Some("ALPHAVANTAGE_API_KEY"),
            Provider::Finnhub => Some("FINNHUB_API_KEY"),
            Provider::Yahoo => None,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Provider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', '-', ' '], "").as_str() {
            "fmp" | "financialmodelingprep" => Ok(Provider::Fmp),
            "alphavantage" | "alpha" | "av" => Ok(Provider::AlphaVantage),
            "finnhub" => Ok(Provider::Finnhub),
            "yahoo" | "yahoofinance" => Ok(Provider::Yahoo),
            _ => Err(ConfigError::UnknownProvider(s.trim().to_string())),
        }
    }
}

/// Opaque provider secrets keyed by provider name.
#[derive(Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Credentials(HashMap<String, String>);

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, provider: Provider, secret: impl Into<String>) {
        self.0.insert(provider.as_str().to_string(), secret.into());
    }

    pub fn with(mut self, provider: Provider, secret: impl Into<String>) -> Self {
        self.insert(provider, secret);
        self
    }

    /// Blank secrets count as absent.
    pub fn get(&self, provider: Provider) -> Option<&str> {
        self.0
            .get(provider.as_str())
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    pub fn configured(&self) -> Vec<Provider> {
        Provider::ALL
            .into_iter()
            .filter(|p| self.get(*p).is_some())
            .collect()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.configured().iter().map(|p| p.as_str()))
            .finish()
    }
}

fn default_category() -> String {
    "Other".to_string()
}

/// A symbol to scan, with the label and category used for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub symbol: Symbol,
    #[serde(default)]
    pub label: String,
    #[serde(default = "default_category")]
    pub category: String,
}

impl WatchlistEntry {
    pub fn new(symbol: &str, label: &str, category: &str) -> Self {
        Self {
            symbol: Symbol::new(symbol),
            label: label.to_string(),
            category: category.to_string(),
        }
    }

    pub fn from_symbol(symbol: &str) -> Self {
        let symbol = Symbol::new(symbol);
        Self {
            label: symbol.to_string(),
            symbol,
            category: default_category(),
        }
    }

    /// Label, falling back to the ticker when none was configured.
    pub fn display_label(&self) -> &str {
        if self.label.trim().is_empty() {
            self.symbol.as_str()
        } else {
            &self.label
        }
    }
}

/// Provider-native key/value mapping returned by an adapter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFields(Map<String, Value>);

impl RawFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.insert(key, value);
        self
    }

    /// Merge a secondary response; keys already present are kept.
    pub fn merge(&mut self, other: Map<String, Value>) {
        for (key, value) in other {
            self.0.entry(key).or_insert(value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for RawFields {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Canonical per-symbol record. `None` marks an unknown value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: Symbol,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub forward_pe: Option<f64>,
    pub forward_eps: Option<f64>,
    pub trailing_eps: Option<f64>,
    pub target_price: Option<f64>,
    pub recommendation: Option<String>,
    /// (forward_eps - trailing_eps) / trailing_eps * 100
    pub eps_growth_pct: Option<f64>,
    /// (target_price - price) / price * 100
    pub upside_pct: Option<f64>,
    pub source: Provider,
}

/// One failed provider attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureRecord {
    pub provider: Provider,
    pub error: FetchError,
}

impl FailureRecord {
    pub fn new(provider: Provider, error: FetchError) -> Self {
        Self { provider, error }
    }
}

impl fmt::Display for FailureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.provider, self.error)
    }
}

/// Result of routing one symbol through the provider list.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RouterOutcome {
    /// First provider to succeed, plus the failures of providers tried before it.
    Resolved {
        quote: Quote,
        failures: Vec<FailureRecord>,
    },
    /// Every provider failed; `failures` is never empty.
    AllSourcesFailed {
        symbol: Symbol,
        failures: Vec<FailureRecord>,
    },
}

impl RouterOutcome {
    pub fn symbol(&self) -> &Symbol {
        match self {
            RouterOutcome::Resolved { quote, .. } => &quote.symbol,
            RouterOutcome::AllSourcesFailed { symbol, .. } => symbol,
        }
    }

    pub fn quote(&self) -> Option<&Quote> {
        match self {
            RouterOutcome::Resolved { quote, .. } => Some(quote),
            RouterOutcome::AllSourcesFailed { .. } => None,
        }
    }

    pub fn failures(&self) -> &[FailureRecord] {
        match self {
            RouterOutcome::Resolved { failures, .. } => failures,
            RouterOutcome::AllSourcesFailed { failures, .. } => failures,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, RouterOutcome::Resolved { .. })
    }

    pub fn into_result(self) -> Result<Quote, AllSourcesFailed> {
        match self {
            RouterOutcome::Resolved { quote, .. } => Ok(quote),
            RouterOutcome::AllSourcesFailed { symbol, failures } => {
                Err(AllSourcesFailed { symbol, failures })
            }
        }
    }
}

/// Human-readable tag explaining why a scoring rule fired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signal(String);

impl Signal {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A quote that cleared the inclusion threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedOpportunity {
    pub label: String,
    pub category: String,
    pub quote: Quote,
    pub signals: Vec<Signal>,
    pub score: u32,
}
