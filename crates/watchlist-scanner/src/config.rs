use scan_core::{ConfigError, Credentials, Provider, WatchlistEntry};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::router::RouterConfig;
use crate::scanner::ScannerConfig;

/// Everything a scan needs, resolved before any provider is contacted.
#[derive(Debug, Clone)]
pub struct ScanSettings {
    pub watchlist: Vec<WatchlistEntry>,
    pub provider_order: Vec<Provider>,
    pub credentials: Credentials,
    pub adapter_delay: Duration,   // 500ms
    pub symbol_delay: Duration,    // 1s
    pub request_timeout: Duration, // 10s
}

impl ScanSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let watchlist = if let Some(path) = var("WATCHLIST_FILE") {
            load_watchlist_file(Path::new(&path))?
        } else if let Some(symbols) = var("WATCHLIST") {
            parse_symbol_list(&symbols)
        } else {
            default_watchlist()
        };

        let provider_order = match var("PROVIDER_ORDER") {
            Some(order) => parse_provider_order(&order)?,
            None => Provider::ALL.to_vec(),
        };

        let mut credentials = match var("API_KEYS_FILE") {
            Some(path) => load_credentials(Path::new(&path))?,
            None => Credentials::new(),
        };
        for provider in Provider::ALL {
            if let Some(key) = provider.credential_env_var().and_then(|name| var(name)) {
                credentials.insert(provider, key);
            }
        }

        let settings = Self {
            watchlist,
            provider_order,
            credentials,
            adapter_delay: Duration::from_millis(parse_number(&var, "ADAPTER_DELAY_MS", 500)?),
            symbol_delay: Duration::from_millis(parse_number(&var, "SYMBOL_DELAY_MS", 1000)?),
            request_timeout: Duration::from_secs(parse_number(&var, "REQUEST_TIMEOUT_SECS", 10)?),
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Replace the watchlist with bare symbols, keeping labels/categories of
    /// symbols already on the configured list. Duplicates keep their first
    /// position.
    pub fn with_symbols(mut self, symbols: &[String]) -> Self {
        let mut watchlist: Vec<WatchlistEntry> = Vec::new();
        for raw in symbols.iter().filter(|s| !s.trim().is_empty()) {
            let entry = WatchlistEntry::from_symbol(raw);
            if watchlist.iter().any(|e| e.symbol == entry.symbol) {
                continue;
            }
            let known = self.watchlist.iter().find(|k| k.symbol == entry.symbol).cloned();
            watchlist.push(known.unwrap_or(entry));
        }
        self.watchlist = watchlist;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.watchlist.is_empty() {
            return Err(ConfigError::EmptyWatchlist);
        }
        if self.provider_order.is_empty() {
            return Err(ConfigError::NoProviders);
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "REQUEST_TIMEOUT_SECS".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    pub fn router_config(&self) -> RouterConfig {
        RouterConfig {
            adapter_delay: self.adapter_delay,
        }
    }

    pub fn scanner_config(&self) -> ScannerConfig {
        ScannerConfig {
            symbol_delay: self.symbol_delay,
        }
    }

    /// Providers in the configured order that will actually be tried.
    pub fn active_providers(&self) -> Vec<Provider> {
        self.provider_order
            .iter()
            .copied()
            .filter(|p| !p.requires_credential() || self.credentials.get(*p).is_some())
            .collect()
    }
}

fn parse_number<F>(var: &F, name: &str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidValue {
            name: name.to_string(),
            value,
        }),
        None => Ok(default),
    }
}

/// Comma- or whitespace-separated symbols; duplicates keep their first position.
pub fn parse_symbol_list(raw: &str) -> Vec<WatchlistEntry> {
    let mut entries: Vec<WatchlistEntry> = Vec::new();
    for symbol in raw.split(|c: char| c == ',' || c.is_whitespace()).filter(|s| !s.is_empty()) {
        let entry = WatchlistEntry::from_symbol(symbol);
        if !entries.iter().any(|e| e.symbol == entry.symbol) {
            entries.push(entry);
        }
    }
    entries
}

pub fn parse_provider_order(raw: &str) -> Result<Vec<Provider>, ConfigError> {
    let mut order = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let provider: Provider = name.parse()?;
        if !order.contains(&provider) {
            order.push(provider);
        }
    }
    if order.is_empty() {
        return Err(ConfigError::NoProviders);
    }
    Ok(order)
}

/// JSON object of provider name to key, e.g. `{"fmp": "...", "finnhub": "..."}`.
pub fn load_credentials(path: &Path) -> Result<Credentials, ConfigError> {
    let contents = read(path)?;
    serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// JSON array of `{symbol, label, category}`.
pub fn load_watchlist_file(path: &Path) -> Result<Vec<WatchlistEntry>, ConfigError> {
    let contents = read(path)?;
    serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: PathBuf::from(path),
        source,
    })
}

/// AI / technology universe scanned when no watchlist is configured.
pub fn default_watchlist() -> Vec<WatchlistEntry> {
    [
        // AI infrastructure
        ("NVDA", "NVIDIA", "AI Chips"),
        ("AMD", "AMD", "AI Chips"),
        ("INTC", "Intel", "AI Chips"),
        ("AVGO", "Broadcom", "AI Chips"),
        ("TSM", "TSMC", "AI Chips"),
        // Storage
        ("MU", "Micron", "Storage"),
        ("WDC", "Western Digital", "Storage"),
        ("STX", "Seagate", "Storage"),
        // AI applications
        ("MSFT", "Microsoft", "AI Apps"),
        ("GOOGL", "Google", "AI Apps"),
        ("AMZN", "Amazon", "AI Apps"),
        ("META", "Meta", "AI Apps"),
        ("PLTR", "Palantir", "AI Apps"),
        // Compute / data center
        ("DELL", "Dell", "Servers"),
        ("HPE", "HPE", "Servers"),
        ("SMCI", "Super Micro", "Servers"),
        // Optical / networking
        ("MRVL", "Marvell", "Optical"),
        ("COHR", "Coherent", "Optical"),
        ("LITE", "Lumentum", "Optical"),
        // Security
        ("PANW", "Palo Alto", "Security"),
        ("FTNT", "Fortinet", "Security"),
        // Emerging
        ("IO", "ION OS", "AI Infrastructure"),
        ("VRT", "Vertiv", "Data Center"),
        ("DYES", "Dayforce", "AI HR"),
    ]
    .into_iter()
    .map(|(symbol, label, category)| WatchlistEntry::new(symbol, label, category))
    .collect()
}
