//! End-to-end scan: failover routing, normalization, scoring and ranking
//! against canned providers.

use async_trait::async_trait;
use scan_core::{
    Credentials, FailureRecord, FetchError, Provider, QuoteAdapter, RawFields, RouterOutcome,
    Symbol, WatchlistEntry,
};
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;
use watchlist_scanner::{
    group_by_category, RouterConfig, ScanReport, ScannerConfig, SourceRouter, WatchlistScanner,
};

/// Canned responses per symbol. Keyed providers report a missing credential
/// before looking at the symbol.
struct CannedAdapter {
    provider: Provider,
    responses: HashMap<&'static str, Result<RawFields, FetchError>>,
}

impl CannedAdapter {
    fn new(provider: Provider) -> Self {
        Self {
            provider,
            responses: HashMap::new(),
        }
    }

    fn respond(mut self, symbol: &'static str, response: Result<RawFields, FetchError>) -> Self {
        self.responses.insert(symbol, response);
        self
    }
}

#[async_trait]
impl QuoteAdapter for CannedAdapter {
    fn provider(&self) -> Provider {
        self.provider
    }

    async fn fetch(&self, symbol: &Symbol, credential: Option<&str>) -> Result<RawFields, FetchError> {
        if self.provider.requires_credential() && credential.is_none() {
            return Err(FetchError::MissingCredential);
        }
        self.responses
            .get(symbol.as_str())
            .cloned()
            .unwrap_or(Err(FetchError::EmptyPayload))
    }
}

fn fmp_profile(name: &str, price: f64, eps: f64, target: f64) -> RawFields {
    RawFields::new()
        .with("companyName", json!(name))
        .with("price", json!(price))
        .with("eps", json!(eps))
        .with("targetMeanPrice", json!(target))
}

fn yahoo_quote(name: &str, price: f64, forward_eps: f64, trailing_eps: f64, pe: f64) -> RawFields {
    RawFields::new()
        .with("shortName", json!(name))
        .with("regularMarketPrice", json!(price))
        .with("epsForward", json!(forward_eps))
        .with("epsTrailingTwelveMonths", json!(trailing_eps))
        .with("forwardPE", json!(pe))
        .with("recommendationKey", json!("buy"))
}

fn scanner(adapters: Vec<CannedAdapter>, credentials: Credentials) -> WatchlistScanner<CannedAdapter> {
    let router = SourceRouter::with_config(
        adapters,
        credentials,
        RouterConfig {
            adapter_delay: Duration::ZERO,
        },
    )
    .unwrap();
    WatchlistScanner::with_config(
        router,
        ScannerConfig {
            symbol_delay: Duration::ZERO,
        },
    )
}

#[tokio::test]
async fn test_partial_failover_loses_no_symbol() {
    // FMP has no key configured, so every symbol falls through to Yahoo
    let fmp = CannedAdapter::new(Provider::Fmp).respond("NVDA", Ok(fmp_profile("NVIDIA", 100.0, 2.0, 150.0)));
    let yahoo = CannedAdapter::new(Provider::Yahoo)
        .respond("NVDA", Ok(yahoo_quote("NVIDIA Corp", 100.0, 4.0, 2.0, 25.0)))
        .respond("MU", Ok(yahoo_quote("Micron", 90.0, 3.0, 2.0, 12.0)));
    let scanner = scanner(vec![fmp, yahoo], Credentials::new());

    let entries = vec![
        WatchlistEntry::new("NVDA", "NVIDIA", "AI Chips"),
        WatchlistEntry::new("MU", "Micron", "Storage"),
        WatchlistEntry::new("ZZZZ", "", "Other"),
    ];
    let outcomes = scanner.scan(&entries).await;

    assert_eq!(outcomes.len(), 3);
    let nvda = outcomes[0].quote().expect("NVDA resolved");
    assert_eq!(nvda.source, Provider::Yahoo);
    assert_eq!(nvda.name.as_deref(), Some("NVIDIA Corp"));
    assert_eq!(outcomes[0].failures()[0].error, FetchError::MissingCredential);

    assert_eq!(outcomes[1].quote().map(|q| q.source), Some(Provider::Yahoo));

    match &outcomes[2] {
        RouterOutcome::AllSourcesFailed { symbol, failures } => {
            assert_eq!(symbol.as_str(), "ZZZZ");
            let providers: Vec<Provider> = failures.iter().map(|f| f.provider).collect();
            assert_eq!(providers, vec![Provider::Fmp, Provider::Yahoo]);
        }
        other => panic!("expected exhaustion, got {:?}", other),
    }
}

#[tokio::test]
async fn test_per_symbol_failover_between_two_providers() {
    // FMP has a key but reports a missing credential for the first symbol only
    let fmp = CannedAdapter::new(Provider::Fmp)
        .respond("NVDA", Err(FetchError::MissingCredential))
        .respond("MU", Ok(fmp_profile("Micron", 90.0, 2.0, 120.0)));
    let yahoo = CannedAdapter::new(Provider::Yahoo)
        .respond("NVDA", Ok(yahoo_quote("NVIDIA", 100.0, 5.0, 2.0, 25.0)));
    let scanner = scanner(vec![fmp, yahoo], Credentials::new().with(Provider::Fmp, "key"));

    let entries = vec![
        WatchlistEntry::new("NVDA", "NVIDIA", "AI Chips"),
        WatchlistEntry::new("MU", "Micron", "Storage"),
        WatchlistEntry::new("WDC", "Western Digital", "Storage"),
    ];
    let outcomes = scanner.scan(&entries).await;

    assert_eq!(outcomes.len(), 3);
    let sources: Vec<Provider> = outcomes.iter().filter_map(|o| o.quote()).map(|q| q.source).collect();
    assert_eq!(sources, vec![Provider::Yahoo, Provider::Fmp]);

    assert_eq!(
        outcomes[0].failures(),
        &[FailureRecord::new(Provider::Fmp, FetchError::MissingCredential)]
    );
    assert!(outcomes[1].failures().is_empty());

    assert!(!outcomes[2].is_resolved());
    assert_eq!(outcomes[2].symbol().as_str(), "WDC");
    assert_eq!(outcomes[2].failures().len(), 2);
}

#[tokio::test]
async fn test_configured_key_uses_primary_provider() {
    let fmp = CannedAdapter::new(Provider::Fmp).respond("NVDA", Ok(fmp_profile("NVIDIA", 100.0, 2.0, 150.0)));
    let yahoo = CannedAdapter::new(Provider::Yahoo);
    let scanner = scanner(vec![fmp, yahoo], Credentials::new().with(Provider::Fmp, "key"));

    let outcomes = scanner.scan(&[WatchlistEntry::from_symbol("nvda")]).await;

    let quote = outcomes[0].quote().expect("resolved");
    assert_eq!(quote.source, Provider::Fmp);
    assert_eq!(quote.trailing_eps, Some(2.0));
    assert_eq!(quote.upside_pct, Some(50.0));
    // no forward EPS from this profile
    assert_eq!(quote.eps_growth_pct, None);
    assert!(outcomes[0].failures().is_empty());
}

#[tokio::test]
async fn test_scan_to_ranked_report() {
    let yahoo = CannedAdapter::new(Provider::Yahoo)
        // growth 150% (+30 +20), PE 25, buy (+10) => 60
        .respond("NVDA", Ok(yahoo_quote("NVIDIA", 100.0, 5.0, 2.0, 25.0)))
        // growth 60% (+30), PE 12 (+10), buy (+10) => 50
        .respond("MU", Ok(yahoo_quote("Micron", 90.0, 3.2, 2.0, 12.0)))
        // same as NVDA, ties on 60
        .respond("AMD", Ok(yahoo_quote("AMD", 150.0, 5.0, 2.0, 25.0)))
        // growth 0%, PE 30, buy (+10) => 10, excluded
        .respond("INTC", Ok(yahoo_quote("Intel", 20.0, 1.0, 1.0, 30.0)));
    let scanner = scanner(vec![yahoo], Credentials::new());

    let entries = vec![
        WatchlistEntry::new("NVDA", "NVIDIA", "AI Chips"),
        WatchlistEntry::new("MU", "Micron", "Storage"),
        WatchlistEntry::new("AMD", "AMD", "AI Chips"),
        WatchlistEntry::new("INTC", "Intel", "AI Chips"),
        WatchlistEntry::new("GONE", "Gone", "Other"),
    ];
    let outcomes = scanner.scan(&entries).await;
    let report = ScanReport::build(&entries, outcomes);

    let ranked: Vec<(&str, u32)> = report
        .opportunities
        .iter()
        .map(|o| (o.quote.symbol.as_str(), o.score))
        .collect();
    assert_eq!(ranked, vec![("NVDA", 60), ("AMD", 60), ("MU", 50)]);

    let signals: Vec<&str> = report.opportunities[2].signals.iter().map(|s| s.as_str()).collect();
    assert_eq!(signals, vec!["EPS growth 60%", "PE=12.0", "buy"]);

    assert_eq!(report.excluded.len(), 1);
    assert_eq!(report.excluded[0].symbol.as_str(), "INTC");
    assert_eq!(report.excluded[0].score, 10);
    assert_eq!(report.unavailable.len(), 1);
    assert_eq!(report.unavailable[0].symbol.as_str(), "GONE");

    let groups = group_by_category(&report.opportunities, 3);
    let categories: Vec<&str> = groups.iter().map(|(c, _)| *c).collect();
    assert_eq!(categories, vec!["AI Chips", "Storage"]);
}
