//! opportunity-finder: scan a watchlist across market data providers and rank
//! the symbols that look like growth opportunities.
//!
//! Usage:
//!   cargo run -p opportunity-finder
//!   cargo run -p opportunity-finder -- --symbols NVDA MU PLTR
//!   cargo run -p opportunity-finder -- --top 5 --per-category 2 --no-save
//!
//! Providers, keys and delays come from the environment (see `.env`).

mod render;

use anyhow::Context;
use provider_clients::ProviderAdapter;
use std::path::PathBuf;
use watchlist_scanner::{ScanReport, ScanSettings, SourceRouter, WatchlistScanner};

const DEFAULT_TOP: usize = 10;
const DEFAULT_PER_CATEGORY: usize = 3;
const DEFAULT_OUTPUT: &str = "/tmp/opportunities.json";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "opportunity_finder=info,watchlist_scanner=info,provider_clients=warn".into()
            }),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    let no_save = args.iter().any(|a| a == "--no-save");

    let top: usize = args
        .iter()
        .position(|a| a == "--top")
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_TOP);

    let per_category: usize = args
        .iter()
        .position(|a| a == "--per-category")
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_PER_CATEGORY);

    let output = args
        .iter()
        .position(|a| a == "--output")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    let mut settings = ScanSettings::from_env().context("invalid scan configuration")?;
    if let Some(idx) = args.iter().position(|a| a == "--symbols") {
        let symbols: Vec<String> = args[idx + 1..]
            .iter()
            .take_while(|a| !a.starts_with("--"))
            .cloned()
            .collect();
        settings = settings.with_symbols(&symbols);
        settings.validate().context("invalid --symbols")?;
    }

    let active = settings.active_providers();
    if active.is_empty() {
        tracing::warn!("No configured provider has a credential; every symbol will fail");
    }
    tracing::info!(
        "opportunity-finder: {} symbols, providers={:?}, active={:?}",
        settings.watchlist.len(),
        settings.provider_order,
        active
    );

    let adapters = ProviderAdapter::for_providers(&settings.provider_order, settings.request_timeout)
        .context("failed to build HTTP client")?;
    let router = SourceRouter::with_config(adapters, settings.credentials.clone(), settings.router_config())?;
    let scanner = WatchlistScanner::with_config(router, settings.scanner_config());

    println!("Opportunity scan");
    println!("Started: {}", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"));
    println!("{}", "=".repeat(60));

    let total = settings.watchlist.len();
    let outcomes = scanner
        .scan_with_progress(&settings.watchlist, |position, outcome| {
            println!("{}", render::progress_line(position, total, outcome));
        })
        .await;

    let report = ScanReport::build(&settings.watchlist, outcomes);

    println!("\n{}", "=".repeat(60));
    print!("{}", render::opportunities_table(&report, top, per_category));
    println!("\n{}", "=".repeat(60));
    println!("{}", render::summary(&report));

    if !report.unavailable.is_empty() {
        println!("\nNo data:");
        print!("{}", render::unavailable_diagnostics(&report));
    }

    if !no_save {
        let json = serde_json::to_string_pretty(&report)?;
        match std::fs::write(&output, json) {
            Ok(()) => println!("\nReport saved to {}", output.display()),
            // A failed save does not invalidate the scan
            Err(e) => tracing::error!("Failed to write report to {}: {}", output.display(), e),
        }
    }

    Ok(())
}

fn print_usage() {
    println!("Usage:");
    println!("  opportunity-finder                       Scan the configured watchlist");
    println!("  opportunity-finder --symbols NVDA MU ... Scan specific symbols");
    println!();
    println!("Options:");
    println!("  --top N            Opportunities to show (default: {})", DEFAULT_TOP);
    println!("  --per-category N   Rows per category (default: {})", DEFAULT_PER_CATEGORY);
    println!("  --output PATH      JSON report path (default: {})", DEFAULT_OUTPUT);
    println!("  --no-save          Do not write the JSON report");
    println!();
    println!("Environment:");
    println!("  PROVIDER_ORDER, FMP_API_KEY, ALPHAVANTAGE_API_KEY, FINNHUB_API_KEY,");
    println!("  API_KEYS_FILE, WATCHLIST, WATCHLIST_FILE, ADAPTER_DELAY_MS,");
    println!("  SYMBOL_DELAY_MS, REQUEST_TIMEOUT_SECS, RUST_LOG");
}
