//! Sequential watchlist scan.

use scan_core::{QuoteAdapter, RouterOutcome, WatchlistEntry};
use std::time::Duration;
use tracing::info;

use crate::router::SourceRouter;

/// Configuration for scanning
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Minimum gap between two symbols, on top of the router's own delay
    pub symbol_delay: Duration,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            symbol_delay: Duration::from_secs(1),
        }
    }
}

/// Runs every watchlist symbol through the router, one at a time.
///
/// Symbols are independent: a failed symbol never stops the batch, and the
/// output holds exactly one outcome per input entry, in input order.
pub struct WatchlistScanner<A> {
    router: SourceRouter<A>,
    config: ScannerConfig,
}

impl<A: QuoteAdapter> WatchlistScanner<A> {
    pub fn new(router: SourceRouter<A>) -> Self {
        Self::with_config(router, ScannerConfig::default())
    }

    pub fn with_config(router: SourceRouter<A>, config: ScannerConfig) -> Self {
        Self { router, config }
    }

    pub fn router(&self) -> &SourceRouter<A> {
        &self.router
    }

    pub async fn scan(&self, entries: &[WatchlistEntry]) -> Vec<RouterOutcome> {
        self.scan_with_progress(entries, |_, _| {}).await
    }

    /// Like `scan`, calling `on_outcome(position, outcome)` as each symbol
    /// finishes (`position` is 1-based).
    pub async fn scan_with_progress<F>(&self, entries: &[WatchlistEntry], mut on_outcome: F) -> Vec<RouterOutcome>
    where
        F: FnMut(usize, &RouterOutcome),
    {
        let mut outcomes = Vec::with_capacity(entries.len());

        for (idx, entry) in entries.iter().enumerate() {
            if idx > 0 && !self.config.symbol_delay.is_zero() {
                tokio::time::sleep(self.config.symbol_delay).await;
            }

            let outcome = self.router.resolve(&entry.symbol).await;
            on_outcome(idx + 1, &outcome);
            outcomes.push(outcome);
        }

        let resolved = outcomes.iter().filter(|o| o.is_resolved()).count();
        info!(
            symbols = entries.len(),
            resolved,
            unavailable = entries.len() - resolved,
            "Watchlist scan complete"
        );

        outcomes
    }
}
