//! Watchlist Scanner
//!
//! Routes each watchlist symbol through the configured providers with
//! failover, then scores and ranks the resolved quotes.

pub mod config;
pub mod ranker;
pub mod router;
pub mod scanner;

pub use config::{default_watchlist, ScanSettings};
pub use ranker::{group_by_category, rank, ExcludedSymbol, ScanReport, UnavailableSymbol};
pub use router::{RouterConfig, SourceRouter};
pub use scanner::{ScannerConfig, WatchlistScanner};
