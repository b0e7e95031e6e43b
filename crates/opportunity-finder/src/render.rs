//! Terminal rendering of scan progress and the final report.

use scan_core::{score, RankedOpportunity, RouterOutcome, ScoreOutcome, Signal};
use std::fmt::Write;
use watchlist_scanner::{group_by_category, ScanReport};

/// `[3/24] NVDA ✅ score:60 [EPS growth 150%, buy]`
pub fn progress_line(position: usize, total: usize, outcome: &RouterOutcome) -> String {
    let prefix = format!("[{}/{}] {:<6}", position, total, outcome.symbol().as_str());

    match outcome.quote() {
        Some(quote) => match score(quote) {
            ScoreOutcome::Included { score, signals } => {
                format!("{} ✅ score:{} [{}]", prefix, score, join_signals(&signals, usize::MAX))
            }
            ScoreOutcome::Excluded { score } => format!("{} ❌ score:{}", prefix, score),
        },
        None => format!("{} ❌ no data", prefix),
    }
}

/// Ranked opportunities grouped by category, limited to the `top` best.
pub fn opportunities_table(report: &ScanReport, top: usize, per_category: usize) -> String {
    let mut out = String::new();

    if report.opportunities.is_empty() {
        out.push_str("No opportunities cleared the threshold this time.\n");
        return out;
    }

    let _ = writeln!(out, "TOP {} opportunities:", top.min(report.opportunities.len()));
    for (category, members) in group_by_category(report.top(top), per_category) {
        let _ = writeln!(out, "\n{}:", category);
        for opp in members {
            let _ = writeln!(out, "{}", opportunity_row(opp));
        }
    }
    out
}

pub fn opportunity_row(opp: &RankedOpportunity) -> String {
    let quote = &opp.quote;
    format!(
        "   {:<6} {:<20} score:{:<3} PE={:>6} ↑{:>6}% signals: {}",
        quote.symbol.as_str(),
        truncate(&opp.label, 20),
        opp.score,
        display(quote.forward_pe, 1),
        display(quote.upside_pct, 1),
        join_signals(&opp.signals, 2),
    )
}

pub fn summary(report: &ScanReport) -> String {
    format!(
        "Scanned {} symbols: {} opportunities, {} below threshold {}, {} without data",
        report.scanned,
        report.opportunities.len(),
        report.excluded.len(),
        report.threshold,
        report.unavailable.len(),
    )
}

/// One line per symbol no provider could supply, with every attempt.
pub fn unavailable_diagnostics(report: &ScanReport) -> String {
    let mut out = String::new();
    for missing in &report.unavailable {
        let attempts: Vec<String> = missing.failures.iter().map(|f| f.to_string()).collect();
        let _ = writeln!(out, "   {:<6} {}", missing.symbol.as_str(), attempts.join("; "));
    }
    out
}

fn display(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "-".to_string(),
    }
}

fn join_signals(signals: &[Signal], limit: usize) -> String {
    signals
        .iter()
        .take(limit)
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn truncate(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scan_core::{FailureRecord, FetchError, Provider, Quote, Symbol, WatchlistEntry};

    fn quote(symbol: &str, growth: Option<f64>, upside: Option<f64>) -> Quote {
        Quote {
            symbol: Symbol::new(symbol),
            name: None,
            price: Some(100.0),
            forward_pe: Some(15.3),
            forward_eps: None,
            trailing_eps: None,
            target_price: None,
            recommendation: None,
            eps_growth_pct: growth,
            upside_pct: upside,
            source: Provider::Fmp,
        }
    }

    fn resolved(quote: Quote) -> RouterOutcome {
        RouterOutcome::Resolved {
            quote,
            failures: vec![],
        }
    }

    fn exhausted(symbol: &str) -> RouterOutcome {
        RouterOutcome::AllSourcesFailed {
            symbol: Symbol::new(symbol),
            failures: vec![
                FailureRecord::new(Provider::Fmp, FetchError::MissingCredential),
                FailureRecord::new(Provider::Yahoo, FetchError::EmptyPayload),
            ],
        }
    }

    #[test]
    fn test_progress_line_variants() {
        let included = resolved(quote("NVDA", Some(150.0), None));
        assert_eq!(
            progress_line(1, 3, &included),
            "[1/3] NVDA   ✅ score:60 [EPS growth 150%, PE=15.3]"
        );

        let excluded = resolved(quote("INTC", None, None));
        assert_eq!(progress_line(2, 3, &excluded), "[2/3] INTC   ❌ score:10");

        assert_eq!(progress_line(3, 3, &exhausted("MU")), "[3/3] MU     ❌ no data");
    }

    #[test]
    fn test_table_and_diagnostics() {
        let entries = vec![
            WatchlistEntry::new("NVDA", "NVIDIA", "AI Chips"),
            WatchlistEntry::new("MU", "Micron", "Storage"),
        ];
        let report = ScanReport::build(
            &entries,
            vec![resolved(quote("NVDA", Some(80.0), None)), exhausted("MU")],
        );

        let table = opportunities_table(&report, 10, 3);
        assert!(table.contains("AI Chips:"));
        assert!(table.contains("NVDA   NVIDIA"));
        assert!(table.contains("↑     -%"));
        assert!(!table.contains("Storage"));

        assert_eq!(
            unavailable_diagnostics(&report),
            "   MU     FMP: no credential configured; Yahoo: empty payload\n"
        );
        assert_eq!(
            summary(&report),
            "Scanned 2 symbols: 1 opportunities, 0 below threshold 30, 1 without data"
        );
    }

    #[test]
    fn test_empty_table() {
        let report = ScanReport::build(&[], vec![]);
        assert!(opportunities_table(&report, 10, 3).starts_with("No opportunities"));
    }
}
