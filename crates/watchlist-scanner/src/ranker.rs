//! Opportunity Ranking Module
//!
//! Scores resolved quotes, keeps the ones that clear the inclusion
//! threshold and orders them by score. Symbols that were scored but fell
//! short are kept apart from symbols no provider could supply.

use chrono::{DateTime, Utc};
use scan_core::{
    score, FailureRecord, Provider, RankedOpportunity, RouterOutcome, ScoreOutcome, Symbol,
    WatchlistEntry, INCLUSION_THRESHOLD,
};
use serde::Serialize;

/// A symbol with data whose score stayed below the threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExcludedSymbol {
    pub symbol: Symbol,
    pub score: u32,
    pub source: Provider,
}

/// A symbol for which every provider failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnavailableSymbol {
    pub symbol: Symbol,
    pub failures: Vec<FailureRecord>,
}

/// Everything one scan pass produced.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub generated_at: DateTime<Utc>,
    pub threshold: u32,
    pub scanned: usize,
    /// Ranked, highest score first
    pub opportunities: Vec<RankedOpportunity>,
    pub excluded: Vec<ExcludedSymbol>,
    pub unavailable: Vec<UnavailableSymbol>,
}

impl ScanReport {
    /// Build the report from scan outcomes, paired with their watchlist entries
    /// in input order. Every outcome is reported, even one whose entry is
    /// missing from `entries`.
    pub fn build(entries: &[WatchlistEntry], outcomes: Vec<RouterOutcome>) -> Self {
        let scanned = outcomes.len();
        let mut included = Vec::new();
        let mut excluded = Vec::new();
        let mut unavailable = Vec::new();

        for (idx, outcome) in outcomes.into_iter().enumerate() {
            let entry = entry_for(entries, idx, outcome.symbol());
            match outcome.into_result() {
                Ok(quote) => match score(&quote) {
                    ScoreOutcome::Included { score, signals } => included.push(RankedOpportunity {
                        label: entry.display_label().to_string(),
                        category: entry.category.clone(),
                        quote,
                        signals,
                        score,
                    }),
                    ScoreOutcome::Excluded { score } => excluded.push(ExcludedSymbol {
                        symbol: quote.symbol,
                        score,
                        source: quote.source,
                    }),
                },
                Err(failed) => unavailable.push(UnavailableSymbol {
                    symbol: failed.symbol,
                    failures: failed.failures,
                }),
            }
        }

        Self {
            generated_at: Utc::now(),
            threshold: INCLUSION_THRESHOLD,
            scanned,
            opportunities: rank(included),
            excluded,
            unavailable,
        }
    }

    /// The `n` best opportunities.
    pub fn top(&self, n: usize) -> &[RankedOpportunity] {
        &self.opportunities[..n.min(self.opportunities.len())]
    }
}

/// Entry at the same position when it matches, otherwise the first entry with
/// that symbol, otherwise a bare entry for the symbol.
fn entry_for(entries: &[WatchlistEntry], idx: usize, symbol: &Symbol) -> WatchlistEntry {
    entries
        .get(idx)
        .filter(|e| e.symbol == *symbol)
        .or_else(|| entries.iter().find(|e| e.symbol == *symbol))
        .cloned()
        .unwrap_or_else(|| WatchlistEntry::from_symbol(symbol.as_str()))
}

/// Sort by score, highest first. Equal scores keep their input order.
pub fn rank(mut opportunities: Vec<RankedOpportunity>) -> Vec<RankedOpportunity> {
    // sort_by is stable
    opportunities.sort_by(|a, b| b.score.cmp(&a.score));
    opportunities
}

/// Group by category in first-seen order, keeping at most `per_category`
/// entries per group.
pub fn group_by_category(
    opportunities: &[RankedOpportunity],
    per_category: usize,
) -> Vec<(&str, Vec<&RankedOpportunity>)> {
    let mut groups: Vec<(&str, Vec<&RankedOpportunity>)> = Vec::new();

    for opp in opportunities {
        match groups.iter_mut().find(|(cat, _)| *cat == opp.category) {
            Some((_, members)) => members.push(opp),
            None => groups.push((opp.category.as_str(), vec![opp])),
        }
    }

    for (_, members) in groups.iter_mut() {
        members.truncate(per_category);
    }
    groups
}
