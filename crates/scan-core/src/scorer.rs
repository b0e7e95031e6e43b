//! Opportunity heuristic: fixed rule table over a normalized quote.
//!
//! | Rule            | Condition                         | Points | Signal          |
//! |-----------------|-----------------------------------|--------|-----------------|
//! | growth-moderate | `eps_growth_pct > 50`             | +30    | `EPS growth X%` |
//! | growth-strong   | `eps_growth_pct > 100`            | +20    |                 |
//! | upside-moderate | `upside_pct > 30`                 | +20    | `upside X%`     |
//! | upside-strong   | `upside_pct > 50`                 | +10    |                 |
//! | valuation       | `0 < forward_pe < 20`             | +10    | `PE=X`          |
//! | analyst         | recommendation is buy / strongBuy | +10    | recommendation  |
//!
//! Rules fire independently and in table order, so signals always appear as
//! growth, upside, valuation, analyst rating. Unknown fields never fire a rule.

use crate::{Quote, Signal};

/// Minimum score for a quote to be reported.
pub const INCLUSION_THRESHOLD: u32 = 30;

/// One row of the rule table.
pub struct Rule {
    pub name: &'static str,
    pub points: u32,
    condition: fn(&Quote) -> bool,
    signal: Option<fn(&Quote) -> Signal>,
}

impl Rule {
    pub fn fires(&self, quote: &Quote) -> bool {
        (self.condition)(quote)
    }
}

pub const RULES: &[Rule] = &[
    Rule {
        name: "growth-moderate",
        points: 30,
        condition: growth_above_50,
        signal: Some(growth_signal),
    },
    Rule {
        name: "growth-strong",
        points: 20,
        condition: growth_above_100,
        signal: None,
    },
    Rule {
        name: "upside-moderate",
        points: 20,
        condition: upside_above_30,
        signal: Some(upside_signal),
    },
    Rule {
        name: "upside-strong",
        points: 10,
        condition: upside_above_50,
        signal: None,
    },
    Rule {
        name: "valuation",
        points: 10,
        condition: reasonable_forward_pe,
        signal: Some(valuation_signal),
    },
    Rule {
        name: "analyst",
        points: 10,
        condition: analyst_buy,
        signal: Some(analyst_signal),
    },
];

fn growth_above_50(q: &Quote) -> bool {
    q.eps_growth_pct.is_some_and(|g| g > 50.0)
}

fn growth_above_100(q: &Quote) -> bool {
    q.eps_growth_pct.is_some_and(|g| g > 100.0)
}

fn upside_above_30(q: &Quote) -> bool {
    q.upside_pct.is_some_and(|u| u > 30.0)
}

fn upside_above_50(q: &Quote) -> bool {
    q.upside_pct.is_some_and(|u| u > 50.0)
}

fn reasonable_forward_pe(q: &Quote) -> bool {
    q.forward_pe.is_some_and(|pe| pe > 0.0 && pe < 20.0)
}

fn analyst_buy(q: &Quote) -> bool {
    matches!(q.recommendation.as_deref(), Some("buy" | "strongBuy"))
}

fn growth_signal(q: &Quote) -> Signal {
    Signal::new(format!("EPS growth {:.0}%", q.eps_growth_pct.unwrap_or_default()))
}

fn upside_signal(q: &Quote) -> Signal {
    Signal::new(format!("upside {:.0}%", q.upside_pct.unwrap_or_default()))
}

fn valuation_signal(q: &Quote) -> Signal {
    Signal::new(format!("PE={:.1}", q.forward_pe.unwrap_or_default()))
}

fn analyst_signal(q: &Quote) -> Signal {
    Signal::new(q.recommendation.clone().unwrap_or_default())
}

/// Scoring verdict for one quote.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreOutcome {
    Included { score: u32, signals: Vec<Signal> },
    /// Below the inclusion threshold; the normal outcome for most symbols.
    Excluded { score: u32 },
}

impl ScoreOutcome {
    pub fn score(&self) -> u32 {
        match self {
            ScoreOutcome::Included { score, .. } | ScoreOutcome::Excluded { score } => *score,
        }
    }

    pub fn is_included(&self) -> bool {
        matches!(self, ScoreOutcome::Included { .. })
    }
}

/// Apply every rule, without the inclusion threshold.
pub fn evaluate(quote: &Quote) -> (u32, Vec<Signal>) {
    let mut score = 0;
    let mut signals = Vec::new();

    for rule in RULES.iter().filter(|r| r.fires(quote)) {
        score += rule.points;
        if let Some(signal) = rule.signal {
            signals.push(signal(quote));
        }
    }

    (score, signals)
}

pub fn score(quote: &Quote) -> ScoreOutcome {
    let (score, signals) = evaluate(quote);
    classify(score, signals)
}

fn classify(score: u32, signals: Vec<Signal>) -> ScoreOutcome {
    if score >= INCLUSION_THRESHOLD {
        ScoreOutcome::Included { score, signals }
    } else {
        ScoreOutcome::Excluded { score }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Provider, Symbol};

    fn blank_quote() -> Quote {
        Quote {
            symbol: Symbol::new("TEST"),
            name: None,
            price: None,
            forward_pe: None,
            forward_eps: None,
            trailing_eps: None,
            target_price: None,
            recommendation: None,
            eps_growth_pct: None,
            upside_pct: None,
            source: Provider::Yahoo,
        }
    }

    fn quote_with(growth: Option<f64>, upside: Option<f64>, pe: Option<f64>, rec: Option<&str>) -> Quote {
        Quote {
            eps_growth_pct: growth,
            upside_pct: upside,
            forward_pe: pe,
            recommendation: rec.map(str::to_string),
            ..blank_quote()
        }
    }

    #[test]
    fn test_unknown_fields_score_zero() {
        assert_eq!(evaluate(&blank_quote()), (0, vec![]));
        assert_eq!(score(&blank_quote()), ScoreOutcome::Excluded { score: 0 });
    }

    #[test]
    fn test_all_rules_fire_in_order() {
        let quote = quote_with(Some(120.0), Some(62.4), Some(12.34), Some("strongBuy"));

        let (score, signals) = evaluate(&quote);

        assert_eq!(score, 100);
        let texts: Vec<&str> = signals.iter().map(|s| s.as_str()).collect();
        assert_eq!(texts, vec!["EPS growth 120%", "upside 62%", "PE=12.3", "strongBuy"]);
    }

    #[test]
    fn test_threshold_boundary() {
        // upside-moderate + analyst = 20 + 10
        let at_threshold = quote_with(None, Some(35.0), None, Some("buy"));
        assert_eq!(
            score(&at_threshold),
            ScoreOutcome::Included {
                score: 30,
                signals: vec![Signal::new("upside 35%"), Signal::new("buy")],
            }
        );

        // valuation + analyst = 20
        let below = quote_with(None, None, Some(15.0), Some("buy"));
        assert_eq!(score(&below), ScoreOutcome::Excluded { score: 20 });
    }

    #[test]
    fn test_classify_29_and_30() {
        // rule points are multiples of ten, so 29 cannot come out of evaluate()
        assert_eq!(classify(29, vec![]), ScoreOutcome::Excluded { score: 29 });
        assert!(classify(30, vec![]).is_included());
        assert_eq!(classify(30, vec![]).score(), 30);
    }

    #[test]
    fn test_boundaries_are_strict() {
        assert_eq!(evaluate(&quote_with(Some(50.0), None, None, None)).0, 0);
        assert_eq!(evaluate(&quote_with(Some(100.0), None, None, None)).0, 30);
        assert_eq!(evaluate(&quote_with(None, Some(30.0), None, None)).0, 0);
        assert_eq!(evaluate(&quote_with(None, Some(50.0), None, None)).0, 20);
        assert_eq!(evaluate(&quote_with(None, None, Some(20.0), None)).0, 0);
        assert_eq!(evaluate(&quote_with(None, None, Some(0.0), None)).0, 0);
        assert_eq!(evaluate(&quote_with(None, None, Some(-4.0), None)).0, 0);
    }

    #[test]
    fn test_only_buy_ratings_count() {
        assert_eq!(evaluate(&quote_with(None, None, None, Some("hold"))).0, 0);
        assert_eq!(evaluate(&quote_with(None, None, None, Some("buy"))).0, 10);
        assert_eq!(evaluate(&quote_with(None, None, None, Some("strongBuy"))).0, 10);
    }

    #[test]
    fn test_scoring_is_monotonic() {
        let base = quote_with(None, None, None, None);
        let variants = [
            quote_with(Some(60.0), None, None, None),
            quote_with(Some(150.0), None, None, None),
            quote_with(None, Some(40.0), None, None),
            quote_with(None, Some(80.0), None, None),
            quote_with(None, None, Some(10.0), None),
            quote_with(None, None, None, Some("buy")),
        ];

        let mut current = base;
        let mut last_score = evaluate(&current).0;
        for variant in variants {
            if variant.eps_growth_pct.is_some() {
                current.eps_growth_pct = variant.eps_growth_pct;
            }
            if variant.upside_pct.is_some() {
                current.upside_pct = variant.upside_pct;
            }
            if variant.forward_pe.is_some() {
                current.forward_pe = variant.forward_pe;
            }
            if variant.recommendation.is_some() {
                current.recommendation = variant.recommendation.clone();
            }
            let next_score = evaluate(&current).0;
            assert!(next_score >= last_score, "{} < {}", next_score, last_score);
            last_score = next_score;
        }
        assert_eq!(last_score, 100);
    }

    #[test]
    fn test_rule_table_points_sum_to_100() {
        let total: u32 = RULES.iter().map(|r| r.points).sum();
        assert_eq!(total, 100);
        assert_eq!(RULES[0].name, "growth-moderate");
    }
}
