//! Maps provider-native fields onto the canonical `Quote`.
//!
//! Each provider has a static table listing, per canonical field, the native
//! keys to consult in precedence order. The first key holding a usable value
//! wins; anything missing, null, non-numeric or non-finite stays unknown.

use serde_json::Value;

use crate::{Provider, Quote, RawFields, Symbol};

/// Canonical fields a provider can supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Price,
    ForwardPe,
    ForwardEps,
    TrailingEps,
    TargetPrice,
    Recommendation,
}

type FieldTable = &'static [(Field, &'static [&'static str])];

const FMP_FIELDS: FieldTable = &[
    (Field::Name, &["companyName"]),
    (Field::Price, &["price"]),
    // `pe` is trailing and never feeds the forward multiple
    (Field::TrailingEps, &["eps"]),
    (Field::TargetPrice, &["targetMeanPrice"]),
    (Field::Recommendation, &["ratingRecommendation"]),
];

const ALPHA_VANTAGE_FIELDS: FieldTable = &[
    (Field::Name, &["Name"]),
    (Field::Price, &["05. price"]),
    (Field::ForwardPe, &["ForwardPE"]),
    (Field::TrailingEps, &["EPS", "DilutedEPSTTM"]),
    (Field::TargetPrice, &["AnalystTargetPrice"]),
];

const FINNHUB_FIELDS: FieldTable = &[
    (Field::Name, &["name"]),
    (Field::Price, &["c"]),
];

const YAHOO_FIELDS: FieldTable = &[
    (Field::Name, &["shortName", "longName"]),
    (Field::Price, &["regularMarketPrice", "currentPrice"]),
    (Field::ForwardPe, &["forwardPE"]),
    (Field::ForwardEps, &["epsForward", "forwardEps"]),
    (Field::TrailingEps, &["epsTrailingTwelveMonths", "trailingEps"]),
    (Field::TargetPrice, &["targetMeanPrice"]),
    (Field::Recommendation, &["recommendationKey", "averageAnalystRating"]),
];

/// Native keys consulted for `field`, in precedence order.
pub fn native_keys(provider: Provider, field: Field) -> &'static [&'static str] {
    let table = match provider {
        Provider::Fmp => FMP_FIELDS,
        Provider::AlphaVantage => ALPHA_VANTAGE_FIELDS,
        Provider::Finnhub => FINNHUB_FIELDS,
        Provider::Yahoo => YAHOO_FIELDS,
    };

    table
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, keys)| *keys)
        .unwrap_or(&[])
}

/// Build the canonical quote for `symbol` from one provider's fields.
pub fn normalize(symbol: &Symbol, raw: &RawFields, provider: Provider) -> Quote {
    let number = |field| lookup_number(raw, native_keys(provider, field));
    let text = |field| lookup_text(raw, native_keys(provider, field));

    let price = number(Field::Price);
    let forward_eps = number(Field::ForwardEps);
    let trailing_eps = number(Field::TrailingEps);
    let target_price = number(Field::TargetPrice);

    Quote {
        symbol: symbol.clone(),
        name: text(Field::Name),
        price,
        forward_pe: number(Field::ForwardPe),
        forward_eps,
        trailing_eps,
        target_price,
        recommendation: text(Field::Recommendation).map(|r| canonical_recommendation(&r)),
        eps_growth_pct: eps_growth_pct(forward_eps, trailing_eps),
        upside_pct: upside_pct(target_price, price),
        source: provider,
    }
}

/// Percentage change from trailing to forward EPS.
pub fn eps_growth_pct(forward_eps: Option<f64>, trailing_eps: Option<f64>) -> Option<f64> {
    match (forward_eps, trailing_eps) {
        (Some(forward), Some(trailing)) if trailing != 0.0 => {
            finite((forward - trailing) / trailing * 100.0)
        }
        _ => None,
    }
}

/// Percentage distance from price to the analyst target.
pub fn upside_pct(target_price: Option<f64>, price: Option<f64>) -> Option<f64> {
    match (target_price, price) {
        (Some(target), Some(price)) if price > 0.0 => finite((target - price) / price * 100.0),
        _ => None,
    }
}

/// Reconcile rating vocabularies (`strong_buy`, `Strong Buy`, `STRONG_BUY`) to camelCase.
pub fn canonical_recommendation(raw: &str) -> String {
    // Yahoo's averageAnalystRating looks like "1.8 - Buy"
    let rating = raw.rsplit(" - ").next().unwrap_or(raw).trim();
    let squashed: String = rating
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();

    match squashed.as_str() {
        "strongbuy" => "strongBuy".to_string(),
        "buy" => "buy".to_string(),
        "hold" => "hold".to_string(),
        "sell" => "sell".to_string(),
        "strongsell" => "strongSell".to_string(),
        _ => rating.to_string(),
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().and_then(finite),
        Value::String(s) => {
            let s = s.trim().trim_end_matches('%');
            match s {
                "" | "-" | "None" | "null" | "N/A" => None,
                _ => s.parse::<f64>().ok().and_then(finite),
            }
        }
        _ => None,
    }
}

fn lookup_number(raw: &RawFields, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| raw.get(key).and_then(parse_number))
}

fn lookup_text(raw: &RawFields, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match raw.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() && s.trim() != "None" => {
            Some(s.trim().to_string())
        }
        _ => None,
    })
}
