use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::types::{FailureRecord, Symbol};

/// Failure of a single provider adapter for a single symbol.
///
/// Every variant is recoverable: the router records it and moves on to the
/// next provider.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FetchError {
    #[error("no credential configured")]
    MissingCredential,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("empty payload")]
    EmptyPayload,

    #[error("rate limited: {0}")]
    RateLimited(String),
}

impl FetchError {
    /// Whether the failed attempt reached the provider over the network.
    pub fn reached_network(&self) -> bool {
        !matches!(self, FetchError::MissingCredential)
    }
}

/// Every configured provider failed for one symbol.
#[derive(Error, Debug, Clone)]
#[error("all sources failed for {symbol}: {}", summarize(.failures))]
pub struct AllSourcesFailed {
    pub symbol: Symbol,
    pub failures: Vec<FailureRecord>,
}

fn summarize(failures: &[FailureRecord]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Fatal problems found before a scan starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("watchlist is empty")]
    EmptyWatchlist,

    #[error("no data providers configured")]
    NoProviders,

    #[error("unknown provider '{0}'")]
    UnknownProvider(String),

    #[error("invalid value for {name}: '{value}'")]
    InvalidValue { name: String, value: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
