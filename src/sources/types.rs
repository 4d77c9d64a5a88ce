// src/sources/types.rs
use anyhow::Result;
use serde::Serialize;

use crate::identity;

pub const UNKNOWN_POLITICIAN: &str = "Unknown";

/// Canonical cross-source trade record. The identifier is computed once in
/// [`NormalizedTrade::new`] and cannot be changed afterwards.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NormalizedTrade {
    pub source: String,
    pub politician: String,
    pub ticker: String,
    pub side: String,
    pub date: String,
    pub amount_min: Option<f64>,
    pub amount_max: Option<f64>,
    identifier: String,
}

impl NormalizedTrade {
    /// Applies the field defaults (blank politician -> "Unknown", ticker and
    /// side uppercased, surrounding whitespace trimmed) and derives the id.
    pub fn new(
        source: &str,
        politician: Option<&str>,
        ticker: Option<&str>,
        side: Option<&str>,
        date: Option<&str>,
    ) -> Self {
        let source = source.trim().to_string();
        let politician = match politician.map(str::trim) {
            Some(p) if !p.is_empty() => p.to_string(),
            _ => UNKNOWN_POLITICIAN.to_string(),
        };
        let ticker = ticker.unwrap_or_default().trim().to_uppercase();
        let side = side.unwrap_or_default().trim().to_uppercase();
        let date = date.unwrap_or_default().trim().to_string();

        let identifier = identity::derive(&source, &politician, &ticker, &side, &date);
        Self {
            source,
            politician,
            ticker,
            side,
            date,
            amount_min: None,
            amount_max: None,
            identifier,
        }
    }

    /// Amounts are outside the identity key, so setting them keeps the id.
    pub fn with_amounts(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.amount_min = min;
        self.amount_max = max;
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

/// One external page or API that yields trade disclosures.
///
/// Implementations perform a single fetch per call and never retry; the poll
/// interval is the retry mechanism. Returning `Err` is allowed, the watcher
/// isolates it from the other sources.
#[async_trait::async_trait]
pub trait TradeSource: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<NormalizedTrade>>;
    fn name(&self) -> &'static str;
}
