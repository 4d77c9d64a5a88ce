// src/sources/providers/quiver.rs
use anyhow::Result;
use async_trait::async_trait;
use metrics::counter;
use once_cell::sync::OnceCell;
use regex::Regex;
use serde_json::{Map, Value};

use crate::sources::http::PageFetcher;
use crate::sources::types::{NormalizedTrade, TradeSource};

pub const QUIVER_URL: &str = "https://www.quiverquant.com/congresstrading/";
const SOURCE: &str = "QuiverQuant";

/// Keys that identify a congressional trade row inside the Next.js payload.
const TRADE_KEYS: [&str; 4] = ["Ticker", "Representative", "Transaction", "Date"];

pub struct QuiverProvider {
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http {
        url: String,
        fetcher: PageFetcher,
    },
}

impl QuiverProvider {
    pub fn from_fixture_str(html: &str) -> Self {
        Self {
            mode: Mode::Fixture(html.to_string()),
        }
    }

    pub fn from_url(url: &str, fetcher: PageFetcher) -> Self {
        Self {
            mode: Mode::Http {
                url: url.to_string(),
                fetcher,
            },
        }
    }

    pub fn live(fetcher: PageFetcher) -> Self {
        Self::from_url(QUIVER_URL, fetcher)
    }

    /// Page -> records. Missing script tag or broken JSON means "nothing
    /// found", not a failed fetch.
    pub fn parse_page(html: &str) -> Vec<NormalizedTrade> {
        let Some(raw) = next_data_payload(html) else {
            tracing::debug!(provider = SOURCE, "no __NEXT_DATA__ script in page");
            return Vec::new();
        };
        let data: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(provider = SOURCE, error = %e, "unparsable __NEXT_DATA__ payload");
                return Vec::new();
            }
        };

        let mut out = Vec::new();
        collect_trades(&data, &mut out);
        counter!("watch_items_parsed_total", "source" => SOURCE).increment(out.len() as u64);
        out
    }
}

fn next_data_payload(html: &str) -> Option<&str> {
    static RE: OnceCell<Regex> = OnceCell::new();
    let re = RE.get_or_init(|| {
        Regex::new(r#"(?s)<script id="__NEXT_DATA__" type="application/json">(.+?)</script>"#)
            .expect("static regex")
    });
    re.captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

fn is_trade_row(obj: &Map<String, Value>) -> bool {
    TRADE_KEYS.iter().all(|k| obj.contains_key(*k))
}

/// Depth-first walk over the whole payload. Matching objects are still
/// descended into, rows can nest.
fn collect_trades(node: &Value, out: &mut Vec<NormalizedTrade>) {
    match node {
        Value::Object(obj) => {
            if is_trade_row(obj) {
                out.push(trade_from_row(obj));
            }
            for v in obj.values() {
                collect_trades(v, out);
            }
        }
        Value::Array(items) => {
            for v in items {
                collect_trades(v, out);
            }
        }
        _ => {}
    }
}

fn trade_from_row(obj: &Map<String, Value>) -> NormalizedTrade {
    let text = |k: &str| obj.get(k).and_then(Value::as_str);
    NormalizedTrade::new(
        SOURCE,
        text("Representative"),
        text("Ticker"),
        text("Transaction"),
        text("Date"),
    )
    .with_amounts(amount(obj.get("AmountMin")), amount(obj.get("AmountMax")))
}

/// Numbers or strings like "$1,001". Zero counts as absent.
fn amount(v: Option<&Value>) -> Option<f64> {
    let n = match v? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| !matches!(c, '$' | ',' | ' '))
                .collect();
            cleaned.parse::<f64>().ok()?
        }
        _ => return None,
    };
    (n.is_finite() && n != 0.0).then_some(n)
}

#[async_trait]
impl TradeSource for QuiverProvider {
    async fn fetch_latest(&self) -> Result<Vec<NormalizedTrade>> {
        match &self.mode {
            Mode::Fixture(s) => Ok(Self::parse_page(s)),
            Mode::Http { url, fetcher } => {
                let body = fetcher.get_text(url).await?;
                Ok(Self::parse_page(&body))
            }
        }
    }

    fn name(&self) -> &'static str {
        SOURCE
    }
}
