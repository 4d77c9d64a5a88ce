// src/sources/mod.rs
pub mod http;
pub mod providers;
pub mod types;

use anyhow::{bail, Result};

use crate::sources::http::PageFetcher;
use crate::sources::providers::{html_rows::HtmlRowProvider, quiver::QuiverProvider};
use crate::sources::types::TradeSource;

/// Every adapter this build knows, in the order they run within a tick.
pub const KNOWN_SOURCES: [&str; 3] = ["QuiverQuant", "CapitolTrades", "UnusualWhales"];

pub fn is_known<S: AsRef<str>>(name: S) -> bool {
    let n = name.as_ref();
    KNOWN_SOURCES.iter().any(|k| k.eq_ignore_ascii_case(n))
}

/// Build the live adapters. An empty `enabled` list means all of them.
/// Names match case-insensitively; unknown names are a startup error.
pub fn build_sources(enabled: &[String], fetcher: &PageFetcher) -> Result<Vec<Box<dyn TradeSource>>> {
    if let Some(bad) = enabled.iter().find(|n| !is_known(n)) {
        bail!(
            "unknown source {bad:?} (known: {})",
            KNOWN_SOURCES.join(", ")
        );
    }
    let wanted = |name: &str| enabled.is_empty() || enabled.iter().any(|e| e.eq_ignore_ascii_case(name));

    let mut out: Vec<Box<dyn TradeSource>> = Vec::new();
    if wanted("QuiverQuant") {
        out.push(Box::new(QuiverProvider::live(fetcher.clone())));
    }
    if wanted("CapitolTrades") {
        out.push(Box::new(HtmlRowProvider::capitol_trades(fetcher.clone())));
    }
    if wanted("UnusualWhales") {
        out.push(Box::new(HtmlRowProvider::unusual_whales(fetcher.clone())));
    }
    Ok(out)
}
