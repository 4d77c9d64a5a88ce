// src/sources/providers/html_rows.rs
//! Best-effort scraping of `data-*` attributes out of rendered trade tables.
//!
//! This is regex over HTML and breaks whenever the site reorders or renames
//! its attributes. When that happens it yields zero rows rather than an
//! error, so a layout change shows up as a quiet source in the tick summary.

use anyhow::Result;
use async_trait::async_trait;
use metrics::counter;
use once_cell::sync::OnceCell;
use regex::Regex;

use crate::sources::http::PageFetcher;
use crate::sources::types::{NormalizedTrade, TradeSource};

pub const CAPITOL_TRADES_URL: &str = "https://www.capitoltrades.com/trades";
pub const UNUSUAL_WHALES_URL: &str = "https://unusualwhales.com/politics";

/// Only the newest rows matter; the pages list the most recent first.
pub const MAX_ROWS: usize = 50;

pub struct HtmlRowProvider {
    source: &'static str,
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http {
        url: String,
        fetcher: PageFetcher,
    },
}

impl HtmlRowProvider {
    pub fn from_fixture_str(source: &'static str, html: &str) -> Self {
        Self {
            source,
            mode: Mode::Fixture(html.to_string()),
        }
    }

    pub fn from_url(source: &'static str, url: &str, fetcher: PageFetcher) -> Self {
        Self {
            source,
            mode: Mode::Http {
                url: url.to_string(),
                fetcher,
            },
        }
    }

    pub fn capitol_trades(fetcher: PageFetcher) -> Self {
        Self::from_url("CapitolTrades", CAPITOL_TRADES_URL, fetcher)
    }

    pub fn unusual_whales(fetcher: PageFetcher) -> Self {
        Self::from_url("UnusualWhales", UNUSUAL_WHALES_URL, fetcher)
    }

    pub fn parse_page(&self, html: &str) -> Vec<NormalizedTrade> {
        let out = extract_rows(self.source, html);
        counter!("watch_items_parsed_total", "source" => self.source).increment(out.len() as u64);
        out
    }
}

fn row_regex() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?s)data-ticker="([A-Z.\-]+)".*?data-transaction="(Buy|Sell)".*?data-politician="([^"]+)".*?data-date="([^"]+)""#,
        )
        .expect("static regex")
    })
}

pub fn extract_rows(source: &str, html: &str) -> Vec<NormalizedTrade> {
    row_regex()
        .captures_iter(html)
        .take(MAX_ROWS)
        .map(|c| {
            let politician = html_escape::decode_html_entities(&c[3]);
            NormalizedTrade::new(
                source,
                Some(politician.as_ref()),
                Some(&c[1]),
                Some(&c[2]),
                Some(&c[4]),
            )
        })
        .collect()
}

#[async_trait]
impl TradeSource for HtmlRowProvider {
    async fn fetch_latest(&self) -> Result<Vec<NormalizedTrade>> {
        match &self.mode {
            Mode::Fixture(s) => Ok(self.parse_page(s)),
            Mode::Http { url, fetcher } => {
                let body = fetcher.get_text(url).await?;
                Ok(self.parse_page(&body))
            }
        }
    }

    fn name(&self) -> &'static str {
        self.source
    }
}
