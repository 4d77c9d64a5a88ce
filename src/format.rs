// src/format.rs
use chrono::{DateTime, SecondsFormat, Utc};

use crate::sources::types::NormalizedTrade;

pub const AMOUNT_NA: &str = "N/A";

/// "$LOW–$HIGH" when both bounds exist, otherwise "N/A". Never renders half a range.
pub fn format_amount(min: Option<f64>, max: Option<f64>) -> String {
    match (min, max) {
        (Some(lo), Some(hi)) => format!("${}–${}", fmt_number(lo), fmt_number(hi)),
        _ => AMOUNT_NA.to_string(),
    }
}

fn fmt_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

/// Alert body stamped with the current time (render time, not detection time).
pub fn alert_text(t: &NormalizedTrade) -> String {
    alert_text_at(t, Utc::now())
}

pub fn alert_text_at(t: &NormalizedTrade, now: DateTime<Utc>) -> String {
    let ticker = if t.ticker.is_empty() { "N/A" } else { t.ticker.as_str() };
    let side = if t.side.is_empty() { "?" } else { t.side.as_str() };
    format!(
        "⚠️ Politician Trade Filed\n\
         👤 {}\n\
         🎯 {} | {}\n\
         💰 Amount: {}\n\
         📅 Date: {}\n\
         🏛️ Source: {}\n\
         ⏱️ {}",
        t.politician,
        ticker,
        side,
        format_amount(t.amount_min, t.amount_max),
        t.date,
        t.source,
        now.to_rfc3339_opts(SecondsFormat::Secs, false),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn amount_range_requires_both_bounds() {
        assert_eq!(format_amount(Some(100.0), Some(500.0)), "$100–$500");
        assert_eq!(format_amount(Some(100.0), None), "N/A");
        assert_eq!(format_amount(None, Some(500.0)), "N/A");
        assert_eq!(format_amount(None, None), "N/A");
    }

    #[test]
    fn fractional_amounts_keep_decimals() {
        assert_eq!(format_amount(Some(0.5), Some(1.25)), "$0.5–$1.25");
    }

    #[test]
    fn template_lines() {
        let t = NormalizedTrade::new("CapitolTrades", Some("Jane Doe"), Some("abc"), Some("Buy"), Some("2024-01-01"));
        let now = Utc.with_ymd_and_hms(2025, 9, 6, 9, 0, 0).unwrap();
        let text = alert_text_at(&t, now);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "⚠️ Politician Trade Filed",
                "👤 Jane Doe",
                "🎯 ABC | BUY",
                "💰 Amount: N/A",
                "📅 Date: 2024-01-01",
                "🏛️ Source: CapitolTrades",
                "⏱️ 2025-09-06T09:00:00+00:00",
            ]
        );
    }

    #[test]
    fn empty_ticker_and_side_get_placeholders() {
        let t = NormalizedTrade::new("QuiverQuant", None, None, None, None);
        let text = alert_text(&t);
        assert!(text.contains("👤 Unknown"));
        assert!(text.contains("🎯 N/A | ?"));
    }
}
