// tests/format_alert.rs
use chrono::{TimeZone, Utc};
use trade_watcher::format::{alert_text_at, format_amount};
use trade_watcher::NormalizedTrade;

#[test]
fn amount_range_formatting() {
    assert_eq!(format_amount(Some(100.0), Some(500.0)), "$100–$500");
    assert_eq!(format_amount(None, Some(500.0)), "N/A");
    assert_eq!(format_amount(Some(100.0), None), "N/A");
}

#[test]
fn alert_carries_all_fields_and_render_time() {
    let t = NormalizedTrade::new("QuiverQuant", Some("Jane Doe"), Some("msft"), Some("Sale"), Some("2024-03-01"))
        .with_amounts(Some(1001.0), Some(15000.0));
    let at = Utc.with_ymd_and_hms(2024, 3, 2, 12, 30, 5).unwrap();
    let text = alert_text_at(&t, at);
    assert!(text.starts_with("⚠️ Politician Trade Filed\n"));
    assert!(text.contains("👤 Jane Doe\n"));
    assert!(text.contains("🎯 MSFT | SALE\n"));
    assert!(text.contains("💰 Amount: $1001–$15000\n"));
    assert!(text.contains("📅 Date: 2024-03-01\n"));
    assert!(text.contains("🏛️ Source: QuiverQuant\n"));
    assert!(text.ends_with("⏱️ 2024-03-02T12:30:05+00:00"));
}
