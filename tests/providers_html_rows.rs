// tests/providers_html_rows.rs
use std::fs;
use trade_watcher::sources::providers::html_rows::HtmlRowProvider;
use trade_watcher::TradeSource;

#[tokio::test]
async fn capitol_fixture_rows_are_extracted() {
    let html = fs::read_to_string("tests/fixtures/capitol_trades.html")
        .expect("missing tests/fixtures/capitol_trades.html");
    let provider = HtmlRowProvider::from_fixture_str("CapitolTrades", &html);
    assert_eq!(provider.name(), "CapitolTrades");

    let items = provider.fetch_latest().await.expect("rows parse ok");
    assert_eq!(items.len(), 2, "Exchange rows are not matched");

    assert_eq!(items[0].ticker, "MSFT");
    assert_eq!(items[0].side, "BUY");
    assert_eq!(items[0].politician, "Nancy Pelosi");
    assert_eq!(items[0].date, "2024-05-02");

    assert_eq!(items[1].ticker, "BRK.B");
    assert_eq!(items[1].side, "SELL");
    assert_eq!(items[1].politician, "Tommy Tuberville & Spouse");
    assert!(items.iter().all(|t| t.amount_min.is_none() && t.amount_max.is_none()));
}

#[tokio::test]
async fn same_page_under_two_sources_gives_distinct_ids() {
    let html = fs::read_to_string("tests/fixtures/capitol_trades.html").unwrap();
    let a = HtmlRowProvider::from_fixture_str("CapitolTrades", &html)
        .fetch_latest()
        .await
        .unwrap();
    let b = HtmlRowProvider::from_fixture_str("UnusualWhales", &html)
        .fetch_latest()
        .await
        .unwrap();
    assert_eq!(a.len(), b.len());
    assert_ne!(a[0].identifier(), b[0].identifier());
}
