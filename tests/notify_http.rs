// tests/notify_http.rs
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use trade_watcher::notify::TelegramNotifier;
use trade_watcher::sources::http::{PageFetcher, DEFAULT_USER_AGENT};
use trade_watcher::Notifier;

const TOKEN: &str = "123456:SECRET-TOKEN";

/// Local HTTP server that answers every request with `status_line`.
async fn serve_status(status_line: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((mut sock, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(async move {
                read_request(&mut sock).await;
                let rsp = format!(
                    "HTTP/1.1 {status_line}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                );
                let _ = sock.write_all(rsp.as_bytes()).await;
                let _ = sock.shutdown().await;
            });
        }
    });
    format!("http://{addr}")
}

/// Consume headers plus a Content-Length body so the client sees a clean response.
async fn read_request(sock: &mut tokio::net::TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let Ok(n) = sock.read(&mut chunk).await else {
            return;
        };
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf);
        if let Some(end) = text.find("\r\n\r\n") {
            let body_len = text[..end]
                .lines()
                .find_map(|l| {
                    let (k, v) = l.split_once(':')?;
                    k.eq_ignore_ascii_case("content-length")
                        .then(|| v.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= end + 4 + body_len {
                return;
            }
        }
    }
}

#[tokio::test]
async fn telegram_non_2xx_is_a_failure_without_leaking_the_token() {
    let base = serve_status("500 Internal Server Error").await;
    let notifier = TelegramNotifier::new(TOKEN.to_string(), "42".to_string())
        .with_timeout(5)
        .with_api_base(&base);

    let err = notifier.send("hello").await.expect_err("500 must fail");
    let msg = format!("{err:#}");
    assert!(msg.contains("telegram"), "unexpected error: {msg}");
    assert!(!msg.contains("SECRET"), "token leaked: {msg}");
}

#[tokio::test]
async fn telegram_2xx_is_delivered() {
    let base = serve_status("200 OK").await;
    let notifier = TelegramNotifier::new(TOKEN.to_string(), "42".to_string())
        .with_timeout(5)
        .with_api_base(&base);
    notifier.send("hello").await.expect("200 delivers");
}

#[tokio::test]
async fn page_fetch_non_2xx_is_a_failure() {
    let base = serve_status("503 Service Unavailable").await;
    let fetcher = PageFetcher::new(DEFAULT_USER_AGENT, Duration::from_secs(5)).unwrap();

    let err = fetcher
        .get_text(&format!("{base}/trades"))
        .await
        .expect_err("503 must fail");
    assert!(format!("{err:#}").contains("non-2xx"));
}
