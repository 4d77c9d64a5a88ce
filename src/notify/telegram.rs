// src/notify/telegram.rs
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::Notifier;

const API_BASE: &str = "https://api.telegram.org";

#[derive(Clone)]
pub struct TelegramNotifier {
    token: String,
    chat_id: String,
    api_base: String,
    client: Client,
    timeout: Duration,
}

// Keeps the bot token out of Debug output (and therefore logs).
impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("chat_id", &self.chat_id)
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    disable_web_page_preview: bool,
}

impl TelegramNotifier {
    pub fn new(token: String, chat_id: String) -> Self {
        Self {
            token,
            chat_id,
            api_base: API_BASE.to_string(),
            client: Client::new(),
            timeout: Duration::from_secs(25),
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Point at a different Bot API host (self-hosted server or a test stub).
    pub fn with_api_base(mut self, base: &str) -> Self {
        self.api_base = base.trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.token)
    }
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        let body = SendMessage {
            chat_id: &self.chat_id,
            text,
            disable_web_page_preview: true,
        };

        // reqwest errors embed the URL, which carries the token; strip it.
        self.client
            .post(self.endpoint())
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| e.without_url())
            .context("telegram sendMessage")?
            .error_for_status()
            .map_err(|e| e.without_url())
            .context("telegram non-2xx")?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "telegram"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_token() {
        let n = TelegramNotifier::new("123:SECRET".into(), "42".into());
        let dbg = format!("{n:?}");
        assert!(!dbg.contains("SECRET"));
        assert!(dbg.contains("42"));
    }

    #[test]
    fn payload_requests_no_link_preview() {
        let body = SendMessage {
            chat_id: "42",
            text: "hi",
            disable_web_page_preview: true,
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["disable_web_page_preview"], serde_json::json!(true));
        assert_eq!(v["chat_id"], "42");
    }

    #[test]
    fn api_base_trailing_slash_is_trimmed() {
        let n = TelegramNotifier::new("t".into(), "c".into()).with_api_base("http://localhost:9/");
        assert_eq!(n.endpoint(), "http://localhost:9/bott/sendMessage");
    }
}
