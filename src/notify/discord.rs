// src/notify/discord.rs
use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::Notifier;

/// Discord message flag that suppresses link embeds.
const SUPPRESS_EMBEDS: u32 = 1 << 2;
/// Discord rejects message content above this many characters.
const MAX_CONTENT: usize = 2000;

#[derive(Clone)]
pub struct DiscordNotifier {
    webhook: String,
    client: Client,
    timeout: Duration,
}

impl DiscordNotifier {
    pub fn new(webhook: String) -> Self {
        Self {
            webhook,
            client: Client::new(),
            timeout: Duration::from_secs(25),
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

#[derive(Serialize)]
struct DiscordWebhookPayload {
    content: String,
    flags: u32,
}

impl DiscordWebhookPayload {
    fn plain(text: &str) -> Self {
        Self {
            content: text.chars().take(MAX_CONTENT).collect(),
            flags: SUPPRESS_EMBEDS,
        }
    }
}

#[async_trait::async_trait]
impl Notifier for DiscordNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        let payload = DiscordWebhookPayload::plain(text);
        let rsp = self
            .client
            .post(&self.webhook)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| anyhow!("Discord webhook request failed: {}", e.without_url()))?;
        if let Err(e) = rsp.error_for_status_ref() {
            return Err(anyhow!("Discord webhook HTTP error: {}", e.without_url()));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "discord"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_is_truncated_and_suppresses_embeds() {
        let long = "x".repeat(MAX_CONTENT + 10);
        let p = DiscordWebhookPayload::plain(&long);
        assert_eq!(p.content.chars().count(), MAX_CONTENT);
        assert_eq!(p.flags, 4);
    }
}
