// src/notify/mod.rs
pub mod discord;
pub mod telegram;

use anyhow::Result;

pub use discord::DiscordNotifier;
pub use telegram::TelegramNotifier;

pub const LIVENESS_TEXT: &str = "✅ Bot is alive and running!";

/// Single delivery channel for alert text. An `Err` means the message was
/// not delivered; the caller decides whether to retry.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<()>;
    fn name(&self) -> &'static str;
}

/// Dry-run channel: logs the text and reports success.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        tracing::info!(target: "alert", "{text}");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
