//! Politician trade watcher — binary entrypoint.
//! Loads configuration, wires sources, notifier and seen-set store, then
//! runs the poll loop until the process is stopped.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use trade_watcher::config::{self, NotifierConfig, WatchConfig};
use trade_watcher::notify::{DiscordNotifier, LogNotifier, Notifier, TelegramNotifier};
use trade_watcher::sources::{build_sources, http::PageFetcher};
use trade_watcher::store::JsonFileStore;
use trade_watcher::watcher::{Watcher, WatcherSettings};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

fn build_notifier(cfg: &WatchConfig) -> Arc<dyn Notifier> {
    match &cfg.notifier {
        NotifierConfig::Telegram { bot_token, chat_id } => Arc::new(
            TelegramNotifier::new(bot_token.clone(), chat_id.clone())
                .with_timeout(cfg.send_timeout_secs),
        ),
        NotifierConfig::Discord { webhook_url } => {
            Arc::new(DiscordNotifier::new(webhook_url.clone()).with_timeout(cfg.send_timeout_secs))
        }
        NotifierConfig::Log => Arc::new(LogNotifier),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real deployments set the environment directly.
    let _ = dotenvy::dotenv();

    let cfg = WatchConfig::from_env().context("loading configuration")?;
    init_tracing(cfg.json_logs);

    let enabled = config::load_sources_default().context("loading source list")?;
    let fetcher = PageFetcher::new(&cfg.user_agent, cfg.fetch_timeout)?;
    let sources = build_sources(&enabled, &fetcher)?;

    let settings = WatcherSettings {
        poll_interval: cfg.poll_interval,
        send_delay: cfg.send_delay,
        source_timeout: cfg.fetch_timeout + std::time::Duration::from_secs(15),
        startup_ping: cfg.startup_ping,
    };
    tracing::info!(
        interval_secs = cfg.poll_interval.as_secs(),
        seen_path = %cfg.seen_path.display(),
        notifier = ?cfg.notifier,
        "politician trade watcher started"
    );

    let watcher = Watcher::new(
        sources,
        build_notifier(&cfg),
        Arc::new(JsonFileStore::new(cfg.seen_path.clone())),
        settings,
    );

    tokio::select! {
        _ = watcher.run() => {}
        res = tokio::signal::ctrl_c() => {
            if let Err(e) = res {
                tracing::warn!("ctrl-c handler: {e:#}");
            }
            tracing::info!("shutting down");
        }
    }
    Ok(())
}
