// src/watcher.rs
//! The poll loop: fetch every source, alert on unseen trades, persist.

use anyhow::{Context, Result};
use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use std::time::Duration;

use crate::format::alert_text;
use crate::notify::{Notifier, LIVENESS_TEXT};
use crate::sources::types::{NormalizedTrade, TradeSource};
use crate::store::{SeenSet, SeenStore};

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("watch_items_total", "Records returned by sources.");
        describe_counter!("watch_alerts_sent_total", "Alerts delivered.");
        describe_counter!("watch_send_failures_total", "Alerts the notifier rejected.");
        describe_counter!("watch_source_errors_total", "Source fetch errors and timeouts.");
        describe_counter!("watch_persist_failures_total", "Failed seen-set writes.");
        describe_counter!("watch_items_parsed_total", "Records parsed per source.");
        describe_gauge!("watch_last_tick_ts", "Unix ts of the last completed tick.");
    });
}

#[derive(Debug, Clone)]
pub struct WatcherSettings {
    pub poll_interval: Duration,
    /// Pause after each delivered alert so the channel isn't flooded.
    pub send_delay: Duration,
    /// Outer ceiling on a single source call, on top of the HTTP timeout.
    pub source_timeout: Duration,
    pub startup_ping: bool,
}

impl Default for WatcherSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(90),
            send_delay: Duration::from_millis(400),
            source_timeout: Duration::from_secs(45),
            startup_ping: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Records returned by all sources, before dedup.
    pub checked: usize,
    pub sent: usize,
    pub send_failures: usize,
    pub source_failures: usize,
}

pub struct Watcher {
    sources: Vec<Box<dyn TradeSource>>,
    notifier: Arc<dyn Notifier>,
    store: Arc<dyn SeenStore>,
    settings: WatcherSettings,
    seen: SeenSet,
    dirty: bool,
    last_summary: Option<TickSummary>,
}

impl Watcher {
    pub fn new(
        sources: Vec<Box<dyn TradeSource>>,
        notifier: Arc<dyn Notifier>,
        store: Arc<dyn SeenStore>,
        settings: WatcherSettings,
    ) -> Self {
        ensure_metrics_described();
        Self {
            sources,
            notifier,
            store,
            settings,
            seen: SeenSet::new(),
            dirty: false,
            last_summary: None,
        }
    }

    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    /// Load persisted state and send the optional liveness message.
    pub async fn init(&mut self) {
        self.seen = self.store.load().await;
        self.dirty = false;
        tracing::info!(
            seen = self.seen.len(),
            sources = self.sources.len(),
            notifier = self.notifier.name(),
            "watcher initialised"
        );
        if self.settings.startup_ping {
            if let Err(e) = self.notifier.send(LIVENESS_TEXT).await {
                tracing::warn!(error = %format!("{e:#}"), "liveness message failed");
            }
        }
    }

    /// Call each source in turn. A failing or hanging source contributes no
    /// records and never stops the others.
    async fn fetch_all(&self) -> (Vec<NormalizedTrade>, usize) {
        let mut items = Vec::new();
        let mut failures = 0usize;
        for src in &self.sources {
            match tokio::time::timeout(self.settings.source_timeout, src.fetch_latest()).await {
                Ok(Ok(mut v)) => {
                    tracing::debug!(source = src.name(), count = v.len(), "source fetched");
                    items.append(&mut v);
                }
                Ok(Err(e)) => {
                    failures += 1;
                    counter!("watch_source_errors_total", "source" => src.name()).increment(1);
                    tracing::warn!(source = src.name(), error = %format!("{e:#}"), "source error");
                }
                Err(_) => {
                    failures += 1;
                    counter!("watch_source_errors_total", "source" => src.name()).increment(1);
                    tracing::warn!(
                        source = src.name(),
                        timeout_secs = self.settings.source_timeout.as_secs(),
                        "source timed out"
                    );
                }
            }
        }
        (items, failures)
    }

    /// One tick. Only a persistence failure escapes as `Err`; the set stays
    /// dirty then, so the next tick writes it again.
    pub async fn tick(&mut self) -> Result<TickSummary> {
        let (items, source_failures) = self.fetch_all().await;
        let mut summary = TickSummary {
            checked: items.len(),
            source_failures,
            ..TickSummary::default()
        };
        counter!("watch_items_total").increment(items.len() as u64);

        for item in &items {
            if self.seen.contains(item.identifier()) {
                continue;
            }
            match self.notifier.send(&alert_text(item)).await {
                Ok(()) => {
                    self.seen.insert(item.identifier().to_string());
                    self.dirty = true;
                    summary.sent += 1;
                    counter!("watch_alerts_sent_total").increment(1);
                    if !self.settings.send_delay.is_zero() {
                        tokio::time::sleep(self.settings.send_delay).await;
                    }
                }
                Err(e) => {
                    summary.send_failures += 1;
                    counter!("watch_send_failures_total").increment(1);
                    tracing::warn!(
                        source = %item.source,
                        id = item.identifier(),
                        ticker = %item.ticker,
                        error = %format!("{e:#}"),
                        "alert send failed, will retry next tick"
                    );
                }
            }
        }

        let saved = if self.dirty {
            let res = self.store.save(&self.seen).await;
            match &res {
                Ok(()) => self.dirty = false,
                Err(_) => counter!("watch_persist_failures_total").increment(1),
            }
            res
        } else {
            Ok(())
        };

        gauge!("watch_last_tick_ts").set(chrono::Utc::now().timestamp() as f64);
        tracing::info!(
            checked = summary.checked,
            sent = summary.sent,
            send_failures = summary.send_failures,
            source_failures = summary.source_failures,
            seen = self.seen.len(),
            persisted = saved.is_ok(),
            "checked {} items, sent {} alerts",
            summary.checked,
            summary.sent
        );
        self.last_summary = Some(summary);

        saved.context("persisting seen-set")?;
        Ok(summary)
    }

    /// Counts of the most recent tick, including one whose save failed.
    pub fn last_summary(&self) -> Option<TickSummary> {
        self.last_summary
    }

    /// INIT, then TICK/SLEEP forever. Never returns.
    pub async fn run(mut self) {
        self.init().await;
        loop {
            if let Err(e) = self.tick().await {
                tracing::error!(error = %format!("{e:#}"), "tick failed");
            }
            tokio::time::sleep(self.settings.poll_interval).await;
        }
    }
}
