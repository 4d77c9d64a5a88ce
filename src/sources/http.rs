// src/sources/http.rs
use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "SavPoliticianWatcher/2.0 (+telegram-bot)";

/// Shared GET transport for the source adapters: one client, a descriptive
/// User-Agent and a hard per-request timeout.
#[derive(Clone, Debug)]
pub struct PageFetcher {
    client: Client,
    timeout: Duration,
}

impl PageFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .context("building http client")?;
        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET `url` and return the body. Non-2xx is an error.
    pub async fn get_text(&self, url: &str) -> Result<String> {
        let rsp = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?
            .error_for_status()
            .with_context(|| format!("GET {url} non-2xx"))?;
        rsp.text()
            .await
            .with_context(|| format!("reading body of {url}"))
    }
}
