// src/config.rs
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::sources::http::DEFAULT_USER_AGENT;
use crate::store::DEFAULT_SEEN_PATH;

const ENV_SOURCES_PATH: &str = "WATCH_SOURCES_PATH";

pub const DEFAULT_POLL_SECONDS: u64 = 90;
pub const DEFAULT_SEND_DELAY_MS: u64 = 400;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SEND_TIMEOUT_SECS: u64 = 25;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    Missing(&'static str),
    #[error("{key} must be a positive integer, got {value:?}")]
    NotPositive { key: &'static str, value: String },
    #[error("{key} must be a non-negative integer, got {value:?}")]
    NotInteger { key: &'static str, value: String },
    #[error("{key} is not a valid boolean: {value:?}")]
    BadBool { key: &'static str, value: String },
    #[error("unknown NOTIFIER {0:?} (expected telegram, discord or log)")]
    UnknownNotifier(String),
}

#[derive(Clone, PartialEq, Eq)]
pub enum NotifierConfig {
    Telegram { bot_token: String, chat_id: String },
    Discord { webhook_url: String },
    Log,
}

impl std::fmt::Debug for NotifierConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Telegram { chat_id, .. } => f
                .debug_struct("Telegram")
                .field("chat_id", chat_id)
                .finish_non_exhaustive(),
            Self::Discord { .. } => f.write_str("Discord"),
            Self::Log => f.write_str("Log"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    pub notifier: NotifierConfig,
    pub poll_interval: Duration,
    pub seen_path: PathBuf,
    pub send_delay: Duration,
    pub fetch_timeout: Duration,
    pub send_timeout_secs: u64,
    pub startup_ping: bool,
    pub user_agent: String,
    pub json_logs: bool,
}

impl WatchConfig {
    /// Read once at startup; any error here must stop the process.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| get(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let require = |k: &'static str| get(k).ok_or(ConfigError::Missing(k));

        let kind = get("NOTIFIER").unwrap_or_else(|| "telegram".to_string());
        let notifier = match kind.to_ascii_lowercase().as_str() {
            "telegram" => NotifierConfig::Telegram {
                bot_token: require("BOT_TOKEN")?,
                chat_id: require("CHAT_ID")?,
            },
            "discord" => NotifierConfig::Discord {
                webhook_url: require("DISCORD_WEBHOOK_URL")?,
            },
            "log" => NotifierConfig::Log,
            _ => return Err(ConfigError::UnknownNotifier(kind)),
        };

        let positive = |key: &'static str, default: u64| -> Result<u64, ConfigError> {
            match get(key) {
                None => Ok(default),
                Some(v) => match v.parse::<u64>() {
                    Ok(n) if n > 0 => Ok(n),
                    _ => Err(ConfigError::NotPositive { key, value: v }),
                },
            }
        };
        let flag = |key: &'static str, default: bool| -> Result<bool, ConfigError> {
            match get(key) {
                None => Ok(default),
                Some(v) => match v.to_ascii_lowercase().as_str() {
                    "1" | "true" | "yes" | "on" => Ok(true),
                    "0" | "false" | "no" | "off" => Ok(false),
                    _ => Err(ConfigError::BadBool { key, value: v }),
                },
            }
        };

        // 0 is a legitimate delay (tests, dry runs), so it gets a looser check.
        let send_delay_ms = match get("SEND_DELAY_MS") {
            None => DEFAULT_SEND_DELAY_MS,
            Some(v) => v.parse::<u64>().map_err(|_| ConfigError::NotInteger {
                key: "SEND_DELAY_MS",
                value: v,
            })?,
        };

        Ok(Self {
            notifier,
            poll_interval: Duration::from_secs(positive("POLL_SECONDS", DEFAULT_POLL_SECONDS)?),
            seen_path: PathBuf::from(get("SEEN_PATH").unwrap_or_else(|| DEFAULT_SEEN_PATH.to_string())),
            send_delay: Duration::from_millis(send_delay_ms),
            fetch_timeout: Duration::from_secs(positive("FETCH_TIMEOUT_SECS", DEFAULT_FETCH_TIMEOUT_SECS)?),
            send_timeout_secs: positive("SEND_TIMEOUT_SECS", DEFAULT_SEND_TIMEOUT_SECS)?,
            startup_ping: flag("STARTUP_PING", true)?,
            user_agent: get("USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            json_logs: get("LOG_FORMAT").is_some_and(|v| v.eq_ignore_ascii_case("json")),
        })
    }
}

const DEFAULT_SOURCES_PATH: &str = "config/sources.toml";

#[derive(serde::Deserialize)]
struct SourcesFile {
    #[serde(default)]
    sources: Vec<String>,
}

/// Enabled source names from a TOML file holding `sources = [...]`.
pub fn load_sources_from(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading source list from {}", path.display()))?;
    let file: SourcesFile = toml::from_str(&content)
        .with_context(|| format!("parsing source list {}", path.display()))?;
    Ok(clean_list(file.sources))
}

/// `$WATCH_SOURCES_PATH` if set (it must exist), else `config/sources.toml`
/// when present. Empty result means every known source.
pub fn load_sources_default() -> Result<Vec<String>> {
    if let Ok(p) = std::env::var(ENV_SOURCES_PATH) {
        let pb = PathBuf::from(p);
        if !pb.exists() {
            return Err(anyhow!("{ENV_SOURCES_PATH} points to non-existent path"));
        }
        return load_sources_from(&pb);
    }
    let default = Path::new(DEFAULT_SOURCES_PATH);
    if default.exists() {
        return load_sources_from(default);
    }
    Ok(Vec::new())
}

/// Trim, drop blanks, dedupe case-insensitively (first spelling wins).
fn clean_list(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for it in items {
        let t = it.trim();
        if !t.is_empty() && !out.iter().any(|o| o.eq_ignore_ascii_case(t)) {
            out.push(t.to_string());
        }
    }
    out
}
