// src/store.rs
//! Durable seen-set: identifiers of trades that were already alerted.
//!
//! The set only grows. Nothing prunes it; evicting entries would re-alert old
//! disclosures, and first-seen times are not tracked to base a policy on.

use anyhow::{anyhow, Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::fs;

pub type SeenSet = HashSet<String>;

pub const DEFAULT_SEEN_PATH: &str = "seen.json";

#[async_trait::async_trait]
pub trait SeenStore: Send + Sync {
    /// Never fails: missing or unreadable state is an empty set.
    async fn load(&self) -> SeenSet;
    /// Full rewrite of the persisted set.
    async fn save(&self, seen: &SeenSet) -> Result<()>;
}

/// JSON array of identifier strings in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "seen.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

pub fn parse_seen(s: &str) -> Result<SeenSet> {
    let ids: Vec<String> = serde_json::from_str(s)?;
    Ok(ids.into_iter().collect())
}

pub fn serialize_seen(seen: &SeenSet) -> Result<Vec<u8>> {
    let mut ids: Vec<&String> = seen.iter().collect();
    ids.sort();
    Ok(serde_json::to_vec(&ids)?)
}

#[async_trait::async_trait]
impl SeenStore for JsonFileStore {
    async fn load(&self) -> SeenSet {
        let content = match fs::read_to_string(&self.path).await {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no seen-set yet, starting empty");
                return SeenSet::new();
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "seen-set unreadable, starting empty");
                return SeenSet::new();
            }
        };
        match parse_seen(&content) {
            Ok(seen) => {
                tracing::info!(path = %self.path.display(), count = seen.len(), "seen-set loaded");
                seen
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "seen-set corrupt, starting empty");
                SeenSet::new()
            }
        }
    }

    async fn save(&self, seen: &SeenSet) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        let bytes = serialize_seen(seen)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, bytes)
            .await
            .with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }
}

/// In-memory store; clones share state. Saves can be made to fail on demand.
#[derive(Debug, Clone, Default)]
pub struct MemorySeenStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    saved: Option<SeenSet>,
    saves: usize,
    fail_saves: bool,
}

impl MemorySeenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seen<I: IntoIterator<Item = String>>(ids: I) -> Self {
        let store = Self::default();
        store.lock().saved = Some(ids.into_iter().collect());
        store
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.lock().fail_saves = fail;
    }

    /// Last successfully saved set (empty if never saved).
    pub fn snapshot(&self) -> SeenSet {
        self.lock().saved.clone().unwrap_or_default()
    }

    pub fn save_count(&self) -> usize {
        self.lock().saves
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }
}

#[async_trait::async_trait]
impl SeenStore for MemorySeenStore {
    async fn load(&self) -> SeenSet {
        self.snapshot()
    }

    async fn save(&self, seen: &SeenSet) -> Result<()> {
        let mut g = self.lock();
        if g.fail_saves {
            return Err(anyhow!("memory store: save disabled"));
        }
        g.saved = Some(seen.clone());
        g.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_duplicates() {
        let s = parse_seen(r#"["a","b","a"]"#).unwrap();
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn parse_rejects_non_list() {
        assert!(parse_seen(r#"{"a":1}"#).is_err());
        assert!(parse_seen("").is_err());
    }

    #[test]
    fn serialized_form_is_sorted() {
        let s: SeenSet = ["b".to_string(), "a".to_string()].into_iter().collect();
        assert_eq!(serialize_seen(&s).unwrap(), br#"["a","b"]"#.to_vec());
    }

    #[tokio::test]
    async fn memory_store_failure_keeps_previous_snapshot() {
        let store = MemorySeenStore::with_seen(vec!["x".to_string()]);
        store.set_fail_saves(true);
        let next: SeenSet = ["x".to_string(), "y".to_string()].into_iter().collect();
        assert!(store.save(&next).await.is_err());
        assert_eq!(store.load().await.len(), 1);
        assert_eq!(store.save_count(), 0);
    }
}
