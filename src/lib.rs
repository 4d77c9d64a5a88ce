// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod config;
pub mod format;
pub mod identity;
pub mod notify;
pub mod sources;
pub mod store;
pub mod watcher;

// ---- Re-exports for stable public API ----
pub use crate::notify::Notifier;
pub use crate::sources::types::{NormalizedTrade, TradeSource};
pub use crate::store::{JsonFileStore, MemorySeenStore, SeenSet, SeenStore};
pub use crate::watcher::{TickSummary, Watcher, WatcherSettings};
