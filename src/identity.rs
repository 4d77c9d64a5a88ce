// src/identity.rs
//! Stable dedup key for a normalized trade.
//!
//! The key covers `(source, politician, ticker, side, date)` and nothing else,
//! so re-fetching the same disclosure on a later tick always maps to the same
//! identifier, while amounts (which some sources revise or omit) never split it.

use sha2::{Digest, Sha256};

/// Field separator; none of the sources put `||` inside a name, ticker or date.
const DELIM: &str = "||";

/// Lowercase hex SHA-256 over the identity tuple (always 64 chars).
pub fn derive(source: &str, politician: &str, ticker: &str, side: &str, date: &str) -> String {
    let mut hasher = Sha256::new();
    for (i, part) in [source, politician, ticker, side, date].iter().enumerate() {
        if i > 0 {
            hasher.update(DELIM.as_bytes());
        }
        hasher.update(part.as_bytes());
    }
    let digest = hasher.finalize();

    let mut out = String::with_capacity(64);
    for b in digest.iter() {
        use std::fmt::Write as _;
        let _ = write!(out, "{b:02x}");
    }
    out
}
