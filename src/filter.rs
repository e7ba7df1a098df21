//! Sender filter — decides whether a sender may trigger any action.
//!
//! Case-insensitive exact match against the allow-list. No wildcards,
//! no domain matching. The list is re-read on every lookup so edits to
//! the env var or file take effect on the next message; an unavailable
//! source yields an empty list, which denies everything.

use std::collections::HashSet;
use std::path::PathBuf;

use tracing::debug;

/// Environment variable holding a comma-separated allow-list.
const WHITELIST_ENV: &str = "EMAIL_WHITELIST";

/// Allow-list lookup over an env var or a line-delimited file.
#[derive(Debug, Clone)]
pub struct SenderFilter {
    file_path: PathBuf,
}

impl SenderFilter {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    /// Whether `sender` is authorized to trigger actions.
    pub fn is_allowed(&self, sender: &str) -> bool {
        let allowed = self.load();
        let hit = allowed.contains(&sender.to_lowercase());
        if !hit {
            debug!(sender = %sender, "Sender not in allow-list");
        }
        hit
    }

    /// Load the allow-list: env var first, then the file, else empty.
    fn load(&self) -> HashSet<String> {
        if let Ok(raw) = std::env::var(WHITELIST_ENV) {
            return raw
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect();
        }

        match std::fs::read_to_string(&self.file_path) {
            Ok(contents) => contents
                .lines()
                .map(|l| l.trim().to_lowercase())
                .filter(|l| !l.is_empty())
                .collect(),
            // Missing or unreadable file means deny-all, never an error.
            Err(_) => HashSet::new(),
        }
    }
}
