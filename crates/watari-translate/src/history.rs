// SPDX-FileCopyrightText: 2026 Watari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user rolling history of recent messages, used as translation context.
//!
//! History is best-effort: read and write failures are logged and swallowed,
//! and a missing or unreadable log reads as empty. The store never blocks a
//! translation.

use std::sync::Arc;

use tracing::warn;

use watari_core::{HistoryEntry, KeyValueStore};

/// Maximum entries retained per user; oldest evicted first.
pub const HISTORY_LIMIT: usize = 2;

/// Bounded per-user message log over a key-value seam.
#[derive(Clone)]
pub struct HistoryStore {
    kv: Arc<dyn KeyValueStore>,
}

impl HistoryStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Returns the user's history, newest last. Never fails.
    pub async fn get(&self, user_key: &str) -> Vec<HistoryEntry> {
        let raw = match self.kv.get(user_key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(user_key, error = %e, "history read failed, using empty context");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(user_key, error = %e, "history payload undecodable, using empty context");
                Vec::new()
            }
        }
    }

    /// Appends an entry and truncates to the newest [`HISTORY_LIMIT`] entries.
    ///
    /// Failures are logged, never surfaced.
    pub async fn append(&self, user_key: &str, entry: HistoryEntry) {
        let mut entries = self.get(user_key).await;
        entries.push(entry);
        if entries.len() > HISTORY_LIMIT {
            entries.drain(..entries.len() - HISTORY_LIMIT);
        }
        let payload = match serde_json::to_string(&entries) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(user_key, error = %e, "history serialization failed, dropping entry");
                return;
            }
        };
        if let Err(e) = self.kv.put(user_key, &payload).await {
            warn!(user_key, error = %e, "history write failed, dropping entry");
        }
    }
}
