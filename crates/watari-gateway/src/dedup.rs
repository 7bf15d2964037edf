// SPDX-FileCopyrightText: 2026 Watari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! TTL-based replay guard for inbound event ids.
//!
//! The platform redelivers webhooks regardless of our acknowledgment, so a
//! repeated event id inside the window must produce no side effects. Marking
//! happens before processing: a crash mid-event risks a missed duplicate,
//! never a double reply.

use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Default retention window for seen event ids.
pub const DEFAULT_DEDUP_TTL: Duration = Duration::from_secs(600);

/// Concurrent set of recently seen event ids with per-entry expiry.
pub struct EventDeduplicator {
    seen: DashMap<String, Instant>,
    ttl: Duration,
}

impl EventDeduplicator {
    pub fn new(ttl: Duration) -> Self {
        Self {
            seen: DashMap::new(),
            ttl,
        }
    }

    /// Returns true exactly once per id within the TTL window, marking the
    /// id as seen. Expired entries are purged on each call.
    pub fn first_sight(&self, event_id: &str) -> bool {
        self.seen.retain(|_, seen_at| seen_at.elapsed() < self.ttl);
        match self.seen.entry(event_id.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(Instant::now());
                true
            }
        }
    }

    /// Number of unexpired ids currently tracked.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

impl Default for EventDeduplicator {
    fn default() -> Self {
        Self::new(DEFAULT_DEDUP_TTL)
    }
}
