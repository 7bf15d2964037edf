// SPDX-FileCopyrightText: 2026 Watari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence traits: per-key blobs and row-oriented records.

use async_trait::async_trait;

use crate::error::WatariError;
use crate::types::{AnswerRecord, PostRecord, TranslationLogRecord};

/// Small per-key state, used for the rolling translation-context history.
///
/// Values are opaque strings (JSON in practice); `put` replaces the whole
/// value for a key atomically relative to that key.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, WatariError>;
    async fn put(&self, key: &str, value: &str) -> Result<(), WatariError>;
}

/// Row-oriented store for posts, answers, users, rooms, and the audit log.
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Appends a post row.
    async fn record_post(&self, post: &PostRecord) -> Result<(), WatariError>;

    /// Fetches a post by id.
    async fn get_post(&self, id: &str) -> Result<Option<PostRecord>, WatariError>;

    /// Records an answer; one row per `(post_id, user_id)`, latest wins.
    async fn upsert_answer(&self, answer: &AnswerRecord) -> Result<(), WatariError>;

    /// All answers for a post, in insertion order.
    async fn answers_for_post(
        &self,
        post_id: &str,
    ) -> Result<Vec<AnswerRecord>, WatariError>;

    /// Creates or updates a user's display name.
    async fn upsert_user_name(
        &self,
        user_id: &str,
        display_name: &str,
        updated_at: &str,
    ) -> Result<(), WatariError>;

    /// Records that a group/room was seen (insert-or-ignore).
    async fn touch_room(&self, room_id: &str, seen_at: &str) -> Result<(), WatariError>;

    /// Appends an audit record for a completed translation.
    async fn append_translation_log(
        &self,
        entry: &TranslationLogRecord,
    ) -> Result<(), WatariError>;
}
