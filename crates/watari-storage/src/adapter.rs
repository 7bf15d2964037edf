// SPDX-FileCopyrightText: 2026 Watari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the RowStore and KeyValueStore traits.

use async_trait::async_trait;
use tracing::debug;

use watari_config::model::StorageConfig;
use watari_core::types::{AnswerRecord, PostRecord, TranslationLogRecord};
use watari_core::{KeyValueStore, RowStore, WatariError};

use crate::database::Database;
use crate::queries;

/// SQLite-backed store for posts, answers, users, rooms, the translation
/// audit log, and per-user history payloads.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules.
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Opens the database at the configured path and applies migrations.
    pub async fn open(config: &StorageConfig) -> Result<Self, WatariError> {
        let db = Database::open(&config.database_path, config.wal_mode).await?;
        debug!(path = %config.database_path, "SQLite store opened");
        Ok(Self { db })
    }

    /// Checkpoints and flushes before shutdown.
    pub async fn close(&self) -> Result<(), WatariError> {
        self.db.close().await
    }

    /// Audit records for a user, oldest first (diagnostic/test access).
    pub async fn translation_log_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<TranslationLogRecord>, WatariError> {
        queries::translation_log::entries_for_user(&self.db, user_id).await
    }

    /// Display name for a user id, if recorded.
    pub async fn display_name(&self, user_id: &str) -> Result<Option<String>, WatariError> {
        queries::users::get_display_name(&self.db, user_id).await
    }
}

#[async_trait]
impl RowStore for SqliteStore {
    async fn record_post(&self, post: &PostRecord) -> Result<(), WatariError> {
        queries::posts::insert_post(&self.db, post).await
    }

    async fn get_post(&self, id: &str) -> Result<Option<PostRecord>, WatariError> {
        queries::posts::get_post(&self.db, id).await
    }

    async fn upsert_answer(&self, answer: &AnswerRecord) -> Result<(), WatariError> {
        queries::answers::upsert_answer(&self.db, answer).await
    }

    async fn answers_for_post(
        &self,
        post_id: &str,
    ) -> Result<Vec<AnswerRecord>, WatariError> {
        queries::answers::answers_for_post(&self.db, post_id).await
    }

    async fn upsert_user_name(
        &self,
        user_id: &str,
        display_name: &str,
        updated_at: &str,
    ) -> Result<(), WatariError> {
        queries::users::upsert_user(&self.db, user_id, display_name, updated_at).await
    }

    async fn touch_room(&self, room_id: &str, seen_at: &str) -> Result<(), WatariError> {
        queries::rooms::touch_room(&self.db, room_id, seen_at).await
    }

    async fn append_translation_log(
        &self,
        entry: &TranslationLogRecord,
    ) -> Result<(), WatariError> {
        queries::translation_log::append_entry(&self.db, entry).await
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, WatariError> {
        queries::history::get_payload(&self.db, key).await
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), WatariError> {
        queries::history::put_payload(&self.db, key, value).await
    }
}
