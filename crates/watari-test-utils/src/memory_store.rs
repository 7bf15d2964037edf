// SPDX-FileCopyrightText: 2026 Watari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory key-value and row stores.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use watari_core::types::{AnswerRecord, PostRecord, TranslationLogRecord};
use watari_core::{KeyValueStore, RowStore, WatariError};

/// In-memory [`KeyValueStore`].
#[derive(Default)]
pub struct MemoryKvStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, WatariError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), WatariError> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// In-memory [`RowStore`] with accessors for asserting recorded state.
#[derive(Default)]
pub struct MemoryRowStore {
    posts: Arc<Mutex<Vec<PostRecord>>>,
    answers: Arc<Mutex<Vec<AnswerRecord>>>,
    users: Arc<Mutex<HashMap<String, String>>>,
    rooms: Arc<Mutex<Vec<String>>>,
    translation_log: Arc<Mutex<Vec<TranslationLogRecord>>>,
}

impl MemoryRowStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn posts(&self) -> Vec<PostRecord> {
        self.posts.lock().await.clone()
    }

    pub async fn answers(&self) -> Vec<AnswerRecord> {
        self.answers.lock().await.clone()
    }

    /// Display name for a user id, if recorded.
    pub async fn user_name(&self, user_id: &str) -> Option<String> {
        self.users.lock().await.get(user_id).cloned()
    }

    pub async fn rooms(&self) -> Vec<String> {
        self.rooms.lock().await.clone()
    }

    pub async fn translation_log(&self) -> Vec<TranslationLogRecord> {
        self.translation_log.lock().await.clone()
    }
}

#[async_trait]
impl RowStore for MemoryRowStore {
    async fn record_post(&self, post: &PostRecord) -> Result<(), WatariError> {
        self.posts.lock().await.push(post.clone());
        Ok(())
    }

    async fn get_post(&self, id: &str) -> Result<Option<PostRecord>, WatariError> {
        Ok(self
            .posts
            .lock()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn upsert_answer(&self, answer: &AnswerRecord) -> Result<(), WatariError> {
        let mut answers = self.answers.lock().await;
        match answers
            .iter_mut()
            .find(|a| a.post_id == answer.post_id && a.user_id == answer.user_id)
        {
            Some(existing) => *existing = answer.clone(),
            None => answers.push(answer.clone()),
        }
        Ok(())
    }

    async fn answers_for_post(
        &self,
        post_id: &str,
    ) -> Result<Vec<AnswerRecord>, WatariError> {
        Ok(self
            .answers
            .lock()
            .await
            .iter()
            .filter(|a| a.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn upsert_user_name(
        &self,
        user_id: &str,
        display_name: &str,
        _updated_at: &str,
    ) -> Result<(), WatariError> {
        self.users
            .lock()
            .await
            .insert(user_id.to_string(), display_name.to_string());
        Ok(())
    }

    async fn touch_room(&self, room_id: &str, _seen_at: &str) -> Result<(), WatariError> {
        let mut rooms = self.rooms.lock().await;
        if !rooms.iter().any(|r| r == room_id) {
            rooms.push(room_id.to_string());
        }
        Ok(())
    }

    async fn append_translation_log(
        &self,
        entry: &TranslationLogRecord,
    ) -> Result<(), WatariError> {
        self.translation_log.lock().await.push(entry.clone());
        Ok(())
    }
}
