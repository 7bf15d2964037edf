// SPDX-FileCopyrightText: 2026 Watari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Translation orchestration: detect, contextualize, prompt, call.

use tracing::debug;

use watari_core::{TranslationRequest, TranslationResult, WatariError};

use crate::client::TranslationClient;
use crate::history::HistoryStore;
use crate::{detect, prompt};

/// Runs the full pipeline for one message.
///
/// History is read-only input here: appending the message afterwards is the
/// caller's explicit step, so the attempt can be journaled even when the
/// translation itself fails.
pub struct TranslationService {
    history: HistoryStore,
    client: TranslationClient,
}

impl TranslationService {
    pub fn new(history: HistoryStore, client: TranslationClient) -> Self {
        Self { history, client }
    }

    /// Translates `message` for the user identified by `user_key`.
    ///
    /// Client errors propagate unchanged; the result bundles the prompt for
    /// audit logging.
    pub async fn translate(
        &self,
        user_key: &str,
        message: &str,
    ) -> Result<TranslationResult, WatariError> {
        let source_language = detect::detect(message);
        let history = self.history.get(user_key).await;
        debug!(
            user_key,
            source = %source_language,
            history_len = history.len(),
            "translating message"
        );

        let history_count = history.len();
        let request = TranslationRequest {
            message: message.to_string(),
            history,
            source_language,
            target_language: source_language.target(),
        };
        let prompt = prompt::build(&request);
        let translated_text = self.client.translate_prompt(&prompt).await?;

        Ok(TranslationResult {
            translated_text,
            prompt_used: prompt,
            source_language,
            history_count,
        })
    }
}
