// SPDX-FileCopyrightText: 2026 Watari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-event classification and side effects.
//!
//! Events in a batch are processed sequentially (per-user history mutation
//! must not race within a batch). Every failure is caught here so the
//! webhook handler can always acknowledge success outward; the platform
//! must never see a failure status and start a retry storm.

use std::sync::Arc;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, error, warn};

use watari_core::types::{AnswerPostback, AnswerRecord, PostRecord, TranslationLogRecord};
use watari_core::{
    EventKind, HistoryEntry, InboundEvent, LanguageTag, MessagingChannel, ReplyMessage,
    RowStore, TranslationResult, WatariError,
};
use watari_translate::{detect, HistoryStore, TranslationService};

use crate::dedup::EventDeduplicator;

/// Poll keyword, matched case-insensitively anywhere in a message.
static POLL_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[check\]").expect("poll keyword pattern is valid"));

/// Name declaration: the fixed phrase followed by a double-quoted name.
static NAME_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)call me\s+"([^"]+)""#).expect("name declaration pattern is valid")
});

/// Reply shown when translation fails for any terminal backend reason.
const GENERIC_ERROR_REPLY: &str =
    "Sorry, I couldn't translate that message. Please try again.";

/// Reply shown when every model candidate was rate limited.
const RATE_LIMIT_REPLY: &str =
    "Translation is temporarily over capacity. Please try again in a few minutes.";

/// Routes inbound events to the translation pipeline and the poll path.
pub struct WebhookDispatcher {
    service: Arc<TranslationService>,
    history: HistoryStore,
    rows: Arc<dyn RowStore>,
    channel: Arc<dyn MessagingChannel>,
    dedup: EventDeduplicator,
    results_base_url: String,
}

impl WebhookDispatcher {
    pub fn new(
        service: Arc<TranslationService>,
        history: HistoryStore,
        rows: Arc<dyn RowStore>,
        channel: Arc<dyn MessagingChannel>,
        dedup: EventDeduplicator,
        results_base_url: String,
    ) -> Self {
        Self {
            service,
            history,
            rows,
            channel,
            dedup,
            results_base_url,
        }
    }

    /// Processes a webhook batch. Never raises.
    pub async fn handle(&self, events: Vec<InboundEvent>) {
        for event in events {
            if let Err(e) = self.process_event(&event).await {
                error!(
                    event_id = event.event_id.as_str(),
                    error = %e,
                    "event processing failed"
                );
            }
        }
    }

    async fn process_event(&self, event: &InboundEvent) -> Result<(), WatariError> {
        // Mark-then-process: at most one set of side effects per id within
        // the TTL window, even across concurrent redeliveries.
        if !self.dedup.first_sight(&event.event_id) {
            debug!(event_id = event.event_id.as_str(), "duplicate event skipped");
            return Ok(());
        }

        if !event.conversation_id.is_empty() {
            if let Err(e) = self
                .rows
                .touch_room(&event.conversation_id, &now_rfc3339())
                .await
            {
                warn!(
                    room_id = event.conversation_id.as_str(),
                    error = %e,
                    "room bookkeeping failed"
                );
            }
        }

        match &event.kind {
            EventKind::Message { id, text } => {
                if POLL_KEYWORD.is_match(text) {
                    self.handle_poll(event, id, text).await
                } else if let Some(caps) = NAME_DECLARATION.captures(text) {
                    let name = caps[1].to_string();
                    self.handle_name_declaration(event, id, text, &name).await
                } else {
                    self.handle_plain_message(event, id, text).await
                }
            }
            EventKind::Postback { data } => self.handle_postback(event, data).await,
        }
    }

    /// Poll message: strip the keyword, translate the remainder, reply with
    /// the translation (when any) followed by the selector.
    async fn handle_poll(
        &self,
        event: &InboundEvent,
        message_id: &str,
        text: &str,
    ) -> Result<(), WatariError> {
        let question = POLL_KEYWORD.replace_all(text, "").trim().to_string();

        // Translation failure degrades to a selector without translation
        // text; the poll itself still goes out.
        let translation = if question.is_empty() {
            None
        } else {
            match self.service.translate(&event.sender_id, &question).await {
                Ok(result) => Some(result),
                Err(e) => {
                    warn!(error = %e, "poll translation failed, sending selector only");
                    None
                }
            }
        };

        let mut messages = Vec::new();
        if let Some(result) = &translation {
            messages.push(ReplyMessage::text(&result.translated_text));
        }
        messages.push(ReplyMessage::poll_selector(
            &question,
            message_id,
            &self.results_base_url,
        ));
        self.send_reply(event, &messages).await;

        let language = translation
            .as_ref()
            .map(|r| r.source_language)
            .unwrap_or_else(|| detect::detect(&question));
        self.record_post(event, message_id, &question, &translation, language, true)
            .await
    }

    /// Name declaration: update the display name, translate the raw message
    /// for context continuity, confirm.
    async fn handle_name_declaration(
        &self,
        event: &InboundEvent,
        message_id: &str,
        text: &str,
        name: &str,
    ) -> Result<(), WatariError> {
        self.rows
            .upsert_user_name(&event.sender_id, name, &now_rfc3339())
            .await?;
        debug!(
            user_id = event.sender_id.as_str(),
            name, "display name updated"
        );

        let translation = match self.service.translate(&event.sender_id, text).await {
            Ok(result) => Some(result),
            Err(e) => {
                warn!(error = %e, "name declaration translation failed");
                None
            }
        };

        let mut messages = Vec::new();
        if let Some(result) = &translation {
            messages.push(ReplyMessage::text(&result.translated_text));
        }
        messages.push(ReplyMessage::text(format!(
            "Got it, I'll call you \"{name}\"."
        )));
        self.send_reply(event, &messages).await;

        let language = translation
            .as_ref()
            .map(|r| r.source_language)
            .unwrap_or_else(|| detect::detect(text));
        self.record_post(event, message_id, text, &translation, language, false)
            .await
    }

    /// Plain message: translate, reply, journal. The post is recorded even
    /// when translation fails (translated field left empty), and the user
    /// always gets a reply.
    async fn handle_plain_message(
        &self,
        event: &InboundEvent,
        message_id: &str,
        text: &str,
    ) -> Result<(), WatariError> {
        match self.service.translate(&event.sender_id, text).await {
            Ok(result) => {
                let language = result.source_language;
                self.send_reply(event, &[ReplyMessage::text(&result.translated_text)])
                    .await;

                let now = now_rfc3339();
                self.history
                    .append(
                        &event.sender_id,
                        HistoryEntry {
                            message: text.to_string(),
                            language: result.source_language,
                            captured_at: now.clone(),
                        },
                    )
                    .await;

                if let Err(e) = self
                    .rows
                    .append_translation_log(&TranslationLogRecord {
                        user_id: event.sender_id.clone(),
                        language: result.source_language,
                        message: text.to_string(),
                        translation: result.translated_text.clone(),
                        prompt: result.prompt_used.clone(),
                        history_count: result.history_count,
                        created_at: now,
                    })
                    .await
                {
                    warn!(error = %e, "translation audit log write failed");
                }

                self.record_post(event, message_id, text, &Some(result), language, false)
                    .await
            }
            Err(e) => {
                error!(
                    user_id = event.sender_id.as_str(),
                    error = %e,
                    "translation failed"
                );
                let reply = if e.is_quota_exhausted() {
                    RATE_LIMIT_REPLY
                } else {
                    GENERIC_ERROR_REPLY
                };
                self.send_reply(event, &[ReplyMessage::text(reply)]).await;

                self.record_post(
                    event,
                    message_id,
                    text,
                    &None,
                    detect::detect(text),
                    false,
                )
                .await
            }
        }
    }

    /// Answer postback: upsert one row per (post, sender), latest wins.
    /// Any other postback action is ignored.
    async fn handle_postback(
        &self,
        event: &InboundEvent,
        data: &str,
    ) -> Result<(), WatariError> {
        let Some(answer) = AnswerPostback::parse(data) else {
            debug!(data, "ignoring postback with unknown action");
            return Ok(());
        };
        self.rows
            .upsert_answer(&AnswerRecord {
                post_id: answer.post_id,
                user_id: event.sender_id.clone(),
                value: answer.value,
                created_at: now_rfc3339(),
            })
            .await
    }

    /// Reply delivery is best-effort: failures are logged, never retried.
    async fn send_reply(&self, event: &InboundEvent, messages: &[ReplyMessage]) {
        if let Err(e) = self.channel.send_reply(&event.reply_token, messages).await {
            warn!(
                event_id = event.event_id.as_str(),
                error = %e,
                "reply delivery failed"
            );
        }
    }

    async fn record_post(
        &self,
        event: &InboundEvent,
        message_id: &str,
        message: &str,
        translation: &Option<TranslationResult>,
        language: LanguageTag,
        has_poll: bool,
    ) -> Result<(), WatariError> {
        self.rows
            .record_post(&PostRecord {
                id: message_id.to_string(),
                user_id: event.sender_id.clone(),
                room_id: event.conversation_id.clone(),
                message: message.to_string(),
                translated: translation
                    .as_ref()
                    .map(|r| r.translated_text.clone())
                    .unwrap_or_default(),
                language,
                has_poll,
                created_at: now_rfc3339(),
            })
            .await
    }
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
