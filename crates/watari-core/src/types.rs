// SPDX-FileCopyrightText: 2026 Watari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Watari workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Source-language classification for an inbound message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LanguageTag {
    Ja,
    Pl,
    En,
}

impl LanguageTag {
    /// The translation target for a given source.
    ///
    /// The pair is binary: Japanese translates out to English (the prompt
    /// additionally requests Polish), and every non-Japanese source
    /// translates into Japanese.
    pub fn target(self) -> LanguageTag {
        match self {
            LanguageTag::Ja => LanguageTag::En,
            _ => LanguageTag::Ja,
        }
    }
}

/// Payload of an inbound webhook event.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// A text message typed by a user. `id` is the platform message id,
    /// used as the post id for records and poll references.
    Message { id: String, text: String },
    /// A structured callback from an interactive element (poll button press).
    Postback { data: String },
}

/// One inbound notification from the messaging platform.
///
/// `event_id` is platform-assigned and may repeat on redelivery; the
/// dispatcher's dedup window guarantees at-most-once side effects per id.
#[derive(Debug, Clone)]
pub struct InboundEvent {
    pub event_id: String,
    pub kind: EventKind,
    pub sender_id: String,
    /// Group/room identifier; empty for 1:1 chats.
    pub conversation_id: String,
    pub reply_token: String,
    /// Platform timestamp, milliseconds since the epoch.
    pub timestamp: i64,
}

/// One remembered message in a user's rolling context window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub message: String,
    pub language: LanguageTag,
    pub captured_at: String,
}

/// Everything the prompt builder needs for one translation.
///
/// Value object; construct once, never mutate.
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    pub message: String,
    pub history: Vec<HistoryEntry>,
    pub source_language: LanguageTag,
    pub target_language: LanguageTag,
}

/// The outcome of a successful translation call.
#[derive(Debug, Clone)]
pub struct TranslationResult {
    pub translated_text: String,
    /// Retained for audit logging.
    pub prompt_used: String,
    pub source_language: LanguageTag,
    /// Number of context messages that went into the prompt.
    pub history_count: usize,
}

/// Classified result of a single model invocation.
///
/// The fallback loop in the translation client drives on this tag: only
/// `QuotaExceeded` advances to the next candidate, only `Transient` is
/// retried in place, and `Fatal` aborts the whole call.
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionOutcome {
    Success { text: String },
    Transient { status: u16, message: String },
    QuotaExceeded { status: u16, message: String },
    Fatal { status: u16, message: String },
}

// --- Reply payloads ---

/// The three fixed poll answer values, in button order.
pub const ANSWER_VALUES: [&str; 3] = ["OK", "NG", "N/A"];

/// An outbound reply message in the platform wire shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReplyMessage {
    /// Plain text reply.
    Text { text: String },
    /// Interactive selector (poll buttons + results link).
    Template {
        #[serde(rename = "altText")]
        alt_text: String,
        template: SelectorTemplate,
    },
}

/// Buttons template carried inside a selector reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectorTemplate {
    /// Template type (always "buttons").
    #[serde(rename = "type")]
    pub template_type: String,
    pub text: String,
    pub actions: Vec<SelectorAction>,
}

/// One action button within a selector template.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SelectorAction {
    Postback { label: String, data: String },
    Uri { label: String, uri: String },
}

impl ReplyMessage {
    /// Plain text reply.
    pub fn text(text: impl Into<String>) -> Self {
        ReplyMessage::Text { text: text.into() }
    }

    /// Poll selector: one postback button per answer value, plus a link to
    /// the results view for this post.
    pub fn poll_selector(question: &str, post_id: &str, results_url: &str) -> Self {
        let mut actions: Vec<SelectorAction> = ANSWER_VALUES
            .iter()
            .map(|value| SelectorAction::Postback {
                label: (*value).to_string(),
                data: format!("action=answer&value={value}&postId={post_id}"),
            })
            .collect();
        actions.push(SelectorAction::Uri {
            label: "Results".to_string(),
            uri: format!("{results_url}?postId={post_id}"),
        });
        ReplyMessage::Template {
            alt_text: question.to_string(),
            template: SelectorTemplate {
                template_type: "buttons".to_string(),
                text: question.to_string(),
                actions,
            },
        }
    }
}

/// A parsed `action=answer` postback payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerPostback {
    pub value: String,
    pub post_id: String,
}

impl AnswerPostback {
    /// Parses selector postback data of the form
    /// `action=answer&value=<v>&postId=<id>`.
    ///
    /// Returns `None` for any other action or a payload missing a field.
    pub fn parse(data: &str) -> Option<Self> {
        let mut action = None;
        let mut value = None;
        let mut post_id = None;
        for pair in data.split('&') {
            match pair.split_once('=') {
                Some(("action", v)) => action = Some(v),
                Some(("value", v)) => value = Some(v),
                Some(("postId", v)) => post_id = Some(v),
                _ => {}
            }
        }
        if action != Some("answer") {
            return None;
        }
        Some(AnswerPostback {
            value: value?.to_string(),
            post_id: post_id?.to_string(),
        })
    }
}

// --- Stored records ---

/// One recorded chat post.
#[derive(Debug, Clone, PartialEq)]
pub struct PostRecord {
    pub id: String,
    pub user_id: String,
    /// Empty for 1:1 chats.
    pub room_id: String,
    pub message: String,
    /// Empty when translation failed.
    pub translated: String,
    pub language: LanguageTag,
    pub has_poll: bool,
    pub created_at: String,
}

/// One poll answer; at most one row per `(post_id, user_id)`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerRecord {
    pub post_id: String,
    pub user_id: String,
    pub value: String,
    pub created_at: String,
}

/// One audit record for a completed translation.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationLogRecord {
    pub user_id: String,
    pub language: LanguageTag,
    pub message: String,
    pub translation: String,
    pub prompt: String,
    pub history_count: usize,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn language_tag_round_trips_through_strings() {
        for tag in [LanguageTag::Ja, LanguageTag::Pl, LanguageTag::En] {
            let s = tag.to_string();
            assert_eq!(LanguageTag::from_str(&s).unwrap(), tag);
        }
        assert_eq!(LanguageTag::Ja.to_string(), "ja");
    }

    #[test]
    fn target_language_is_binary() {
        assert_eq!(LanguageTag::Ja.target(), LanguageTag::En);
        assert_eq!(LanguageTag::Pl.target(), LanguageTag::Ja);
        assert_eq!(LanguageTag::En.target(), LanguageTag::Ja);
    }

    #[test]
    fn text_reply_serializes_to_wire_shape() {
        let msg = ReplyMessage::text("hello");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["text"], "hello");
    }

    #[test]
    fn poll_selector_has_three_buttons_and_results_link() {
        let msg = ReplyMessage::poll_selector("Lunch today?", "P1", "https://example.com/results");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "template");
        assert_eq!(json["altText"], "Lunch today?");
        assert_eq!(json["template"]["type"], "buttons");

        let actions = json["template"]["actions"].as_array().unwrap();
        assert_eq!(actions.len(), 4);
        assert_eq!(actions[0]["type"], "postback");
        assert_eq!(actions[0]["data"], "action=answer&value=OK&postId=P1");
        assert_eq!(actions[1]["data"], "action=answer&value=NG&postId=P1");
        assert_eq!(actions[2]["data"], "action=answer&value=N/A&postId=P1");
        assert_eq!(actions[3]["type"], "uri");
        assert_eq!(actions[3]["uri"], "https://example.com/results?postId=P1");
    }

    #[test]
    fn answer_postback_parses_selector_data() {
        let parsed = AnswerPostback::parse("action=answer&value=OK&postId=P1").unwrap();
        assert_eq!(parsed.value, "OK");
        assert_eq!(parsed.post_id, "P1");
    }

    #[test]
    fn answer_postback_rejects_other_actions() {
        assert!(AnswerPostback::parse("action=join&value=OK&postId=P1").is_none());
        assert!(AnswerPostback::parse("action=answer&postId=P1").is_none());
        assert!(AnswerPostback::parse("garbage").is_none());
    }

    #[test]
    fn answer_postback_keeps_literal_slash_value() {
        let parsed = AnswerPostback::parse("action=answer&value=N/A&postId=P9").unwrap();
        assert_eq!(parsed.value, "N/A");
    }
}
