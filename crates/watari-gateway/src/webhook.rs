// SPDX-FileCopyrightText: 2026 Watari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Platform webhook wire model and conversion into channel-agnostic events.
//!
//! Only text messages and postbacks are converted; every other event or
//! message type is skipped. Unknown JSON fields are ignored so platform
//! additions don't break parsing.

use serde::Deserialize;
use tracing::debug;

use watari_core::{EventKind, InboundEvent};

/// Top-level webhook delivery body.
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

/// One event within a delivery.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub webhook_event_id: String,
    #[serde(default)]
    pub reply_token: String,
    #[serde(default)]
    pub timestamp: i64,
    pub source: Option<EventSource>,
    pub message: Option<WebhookMessage>,
    pub postback: Option<WebhookPostback>,
}

/// Sender information for an event.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    #[serde(rename = "type", default)]
    pub source_type: String,
    #[serde(default)]
    pub user_id: String,
    /// Present for group chats only.
    pub group_id: Option<String>,
}

/// Message payload of a message event.
#[derive(Debug, Deserialize)]
pub struct WebhookMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub text: String,
}

/// Postback payload of a postback event.
#[derive(Debug, Deserialize)]
pub struct WebhookPostback {
    pub data: String,
}

/// Converts a wire event into an [`InboundEvent`].
///
/// Returns `None` for unsupported event or message types (stickers, images,
/// joins, ...), which the dispatcher never sees.
pub fn to_inbound_event(event: &WebhookEvent) -> Option<InboundEvent> {
    let kind = match event.event_type.as_str() {
        "message" => {
            let message = event.message.as_ref()?;
            if message.message_type != "text" {
                debug!(
                    message_type = message.message_type.as_str(),
                    "ignoring unsupported message type"
                );
                return None;
            }
            EventKind::Message {
                id: message.id.clone(),
                text: message.text.clone(),
            }
        }
        "postback" => {
            let postback = event.postback.as_ref()?;
            EventKind::Postback {
                data: postback.data.clone(),
            }
        }
        other => {
            debug!(event_type = other, "ignoring unsupported event type");
            return None;
        }
    };

    let (sender_id, conversation_id) = match event.source.as_ref() {
        Some(source) => (
            source.user_id.clone(),
            source.group_id.clone().unwrap_or_default(),
        ),
        None => (String::new(), String::new()),
    };

    // The platform id for dedup; message id is the fallback for deliveries
    // that predate webhook event ids.
    let event_id = if !event.webhook_event_id.is_empty() {
        event.webhook_event_id.clone()
    } else {
        match &kind {
            EventKind::Message { id, .. } if !id.is_empty() => id.clone(),
            _ => {
                debug!("event carries no usable id, skipping");
                return None;
            }
        }
    };

    Some(InboundEvent {
        event_id,
        kind,
        sender_id,
        conversation_id,
        reply_token: event.reply_token.clone(),
        timestamp: event.timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_payload(json: &str) -> WebhookPayload {
        serde_json::from_str(json).expect("payload should deserialize")
    }

    #[test]
    fn text_message_event_converts() {
        let payload = parse_payload(
            r#"{
                "destination": "bot-1",
                "events": [{
                    "type": "message",
                    "webhookEventId": "evt-1",
                    "replyToken": "tok-1",
                    "timestamp": 1700000000000,
                    "source": {"type": "user", "userId": "U1"},
                    "message": {"type": "text", "id": "M1", "text": "こんにちは"}
                }]
            }"#,
        );
        let event = to_inbound_event(&payload.events[0]).unwrap();
        assert_eq!(event.event_id, "evt-1");
        assert_eq!(event.sender_id, "U1");
        assert_eq!(event.conversation_id, "");
        assert_eq!(event.reply_token, "tok-1");
        assert_eq!(
            event.kind,
            EventKind::Message {
                id: "M1".into(),
                text: "こんにちは".into()
            }
        );
    }

    #[test]
    fn group_message_carries_conversation_id() {
        let payload = parse_payload(
            r#"{
                "events": [{
                    "type": "message",
                    "webhookEventId": "evt-2",
                    "replyToken": "tok-2",
                    "timestamp": 1700000000000,
                    "source": {"type": "group", "userId": "U1", "groupId": "G1"},
                    "message": {"type": "text", "id": "M2", "text": "hi all"}
                }]
            }"#,
        );
        let event = to_inbound_event(&payload.events[0]).unwrap();
        assert_eq!(event.conversation_id, "G1");
    }

    #[test]
    fn postback_event_converts() {
        let payload = parse_payload(
            r#"{
                "events": [{
                    "type": "postback",
                    "webhookEventId": "evt-3",
                    "replyToken": "tok-3",
                    "timestamp": 1700000000000,
                    "source": {"type": "user", "userId": "U2"},
                    "postback": {"data": "action=answer&value=OK&postId=P1"}
                }]
            }"#,
        );
        let event = to_inbound_event(&payload.events[0]).unwrap();
        assert_eq!(
            event.kind,
            EventKind::Postback {
                data: "action=answer&value=OK&postId=P1".into()
            }
        );
    }

    #[test]
    fn sticker_message_is_skipped() {
        let payload = parse_payload(
            r#"{
                "events": [{
                    "type": "message",
                    "webhookEventId": "evt-4",
                    "replyToken": "tok-4",
                    "timestamp": 1700000000000,
                    "source": {"type": "user", "userId": "U1"},
                    "message": {"type": "sticker", "id": "M4"}
                }]
            }"#,
        );
        assert!(to_inbound_event(&payload.events[0]).is_none());
    }

    #[test]
    fn unknown_event_type_is_skipped() {
        let payload = parse_payload(
            r#"{"events": [{"type": "follow", "webhookEventId": "evt-5", "timestamp": 0}]}"#,
        );
        assert!(to_inbound_event(&payload.events[0]).is_none());
    }

    #[test]
    fn missing_webhook_event_id_falls_back_to_message_id() {
        let payload = parse_payload(
            r#"{
                "events": [{
                    "type": "message",
                    "replyToken": "tok-6",
                    "timestamp": 1700000000000,
                    "source": {"type": "user", "userId": "U1"},
                    "message": {"type": "text", "id": "M6", "text": "hello"}
                }]
            }"#,
        );
        let event = to_inbound_event(&payload.events[0]).unwrap();
        assert_eq!(event.event_id, "M6");
    }

    #[test]
    fn unknown_fields_are_tolerated() {
        let payload = parse_payload(
            r#"{
                "destination": "bot-1",
                "somethingNew": true,
                "events": [{
                    "type": "message",
                    "webhookEventId": "evt-7",
                    "replyToken": "tok-7",
                    "timestamp": 1700000000000,
                    "mode": "active",
                    "source": {"type": "user", "userId": "U1"},
                    "message": {"type": "text", "id": "M7", "text": "ok", "quoteToken": "q"}
                }]
            }"#,
        );
        assert!(to_inbound_event(&payload.events[0]).is_some());
    }
}
