// SPDX-FileCopyrightText: 2026 Watari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock messaging channel that captures outbound replies.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use watari_core::{MessagingChannel, ReplyMessage, WatariError};

/// One captured reply call.
#[derive(Debug, Clone)]
pub struct SentReply {
    pub reply_token: String,
    pub messages: Vec<ReplyMessage>,
}

/// A [`MessagingChannel`] that records every reply instead of sending it.
#[derive(Default)]
pub struct MockChannel {
    sent: Arc<Mutex<Vec<SentReply>>>,
    fail_sends: AtomicBool,
}

impl MockChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `send_reply` fail with a channel error.
    pub fn fail_sends(&self) {
        self.fail_sends.store(true, Ordering::SeqCst);
    }

    /// All captured replies in send order.
    pub async fn sent(&self) -> Vec<SentReply> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl MessagingChannel for MockChannel {
    async fn send_reply(
        &self,
        reply_token: &str,
        messages: &[ReplyMessage],
    ) -> Result<(), WatariError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(WatariError::Channel {
                message: "mock channel configured to fail".to_string(),
                source: None,
            });
        }
        self.sent.lock().await.push(SentReply {
            reply_token: reply_token.to_string(),
            messages: messages.to_vec(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_replies_in_order() {
        let channel = MockChannel::new();
        channel
            .send_reply("tok-1", &[ReplyMessage::text("first")])
            .await
            .unwrap();
        channel
            .send_reply("tok-2", &[ReplyMessage::text("second")])
            .await
            .unwrap();

        let sent = channel.sent().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].reply_token, "tok-1");
        assert_eq!(sent[1].reply_token, "tok-2");
    }

    #[tokio::test]
    async fn fail_sends_turns_replies_into_errors() {
        let channel = MockChannel::new();
        channel.fail_sends();
        let result = channel.send_reply("tok", &[ReplyMessage::text("x")]).await;
        assert!(result.is_err());
        assert!(channel.sent().await.is_empty());
    }
}
