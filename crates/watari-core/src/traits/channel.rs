// SPDX-FileCopyrightText: 2026 Watari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Messaging channel trait for reply delivery.

use async_trait::async_trait;

use crate::error::WatariError;
use crate::types::ReplyMessage;

/// Delivers an ordered sequence of reply messages against a reply token.
///
/// The token is platform-issued, single-use, and short-lived; the dispatcher
/// treats delivery failure as non-fatal (logged, never retried).
#[async_trait]
pub trait MessagingChannel: Send + Sync {
    async fn send_reply(
        &self,
        reply_token: &str,
        messages: &[ReplyMessage],
    ) -> Result<(), WatariError>;
}
