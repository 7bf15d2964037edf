// SPDX-FileCopyrightText: 2026 Watari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model backend trait for generative-language API integrations.

use async_trait::async_trait;

use crate::error::WatariError;
use crate::types::CompletionOutcome;

/// A single-shot completion backend for one family of models.
///
/// Implementations classify the HTTP response into a [`CompletionOutcome`]
/// tag; only transport-level failures (connection refused, timeout mid-read)
/// surface as `Err`. The retry/fallback policy lives in the caller, not here.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Sends `prompt` to the named model and classifies the result.
    async fn complete(
        &self,
        model: &str,
        prompt: &str,
    ) -> Result<CompletionOutcome, WatariError>;
}
