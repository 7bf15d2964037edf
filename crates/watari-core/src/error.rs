// SPDX-FileCopyrightText: 2026 Watari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Watari translation relay.

use thiserror::Error;

/// The primary error type used across all Watari trait seams and core operations.
#[derive(Debug, Error)]
pub enum WatariError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Messaging channel errors (reply delivery failure, payload rejected).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A model backend returned a terminal, non-retryable failure.
    ///
    /// Only rate limiting triggers model fallback; any other non-success
    /// status indicates a caller-side problem and aborts the whole call.
    #[error("backend error from {model} (status {status}): {message}")]
    Backend {
        model: String,
        status: u16,
        message: String,
    },

    /// A model responded successfully but produced no usable text.
    #[error("backend {model} returned an empty completion")]
    EmptyCompletion { model: String },

    /// The backend could not be reached at all (connect failure, timeout).
    #[error("transport failure calling {model}: {source}")]
    Transport {
        model: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Every model candidate was exhausted via rate limiting.
    #[error("all model candidates rate limited; last: {last}")]
    AllModelsExhausted { last: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl WatariError {
    /// True when this failure means every candidate model hit its quota,
    /// and the user should be told to retry later rather than shown the
    /// generic apology.
    pub fn is_quota_exhausted(&self) -> bool {
        matches!(self, WatariError::AllModelsExhausted { .. })
    }
}
