// SPDX-FileCopyrightText: 2026 Watari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contextual translation pipeline for the Watari relay.
//!
//! Composes language detection, per-user history context, prompt assembly,
//! and the multi-model backend client into [`TranslationService`].

pub mod client;
pub mod detect;
pub mod gemini;
pub mod history;
pub mod prompt;
pub mod service;

pub use client::{RetryPolicy, TranslationClient};
pub use gemini::GeminiBackend;
pub use history::{HistoryStore, HISTORY_LIMIT};
pub use service::TranslationService;
