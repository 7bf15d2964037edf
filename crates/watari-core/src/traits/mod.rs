// SPDX-FileCopyrightText: 2026 Watari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability traits at the seams of the translation relay.
//!
//! Core logic depends only on these traits, never on concrete HTTP or
//! SQLite implementations, so every pipeline stage is testable with
//! in-memory fakes.

pub mod backend;
pub mod channel;
pub mod store;

pub use backend::ModelBackend;
pub use channel::MessagingChannel;
pub use store::{KeyValueStore, RowStore};
