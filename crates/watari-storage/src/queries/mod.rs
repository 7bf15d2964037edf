// SPDX-FileCopyrightText: 2026 Watari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules, one per table.

pub mod answers;
pub mod history;
pub mod posts;
pub mod rooms;
pub mod translation_log;
pub mod users;
