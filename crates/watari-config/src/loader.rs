// SPDX-FileCopyrightText: 2026 Watari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./watari.toml` > `~/.config/watari/watari.toml` >
//! `/etc/watari/watari.toml` with environment variable overrides via the
//! `WATARI_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::WatariConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/watari/watari.toml` (system-wide)
/// 3. `~/.config/watari/watari.toml` (user XDG config)
/// 4. `./watari.toml` (local directory)
/// 5. `WATARI_*` environment variables
pub fn load_config() -> Result<WatariConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(WatariConfig::default()))
        .merge(Toml::file("/etc/watari/watari.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("watari/watari.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("watari.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config file specification.
pub fn load_config_from_str(toml_content: &str) -> Result<WatariConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(WatariConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<WatariConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(WatariConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `WATARI_CHANNEL_ACCESS_TOKEN` must map to
/// `channel.access_token`, not `channel.access.token`.
fn env_provider() -> Env {
    Env::prefixed("WATARI_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: WATARI_BACKEND_API_KEY -> "backend_api_key"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("server_", "server.", 1)
            .replacen("channel_", "channel.", 1)
            .replacen("backend_", "backend.", 1)
            .replacen("dispatch_", "dispatch.", 1)
            .replacen("storage_", "storage.", 1);
        mapped.into()
    })
}
