// SPDX-FileCopyrightText: 2026 Watari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Watari translation relay.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Watari configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WatariConfig {
    /// Process identity and logging.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Webhook HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Messaging platform credentials and endpoints.
    #[serde(default)]
    pub channel: ChannelConfig,

    /// Generative-language backend settings.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Webhook dispatch settings.
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Process identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the relay.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "watari".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Webhook HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8700
}

/// Messaging platform configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelConfig {
    /// Webhook signature secret. `None` disables signature verification.
    #[serde(default)]
    pub channel_secret: Option<String>,

    /// Bearer token for the reply API. `None` requires environment variable.
    #[serde(default)]
    pub access_token: Option<String>,

    /// Reply API endpoint.
    #[serde(default = "default_reply_endpoint")]
    pub reply_endpoint: String,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            channel_secret: None,
            access_token: None,
            reply_endpoint: default_reply_endpoint(),
        }
    }
}

fn default_reply_endpoint() -> String {
    "https://api.line.me/v2/bot/message/reply".to_string()
}

/// Generative-language backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// API key. `None` requires environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// API base endpoint.
    #[serde(default = "default_backend_endpoint")]
    pub endpoint: String,

    /// Model candidates in fallback priority order.
    #[serde(default = "default_models")]
    pub models: Vec<String>,

    /// Maximum tokens to generate per response.
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_backend_endpoint(),
            models: default_models(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

fn default_backend_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_models() -> Vec<String> {
    vec![
        "gemini-2.0-flash".to_string(),
        "gemini-1.5-pro".to_string(),
        "gemini-1.5-flash".to_string(),
    ]
}

fn default_max_output_tokens() -> u32 {
    1024
}

/// Webhook dispatch configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Seconds a processed event id stays in the replay guard.
    #[serde(default = "default_dedup_ttl_secs")]
    pub dedup_ttl_secs: u64,

    /// Base URL of the poll results view linked from selector replies.
    #[serde(default)]
    pub results_base_url: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            dedup_ttl_secs: default_dedup_ttl_secs(),
            results_base_url: String::new(),
        }
    }
}

fn default_dedup_ttl_secs() -> u64 {
    600
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Whether to enable WAL journal mode.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    "watari.db".to_string()
}

fn default_wal_mode() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_complete() {
        let config = WatariConfig::default();
        assert_eq!(config.agent.name, "watari");
        assert_eq!(config.server.port, 8700);
        assert_eq!(config.backend.models.len(), 3);
        assert_eq!(config.backend.models[0], "gemini-2.0-flash");
        assert_eq!(config.dispatch.dedup_ttl_secs, 600);
        assert!(config.storage.wal_mode);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let toml = r#"
            [agent]
            naem = "oops"
        "#;
        let result: Result<WatariConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
    }
}
