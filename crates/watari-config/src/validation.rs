// SPDX-FileCopyrightText: 2026 Watari Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as non-empty model lists and a sane bind address.

use crate::diagnostic::ConfigError;
use crate::model::WatariConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &WatariConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Validate bind host is not empty and looks like an IP or hostname.
    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!(
                    "server.host `{host}` is not a valid IP address or hostname"
                ),
            });
        }
    }

    // At least one model candidate is required for fallback to mean anything.
    if config.backend.models.is_empty() {
        errors.push(ConfigError::Validation {
            message: "backend.models must list at least one model candidate".to_string(),
        });
    }
    for (i, model) in config.backend.models.iter().enumerate() {
        if model.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("backend.models[{i}] must not be empty"),
            });
        }
    }

    if config.backend.endpoint.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "backend.endpoint must not be empty".to_string(),
        });
    }

    if config.channel.reply_endpoint.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "channel.reply_endpoint must not be empty".to_string(),
        });
    }

    // A zero TTL would disable the replay guard entirely.
    if config.dispatch.dedup_ttl_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "dispatch.dedup_ttl_secs must be greater than zero".to_string(),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = WatariConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_model_list_is_rejected() {
        let mut config = WatariConfig::default();
        config.backend.models.clear();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.to_string().contains("backend.models")));
    }

    #[test]
    fn zero_dedup_ttl_is_rejected() {
        let mut config = WatariConfig::default();
        config.dispatch.dedup_ttl_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.to_string().contains("dedup_ttl_secs")));
    }

    #[test]
    fn collects_multiple_errors() {
        let mut config = WatariConfig::default();
        config.server.host = String::new();
        config.storage.database_path = String::new();
        config.backend.models.clear();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
