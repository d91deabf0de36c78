// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks that serde attributes cannot express.

use crate::diagnostic::ConfigError;
use crate::model::ParleyConfig;

/// Shortest poll interval accepted, in milliseconds.
pub const MIN_POLL_INTERVAL_MS: u64 = 250;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Validate a deserialized configuration, collecting every failure.
pub fn validate_config(config: &ParleyConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.client.log_level.trim().to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "client.log_level `{}` is not one of {}",
                config.client.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.poll.interval_ms < MIN_POLL_INTERVAL_MS {
        errors.push(ConfigError::Validation {
            message: format!(
                "poll.interval_ms must be at least {MIN_POLL_INTERVAL_MS}, got {}",
                config.poll.interval_ms
            ),
        });
    }

    if config.poll.history_limit == 0 {
        errors.push(ConfigError::Validation {
            message: "poll.history_limit must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
