// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is a
//! startup error rather than a silently ignored setting.

use parley_core::Counterparty;
use serde::{Deserialize, Serialize};

/// Top-level Parley configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ParleyConfig {
    /// Process-wide client settings.
    #[serde(default)]
    pub client: ClientConfig,

    /// History poll channel settings.
    #[serde(default)]
    pub poll: PollConfig,

    /// Vetting Q/A extraction settings.
    #[serde(default)]
    pub vetting: VettingConfig,
}

/// Process-wide client settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// History poll channel settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PollConfig {
    /// Milliseconds between history polls while a session is open.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Maximum number of snapshots requested per poll.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            history_limit: default_history_limit(),
        }
    }
}

impl PollConfig {
    pub fn interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.interval_ms)
    }
}

fn default_interval_ms() -> u64 {
    3000
}

fn default_history_limit() -> usize {
    10
}

/// Vetting Q/A extraction settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VettingConfig {
    /// Identity used when a header names the generic "counterparty" and no
    /// usable hint is available.
    #[serde(default)]
    pub default_counterparty: Counterparty,
}
