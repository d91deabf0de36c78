// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-based loader.
//!
//! Merge order (later overrides earlier): compiled defaults,
//! `/etc/parley/parley.toml`, `~/.config/parley/parley.toml`,
//! `./parley.toml`, then `PARLEY_*` environment variables.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use tracing::debug;

use crate::model::ParleyConfig;

/// Sections whose env vars are mapped `PARLEY_<SECTION>_<KEY>` → `<section>.<key>`.
const SECTIONS: &[&str] = &["client", "poll", "vetting"];

/// TOML files consulted by [`load_config`], lowest precedence first.
pub fn candidate_files() -> Vec<PathBuf> {
    let mut files = vec![PathBuf::from("/etc/parley/parley.toml")];
    if let Some(dir) = dirs::config_dir() {
        files.push(dir.join("parley").join("parley.toml"));
    }
    files.push(PathBuf::from("parley.toml"));
    files
}

/// Build the layered Figment without extracting it.
pub fn build_figment() -> Figment {
    candidate_files()
        .into_iter()
        .fold(defaults(), |figment, file| {
            if file.is_file() {
                debug!(path = %file.display(), "merging config file");
            }
            figment.merge(Toml::file(file))
        })
        .merge(env_provider())
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<ParleyConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from one TOML file with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ParleyConfig, figment::Error> {
    defaults()
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Load configuration from an inline TOML string. No env overrides.
pub fn load_config_from_str(toml_content: &str) -> Result<ParleyConfig, figment::Error> {
    defaults().merge(Toml::string(toml_content)).extract()
}

fn defaults() -> Figment {
    Figment::new().merge(Serialized::defaults(ParleyConfig::default()))
}

/// Maps `PARLEY_POLL_INTERVAL_MS` to `poll.interval_ms`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// keys that themselves contain underscores survive intact.
pub(crate) fn env_provider() -> Env {
    Env::prefixed("PARLEY_").map(|key| {
        let key = key.as_str();
        SECTIONS
            .iter()
            .find_map(|section| {
                key.strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| format!("{section}.{rest}"))
            })
            .unwrap_or_else(|| key.to_string())
            .into()
    })
}
