// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for the Parley conversation client.
//!
//! TOML files are layered with Figment (system, user, local) and overridden
//! by `PARLEY_*` environment variables. Every section rejects unknown keys,
//! and failures are reported as miette diagnostics with typo suggestions.
//!
//! ```no_run
//! let config = parley_config::load_and_validate().expect("config errors");
//! println!("poll every {} ms", config.poll.interval_ms);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::ParleyConfig;

/// Load configuration from the standard hierarchy and validate it.
pub fn load_and_validate() -> Result<ParleyConfig, Vec<ConfigError>> {
    finish(loader::load_config(), loader::candidate_files)
}

/// Load configuration from a single TOML file (plus env overrides) and validate it.
pub fn load_and_validate_path(path: &std::path::Path) -> Result<ParleyConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path), || vec![path.to_path_buf()])
}

/// Load configuration from an inline TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<ParleyConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => validation::validate_config(&config).map(|()| config),
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::from_figment(err, &sources))
        }
    }
}

fn finish(
    loaded: Result<ParleyConfig, figment::Error>,
    files: impl FnOnce() -> Vec<std::path::PathBuf>,
) -> Result<ParleyConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => validation::validate_config(&config).map(|()| config),
        Err(err) => {
            let sources: Vec<(String, String)> = files()
                .into_iter()
                .filter_map(|path| {
                    std::fs::read_to_string(&path)
                        .ok()
                        .map(|content| (path.display().to_string(), content))
                })
                .collect();
            Err(diagnostic::from_figment(err, &sources))
        }
    }
}
