// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parley - conversation client core, driven from the command line.
//!
//! This is the binary entry point. It loads configuration, installs the
//! tracing subscriber, and dispatches to the `extract`, `replay`, and
//! `config` subcommands.

mod extract;
mod replay;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use parley_config::ParleyConfig;
use parley_core::ParleyError;
use parley_session::Conversation;
use parley_vetting::QaExtractor;
use tracing::debug;

/// Parley - reconcile conversation channels and extract vetting Q/A.
#[derive(Parser, Debug)]
#[command(name = "parley", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract the vetting Q/A block and addendum from one message (file or stdin).
    Extract {
        file: Option<PathBuf>,
        /// Counterparty to assume when the message only says "counterparty".
        #[arg(long)]
        hint: Option<String>,
    },
    /// Replay a JSON script of channel events and print the final view.
    Replay { file: PathBuf },
    /// Print the effective configuration as TOML.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => parley_config::load_and_validate_path(path),
        None => parley_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            parley_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.client.log_level);
    debug!(poll_interval_ms = config.poll.interval_ms, "config loaded");

    if let Err(e) = run(cli.command, &config) {
        eprintln!("parley: {e}");
        std::process::exit(1);
    }
}

fn run(command: Commands, config: &ParleyConfig) -> Result<(), ParleyError> {
    match command {
        Commands::Extract { file, hint } => extract::run_extract(
            file.as_deref(),
            hint.as_deref(),
            &QaExtractor::from_config(&config.vetting),
        ),
        Commands::Replay { file } => {
            let mut conversation = Conversation::from_config(config);
            replay::run_replay(&file, &mut conversation)
        }
        Commands::Config => {
            let rendered = toml::to_string_pretty(config)
                .map_err(|e| ParleyError::Internal(format!("failed to render config: {e}")))?;
            print!("{rendered}");
            Ok(())
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let level = log_level.trim().to_lowercase();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("parley={level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_loads_config_defaults() {
        let config = parley_config::load_and_validate_str("").expect("default config should be valid");
        assert_eq!(config.poll.interval_ms, 3000);
    }

    #[test]
    fn parses_extract_with_hint() {
        let cli = Cli::try_parse_from(["parley", "extract", "msg.txt", "--hint", "tenant"]).unwrap();
        match cli.command {
            Commands::Extract { file, hint } => {
                assert_eq!(file, Some(PathBuf::from("msg.txt")));
                assert_eq!(hint.as_deref(), Some("tenant"));
            }
            other => panic!("expected extract, got {other:?}"),
        }
    }

    #[test]
    fn extract_file_is_optional() {
        let cli = Cli::try_parse_from(["parley", "extract"]).unwrap();
        assert!(matches!(cli.command, Commands::Extract { file: None, .. }));
    }

    #[test]
    fn global_config_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["parley", "replay", "script.json", "--config", "p.toml"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("p.toml")));
        assert!(matches!(cli.command, Commands::Replay { .. }));
    }

    #[test]
    fn replay_requires_a_file() {
        assert!(Cli::try_parse_from(["parley", "replay"]).is_err());
    }

    #[test]
    fn config_command_renders_toml() {
        let config = ParleyConfig::default();
        run(Commands::Config, &config).expect("default config renders");
    }
}
