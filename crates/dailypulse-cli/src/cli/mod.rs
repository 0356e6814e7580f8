//! CLI for Daily Pulse.

mod commands;
mod shell;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dailypulse_core::config;
use std::path::PathBuf;

use commands::{run_check, run_status, run_watch};

/// Top-level CLI for Daily Pulse.
#[derive(Debug, Parser)]
#[command(name = "dailypulse")]
#[command(about = "Daily Pulse: keep today's audio news cached and ready to play", long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of ~/.config/dailypulse/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Check for a new revision now and download it if there is one.
    Check {
        /// Launch the configured player once the audio is ready.
        #[arg(long)]
        play: bool,
    },

    /// Show the cached revision, the countdown to the next one and the audio file.
    Status {
        /// Print machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Check at start-up, then keep the countdown fresh. Press Enter to check again.
    Watch {
        /// Launch the configured player whenever audio is ready.
        #[arg(long)]
        play: bool,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = match &cli.config {
            Some(path) => config::load_from_path(path)?,
            None => {
                let cfg = config::load_or_init()?;
                cfg.validate()?;
                cfg
            }
        };
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Check { play } => run_check(&cfg, play).await?,
            CliCommand::Status { json } => run_status(&cfg, json).await?,
            CliCommand::Watch { play } => run_watch(&cfg, play).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
