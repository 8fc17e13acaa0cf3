// ABOUTME: LiftLog CLI - command-line front end for the exercise history engine
// ABOUTME: Builds history reports and inspects the persistent session detail cache
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Exercise history for the configured upstream account
//! LIFTLOG_API_TOKEN=... liftlog-cli history --user 12345
//!
//! # Same report with a shorter recovery window
//! liftlog-cli history --user 12345 --recovery-hours 48
//!
//! # Offline run against generated training data
//! liftlog-cli history --user demo --synthetic
//!
//! # Show what the detail cache holds for one session
//! liftlog-cli cache inspect --user 12345 --session 987654
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use liftlog::config::EngineConfig;
use liftlog::logging::{LogFormat, LoggingConfig};

#[derive(Parser)]
#[command(
    name = "liftlog-cli",
    about = "LiftLog exercise history engine",
    long_about = "Aggregates completed strength-training sessions into per-exercise history and muscle fatigue."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Print the exercise history report as JSON
    History {
        /// Upstream user id (defaults to `LIFTLOG_API_USER_ID`)
        #[arg(long)]
        user: Option<String>,

        /// Hours for a fully fatigued muscle to recover (clamped to 24-168)
        #[arg(long)]
        recovery_hours: Option<f64>,

        /// Use generated training data instead of the upstream API
        #[arg(long)]
        synthetic: bool,
    },

    /// Persistent detail cache commands
    Cache {
        #[command(subcommand)]
        action: CacheCommand,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum CacheCommand {
    /// Show the stored entry for one session and whether it is current
    Inspect {
        /// Upstream user id
        #[arg(long)]
        user: String,

        /// Session id
        #[arg(long)]
        session: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        "debug".clone_into(&mut logging.level);
        logging.format = LogFormat::Compact;
    }
    logging.init()?;

    let mut config = EngineConfig::from_env()?;
    if let Some(database_url) = cli.database_url {
        config.cache.database_url = database_url;
    }

    match cli.command {
        Command::History {
            user,
            recovery_hours,
            synthetic,
        } => {
            commands::history::run(&config, user, recovery_hours, synthetic).await?;
        }
        Command::Cache { action } => match action {
            CacheCommand::Inspect { user, session } => {
                commands::cache::inspect(&config, &user, &session).await?;
            }
        },
    }

    Ok(())
}
