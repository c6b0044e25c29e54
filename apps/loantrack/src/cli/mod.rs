//! # loantrack CLI Module
//!
//! This module implements the CLI interface for loantrack.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `stages` - List the stage order
//! - `track` - Show the tracker for a stage
//! - `config` - Show the effective configuration

mod commands;

use crate::config::{AppConfig, DEFAULT_CONFIG_FILE};
use clap::{Parser, Subcommand};
use loantrack_core::TrackerError;
use std::path::{Path, PathBuf};

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// loantrack - Loan stage tracker
///
/// Shows which steps of the loan workflow are completed, current, or
/// pending for a given stage, hiding steps superseded by a disbursement
/// outcome.
#[derive(Parser, Debug)]
#[command(name = "loantrack")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the configuration file (must exist; default: ./loantrack.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to (overrides config)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List all stages in order
    Stages,

    /// Show the tracker for a loan at STAGE
    Track {
        /// Current stage identifier, e.g. `disbursement-processing`
        stage: String,

        /// Theme used for colour tokens (light, dark)
        #[arg(short, long)]
        theme: Option<String>,
    },

    /// Show the effective configuration
    Config,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
///
/// Configuration is loaded only by commands that read it, so `stages`
/// works even when the config file is broken.
pub async fn execute(cli: Cli) -> Result<(), TrackerError> {
    let json_mode = cli.json_mode;
    let explicit = cli.config.as_deref();

    match cli.command {
        Some(Commands::Stages) | None => cmd_stages(json_mode),
        Some(Commands::Server { host, port }) => {
            cmd_server(AppConfig::load(explicit)?, host, port).await
        }
        Some(Commands::Track { stage, theme }) => {
            let config = AppConfig::load(explicit)?;
            cmd_track(&config, json_mode, &stage, theme.as_deref())
        }
        Some(Commands::Config) => {
            let config = AppConfig::load(explicit)?;
            let path = explicit.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
            cmd_config(path, &config, json_mode)
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
