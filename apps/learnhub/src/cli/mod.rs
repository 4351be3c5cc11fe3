//! # Learnhub CLI Module
//!
//! This module implements the CLI interface for Learnhub.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `status` - Show row counts per table
//! - `export` - Write a store snapshot to a JSON file
//!
//! Every command works on the seed dataset unless `--data` names a
//! snapshot file written by `export`.

mod commands;

use crate::config::ServerConfig;
use clap::{Parser, Subcommand};
use learnhub_core::HubError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// ERRORS
// =============================================================================

/// Anything a CLI command can fail with.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Store(#[from] HubError),
}

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Learnhub - educational content server
///
/// Serves concepts, theory, code, experiments and papers on semi- and
/// self-supervised learning over a JSON REST API.
#[derive(Parser, Debug)]
#[command(name = "learnhub")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Snapshot file to load instead of the seed dataset
    #[arg(short = 'd', long, global = true)]
    pub data: Option<PathBuf>,

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
        /// Host to bind to (overrides config and LEARNHUB_HOST)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides config and LEARNHUB_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show row counts per table
    Status,

    /// Write a store snapshot as JSON
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments and the loaded configuration.
pub async fn execute(cli: Cli, config: ServerConfig) -> Result<(), CliError> {
    let data = cli.data.as_deref();

    match cli.command {
        Some(Commands::Server { host, port }) => {
            let config = config.with_cli_overrides(host, port);
            cmd_server(config, data).await?;
        }
        Some(Commands::Status) => cmd_status(data, cli.json_mode)?,
        Some(Commands::Export { output }) => {
            cmd_export(data, &output)?;
        }
        None => {
            // No subcommand - show status by default
            cmd_status(data, cli.json_mode)?;
        }
    }
    Ok(())
}
