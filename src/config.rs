//! Command-line and environment configuration.

use crate::agent::store::DEFAULT_DB_PATH;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "call-analysis", version, about = "Call transcript intent and sentiment analysis")]
pub struct Cli {
    /// SQLite database holding transcripts and analysis results
    #[arg(long, global = true, env = "CALL_ANALYSIS_DB", default_value = DEFAULT_DB_PATH)]
    pub db: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API
    Serve {
        #[arg(long, env = "HOST", default_value = "127.0.0.1")]
        host: String,

        #[arg(long, env = "PORT", default_value_t = 8080)]
        port: u16,

        /// Load the sample transcripts into an empty database first
        #[arg(long)]
        seed: bool,
    },
    /// Serve tools as JSON-RPC over stdin/stdout
    Mcp {
        #[arg(long)]
        seed: bool,
    },
    /// Load the sample transcripts and exit
    Seed,
}

/// What the process should run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Http { host: String, port: u16 },
    Stdio,
    SeedOnly,
}

/// Resolved runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub seed_sample_data: bool,
    pub mode: Mode,
}

impl From<Cli> for AppConfig {
    fn from(cli: Cli) -> Self {
        let (mode, seed_sample_data) = match cli.command {
            Command::Serve { host, port, seed } => (Mode::Http { host, port }, seed),
            Command::Mcp { seed } => (Mode::Stdio, seed),
            Command::Seed => (Mode::SeedOnly, true),
        };
        Self {
            database_path: cli.db,
            seed_sample_data,
            mode,
        }
    }
}
