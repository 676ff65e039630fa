//! CLI command definitions and dispatch for the `agora` binary.
//!
//! Uses clap derive macros for argument parsing. Operator commands
//! (`status`, `words`) run against the same services the server uses.

pub mod status;
pub mod words;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Deduplicated voting, comments, and a word cloud for public engagement.
#[derive(Parser)]
#[command(name = "agora", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on (overrides config.toml, default 3001).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides config.toml, default 127.0.0.1).
        #[arg(long)]
        host: Option<String>,

        /// Export spans via OpenTelemetry (stdout exporter).
        #[arg(long)]
        otel: bool,
    },

    /// Engagement dashboard: votes, comments, word cloud.
    Status,

    /// Manage the word cloud (list, delete, clear).
    Words {
        #[command(subcommand)]
        action: words::WordsCommand,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
