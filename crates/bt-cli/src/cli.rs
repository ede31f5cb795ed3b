//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Biathlon race log processor.
///
/// Replays a timing-system event log and reports what happened to every
/// competitor, followed by the final standings.
#[derive(Debug, Parser)]
#[command(name = "biathlon", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a race config file (TOML, or JSON with a `.json` extension).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the narrative log followed by the results table.
    Run {
        /// Event log to replay.
        #[arg(default_value = "events")]
        events: PathBuf,
    },

    /// Print the narrative log only.
    Log {
        /// Event log to replay.
        #[arg(default_value = "events")]
        events: PathBuf,
    },

    /// Print the results table only.
    Results {
        /// Event log to replay.
        #[arg(default_value = "events")]
        events: PathBuf,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}
