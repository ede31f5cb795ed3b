use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bt_cli::commands::{log, results, run, util};
use bt_cli::{Cli, Commands};
use bt_core::{RaceConfig, RaceProcessor};

/// Load and validate the race config.
fn load_config(config_path: Option<&Path>) -> Result<RaceConfig> {
    if let Some(path) = config_path {
        anyhow::ensure!(path.exists(), "config file not found: {}", path.display());
    }

    let config = bt_cli::load_from(config_path).context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn replay(config_path: Option<&Path>, events: &Path) -> Result<RaceProcessor> {
    let config = load_config(config_path)?;
    util::replay_file(events, config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support; stdout is reserved for reports
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Some(Commands::Run { events }) => {
            let processor = replay(cli.config.as_deref(), events)?;
            run::run(&mut out, &processor)?;
        }
        Some(Commands::Log { events }) => {
            let processor = replay(cli.config.as_deref(), events)?;
            log::run(&mut out, &processor)?;
        }
        Some(Commands::Results { events, json }) => {
            let processor = replay(cli.config.as_deref(), events)?;
            results::run(&mut out, &processor, *json)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    out.flush()?;
    Ok(())
}
