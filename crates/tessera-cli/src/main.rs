// crates/tessera-cli/src/main.rs
//
// CLI entrypoint for the Tessera operator tools.
//
// Loads configuration, initializes tracing, and dispatches to the decay
// inspection and scenario simulation subcommands.

mod commands;
mod config;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use commands::decay::DecayCmd;
use commands::simulate::SimulateCmd;
use config::TesseraConfig;

/// Tessera CLI: host reputation and piece availability tools.
#[derive(Parser, Debug)]
#[command(
    name = "tessera",
    version = "0.1.0",
    about = "Tessera CLI for host reputation decay and erasure-coded file availability"
)]
struct Cli {
    /// Path to the TOML configuration file (default: ~/.tessera/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply one decay step to a host's interaction counters.
    Decay(DecayCmd),

    /// Replay a scenario of host interactions and piece events.
    Simulate(SimulateCmd),
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let (config, load_error) = match TesseraConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (TesseraConfig::default(), Some(e)),
    };

    // Initialize tracing subscriber for structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match load_error {
        None => tracing::info!("Loaded configuration from {}", config_path.display()),
        Some(e) => tracing::warn!(
            "Could not load config from {}: {}. Using defaults.",
            config_path.display(),
            e
        ),
    }

    match &cli.command {
        Commands::Decay(cmd) => commands::decay::run(cmd, &config.reputation)?,
        Commands::Simulate(cmd) => commands::simulate::run(cmd, &config.reputation)?,
    }

    Ok(())
}
