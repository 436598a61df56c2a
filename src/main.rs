//! Periodica - periodic seasonal features for period-indexed time series
//!
//! Computes `sin((t - start_date) / period)` for every period of a
//! generated index and prints the resulting column.

mod commands;
mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::TransformArgs;
use periodica_observability::{init_logging, parse_level, LogFormat};
use std::path::PathBuf;
use tracing::{info, Level};

#[derive(Debug, Parser)]
#[command(
    name = "periodica",
    version,
    about = "Periodic seasonal features for period-indexed time series"
)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute the periodic feature and print it
    Transform(TransformArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, source) =
        config::load_config(cli.config.as_deref()).context("Failed to load configuration")?;

    // Initialize logging
    let log_format = config
        .logging
        .format
        .or_else(|| {
            std::env::var("LOG_FORMAT")
                .ok()
                .and_then(|f| f.parse::<LogFormat>().ok())
        })
        .unwrap_or_default();

    let log_level = config
        .logging
        .level
        .clone()
        .or_else(|| std::env::var("LOG_LEVEL").ok())
        .map(|l| parse_level(&l))
        .unwrap_or(Level::INFO);

    init_logging(log_format, log_level);

    match &source {
        Some(path) => info!(path = %path.display(), "Loaded configuration"),
        None => info!("Config file not found, using defaults"),
    }

    match cli.command {
        Command::Transform(args) => args.run(config),
    }
}
