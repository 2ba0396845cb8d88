//! CLI for the routewatch travel-time collector.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use routewatch_core::config::{self, RouteWatchConfig};
use routewatch_core::logging;
use std::path::PathBuf;

use commands::{run_analyze, run_collect, run_routes, run_scheduler, run_verify};

/// Top-level CLI for routewatch.
#[derive(Debug, Parser)]
#[command(name = "routewatch")]
#[command(about = "Collect travel times for fixed routes every few minutes", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/routewatch/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Collect on every clock-aligned boundary until interrupted.
    Run {
        /// Do not print the live countdown to the next run.
        #[arg(long)]
        no_countdown: bool,
    },

    /// Run a single collection cycle now.
    Collect,

    /// Show the most recent measurements.
    Verify {
        /// Number of measurements to show.
        #[arg(long, default_value = "5", value_name = "N")]
        limit: u32,
    },

    /// Summarize all stored measurements (coverage, gaps, daily stats).
    Analyze,

    /// List configured routes.
    Routes,
}

impl Cli {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = load_config(&cli)?;

        if let Err(e) = logging::init_logging(cfg.log_file.as_deref()) {
            logging::init_logging_stderr();
            tracing::warn!("file logging unavailable ({:#}); logging to stderr only", e);
        }
        tracing::debug!(routes = cfg.routes.len(), "loaded config");
        cfg.validate()?;

        match cli.command {
            CliCommand::Run { no_countdown } => run_scheduler(&cfg, !no_countdown).await?,
            CliCommand::Collect => run_collect(&cfg).await?,
            CliCommand::Verify { limit } => run_verify(&cfg, limit).await?,
            CliCommand::Analyze => run_analyze(&cfg).await?,
            CliCommand::Routes => run_routes(&cfg),
        }

        Ok(())
    }
}

fn load_config(cli: &Cli) -> Result<RouteWatchConfig> {
    match &cli.config {
        Some(path) => config::load_from(path),
        None => config::load_or_init(),
    }
}

#[cfg(test)]
mod tests;
