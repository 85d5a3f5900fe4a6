use clap::Parser;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use pairlab::cli::{Cli, Commands};
use pairlab::commands;
use pairlab::config::AppConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logger: RUST_LOG wins over the --verbose flag.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.verbose));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let defaults = match &cli.config {
        Some(path) => AppConfig::load(Path::new(path))?,
        None => AppConfig::default(),
    };

    match &cli.command {
        Commands::Scan {
            data,
            p_threshold,
            min_observations,
            top,
            output,
        } => commands::run_scan(
            data,
            *p_threshold,
            *min_observations,
            *top,
            output,
            &defaults,
        )?,
        Commands::Backtest {
            data,
            pairs,
            pair,
            estimator,
            window,
            entry,
            exit,
            commission,
            num_pairs,
            output,
        } => commands::run_backtest(
            data,
            pairs.as_deref(),
            pair.as_deref(),
            estimator,
            *window,
            *entry,
            *exit,
            *commission,
            *num_pairs,
            output,
            &defaults,
        )?,
        Commands::Optimize {
            data,
            pair,
            windows,
            thresholds,
            exit,
            commission,
            output,
        } => commands::run_optimize(
            data,
            pair,
            windows.as_deref(),
            thresholds.as_deref(),
            *exit,
            *commission,
            output,
            &defaults,
        )?,
    }

    Ok(())
}
