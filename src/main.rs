//! Grant Inflation Report - award totals by year and program
//!
//! Reads a grants table and an inflation history, then writes stacked bar
//! charts and yearly summary CSVs in nominal and constant dollars, plus a
//! chart of the derived price index.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Invalid arguments, unreadable input or failed output

mod charts;
mod cli;
mod config;
mod data;
mod pipeline;
mod report;
mod stats;

use anyhow::{Context, Result};
use cli::Args;
use config::Config;
use pipeline::Pipeline;
use std::path::Path;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<()> {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // No logging needed
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args)?;

    info!("Grant Inflation Report v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(&args) {
        error!("Report failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: write a default .grant-report.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(Config::FILE_NAME);

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit it manually.",
            Config::FILE_NAME
        );
        std::process::exit(1);
    }

    std::fs::write(path, Config::default_toml())
        .with_context(|| format!("Failed to write {}", Config::FILE_NAME))?;

    println!("Created {} with default settings.", Config::FILE_NAME);
    Ok(())
}

/// RUST_LOG takes precedence over --verbose / --quiet.
fn init_logging(args: &Args) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level().as_str().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

fn run(args: &Args) -> Result<()> {
    let mut config = Config::resolve(args.config.as_deref())?;
    config.merge_with_args(args);
    config.validate()?;
    debug!("Configuration: {:?}", config);

    let summary = Pipeline::new(&config).run()?;

    info!(
        "Aggregated {} of {} grant rows in {}-year dollars",
        summary.grant_rows_aggregated, summary.grant_rows_read, summary.target_year
    );
    for file in &summary.files_written {
        println!("{}", config.output.directory.join(file).display());
    }

    Ok(())
}
