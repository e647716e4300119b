//! Command-line interface argument parsing.
//!
//! Every flag is optional; with none given the tool reads `grants_data.csv`
//! and `inflation_history.csv` from the working directory and writes to
//! `Outputs/`.

use clap::Parser;
use std::path::PathBuf;

/// Grant award totals by year and program, nominal and inflation-adjusted.
///
/// Examples:
///   grant_inflation_report
///   grant_inflation_report --grants awards.csv --target-year 2020
///   grant_inflation_report --output-dir reports --no-charts
///   grant_inflation_report --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Grants table (CSV) [default: grants_data.csv]
    #[arg(long, value_name = "FILE")]
    pub grants: Option<PathBuf>,

    /// Inflation history table (CSV) [default: inflation_history.csv]
    #[arg(long, value_name = "FILE")]
    pub inflation: Option<PathBuf>,

    /// Directory for charts and summaries [default: Outputs]
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Express adjusted amounts in this year's dollars [default: 2024]
    #[arg(short, long, value_name = "YEAR", env = "GRANT_REPORT_TARGET_YEAR")]
    pub target_year: Option<i32>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .grant-report.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Skip PNG chart rendering
    #[arg(long)]
    pub no_charts: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Write a default .grant-report.toml and exit
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate argument combinations.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }
        Ok(())
    }

    /// Log level implied by --verbose / --quiet.
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::ERROR
        } else {
            tracing::Level::INFO
        }
    }
}
