//! Configuration file handling.
//!
//! Settings come from `.grant-report.toml` (or `--config`), with every field
//! defaulted so that an absent file reproduces the fixed-filename behaviour.
//! Command-line flags override file values.

use crate::cli::Args;
use crate::stats::DEFAULT_TARGET_YEAR;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Input tables.
    #[serde(default)]
    pub input: InputConfig,

    /// Output location and which artifacts to produce.
    #[serde(default)]
    pub output: OutputConfig,

    /// Inflation adjustment settings.
    #[serde(default)]
    pub adjustment: AdjustmentConfig,

    /// Chart image sizes.
    #[serde(default)]
    pub charts: ChartConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Grants table (CSV).
    #[serde(default = "default_grants")]
    pub grants: PathBuf,

    /// Inflation history table (CSV).
    #[serde(default = "default_inflation")]
    pub inflation: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            grants: default_grants(),
            inflation: default_inflation(),
        }
    }
}

fn default_grants() -> PathBuf {
    PathBuf::from("grants_data.csv")
}

fn default_inflation() -> PathBuf {
    PathBuf::from("inflation_history.csv")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory all outputs are written to. Created if absent.
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,

    /// Render PNG charts.
    #[serde(default = "default_true")]
    pub charts: bool,

    /// Write `run_report.json` with row counts and coverage gaps.
    #[serde(default = "default_true")]
    pub run_report: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            charts: true,
            run_report: true,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("Outputs")
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustmentConfig {
    /// Year whose dollars adjusted amounts are expressed in.
    #[serde(default = "default_target_year")]
    pub target_year: i32,
}

impl Default for AdjustmentConfig {
    fn default() -> Self {
        Self {
            target_year: default_target_year(),
        }
    }
}

fn default_target_year() -> i32 {
    DEFAULT_TARGET_YEAR
}

/// Pixel sizes of the rendered charts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_bar_width")]
    pub bar_width: u32,

    #[serde(default = "default_bar_height")]
    pub bar_height: u32,

    #[serde(default = "default_line_width")]
    pub line_width: u32,

    #[serde(default = "default_line_height")]
    pub line_height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            bar_width: default_bar_width(),
            bar_height: default_bar_height(),
            line_width: default_line_width(),
            line_height: default_line_height(),
        }
    }
}

fn default_bar_width() -> u32 {
    1500
}

fn default_bar_height() -> u32 {
    800
}

fn default_line_width() -> u32 {
    1200
}

fn default_line_height() -> u32 {
    600
}

impl Config {
    /// File looked up in the working directory when `--config` is not given.
    pub const FILE_NAME: &'static str = ".grant-report.toml";

    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load the explicitly requested file, else `.grant-report.toml` if it
    /// exists, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let local = Path::new(Self::FILE_NAME);
        if local.exists() {
            Self::load(local)
        } else {
            Ok(Self::default())
        }
    }

    /// Override file values with any flags given on the command line.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(grants) = &args.grants {
            self.input.grants = grants.clone();
        }
        if let Some(inflation) = &args.inflation {
            self.input.inflation = inflation.clone();
        }
        if let Some(dir) = &args.output_dir {
            self.output.directory = dir.clone();
        }
        if let Some(year) = args.target_year {
            self.adjustment.target_year = year;
        }
        if args.no_charts {
            self.output.charts = false;
        }
    }

    /// Reject settings no run could succeed with.
    pub fn validate(&self) -> Result<()> {
        if !(1000..=9999).contains(&self.adjustment.target_year) {
            bail!(
                "target_year must be a four-digit year, got {}",
                self.adjustment.target_year
            );
        }
        if self.output.directory.as_os_str().is_empty() {
            bail!("output directory must not be empty");
        }
        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
