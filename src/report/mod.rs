//! Report module - summary tables and output files

mod summary;
mod writer;

pub use summary::{adjusted_frame, adjusted_summary, nominal_frame, nominal_summary};
pub use writer::{ReportError, ReportWriter};

pub const NOMINAL_CHART_FILE: &str = "grants_nominal.png";
pub const NOMINAL_SUMMARY_FILE: &str = "grants_nominal_summary.csv";
pub const ADJUSTED_CHART_FILE: &str = "grants_inflation_adjusted.png";
pub const ADJUSTED_SUMMARY_FILE: &str = "grants_inflation_adjusted_summary.csv";
pub const CPI_CHART_FILE: &str = "cpi_index_chart.png";
pub const RUN_REPORT_FILE: &str = "run_report.json";
