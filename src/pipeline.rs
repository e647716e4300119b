//! Report pipeline.
//!
//! One run: load grants → classify → aggregate → nominal outputs, then
//! load inflation → build index → adjust → adjusted outputs and CPI chart.
//! Stages run strictly in sequence over in-memory tables.

use crate::charts::{ChartRenderer, LineChartData, RenderError, StackedBarData};
use crate::config::Config;
use crate::data::{DataLoader, DataProcessor, DropCounts, LoaderError};
use crate::report::{self, ReportError, ReportWriter};
use crate::stats::{adjust_totals, uncovered_years, IndexError, PriceIndex, YearBucketTotals};
use polars::prelude::PolarsError;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error(transparent)]
    Index(#[from] IndexError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error("Failed to render {file}: {source}")]
    Render {
        file: &'static str,
        #[source]
        source: RenderError,
    },
    #[error("Failed to build summary table: {0}")]
    Table(#[from] PolarsError),
}

/// Counts and coverage information for one run, written to `run_report.json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub target_year: i32,
    pub grant_rows_read: usize,
    pub grant_rows_aggregated: usize,
    pub grant_rows_dropped: DropCounts,
    pub inflation_rows_read: usize,
    pub inflation_rows_dropped: usize,
    pub index_base_year: Option<i32>,
    /// Grant years whose amounts were left unadjusted.
    pub uncovered_years: Vec<i32>,
    pub files_written: Vec<String>,
}

/// Runs the whole report for one configuration.
pub struct Pipeline<'a> {
    config: &'a Config,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<RunSummary, PipelineError> {
        let target_year = self.config.adjustment.target_year;

        // Grants
        info!("Loading grants from {}", self.config.input.grants.display());
        let records = DataLoader::load_grants(&self.config.input.grants)?;
        let processed = DataProcessor::classify_records(&records);
        info!(
            "Aggregating {} of {} grant rows ({} dropped: {} without a usable date, {} without a numeric amount)",
            processed.awards.len(),
            records.len(),
            processed.dropped.total(),
            processed.dropped.missing_date,
            processed.dropped.missing_amount
        );

        let nominal = YearBucketTotals::aggregate(&processed.awards);
        if nominal.is_empty() {
            warn!("No grant rows survived cleaning; summaries will be empty");
        }
        debug!(
            "{} (year, bucket) groups across {} years",
            nominal.len(),
            nominal.years().len()
        );

        let writer = ReportWriter::create(&self.config.output.directory)?;
        let mut files_written = Vec::new();

        // Nominal outputs
        if self.config.output.charts {
            let data = StackedBarData::from_totals(
                &nominal,
                "Grant Amounts by Year and Primary Program (Nominal Values)",
                "Amount ($Billions)",
            );
            self.write_bar_chart(&writer, report::NOMINAL_CHART_FILE, &data)?;
            files_written.push(report::NOMINAL_CHART_FILE.to_string());
        }

        let mut nominal_df = report::nominal_frame(&report::nominal_summary(&nominal))?;
        writer.write_csv(report::NOMINAL_SUMMARY_FILE, &mut nominal_df)?;
        files_written.push(report::NOMINAL_SUMMARY_FILE.to_string());

        // Inflation
        info!("Loading inflation history from {}", self.config.input.inflation.display());
        let inflation = DataLoader::load_inflation(&self.config.input.inflation)?;
        if inflation.dropped_rows > 0 {
            warn!(
                "Ignored {} inflation rows without a usable year",
                inflation.dropped_rows
            );
        }

        let index = PriceIndex::build(&inflation.observations)?;
        info!(
            "Built price index over {} years (base {} = 100)",
            index.len(),
            index.first_year().unwrap_or_default()
        );

        if !index.contains(target_year) {
            warn!(
                "Target year {} is not in the inflation table; adjusted amounts equal nominal amounts",
                target_year
            );
        }
        let uncovered = uncovered_years(&nominal, &index, target_year);
        for year in uncovered.iter().filter(|&&year| !index.contains(year)) {
            warn!("No inflation data for {}; amounts left unadjusted", year);
        }

        let adjusted = adjust_totals(&nominal, &index, target_year);

        // Adjusted outputs
        if self.config.output.charts {
            let data = StackedBarData::from_totals(
                &adjusted,
                &format!(
                    "Grant Amounts by Year and Primary Program (Inflation-Adjusted to {} Dollars)",
                    target_year
                ),
                "Amount ($Billions Inflation Adjusted)",
            );
            self.write_bar_chart(&writer, report::ADJUSTED_CHART_FILE, &data)?;
            files_written.push(report::ADJUSTED_CHART_FILE.to_string());
        }

        let rows = report::adjusted_summary(&nominal, &adjusted, &inflation, &index, target_year);
        let mut adjusted_df = report::adjusted_frame(&rows)?;
        writer.write_csv(report::ADJUSTED_SUMMARY_FILE, &mut adjusted_df)?;
        files_written.push(report::ADJUSTED_SUMMARY_FILE.to_string());

        if self.config.output.charts {
            let chart = &self.config.charts;
            let image = ChartRenderer::render_index_line(
                &LineChartData::from_index(&index),
                chart.line_width,
                chart.line_height,
            )
            .map_err(|source| PipelineError::Render {
                file: report::CPI_CHART_FILE,
                source,
            })?;
            writer.write_png(report::CPI_CHART_FILE, &image)?;
            files_written.push(report::CPI_CHART_FILE.to_string());
        }

        if self.config.output.run_report {
            files_written.push(report::RUN_REPORT_FILE.to_string());
        }

        let summary = RunSummary {
            target_year,
            grant_rows_read: records.len(),
            grant_rows_aggregated: processed.awards.len(),
            grant_rows_dropped: processed.dropped,
            inflation_rows_read: inflation.observations.len() + inflation.dropped_rows,
            inflation_rows_dropped: inflation.dropped_rows,
            index_base_year: index.first_year(),
            uncovered_years: uncovered,
            files_written,
        };

        if self.config.output.run_report {
            writer.write_json(report::RUN_REPORT_FILE, &summary)?;
        }

        info!("Outputs written to {}", self.output_dir().display());
        Ok(summary)
    }

    fn write_bar_chart(
        &self,
        writer: &ReportWriter,
        file: &'static str,
        data: &StackedBarData,
    ) -> Result<(), PipelineError> {
        let image = ChartRenderer::render_stacked_bar(
            data,
            self.config.charts.bar_width,
            self.config.charts.bar_height,
        )
        .map_err(|source| PipelineError::Render { file, source })?;
        writer.write_png(file, &image)?;
        Ok(())
    }

    fn output_dir(&self) -> &Path {
        &self.config.output.directory
    }
}
