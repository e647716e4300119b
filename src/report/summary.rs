//! Yearly summary tables for the CSV outputs.

use crate::data::InflationTable;
use crate::stats::{PriceIndex, YearBucketTotals};
use polars::prelude::*;

/// One row of `grants_nominal_summary.csv`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NominalSummaryRow {
    pub year: i32,
    pub total_amount: f64,
}

/// One row of `grants_inflation_adjusted_summary.csv`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjustedSummaryRow {
    pub year: i32,
    pub total_amount: f64,
    /// `None` when the year is absent from the inflation table.
    pub inflation_rate: Option<f64>,
    pub cpi_index: Option<f64>,
    pub inflation_multiplier: f64,
    pub inflation_adjusted_amount: f64,
}

/// Year totals across all buckets.
pub fn nominal_summary(totals: &YearBucketTotals) -> Vec<NominalSummaryRow> {
    totals
        .totals_by_year()
        .into_iter()
        .map(|(year, total_amount)| NominalSummaryRow { year, total_amount })
        .collect()
}

/// Per-year nominal and adjusted totals, with the inflation rate and index
/// joined in for years the inflation table covers.
pub fn adjusted_summary(
    nominal: &YearBucketTotals,
    adjusted: &YearBucketTotals,
    inflation: &InflationTable,
    index: &PriceIndex,
    target_year: i32,
) -> Vec<AdjustedSummaryRow> {
    let adjusted_by_year = adjusted.totals_by_year();

    nominal
        .totals_by_year()
        .into_iter()
        .map(|(year, total_amount)| AdjustedSummaryRow {
            year,
            total_amount,
            inflation_rate: inflation.rate_for(year),
            cpi_index: index.get(year),
            inflation_multiplier: index.multiplier(year, target_year),
            inflation_adjusted_amount: adjusted_by_year.get(&year).copied().unwrap_or(total_amount),
        })
        .collect()
}

pub fn nominal_frame(rows: &[NominalSummaryRow]) -> PolarsResult<DataFrame> {
    DataFrame::new(vec![
        Column::new("Year".into(), rows.iter().map(|r| r.year).collect::<Vec<i32>>()),
        Column::new(
            "Total_Amount".into(),
            rows.iter().map(|r| r.total_amount).collect::<Vec<f64>>(),
        ),
    ])
}

pub fn adjusted_frame(rows: &[AdjustedSummaryRow]) -> PolarsResult<DataFrame> {
    DataFrame::new(vec![
        Column::new("Year".into(), rows.iter().map(|r| r.year).collect::<Vec<i32>>()),
        Column::new(
            "Total_Amount".into(),
            rows.iter().map(|r| r.total_amount).collect::<Vec<f64>>(),
        ),
        Column::new(
            "Inflation_Rate".into(),
            rows.iter().map(|r| r.inflation_rate).collect::<Vec<Option<f64>>>(),
        ),
        Column::new(
            "CPI_Index".into(),
            rows.iter().map(|r| r.cpi_index).collect::<Vec<Option<f64>>>(),
        ),
        Column::new(
            "Inflation_Multiplier".into(),
            rows.iter().map(|r| r.inflation_multiplier).collect::<Vec<f64>>(),
        ),
        Column::new(
            "Inflation_Adjusted_Amount".into(),
            rows.iter()
                .map(|r| r.inflation_adjusted_amount)
                .collect::<Vec<f64>>(),
        ),
    ])
}
