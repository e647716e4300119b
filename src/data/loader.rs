//! CSV Data Loader Module
//! Loads the grant and inflation tables with Polars and coerces them into typed records.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const DATE_COLUMN: &str = "President Approval/Award Date";
pub const AMOUNT_COLUMN: &str = "Amount";
pub const PROGRAM_COLUMN: &str = "Top Level Primary Program";
pub const YEAR_COLUMN: &str = "Year";
pub const RATE_COLUMN: &str = "Inflation_Rate";

/// Date layouts accepted for the award date column, tried in order.
const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%m/%d/%y",
    "%Y/%m/%d",
    "%d-%b-%Y",
    "%B %d, %Y",
    "%b %d, %Y",
];

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M"];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Input file not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to load CSV {path}: {source}")]
    CsvError {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
    #[error("Column '{column}' missing from {path}")]
    MissingColumn { column: &'static str, path: PathBuf },
}

/// One row of the grants table after coercion. Any field may be missing.
#[derive(Debug, Clone, PartialEq)]
pub struct AwardRecord {
    pub award_date: Option<NaiveDate>,
    pub amount: Option<f64>,
    pub program_label: Option<String>,
}

/// One row of the inflation table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InflationObservation {
    pub year: i32,
    /// Annual rate in percent; NaN when the source cell did not coerce.
    pub rate_percent: f64,
}

/// Inflation observations sorted by year, plus the rows that had no usable year.
#[derive(Debug, Clone, Default)]
pub struct InflationTable {
    pub observations: Vec<InflationObservation>,
    pub dropped_rows: usize,
}

impl InflationTable {
    /// Build a table from raw rows, sorting by year (stable) and dropping rows without a year.
    pub fn from_rows(rows: impl IntoIterator<Item = (Option<i64>, Option<f64>)>) -> Self {
        let mut observations = Vec::new();
        let mut dropped_rows = 0;

        for (year, rate) in rows {
            match year.and_then(|y| i32::try_from(y).ok()) {
                Some(year) => observations.push(InflationObservation {
                    year,
                    rate_percent: rate.unwrap_or(f64::NAN),
                }),
                None => dropped_rows += 1,
            }
        }

        observations.sort_by_key(|obs| obs.year);

        Self {
            observations,
            dropped_rows,
        }
    }

    /// Rate recorded for a year, if the year is in the table.
    pub fn rate_for(&self, year: i32) -> Option<f64> {
        self.observations
            .iter()
            .find(|obs| obs.year == year)
            .map(|obs| obs.rate_percent)
    }
}

/// Reads the two input tables.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file using Polars. Every column is read as text; typed
    /// coercion happens per column in `column_as`, so a late cell that does
    /// not match an inferred type is never discarded by the reader.
    fn read_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        if !path.exists() {
            return Err(LoaderError::NotFound(path.to_path_buf()));
        }

        let csv_error = |source| LoaderError::CsvError {
            path: path.to_path_buf(),
            source,
        };

        let df = LazyCsvReader::new(path)
            .with_infer_schema_length(Some(0))
            .with_ignore_errors(true)
            .finish()
            .map_err(csv_error)?
            .collect()
            .map_err(csv_error)?;

        debug!("Read {} rows x {} columns from {}", df.height(), df.width(), path.display());
        Ok(df)
    }

    /// Fetch a required column cast to `dtype`. Casting is non-strict, so
    /// cells that do not coerce become null.
    fn column_as(
        df: &DataFrame,
        column: &'static str,
        dtype: &DataType,
        path: &Path,
    ) -> Result<Column, LoaderError> {
        let col = df.column(column).map_err(|_| LoaderError::MissingColumn {
            column,
            path: path.to_path_buf(),
        })?;

        col.cast(dtype).map_err(|source| LoaderError::CsvError {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the grants table. Dates and amounts that cannot be coerced are kept as missing.
    pub fn load_grants(path: &Path) -> Result<Vec<AwardRecord>, LoaderError> {
        let df = Self::read_csv(path)?;
        let polars_error = |source| LoaderError::CsvError {
            path: path.to_path_buf(),
            source,
        };

        let date_col = Self::column_as(&df, DATE_COLUMN, &DataType::String, path)?;
        let amount_col = Self::column_as(&df, AMOUNT_COLUMN, &DataType::Float64, path)?;
        let program_col = Self::column_as(&df, PROGRAM_COLUMN, &DataType::String, path)?;

        let dates = date_col.str().map_err(polars_error)?;
        let amounts = amount_col.f64().map_err(polars_error)?;
        let programs = program_col.str().map_err(polars_error)?;

        let records = (0..df.height())
            .map(|i| AwardRecord {
                award_date: dates.get(i).and_then(parse_award_date),
                amount: amounts.get(i),
                program_label: programs.get(i).map(str::to_string),
            })
            .collect();

        Ok(records)
    }

    /// Load the inflation table, sorted by year ascending.
    pub fn load_inflation(path: &Path) -> Result<InflationTable, LoaderError> {
        let df = Self::read_csv(path)?;
        let polars_error = |source| LoaderError::CsvError {
            path: path.to_path_buf(),
            source,
        };

        // Through Float64 so that "2001.0" still resolves to a year
        let year_col = Self::column_as(&df, YEAR_COLUMN, &DataType::Float64, path)?
            .cast(&DataType::Int64)
            .map_err(polars_error)?;
        let rate_col = Self::column_as(&df, RATE_COLUMN, &DataType::Float64, path)?;

        let years = year_col.i64().map_err(polars_error)?;
        let rates = rate_col.f64().map_err(polars_error)?;

        Ok(InflationTable::from_rows(
            (0..df.height()).map(|i| (years.get(i), rates.get(i))),
        ))
    }
}

/// Parse an award date leniently. Blank or unrecognised input yields `None`.
pub fn parse_award_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
    {
        return Some(date);
    }

    if let Some(datetime) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(datetime.date());
    }

    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_parse_award_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2020, 3, 15);
        assert_eq!(parse_award_date("2020-03-15"), expected);
        assert_eq!(parse_award_date("3/15/2020"), expected);
        assert_eq!(parse_award_date("2020/03/15"), expected);
        assert_eq!(parse_award_date("15-Mar-2020"), expected);
        assert_eq!(parse_award_date("March 15, 2020"), expected);
        assert_eq!(parse_award_date("2020-03-15 00:00:00"), expected);
        assert_eq!(parse_award_date("2020-03-15T12:30:00"), expected);
        assert_eq!(parse_award_date(" 2020-03-15 "), expected);
    }

    #[test]
    fn test_parse_award_date_rejects_garbage() {
        assert_eq!(parse_award_date(""), None);
        assert_eq!(parse_award_date("   "), None);
        assert_eq!(parse_award_date("not a date"), None);
        assert_eq!(parse_award_date("2020-13-45"), None);
    }

    #[test]
    fn test_inflation_table_sorts_and_drops() {
        let table = InflationTable::from_rows(vec![
            (Some(2002), Some(-10.0)),
            (None, Some(3.0)),
            (Some(2000), Some(0.0)),
            (Some(2001), None),
        ]);

        let years: Vec<i32> = table.observations.iter().map(|o| o.year).collect();
        assert_eq!(years, vec![2000, 2001, 2002]);
        assert_eq!(table.dropped_rows, 1);
        assert!(table.rate_for(2001).unwrap().is_nan());
        assert_eq!(table.rate_for(2002), Some(-10.0));
        assert_eq!(table.rate_for(1999), None);
    }

    #[test]
    fn test_load_grants() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "grants.csv",
            "President Approval/Award Date,Amount,Top Level Primary Program\n\
             2020-03-15,50,Education\n\
             ,25,Cyber\n\
             2021-01-02,,\n",
        );

        let records = DataLoader::load_grants(&path).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].award_date, NaiveDate::from_ymd_opt(2020, 3, 15));
        assert_eq!(records[0].amount, Some(50.0));
        assert_eq!(records[0].program_label.as_deref(), Some("Education"));
        assert_eq!(records[1].award_date, None);
        assert_eq!(records[2].amount, None);
        assert_eq!(records[2].program_label, None);
    }

    #[test]
    fn test_load_grants_keeps_late_fractional_amount() {
        let dir = tempfile::tempdir().unwrap();
        let mut content =
            String::from("President Approval/Award Date,Amount,Top Level Primary Program\n");
        for _ in 0..10_050 {
            content.push_str("2020-01-01,100,Education\n");
        }
        content.push_str("2021-01-01,1500.75,Education\n");
        let path = write_csv(&dir, "grants.csv", &content);

        let records = DataLoader::load_grants(&path).unwrap();
        assert_eq!(records.len(), 10_051);
        assert_eq!(records[0].amount, Some(100.0));
        assert_eq!(records[10_050].amount, Some(1500.75));
        assert_eq!(records[10_050].award_date, NaiveDate::from_ymd_opt(2021, 1, 1));
    }

    #[test]
    fn test_load_inflation_coerces_text_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "inflation.csv",
            "Year,Inflation_Rate\n2000.0,1\nn/a,2\n2001,2.5\n2002,unknown\n",
        );

        let table = DataLoader::load_inflation(&path).unwrap();
        let years: Vec<i32> = table.observations.iter().map(|o| o.year).collect();
        assert_eq!(years, vec![2000, 2001, 2002]);
        assert_eq!(table.dropped_rows, 1);
        assert_eq!(table.rate_for(2001), Some(2.5));
        assert!(table.rate_for(2002).unwrap().is_nan());
    }

    #[test]
    fn test_load_inflation() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "inflation.csv",
            "Year,Inflation_Rate\n2001,10\n2000,0\n2002,-10\n",
        );

        let table = DataLoader::load_inflation(&path).unwrap();
        assert_eq!(
            table.observations,
            vec![
                InflationObservation { year: 2000, rate_percent: 0.0 },
                InflationObservation { year: 2001, rate_percent: 10.0 },
                InflationObservation { year: 2002, rate_percent: -10.0 },
            ]
        );
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "inflation.csv", "Year,Rate\n2000,1\n");

        let err = DataLoader::load_inflation(&path).unwrap_err();
        assert!(matches!(
            err,
            LoaderError::MissingColumn { column: RATE_COLUMN, .. }
        ));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = DataLoader::load_grants(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, LoaderError::NotFound(_)));
    }
}
