//! Output directory writer for CSV summaries, chart images and the run report.

use image::RgbImage;
use polars::prelude::*;
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
    #[error("Failed to serialize {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to save image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Writes report artifacts into a single output directory.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    /// Create the writer, creating the output directory if needed.
    pub fn create(output_dir: &Path) -> Result<Self, ReportError> {
        fs::create_dir_all(output_dir).map_err(|source| ReportError::CreateDir {
            path: output_dir.to_path_buf(),
            source,
        })?;

        Ok(Self {
            output_dir: output_dir.to_path_buf(),
        })
    }

    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }

    fn create_file(&self, file_name: &str) -> Result<(PathBuf, File), ReportError> {
        let path = self.path_for(file_name);
        let file = File::create(&path).map_err(|source| ReportError::Io {
            path: path.clone(),
            source,
        })?;
        Ok((path, file))
    }

    /// Write a DataFrame as CSV with a header row.
    pub fn write_csv(&self, file_name: &str, df: &mut DataFrame) -> Result<PathBuf, ReportError> {
        let (path, file) = self.create_file(file_name)?;
        let mut writer = BufWriter::new(file);

        CsvWriter::new(&mut writer)
            .include_header(true)
            .finish(df)
            .map_err(|source| ReportError::Csv {
                path: path.clone(),
                source,
            })?;

        debug!("Wrote {} rows to {}", df.height(), path.display());
        Ok(path)
    }

    /// Write a value as pretty-printed JSON.
    pub fn write_json<T: Serialize>(&self, file_name: &str, value: &T) -> Result<PathBuf, ReportError> {
        let (path, file) = self.create_file(file_name)?;

        serde_json::to_writer_pretty(BufWriter::new(file), value).map_err(|source| {
            ReportError::Json {
                path: path.clone(),
                source,
            }
        })?;

        Ok(path)
    }

    /// Save a rendered chart as PNG.
    pub fn write_png(&self, file_name: &str, img: &RgbImage) -> Result<PathBuf, ReportError> {
        let path = self.path_for(file_name);
        img.save(&path).map_err(|source| ReportError::Image {
            path: path.clone(),
            source,
        })?;

        debug!("Saved {}x{} chart to {}", img.width(), img.height(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_makes_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("a").join("Outputs");

        let writer = ReportWriter::create(&out).unwrap();
        assert!(out.is_dir());
        assert_eq!(writer.path_for("x.csv"), out.join("x.csv"));
    }

    #[test]
    fn test_create_fails_when_path_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("Outputs");
        fs::write(&blocker, "not a directory").unwrap();

        let err = ReportWriter::create(&blocker).unwrap_err();
        assert!(matches!(err, ReportError::CreateDir { .. }));
    }

    #[test]
    fn test_write_csv() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::create(dir.path()).unwrap();

        let mut df = DataFrame::new(vec![
            Column::new("Year".into(), vec![2020i32, 2021]),
            Column::new("Total_Amount".into(), vec![Some(1.5f64), None]),
        ])
        .unwrap();

        let path = writer.write_csv("summary.csv", &mut df).unwrap();
        let content = fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines[0], "Year,Total_Amount");
        assert_eq!(lines[1], "2020,1.5");
        assert_eq!(lines[2], "2021,");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::create(dir.path()).unwrap();

        let path = writer
            .write_json("report.json", &json!({ "target_year": 2024 }))
            .unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value["target_year"], 2024);
    }
}
