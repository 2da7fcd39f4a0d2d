//! CSV Dataset Loader Module
//! Fetches the grade distribution CSV and prepares the immutable base table using Polars.

use super::grades::{COL_INSTRUCTOR, COL_NUMBER, COL_SUBJECT, GRADE_BUCKETS};
use polars::prelude::*;
use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Public UIUC course grade distribution dataset.
pub const DEFAULT_DATASET_URL: &str =
    "https://raw.githubusercontent.com/wadefagen/datasets/master/gpa/uiuc-gpa-dataset.csv";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to download dataset: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Dataset is missing required column '{0}'")]
    MissingColumn(String),
    #[error("Column '{column}' has {rows} negative grade count(s)")]
    InvalidCount { column: String, rows: usize },
}

/// Where the dataset is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    Path(PathBuf),
}

impl DataSource {
    /// Anything starting with `http://` or `https://` is fetched, the rest is a file path.
    pub fn parse(source: &str) -> Self {
        if source.starts_with("http://") || source.starts_with("https://") {
            DataSource::Url(source.to_string())
        } else {
            DataSource::Path(PathBuf::from(source))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Url(url) => f.write_str(url),
            DataSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// The base table: every grade record with a known instructor.
///
/// Built once at startup and never mutated afterwards, so it can be shared
/// behind an `Arc` by every lookup and aggregation.
#[derive(Debug, Clone)]
pub struct GradeDataset {
    df: DataFrame,
    source: String,
    subjects: Vec<String>,
}

impl GradeDataset {
    /// Fetch and parse the dataset. Any failure here is fatal for the caller.
    pub fn load(source: &DataSource) -> Result<Self, LoaderError> {
        let bytes = match source {
            DataSource::Url(url) => Self::fetch_bytes(url)?,
            DataSource::Path(path) => Self::read_bytes(path)?,
        };
        Self::from_csv_bytes(bytes, source.to_string())
    }

    fn fetch_bytes(url: &str) -> Result<Vec<u8>, LoaderError> {
        info!(%url, "downloading grade dataset");
        let response = reqwest::blocking::get(url)?.error_for_status()?;
        let bytes = response.bytes()?;
        debug!(bytes = bytes.len(), "download complete");
        Ok(bytes.to_vec())
    }

    fn read_bytes(path: &Path) -> Result<Vec<u8>, LoaderError> {
        info!(path = %path.display(), "reading grade dataset");
        Ok(std::fs::read(path)?)
    }

    /// Parse raw CSV bytes into the base table.
    pub fn from_csv_bytes(bytes: Vec<u8>, source: impl Into<String>) -> Result<Self, LoaderError> {
        // Full-length schema inference: course numbers and counts are sparse enough
        // that a short sample can guess the wrong dtype.
        let raw = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;

        Self::from_dataframe(raw, source)
    }

    /// Validate and normalize an already parsed table.
    ///
    /// Drops rows without an instructor, turns `Subject` and `Number` into
    /// strings and the grade buckets into `Float64` with empty cells as 0.
    /// A count that does not parse as a number, or is negative, rejects the dataset.
    pub fn from_dataframe(raw: DataFrame, source: impl Into<String>) -> Result<Self, LoaderError> {
        let columns: Vec<String> = raw
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        for required in [COL_SUBJECT, COL_NUMBER, COL_INSTRUCTOR]
            .into_iter()
            .chain(GRADE_BUCKETS)
        {
            if !columns.iter().any(|c| c == required) {
                return Err(LoaderError::MissingColumn(required.to_string()));
            }
        }

        let raw_rows = raw.height();

        let mut normalized = vec![
            col(COL_SUBJECT).cast(DataType::String),
            col(COL_NUMBER).cast(DataType::String),
        ];
        normalized.extend(
            GRADE_BUCKETS
                .iter()
                .map(|bucket| col(*bucket).strict_cast(DataType::Float64).fill_null(lit(0.0))),
        );

        let df = raw
            .lazy()
            .filter(col(COL_INSTRUCTOR).is_not_null())
            .with_columns(normalized)
            .collect()?;

        Self::check_counts(&df)?;

        let dropped = raw_rows - df.height();
        if dropped > 0 {
            warn!(dropped, "dropped rows without a primary instructor");
        }

        let subjects = Self::distinct_sorted(&df, COL_SUBJECT)?;
        let source = source.into();

        info!(
            %source,
            rows = df.height(),
            subjects = subjects.len(),
            "grade dataset ready"
        );

        Ok(Self {
            df,
            source,
            subjects,
        })
    }

    fn check_counts(df: &DataFrame) -> Result<(), LoaderError> {
        for bucket in GRADE_BUCKETS {
            let rows = df
                .clone()
                .lazy()
                .filter(col(bucket).lt(lit(0.0)))
                .collect()?
                .height();
            if rows > 0 {
                return Err(LoaderError::InvalidCount {
                    column: bucket.to_string(),
                    rows,
                });
            }
        }
        Ok(())
    }

    fn distinct_sorted(df: &DataFrame, column: &str) -> Result<Vec<String>, LoaderError> {
        let unique = df.column(column)?.unique()?;
        let mut values: Vec<String> = unique
            .as_materialized_series()
            .str()?
            .into_iter()
            .flatten()
            .map(|s| s.to_string())
            .collect();
        values.sort_unstable();
        Ok(values)
    }

    /// Sorted distinct subjects.
    pub fn subjects(&self) -> &[String] {
        &self.subjects
    }

    pub fn contains_subject(&self, subject: &str) -> bool {
        self.subjects.binary_search_by(|s| s.as_str().cmp(subject)).is_ok()
    }

    /// Get a reference to the base table.
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Get the number of rows in the base table.
    pub fn row_count(&self) -> usize {
        self.df.height()
    }

    /// Where the data was loaded from.
    pub fn source(&self) -> &str {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Year,Term,YearTerm,Subject,Number,Course Title,Sched Type,A+,A,A-,B+,B,B-,C+,C,C-,D+,D,D-,F,W,Primary Instructor";

    fn csv(rows: &[&str]) -> Vec<u8> {
        let mut text = String::from(HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text.into_bytes()
    }

    #[test]
    fn drops_rows_without_instructor() {
        let bytes = csv(&[
            "2020,Fall,2020-fa,STAT,100,Statistics,LCD,1,2,3,0,0,0,0,0,0,0,0,0,0,0,\"Smith, Jane\"",
            "2020,Fall,2020-fa,STAT,100,Statistics,LCD,1,2,3,0,0,0,0,0,0,0,0,0,0,0,",
            "2020,Fall,2020-fa,MATH,221,Calculus I,LCD,4,4,4,0,0,0,0,0,0,0,0,0,1,0,\"Lee, Ann\"",
        ]);

        let dataset = GradeDataset::from_csv_bytes(bytes, "inline").unwrap();
        assert_eq!(dataset.row_count(), 2);
        assert_eq!(dataset.subjects(), &["MATH".to_string(), "STAT".to_string()]);
        assert!(dataset.contains_subject("STAT"));
        assert!(!dataset.contains_subject("CS"));
        assert_eq!(dataset.source(), "inline");
    }

    #[test]
    fn normalizes_number_and_grade_columns() {
        let bytes = csv(&[
            "2020,Fall,2020-fa,STAT,100,Statistics,LCD,1,,3,0,0,0,0,0,0,0,0,0,0,0,\"Smith, Jane\"",
        ]);

        let dataset = GradeDataset::from_csv_bytes(bytes, "inline").unwrap();
        let df = dataset.dataframe();
        assert_eq!(df.column(COL_NUMBER).unwrap().dtype(), &DataType::String);
        let a = df.column("A").unwrap();
        assert_eq!(a.dtype(), &DataType::Float64);
        assert_eq!(a.as_materialized_series().f64().unwrap().get(0), Some(0.0));
    }

    #[test]
    fn missing_grade_column_is_rejected() {
        let bytes = b"Subject,Number,Primary Instructor,A+\nSTAT,100,Smith,1\n".to_vec();
        let err = GradeDataset::from_csv_bytes(bytes, "inline").unwrap_err();
        assert!(matches!(err, LoaderError::MissingColumn(ref c) if c == "A"));
    }

    #[test]
    fn non_numeric_count_is_rejected() {
        let bytes = csv(&[
            "2020,Fall,2020-fa,STAT,100,Statistics,LCD,5,abc,2,0,0,0,0,0,0,0,0,0,0,0,\"Smith, Jane\"",
        ]);
        let err = GradeDataset::from_csv_bytes(bytes, "inline").unwrap_err();
        assert!(matches!(err, LoaderError::CsvError(_)));
    }

    #[test]
    fn negative_count_is_rejected() {
        let bytes = csv(&[
            "2020,Fall,2020-fa,STAT,100,Statistics,LCD,10,0,0,0,0,0,0,0,0,0,0,0,0,0,\"Smith, Jane\"",
            "2020,Fall,2020-fa,STAT,100,Statistics,LCD,5,0,0,0,0,0,0,0,0,0,0,0,-7,0,\"Lee, Ann\"",
        ]);
        let err = GradeDataset::from_csv_bytes(bytes, "inline").unwrap_err();
        assert!(matches!(
            err,
            LoaderError::InvalidCount { ref column, rows: 1 } if column == "F"
        ));
    }

    #[test]
    fn subjects_are_unique_and_sorted() {
        let bytes = csv(&[
            "2020,Fall,2020-fa,STAT,100,Statistics,LCD,1,0,0,0,0,0,0,0,0,0,0,0,0,0,\"Smith, Jane\"",
            "2020,Fall,2020-fa,CS,124,Intro CS,LCD,1,0,0,0,0,0,0,0,0,0,0,0,0,0,\"Lee, Ann\"",
            "2020,Fall,2020-fa,STAT,200,Statistics II,LCD,1,0,0,0,0,0,0,0,0,0,0,0,0,0,\"Lee, Ann\"",
            "2020,Fall,2020-fa,MATH,221,Calculus I,LCD,1,0,0,0,0,0,0,0,0,0,0,0,0,0,\"Lee, Ann\"",
        ]);
        let dataset = GradeDataset::from_csv_bytes(bytes, "inline").unwrap();
        assert_eq!(dataset.subjects(), &["CS", "MATH", "STAT"]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let source = DataSource::Path(PathBuf::from("/definitely/not/here.csv"));
        assert!(matches!(GradeDataset::load(&source), Err(LoaderError::Io(_))));
    }

    #[test]
    fn data_source_parsing() {
        assert_eq!(
            DataSource::parse("https://example.org/gpa.csv"),
            DataSource::Url("https://example.org/gpa.csv".to_string())
        );
        assert_eq!(
            DataSource::parse("data/gpa.csv"),
            DataSource::Path(PathBuf::from("data/gpa.csv"))
        );
    }
}
