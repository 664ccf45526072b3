use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can abort a run. There is no partial-output mode: any of
/// these stops the run before a single table is written.
#[derive(Error, Debug)]
pub enum CrossingsError {
    /// A malformed row, an unsorted sequence or a duplicated date.
    #[error("Invalid record at row {row}: {reason}")]
    InvalidRecord { row: usize, reason: String },

    /// A negative arrival count.
    #[error("Invalid count on {date}: {column} = {value}")]
    InvalidCount {
        date: NaiveDate,
        column: &'static str,
        value: i64,
    },

    /// Week correction produced a week outside 1..=52. Indicates a logic defect.
    #[error("Invalid grouping on {date}: corrected week {week} is outside 1..=52")]
    InvalidGrouping { date: NaiveDate, week: u32 },

    /// A required column is missing from the source sheet.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// No candidate source file was found in the data directory.
    #[error("No source CSV found in {0}")]
    NoSourceFile(PathBuf),

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to scan directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CrossingsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_record() {
        let err = CrossingsError::InvalidRecord {
            row: 4,
            reason: "duplicate date 2024-01-02".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid record at row 4: duplicate date 2024-01-02"
        );
    }

    #[test]
    fn test_error_display_invalid_count() {
        let err = CrossingsError::InvalidCount {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            column: "boats_arrived",
            value: -2,
        };
        assert_eq!(
            err.to_string(),
            "Invalid count on 2024-03-01: boats_arrived = -2"
        );
    }

    #[test]
    fn test_error_display_invalid_grouping() {
        let err = CrossingsError::InvalidGrouping {
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            week: 53,
        };
        assert!(err.to_string().contains("corrected week 53"));
    }

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = CrossingsError::FileRead {
            path: PathBuf::from("/data/crossings.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("/data/crossings.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: CrossingsError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }
}
