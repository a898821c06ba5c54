use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, ChartError>;

/// Errors raised while building, drawing or emitting a burndown chart
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Invalid date range: chart end {end} precedes chart start {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Sprint start {sprint_start} is outside the chart window {chart_start}..={chart_end}")]
    SprintStartOutOfRange {
        sprint_start: DateTime<Utc>,
        chart_start: NaiveDate,
        chart_end: NaiveDate,
    },

    #[error("Cannot prepare output directory {path}: {source}")]
    Path {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported output format: '{0}'. Use: png, jpg, jpeg, bmp, svg")]
    UnsupportedFormat(String),

    #[error("Invalid value for format key '{key}': {value}")]
    InvalidFormat { key: String, value: String },

    #[error("Failed to render chart: {0}")]
    Render(String),

    #[error("No display available for interactive chart viewer")]
    NoDisplayAvailable,

    #[error("Chart viewer failed: {0}")]
    Display(String),

    #[error("Invalid setting {key}={value}")]
    Config { key: String, value: String },
}

impl ChartError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ChartError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_format(key: &str, value: impl ToString) -> Self {
        ChartError::InvalidFormat {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_range_message() {
        let err = ChartError::InvalidRange {
            start: NaiveDate::from_ymd_opt(2024, 1, 14).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid date range: chart end 2024-01-01 precedes chart start 2024-01-14"
        );
    }

    #[test]
    fn test_io_error_keeps_source() {
        use std::error::Error as _;

        let err = ChartError::io(
            "/tmp/chart.png",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/tmp/chart.png"));
        assert!(err.source().is_some());
    }
}
