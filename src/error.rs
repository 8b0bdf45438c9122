use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while evaluating feature tables.
///
/// [`EvalError::Directory`] and [`EvalError::Settings`] are fatal for a batch
/// run; every other variant is local to the file being processed.
#[derive(Error, Debug)]
pub enum EvalError {
    #[error("{}: missing required column(s): {}", path.display(), missing.join(", "))]
    Schema { path: PathBuf, missing: Vec<String> },

    #[error("cannot estimate point density from {points} point(s): {reason}")]
    InsufficientData { points: usize, reason: String },

    #[error("incorrect input directory or empty directory ({}): {reason}", path.display())]
    Directory { path: PathBuf, reason: String },

    #[error("{}: row {row}, column '{column}': '{value}' is not a finite number", path.display())]
    InvalidValue {
        path: PathBuf,
        row: usize,
        column: String,
        value: String,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("invalid settings: {0}")]
    Settings(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("rendering failed: {0}")]
    Render(String),
}

impl EvalError {
    /// Whether the error only concerns a single input file, so sibling files
    /// in a batch can still be processed.
    pub fn is_per_file(&self) -> bool {
        !matches!(self, EvalError::Directory { .. } | EvalError::Settings(_))
    }
}

pub type Result<T> = std::result::Result<T, EvalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_errors_are_fatal() {
        let err = EvalError::Directory {
            path: PathBuf::from("networks/"),
            reason: "no input files".into(),
        };
        assert!(!err.is_per_file());
        assert!(err.to_string().contains("networks/"));
    }

    #[test]
    fn settings_errors_are_fatal() {
        assert!(!EvalError::Settings("negative mz tolerance".into()).is_per_file());
        assert!(EvalError::UnsupportedFormat("xlsx".into()).is_per_file());
        assert!(EvalError::InsufficientData {
            points: 2,
            reason: "singular".into()
        }
        .is_per_file());
    }

    #[test]
    fn schema_error_lists_every_missing_column() {
        let err = EvalError::Schema {
            path: PathBuf::from("a.csv"),
            missing: vec!["row m/z".into(), "row retention time".into()],
        };
        assert!(err.is_per_file());
        assert_eq!(
            err.to_string(),
            "a.csv: missing required column(s): row m/z, row retention time"
        );
    }
}
