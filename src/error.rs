//! Fatal errors for a report run
//!
//! Only whole-run failures live here. Row-level problems (malformed rows,
//! unparseable ages, ISBNs with no matching book) are recovered where they
//! occur and never reach this type.

use crate::chart::PlotError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{} is empty or has no header row", path.display())]
    EmptyInput { path: PathBuf },

    #[error("{} has no '{column}' column (is it ';'-delimited?)", path.display())]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("Failed to create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to render chart: {0}")]
    Plot(#[from] PlotError),

    #[error("Failed to write report: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write CSV export: {0}")]
    CsvExport(#[from] csv::Error),
}

pub type Result<T> = core::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_message_names_column_and_file() {
        let err = ReportError::MissingColumn {
            path: PathBuf::from("uploads/books.csv"),
            column: "Book-Title",
        };
        let msg = err.to_string();
        assert!(msg.contains("uploads/books.csv"));
        assert!(msg.contains("Book-Title"));
    }

    #[test]
    fn test_empty_input_message() {
        let err = ReportError::EmptyInput {
            path: PathBuf::from("users.csv"),
        };
        assert_eq!(err.to_string(), "users.csv is empty or has no header row");
    }
}
