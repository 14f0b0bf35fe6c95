use std::path::PathBuf;

use thiserror::Error;

use crate::parser::RowBuildError;

pub type Result<T> = std::result::Result<T, CsvQueryError>;

#[derive(Debug, Error)]
pub enum CsvQueryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    /// A line's field count disagrees with the width fixed by the first line.
    #[error("Line {line} has {found} fields, expected {expected}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Line {line}: {source}")]
    RowBuild {
        line: usize,
        #[source]
        source: RowBuildError,
    },

    #[error("Column not found: {column} (available: {})", .available.join(", "))]
    ColumnNotFound {
        column: String,
        available: Vec<String>,
    },

    #[error("Header has {header_width} columns but rows have {width}; cannot search by name")]
    HeaderMismatch { header_width: usize, width: usize },

    #[error("A header was declared for an empty table")]
    EmptyTableWithHeader,

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Illegal file path: {0}")]
    IllegalPath(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Invalid UTF-8 at byte position {0}")]
    InvalidUtf8(usize),

    #[error("No table loaded; load a file first")]
    NoTableLoaded,
}
