use std::path::{Path, PathBuf};

use serde::Serialize;

/// A row of raw field values.
pub type Row = Vec<String>;

/// An ordered sequence of rows that all share one width.
///
/// Built wholesale by [`crate::parser::parse`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table<T> {
    rows: Vec<T>,
    /// Field count of every row. `None` only when the table has no rows.
    width: Option<usize>,
}

impl<T> Table<T> {
    pub(crate) fn new(rows: Vec<T>, width: Option<usize>) -> Self {
        Self { rows, width }
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn width(&self) -> Option<usize> {
        self.width
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<T> {
        self.rows
    }
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self::new(Vec::new(), None)
    }
}

/// A parsed table together with the file it was read from.
#[derive(Debug, Clone, Serialize)]
pub struct LoadedTable {
    source: PathBuf,
    table: Table<Row>,
}

impl LoadedTable {
    pub fn new(source: impl Into<PathBuf>, table: Table<Row>) -> Self {
        Self {
            source: source.into(),
            table,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn table(&self) -> &Table<Row> {
        &self.table
    }
}
