use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::error::{CsvQueryError, Result};
use crate::resolver::{resolve, ColumnSpec};
use crate::table::Table;

/// A single search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult<'t, R> {
    /// Position among the data rows (the header is not counted).
    pub row_num: usize,
    pub row: &'t R,
}

/// Exact-match search over a borrowed table, optionally headed.
///
/// Works for any row type that exposes its fields as a slice of strings.
#[derive(Debug)]
pub struct Searcher<'t, R> {
    header: Option<&'t R>,
    rows: &'t [R],
    width: usize,
}

impl<'t, R> Searcher<'t, R>
where
    R: AsRef<[String]> + Sync,
{
    /// Wrap `table`, treating its first row as the header when `has_header` is set.
    pub fn new(table: &'t Table<R>, has_header: bool) -> Result<Self> {
        let width = table.width().unwrap_or(0);
        let (header, rows) = if has_header {
            let (first, rest) = table
                .rows()
                .split_first()
                .ok_or(CsvQueryError::EmptyTableWithHeader)?;
            (Some(first), rest)
        } else {
            (None, table.rows())
        };

        Ok(Self {
            header,
            rows,
            width,
        })
    }

    /// Column names, or an empty slice when the table has no header.
    pub fn header(&self) -> &'t [String] {
        match self.header {
            Some(h) => h.as_ref(),
            None => &[],
        }
    }

    /// The searchable data rows.
    pub fn rows(&self) -> &'t [R] {
        self.rows
    }

    /// Return every data row whose value in any resolved column equals `value`.
    ///
    /// An empty data set matches nothing and skips column resolution, so even
    /// an unresolvable spec is not an error there.
    pub fn search(&self, value: &str, spec: &ColumnSpec) -> Result<Vec<SearchResult<'t, R>>> {
        if self.rows.is_empty() {
            return Ok(Vec::new());
        }

        let header = self.header.map(|h| h.as_ref());
        let columns = resolve(spec, header, self.width)?;

        let rows = self.rows;
        let results: Vec<SearchResult<'t, R>> = rows
            .par_iter()
            .enumerate()
            .filter(|(_, row)| {
                let fields: &[String] = (*row).as_ref();
                columns
                    .iter()
                    .any(|&col| fields.get(col).is_some_and(|f| f == value))
            })
            .map(|(row_num, row)| SearchResult { row_num, row })
            .collect();

        debug!(value, %spec, matches = results.len(), "search finished");
        Ok(results)
    }
}
