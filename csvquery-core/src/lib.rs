pub mod error;
pub mod holder;
pub mod loader;
pub mod parser;
pub mod resolver;
pub mod searcher;
pub mod table;
pub mod writer;

pub use error::{CsvQueryError, Result};
pub use holder::TableHolder;
pub use loader::{load_file, LoaderConfig};
pub use parser::{parse, parse_rows, string_row, RowBuildError, RowBuilder};
pub use resolver::{resolve, ColumnSpec};
pub use searcher::{SearchResult, Searcher};
pub use table::{LoadedTable, Row, Table};
pub use writer::write_rows;

/// Search convenience function re-exported at crate root.
///
/// Runs one query against `table` without keeping the [`Searcher`] around.
pub fn search<'t>(
    table: &'t Table<Row>,
    has_header: bool,
    value: &str,
    spec: &ColumnSpec,
) -> Result<Vec<SearchResult<'t, Row>>> {
    Searcher::new(table, has_header)?.search(value, spec)
}
