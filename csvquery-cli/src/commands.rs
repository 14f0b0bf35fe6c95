use std::error::Error;
use std::io::Write;
use std::time::Instant;

use clap::Args;
use csvquery_core::{ColumnSpec, Row, SearchResult, Searcher, Table};

use crate::format::{self, OutputFormat};

pub type CmdResult = Result<(), Box<dyn Error>>;

/// Arguments shared by the one-shot `search` command and the shell's `search`.
#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Exact value to look for
    pub value: String,

    /// Treat the first row as a header
    #[arg(long)]
    pub header: bool,

    /// How --column identifies the column: "index" or "name"
    #[arg(long, value_name = "index|name")]
    pub by: Option<String>,

    /// Column index or name (requires --by)
    #[arg(long)]
    pub column: Option<String>,

    /// Maximum number of rows to print (0 = unlimited)
    #[arg(short = 'n', long, default_value_t = 100)]
    pub limit: usize,

    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct ViewArgs {
    /// Treat the first row as a header
    #[arg(long)]
    pub header: bool,

    /// Row range to display, e.g. "100-200" or "100" (default: all rows)
    #[arg(short, long)]
    pub rows: Option<String>,

    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

pub fn run_view<W: Write>(out: &mut W, table: &Table<Row>, args: &ViewArgs) -> CmdResult {
    let searcher = Searcher::new(table, args.header)?;
    let data = searcher.rows();

    let (start, end) = parse_row_range(args.rows.as_deref(), data.len())?;
    if start > end || (start == end && args.rows.is_some()) {
        return Err(format!("Row {start} is out of range (table has {} rows)", data.len()).into());
    }

    let results: Vec<SearchResult<'_, Row>> = data[start..end]
        .iter()
        .enumerate()
        .map(|(i, row)| SearchResult {
            row_num: start + i,
            row,
        })
        .collect();

    format::render(out, args.format, searcher.header(), &results)
}

pub fn run_query<W: Write>(out: &mut W, table: &Table<Row>, args: &QueryArgs) -> CmdResult {
    let spec = ColumnSpec::from_params(args.by.as_deref(), args.column.as_deref())?;
    let searcher = Searcher::new(table, args.header)?;

    let start = Instant::now();
    let mut results = searcher.search(&args.value, &spec)?;
    let elapsed = start.elapsed();

    if args.format == OutputFormat::Table {
        let total = results.len();
        writeln!(
            out,
            "Found {} match{} for \"{}\" in {} (searched {} rows in {:.2?})",
            format::format_number(total),
            if total == 1 { "" } else { "es" },
            args.value,
            spec,
            format::format_number(searcher.rows().len()),
            elapsed,
        )?;
        if results.is_empty() {
            return Ok(());
        }
        writeln!(out)?;
    }

    if args.limit > 0 {
        results.truncate(args.limit);
    }

    format::render(out, args.format, searcher.header(), &results)
}

/// Parse a row range string like "100-200" or "100" into (start, end).
/// Returns (start, end) where end is exclusive; both are clamped to `row_count`.
fn parse_row_range(arg: Option<&str>, row_count: usize) -> Result<(usize, usize), Box<dyn Error>> {
    match arg {
        None => Ok((0, row_count)),
        Some(s) => {
            if let Some((left, right)) = s.split_once('-') {
                let start: usize = left.trim().parse()?;
                let end = right.trim().parse::<usize>()?.saturating_add(1); // inclusive -> exclusive
                Ok((start.min(row_count), end.min(row_count)))
            } else {
                let n: usize = s.trim().parse()?;
                Ok((n.min(row_count), n.saturating_add(1).min(row_count)))
            }
        }
    }
}
