use std::error::Error;
use std::io::Write;

use clap::ValueEnum;
use csvquery_core::{write_rows, Row, SearchResult};
use serde::Serialize;

/// How rows are rendered on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table with row numbers
    #[default]
    Table,
    /// Standard CSV
    Csv,
    /// JSON object with `header` and `results`
    Json,
}

#[derive(Serialize)]
struct JsonView<'a, 'r> {
    header: &'a [String],
    results: &'a [SearchResult<'r, Row>],
}

/// Render `results` in the requested format.
pub fn render<W: Write>(
    out: &mut W,
    format: OutputFormat,
    header: &[String],
    results: &[SearchResult<'_, Row>],
) -> Result<(), Box<dyn Error>> {
    match format {
        OutputFormat::Table => write_table(out, header, results)?,
        OutputFormat::Csv => write_rows(&mut *out, header, results.iter().map(|r| r.row))?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &JsonView { header, results })?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Write rows as an aligned table.
///
/// Without a header the columns are labelled by position.
pub fn write_table<W: Write>(
    out: &mut W,
    header: &[String],
    results: &[SearchResult<'_, Row>],
) -> std::io::Result<()> {
    let labels: Vec<String> = if header.is_empty() {
        let width = results.first().map_or(0, |r| r.row.len());
        (0..width).map(|i| i.to_string()).collect()
    } else {
        header.to_vec()
    };

    if labels.is_empty() {
        return writeln!(out, "(empty table)");
    }

    let max_col_width: usize = 40;
    let num_cols = labels.len();

    let row_label_width = results
        .iter()
        .map(|r| format_number(r.row_num).len())
        .max()
        .unwrap_or(3)
        .max(3);

    let mut col_widths: Vec<usize> = labels.iter().map(|h| h.chars().count()).collect();
    for result in results {
        for (i, field) in result.row.iter().enumerate().take(num_cols) {
            col_widths[i] = col_widths[i].max(field.chars().count());
        }
    }
    for w in col_widths.iter_mut() {
        *w = (*w).min(max_col_width);
    }

    write!(out, " {:>width$} ", "Row", width = row_label_width)?;
    write_cells(out, labels.iter().map(String::as_str), &col_widths)?;

    write!(out, "-{:-<width$}-", "", width = row_label_width)?;
    for (i, &w) in col_widths.iter().enumerate() {
        let sep = if i > 0 { "-+-" } else { "+-" };
        write!(out, "{sep}{:-<width$}", "", width = w)?;
    }
    writeln!(out)?;

    for result in results {
        write!(
            out,
            " {:>width$} ",
            format_number(result.row_num),
            width = row_label_width
        )?;
        write_cells(out, result.row.iter().map(String::as_str), &col_widths)?;
    }

    Ok(())
}

fn write_cells<'a, W: Write>(
    out: &mut W,
    cells: impl Iterator<Item = &'a str>,
    col_widths: &[usize],
) -> std::io::Result<()> {
    for (i, (cell, &w)) in cells.zip(col_widths).enumerate() {
        let sep = if i > 0 { " | " } else { "| " };
        write!(out, "{sep}{:<width$}", truncate(cell, w), width = w)?;
    }
    writeln!(out)
}

/// Truncate a string to `max_len` characters, appending "..." if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let mut cut: String = s.chars().take(max_len - 3).collect();
        cut.push_str("...");
        cut
    }
}

/// Format a number with comma separators (e.g., 1234567 -> "1,234,567").
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Format a byte count as a human-readable size (e.g., "487.3 MB").
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;

    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{} B", bytes)
    }
}
