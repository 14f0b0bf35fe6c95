use thiserror::Error;
use tracing::debug;

use crate::error::{CsvQueryError, Result};
use crate::table::{Row, Table};

/// Failure raised by a [`RowBuilder`] when it cannot turn a line's fields into a row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason} (fields: {fields:?})")]
pub struct RowBuildError {
    pub reason: String,
    pub fields: Vec<String>,
}

impl RowBuildError {
    pub fn new(reason: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            reason: reason.into(),
            fields,
        }
    }
}

/// Builds a row of type `T` from one line's ordered fields.
///
/// Implemented for any `Fn(Vec<String>) -> Result<T, RowBuildError>`, so a
/// plain closure or function works as a builder.
pub trait RowBuilder<T> {
    fn build(&self, fields: Vec<String>) -> std::result::Result<T, RowBuildError>;
}

impl<T, F> RowBuilder<T> for F
where
    F: Fn(Vec<String>) -> std::result::Result<T, RowBuildError>,
{
    fn build(&self, fields: Vec<String>) -> std::result::Result<T, RowBuildError> {
        self(fields)
    }
}

/// The identity builder: keeps the fields as they are.
pub fn string_row(fields: Vec<String>) -> std::result::Result<Row, RowBuildError> {
    Ok(fields)
}

/// Parse a whole buffer into a table of rows built by `builder`.
///
/// The first line fixes the table width. Any later line with a different
/// field count, or any line the builder rejects, aborts the parse and no
/// rows are returned.
pub fn parse<T, B>(text: &str, builder: &B) -> Result<Table<T>>
where
    B: RowBuilder<T> + ?Sized,
{
    let mut rows = Vec::new();
    let mut width: Option<usize> = None;

    for (idx, line) in Lines::new(text).enumerate() {
        let line_no = idx + 1;
        let fields = split_fields(line);
        let expected = *width.get_or_insert(fields.len());

        if fields.len() != expected {
            return Err(CsvQueryError::RaggedRow {
                line: line_no,
                expected,
                found: fields.len(),
            });
        }

        let row = builder
            .build(fields)
            .map_err(|source| CsvQueryError::RowBuild {
                line: line_no,
                source,
            })?;
        rows.push(row);
    }

    debug!(rows = rows.len(), width = ?width, "parsed table");
    Ok(Table::new(rows, width))
}

/// Parse a buffer into rows of plain strings.
pub fn parse_rows(text: &str) -> Result<Table<Row>> {
    parse(text, &string_row)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    InQuotes,
}

/// Split one line into fields on commas outside double-quoted spans.
///
/// Quote characters stay in the field text; `""` is not unescaped. An
/// unterminated quote runs to the end of the line.
pub fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut state = State::Normal;
    let mut start = 0;

    // ',' and '"' are ASCII, so byte offsets are always char boundaries here.
    for (i, b) in line.bytes().enumerate() {
        match (state, b) {
            (State::Normal, b',') => {
                fields.push(line[start..i].to_string());
                start = i + 1;
            }
            (State::Normal, b'"') => state = State::InQuotes,
            (State::InQuotes, b'"') => state = State::Normal,
            _ => {}
        }
    }
    fields.push(line[start..].to_string());

    fields
}

/// Line iterator that splits on `\n`, `\r`, or `\r\n`.
///
/// A terminator at the very end of the buffer does not produce a trailing
/// empty line.
struct Lines<'a> {
    rest: &'a str,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Self { rest: text }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }

        let bytes = self.rest.as_bytes();
        match bytes.iter().position(|&b| b == b'\n' || b == b'\r') {
            Some(end) => {
                let line = &self.rest[..end];
                let skip = if bytes[end] == b'\r' && bytes.get(end + 1) == Some(&b'\n') {
                    2
                } else {
                    1
                };
                self.rest = &self.rest[end + skip..];
                Some(line)
            }
            None => {
                let line = self.rest;
                self.rest = "";
                Some(line)
            }
        }
    }
}
