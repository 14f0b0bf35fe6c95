use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CsvQueryError, Result};

/// How a query identifies the column(s) to search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnSpec {
    /// A 0-based column position.
    ByIndex(usize),
    /// A header name. Every column carrying this name is searched.
    ByName(String),
    /// Search every column.
    Unspecified,
}

impl ColumnSpec {
    /// Decode a column spec from loosely typed request parameters.
    ///
    /// `specifier` is `"index"` or `"name"`; `identifier` is the index or
    /// name itself. No identifier and no recognized specifier means every
    /// column.
    pub fn from_params(specifier: Option<&str>, identifier: Option<&str>) -> Result<Self> {
        match (specifier, identifier) {
            (None, None) => Ok(ColumnSpec::Unspecified),
            (None, Some(_)) => Err(CsvQueryError::InvalidQuery(
                "column identifier given without a column specifier ('index' or 'name')".into(),
            )),
            (Some(kind @ ("index" | "name")), None) => Err(CsvQueryError::InvalidQuery(format!(
                "column specifier '{kind}' given without a column identifier"
            ))),
            (Some(_), None) => Ok(ColumnSpec::Unspecified),
            (Some("index"), Some(id)) => id
                .trim()
                .parse::<usize>()
                .map(ColumnSpec::ByIndex)
                .map_err(|_| {
                    CsvQueryError::InvalidQuery(format!(
                        "column index must be a non-negative integer, got '{id}'"
                    ))
                }),
            (Some("name"), Some(id)) => Ok(ColumnSpec::ByName(id.to_string())),
            (Some(other), _) => Err(CsvQueryError::InvalidQuery(format!(
                "column specifier must be 'index' or 'name', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnSpec::ByIndex(n) => write!(f, "index {n}"),
            ColumnSpec::ByName(name) => write!(f, "name '{name}'"),
            ColumnSpec::Unspecified => f.write_str("all columns"),
        }
    }
}

/// Resolve a column spec to the ascending, distinct column positions it names.
///
/// An index in range wins over any header name that happens to look like a
/// number. Name lookup needs a header exactly as wide as the data.
pub fn resolve(spec: &ColumnSpec, header: Option<&[String]>, width: usize) -> Result<Vec<usize>> {
    let columns: Vec<usize> = match spec {
        ColumnSpec::ByIndex(n) if *n < width => vec![*n],
        ColumnSpec::ByIndex(_) => Vec::new(),
        ColumnSpec::ByName(name) => {
            let header = match header {
                Some(h) if h.len() == width => h,
                other => {
                    return Err(CsvQueryError::HeaderMismatch {
                        header_width: other.map_or(0, <[String]>::len),
                        width,
                    })
                }
            };
            header
                .iter()
                .enumerate()
                .filter(|(_, h)| *h == name)
                .map(|(i, _)| i)
                .collect()
        }
        ColumnSpec::Unspecified => (0..width).collect(),
    };

    if columns.is_empty() {
        return Err(CsvQueryError::ColumnNotFound {
            column: spec.to_string(),
            available: header.map(<[String]>::to_vec).unwrap_or_default(),
        });
    }

    debug!(%spec, ?columns, "resolved columns");
    Ok(columns)
}
