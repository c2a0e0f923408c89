//! Whitespace-delimited table parsing.
//!
//! The upstream files have no header. Columns are assigned by position, so a
//! layout is just the ordered list of column names. A row with a different
//! number of fields is rejected rather than shifted.

use crate::error::{Error, Result};
use crate::model::PointId;

/// Column layout of one upstream file.
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub dataset: &'static str,
    pub columns: &'static [&'static str],
}

/// One data line, split into fields.
#[derive(Debug)]
pub struct Row<'a> {
    layout: Layout,
    /// 1-based line number in the source text
    pub line: usize,
    fields: Vec<&'a str>,
}

impl Row<'_> {
    /// Finite decimal number. `NaN` and `inf` have no SQL literal form.
    pub fn number(&self, column: usize) -> Result<f64> {
        let value = self.fields[column];
        value
            .parse()
            .ok()
            .filter(|v: &f64| v.is_finite())
            .ok_or_else(|| self.invalid(column, value))
    }

    pub fn id(&self, column: usize) -> Result<PointId> {
        let value = self.fields[column];
        value.parse().map_err(|_| self.invalid(column, value))
    }

    fn invalid(&self, column: usize, value: &str) -> Error {
        Error::InvalidNumber {
            dataset: self.layout.dataset,
            line: self.line,
            column: self.layout.columns[column],
            value: value.to_string(),
        }
    }
}

/// Splits `text` into rows matching `layout`, skipping blank lines.
pub fn parse_rows(text: &str, layout: Layout) -> Result<Vec<Row<'_>>> {
    let mut rows = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() != layout.columns.len() {
            return Err(Error::ColumnCount {
                dataset: layout.dataset,
                line: i + 1,
                expected: layout.columns.len(),
                found: fields.len(),
            });
        }
        rows.push(Row {
            layout,
            line: i + 1,
            fields,
        });
    }

    if rows.is_empty() {
        return Err(Error::EmptyDataset {
            dataset: layout.dataset,
        });
    }

    tracing::debug!("{}: {} rows", layout.dataset, rows.len());
    Ok(rows)
}
