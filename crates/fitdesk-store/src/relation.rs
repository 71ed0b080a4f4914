//! In-memory relation: a named, column-labelled list of rows
//!
//! Rows are stored exactly as added; nothing checks them against the
//! column count. Reads re-assemble a row in column order, padding with
//! `Null`, so a row read back always has one value per column. Column
//! lookup is case-insensitive and every miss fails soft.

use fitdesk_core::model::value::{Value, NULL};
use serde::Serialize;

/// Name given to relations returned for an unmapped entity type
pub const ERROR_RELATION: &str = "error";

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Relation {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Relation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Empty relation tagged as the result of a failed lookup
    pub fn error() -> Self {
        Self::new(ERROR_RELATION)
    }

    pub fn is_error(&self) -> bool {
        self.name == ERROR_RELATION
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replace the column list; duplicates (ignoring case) keep their
    /// first occurrence
    pub fn set_columns<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.clear();
        for name in names {
            let name = name.into();
            if self.column_index(&name).is_none() {
                self.columns.push(name);
            }
        }
    }

    pub fn add_row(&mut self, values: Vec<Value>) {
        self.rows.push(values);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_name(&self, index: usize) -> Option<&str> {
        self.columns.get(index).map(String::as_str)
    }

    /// Position of a column, compared case-insensitively
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell value; `Null` for an unknown column, a row out of range or a
    /// short row
    pub fn value(&self, row: usize, column: &str) -> &Value {
        self.column_index(column)
            .and_then(|c| self.rows.get(row).and_then(|r| r.get(c)))
            .unwrap_or(&NULL)
    }

    /// Overwrite a cell
    ///
    /// An unknown column or row is a logged no-op. Writing past the end of
    /// a short row pads it with `Null` first.
    pub fn set_value(&mut self, row: usize, column: &str, value: Value) {
        let Some(c) = self.column_index(column) else {
            tracing::warn!(relation = %self.name, column, "set_value: unknown column");
            return;
        };
        let Some(cells) = self.rows.get_mut(row) else {
            tracing::warn!(relation = %self.name, row, "set_value: row out of range");
            return;
        };
        if cells.len() <= c {
            cells.resize(c + 1, Value::Null);
        }
        cells[c] = value;
    }

    /// Row values in column order, one per column
    ///
    /// Empty for an out-of-range row.
    pub fn get_row(&self, row: usize) -> Vec<Value> {
        let Some(cells) = self.rows.get(row) else {
            return Vec::new();
        };
        (0..self.columns.len())
            .map(|i| cells.get(i).cloned().unwrap_or_default())
            .collect()
    }

    /// Iterate rows in column order
    pub fn rows(&self) -> impl Iterator<Item = Vec<Value>> + '_ {
        (0..self.rows.len()).map(|i| self.get_row(i))
    }

    /// True when any row holds `value` in `column`
    ///
    /// Comparison follows SQLite coercion, so the text `"5"` matches the
    /// integer 5.
    pub fn contains(&self, column: &str, value: &Value) -> bool {
        let Some(c) = self.column_index(column) else {
            return false;
        };
        self.rows
            .iter()
            .any(|r| r.get(c).is_some_and(|v| v.loosely_eq(value)))
    }

    /// Column name/value pairs of one row
    pub fn row_entries(&self, row: usize) -> Vec<(&str, Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.get_row(row))
            .collect()
    }
}
