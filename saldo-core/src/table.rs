//! Dynamic table model for ingested statement data.
//!
//! Input CSVs carry whatever columns the bank exported, so the table keeps
//! an ordered column list and row-major cells instead of a fixed struct.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Canonical column names after normalization.
pub const COL_DATE: &str = "data";
pub const COL_AMOUNT: &str = "valor";
pub const COL_DESCRIPTION: &str = "descricao";
pub const COL_CATEGORY: &str = "categoria";
pub const COL_ORIGIN: &str = "origem";

/// A single cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Explicit missing-value marker; also the missing-date sentinel.
    Missing,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl Value {
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }
}

/// Comparison form for column names: surrounding whitespace stripped,
/// lower-cased. `" Data "` and `"data"` denote the same column.
pub fn canonical_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// An ordered sequence of rows sharing a uniform column set.
///
/// Every row holds exactly `columns.len()` cells. Row order is insertion
/// order; there is no row identity beyond position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Zero rows, zero columns.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// True when the table has no rows (a header-only table counts as empty,
    /// matching the short-circuit in normalization).
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Value]> {
        self.rows.iter().map(|r| r.as_slice())
    }

    /// Append a row. The row must match the column count.
    pub fn push_row(&mut self, row: Vec<Value>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    /// Case-insensitive, whitespace-trimmed column lookup.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let want = canonical_name(name);
        self.columns.iter().position(|c| canonical_name(c) == want)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn cell(&self, row: usize, col: usize) -> &Value {
        &self.rows[row][col]
    }

    /// Cell lookup by row position and column name.
    pub fn get(&self, row: usize, name: &str) -> Option<&Value> {
        let col = self.column_index(name)?;
        self.rows.get(row).map(|r| &r[col])
    }

    /// Values of one column, top to bottom.
    pub fn column_values(&self, name: &str) -> Option<impl Iterator<Item = &Value>> {
        let col = self.column_index(name)?;
        Some(self.rows.iter().map(move |r| &r[col]))
    }

    /// Append a column, filling every existing row with `fill`.
    pub fn push_column(&mut self, name: &str, fill: Value) {
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.push(fill.clone());
        }
    }

    /// New table containing the rows whose positions satisfy `keep`.
    pub fn retain_rows(&self, keep: impl Fn(usize) -> bool) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .enumerate()
                .filter(|(i, _)| keep(*i))
                .map(|(_, r)| r.clone())
                .collect(),
        }
    }

    /// Concatenate tables preserving the column union.
    ///
    /// Columns are matched by canonical name, keeping the first-seen
    /// spelling; rows missing a column present elsewhere get
    /// [`Value::Missing`]. Row order is table order then within-table
    /// order. An empty input list yields the empty table.
    pub fn concat(tables: Vec<Table>) -> Table {
        let mut columns: Vec<String> = Vec::new();
        for t in &tables {
            for c in &t.columns {
                let want = canonical_name(c);
                if !columns.iter().any(|u| canonical_name(u) == want) {
                    columns.push(c.clone());
                }
            }
        }

        let mut out = Table::new(columns);
        for t in tables {
            // Map each output column to the matching source column, if any.
            let mapping: Vec<Option<usize>> = out
                .columns
                .iter()
                .map(|c| t.column_index(c))
                .collect();
            for row in &t.rows {
                let cells = mapping
                    .iter()
                    .map(|m| match m {
                        Some(i) => row[*i].clone(),
                        None => Value::Missing,
                    })
                    .collect();
                out.rows.push(cells);
            }
        }
        out
    }
}
