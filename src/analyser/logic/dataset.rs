//! In-memory tabular input for a profiling run.
//!
//! A [`Dataset`] is a rectangular grid of [`RawValue`]s under a list of unique
//! column names. It is validated once at construction and never mutated
//! afterwards; profiling only ever borrows it.

use super::frame::distinct_count;
use crate::error::{InputError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// An untyped cell as handed over by the upload layer.
///
/// Values keep the type they arrived with: the text `"1"` and the integer `1`
/// are different cells until the classifier decides what the column is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawValue {
    pub fn is_null(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Display form used for frequency tables, samples and modes.
    pub fn render(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => s.clone(),
        }
    }

    /// Rough heap + inline footprint, used for the `memory_usage` estimate.
    pub fn approx_size(&self) -> usize {
        let inline = std::mem::size_of::<Self>();
        match self {
            Self::Text(s) => inline + s.len(),
            _ => inline,
        }
    }

    /// Appends a type-tagged identity of the cell. Cells of different types
    /// never produce the same key.
    fn write_key(&self, out: &mut String) {
        match self {
            Self::Float(v) if v.is_nan() => out.push('n'),
            Self::Null => out.push('n'),
            Self::Bool(b) => out.push_str(if *b { "b1" } else { "b0" }),
            Self::Int(i) => {
                out.push('i');
                out.push_str(&i.to_string());
            }
            // -0.0 and 0.0 compare equal, so they share a key
            Self::Float(v) => {
                let bits = if *v == 0.0 { 0 } else { v.to_bits() };
                out.push('f');
                out.push_str(&bits.to_string());
            }
            Self::Text(s) => {
                out.push('t');
                out.push_str(&s.len().to_string());
                out.push(':');
                out.push_str(s);
            }
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for RawValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl<T> From<Option<T>> for RawValue
where
    T: Into<Self>,
{
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<RawValue>>,
}

impl Dataset {
    /// Builds a dataset from column names and positional rows.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::DuplicateColumn`] when two columns share a name and
    /// [`InputError::RowWidthMismatch`] when a row is not exactly as wide as the header.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<RawValue>>) -> Result<Self> {
        let mut seen = HashSet::new();
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(InputError::DuplicateColumn(name.clone()).into());
            }
        }

        for (idx, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(InputError::RowWidthMismatch {
                    row: idx,
                    expected: columns.len(),
                    found: row.len(),
                }
                .into());
            }
        }

        Ok(Self { columns, rows })
    }

    /// Builds a dataset from name-keyed records. Columns absent from a record are null.
    ///
    /// # Errors
    ///
    /// Same as [`Dataset::new`].
    pub fn from_records(columns: Vec<String>, records: Vec<HashMap<String, RawValue>>) -> Result<Self> {
        let rows = records
            .into_iter()
            .map(|mut record| {
                columns
                    .iter()
                    .map(|name| record.remove(name).unwrap_or(RawValue::Null))
                    .collect()
            })
            .collect();
        Self::new(columns, rows)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<RawValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Iterates one column top to bottom.
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &RawValue> + '_ {
        self.rows.iter().filter_map(move |row| row.get(idx))
    }

    pub fn estimated_size_bytes(&self) -> usize {
        let headers: usize = self.columns.iter().map(String::len).sum();
        let cells: usize = self
            .rows
            .iter()
            .flat_map(|row| row.iter())
            .map(RawValue::approx_size)
            .sum();
        headers + cells
    }

    /// Number of rows that repeat an earlier row cell-for-cell.
    ///
    /// # Errors
    ///
    /// Only if polars fails to count the row keys.
    pub fn count_duplicate_rows(&self) -> Result<usize> {
        let keys: Vec<String> = self
            .rows
            .iter()
            .map(|row| {
                let mut key = String::new();
                for cell in row {
                    cell.write_key(&mut key);
                    key.push('|');
                }
                key
            })
            .collect();
        let distinct = distinct_count(keys)?;
        Ok(self.rows.len() - distinct)
    }
}
