//! Core types for roster-core.
//!
//! This module defines the in-memory [`Table`] snapshot of the student
//! spreadsheet and the borrowed [`Row`] view handed out by lookups and search.
//! Rows are stored as cell vectors aligned with the table's column sequence,
//! so column order is explicit rather than an accident of a map type.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Immutable snapshot of the dataset: ordered columns × ordered rows.
///
/// Every row holds exactly `columns.len()` cells. Missing source values are
/// stored as the empty string, never as a null marker.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table from a header and raw rows.
    ///
    /// Rows shorter than the header are padded with empty cells; cells beyond
    /// the header are dropped. Column names are used as given, so callers
    /// must already have trimmed and de-duplicated them.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut cells| {
                cells.resize(width, String::new());
                cells
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.rows.get(index).map(|cells| Row {
            columns: &self.columns,
            cells,
        })
    }

    /// Iterate rows in source order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = Row<'_>> + '_ {
        self.rows.iter().map(|cells| Row {
            columns: &self.columns,
            cells,
        })
    }
}

/// A borrowed view of one table row.
///
/// Serializes as a JSON object whose keys follow the table's column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row<'t> {
    columns: &'t [String],
    cells: &'t [String],
}

impl<'t> Row<'t> {
    /// Cell values in column order.
    pub fn cells(&self) -> &'t [String] {
        self.cells
    }

    /// Look up a cell by column name.
    pub fn get(&self, column: &str) -> Option<&'t str> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| self.cells[i].as_str())
    }

    /// `(column, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&'t str, &'t str)> + 't {
        self.columns
            .iter()
            .zip(self.cells.iter())
            .map(|(c, v)| (c.as_str(), v.as_str()))
    }
}

impl Serialize for Row<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}
