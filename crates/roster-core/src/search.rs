//! Search layer — substring containment over normalized row text.
//!
//! Each row is flattened into one string: every cell is normalized, in column
//! order, and the pieces are joined with a single space. A row matches when the
//! normalized query is a substring of that string. Because of the join, a
//! query may match across two adjacent cells (`"ali 101"` hits a row with
//! `Name = "Ali"` and `Group = "101"`). Keep the join; per-cell matching would
//! change which rows are returned.
//!
//! There is no index and no ranking. Results keep table order.

use crate::{
    normalizer::normalize_str,
    types::{Row, Table},
};

/// Fixed message returned when the query is blank.
pub const EMPTY_QUERY_MESSAGE: &str = "Qidiruv so\u{2018}rovi bo\u{2018}sh";

/// Separator placed between normalized cells of one row.
pub const CELL_SEPARATOR: &str = " ";

/// Matching rows for a non-blank query.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult<'t> {
    /// The caller's query with surrounding whitespace removed.
    pub query: String,
    /// Matching rows with their original cell values, in table order.
    pub rows: Vec<Row<'t>>,
}

impl SearchResult<'_> {
    pub fn count(&self) -> usize {
        self.rows.len()
    }
}

/// Outcome of [`search`]. A blank query is a normal result, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome<'t> {
    EmptyQuery,
    Found(SearchResult<'t>),
}

impl<'t> SearchOutcome<'t> {
    pub fn is_success(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }

    pub fn rows(&self) -> &[Row<'t>] {
        match self {
            SearchOutcome::EmptyQuery => &[],
            SearchOutcome::Found(result) => &result.rows,
        }
    }
}

/// Build the searchable text of one row.
pub fn row_text(row: &Row<'_>) -> String {
    row.cells()
        .iter()
        .map(|cell| normalize_str(cell))
        .collect::<Vec<_>>()
        .join(CELL_SEPARATOR)
}

/// Return every row whose normalized text contains the normalized query.
pub fn search<'t>(table: &'t Table, query: &str) -> SearchOutcome<'t> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        tracing::warn!("search aborted: empty query");
        return SearchOutcome::EmptyQuery;
    }

    let needle = normalize_str(trimmed);
    let rows: Vec<Row<'t>> = table
        .rows()
        .filter(|row| row_text(row).contains(&needle))
        .collect();

    tracing::info!(q = %trimmed, results = rows.len(), "search completed");
    SearchOutcome::Found(SearchResult {
        query: trimmed.to_string(),
        rows,
    })
}
