//! Domain-specific assertion macros for roster harnesses.
//!
//! These wrap `pretty_assertions` and add failure messages that say which
//! search invariant broke.

/// Assert that a search outcome returned exactly the rows whose first cell
/// is listed, in that order.
///
/// ```rust
/// assert_first_cells!(outcome, ["Ra'no Karimova", "Ali Valiyev"]);
/// ```
#[macro_export]
macro_rules! assert_first_cells {
    ($outcome:expr, [$($name:expr),* $(,)?]) => {{
        let outcome: &roster_core::SearchOutcome<'_> = &$outcome;
        let actual: Vec<&str> = outcome
            .rows()
            .iter()
            .map(|r| r.cells().first().map(String::as_str).unwrap_or(""))
            .collect();
        let expected: Vec<&str> = vec![$($name),*];
        pretty_assertions::assert_eq!(
            actual, expected,
            "assert_first_cells! failed: unexpected rows (order matters)"
        );
    }};
}

/// Assert that an outcome is the empty-query validation result.
#[macro_export]
macro_rules! assert_empty_query {
    ($outcome:expr) => {{
        let outcome: &roster_core::SearchOutcome<'_> = &$outcome;
        if !matches!(outcome, roster_core::SearchOutcome::EmptyQuery) {
            panic!(
                "assert_empty_query! failed: expected EmptyQuery, got {} rows",
                outcome.rows().len()
            );
        }
    }};
}

/// Assert that every returned row is present, unchanged, in the table.
pub fn assert_rows_subset_of_table(outcome: &roster_core::SearchOutcome<'_>, table: &roster_core::Table) {
    for row in outcome.rows() {
        assert!(
            table.rows().any(|r| r.cells() == row.cells()),
            "search returned a row that is not in the table: {:?}",
            row.cells()
        );
    }
}
