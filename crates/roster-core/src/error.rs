//! Error types for dataset loading.

use std::path::PathBuf;

/// Failure to produce a [`Table`](crate::Table) from the configured source.
///
/// Causes are captured as rendered strings so the error is `Clone`: every
/// caller racing on a failed load receives its own copy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("dataset not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("cannot open workbook {}: {reason}", path.display())]
    Open { path: PathBuf, reason: String },

    #[error("workbook {} contains no worksheets", path.display())]
    NoSheet { path: PathBuf },

    #[error("worksheet {sheet:?} not found in {}", path.display())]
    SheetMissing { path: PathBuf, sheet: String },

    #[error("cannot read worksheet {sheet:?} in {}: {reason}", path.display())]
    Sheet {
        path: PathBuf,
        sheet: String,
        reason: String,
    },
}
