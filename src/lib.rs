//! roster — read-only search service over a spreadsheet of student records.
//!
//! The heavy lifting lives in [`roster_core`]; this crate adds the HTTP
//! surface and re-exports the core so integration tests can import both from
//! one place.
//!
//! # Architecture
//!
//! ```text
//! config ──► DatasetCache ──► search() ──► http
//!                 ▲
//!                 └── SpreadsheetSource
//! ```

pub mod http;

pub use roster_core::*;

/// Build the dataset cache described by `settings`.
pub fn cache_from_settings(settings: &config::Settings) -> DatasetCache {
    let mut source = SpreadsheetSource::new(&settings.dataset.path);
    if let Some(sheet) = &settings.dataset.sheet {
        source = source.with_sheet(sheet);
    }
    DatasetCache::new(source)
}
