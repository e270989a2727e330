//! roster-core — dataset cache and match engine for roster.
//!
//! # Architecture
//!
//! ```text
//! TableSource ──► DatasetCache ──► search() ──► SearchOutcome
//!  (loader)         (cache)        (search + normalizer)
//! ```
//!
//! The cache and the engine never call each other: the caller fetches an
//! `Arc<Table>` from the cache and hands a borrow of it to [`search`].

pub mod cache;
pub mod config;
pub mod error;
pub mod loader;
pub mod normalizer;
pub mod search;
pub mod types;

pub use cache::DatasetCache;
pub use error::LoadError;
pub use loader::{SpreadsheetSource, TableSource};
pub use normalizer::{normalize, normalize_str};
pub use search::{search, SearchOutcome, SearchResult, EMPTY_QUERY_MESSAGE};
pub use types::{Row, Table};
