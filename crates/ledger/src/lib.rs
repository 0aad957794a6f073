//! Ledger Loader.
//!
//! Reads the item catalog and the movement ledger (local CSV files or published
//! spreadsheet URLs), parses them into immutable tables and memoizes the resulting
//! snapshot per source pair for the lifetime of the loader.

pub mod cache;
pub mod error;
pub mod loader;
pub mod parse;
pub mod source;

pub use cache::SnapshotCache;
pub use error::LoadError;
pub use loader::{LedgerLoader, LedgerSnapshot};
pub use parse::{LoadReport, SkippedRow, parse_items, parse_movements, parse_timestamp};
pub use source::{LedgerSources, SourceDescriptor, SourceFetcher, TableFetcher};
