//! I/O module
//!
//! Handles CSV loading and report output.
//!
//! # Components
//!
//! - `csv_format` - Row formats, header validation, source names
//! - `sync_reader` - Synchronous CSV reader with iterator interface
//! - `async_reader` - Asynchronous CSV reader with batch reading interface
//! - `loader` - Builds the record store from the input files
//! - `report` - Text summary and unmatched records export

pub mod async_reader;
pub mod csv_format;
pub mod loader;
pub mod report;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use csv_format::{source_name_from_path, CsvRow, StatementRow, TransactionRow};
pub use loader::{load_async, load_sync, LoadRequest};
pub use report::{write_summary, write_unmatched_csv};
pub use sync_reader::SyncReader;
