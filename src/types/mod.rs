//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `transaction`: Internal transactions and their direction
//! - `bank_record`: Bank statement records and source names
//! - `dates`: Calendar date normalization
//! - `report`: The reconciliation result
//! - `error`: Error types for the reconciler

pub mod bank_record;
pub mod dates;
pub mod error;
pub mod report;
pub mod transaction;

pub use bank_record::{BankRecord, SourceName};
pub use dates::DateRange;
pub use error::ReconcileError;
pub use report::ReconciliationResult;
pub use transaction::{Direction, Transaction};
