//! Error types for the reconciler
//!
//! This module defines all error types that can occur while loading records
//! and running a reconciliation. Errors are designed to be descriptive and
//! user-friendly for CLI output.
//!
//! # Error Categories
//!
//! - **Caller Errors**: Unknown strategy selector, reused session, bad arguments
//! - **File I/O Errors**: File not found, permission denied, etc.
//! - **CSV Errors**: Malformed CSV, wrong header, empty file
//!
//! Record-level problems are not errors at this level. Rows that cannot be
//! read are skipped by the loader, and records whose date cannot be parsed
//! are counted as invalid by the engine.

use chrono::NaiveDate;
use thiserror::Error;

/// Main error type for the reconciler
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReconcileError {
    /// Strategy selector is not one of `sequential`, `partitioned`, `indexed`
    ///
    /// Reported before any record is touched.
    #[error("Unknown reconciliation strategy '{name}', expected one of: sequential, partitioned, indexed")]
    UnknownStrategy {
        /// The name that was requested
        name: String,
    },

    /// A session was asked to run a second time
    ///
    /// Matched flags never revert, so a store can only be reconciled once.
    #[error("Records in this session have already been reconciled")]
    AlreadyReconciled,

    /// Command-line argument failed validation
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the problem
        message: String,
    },

    /// Reconciliation window ends before it starts
    #[error("End date {end} cannot be earlier than start date {start}")]
    InvalidDateRange {
        /// Window start
        start: NaiveDate,
        /// Window end
        end: NaiveDate,
    },

    /// File not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// Input file has no header line
    #[error("File {path} is empty")]
    EmptyFile {
        /// The empty file
        path: String,
    },

    /// Header line does not match the expected columns
    #[error("Invalid header in {path}: {message}")]
    InvalidHeader {
        /// File with the bad header
        path: String,
        /// What was wrong with it
        message: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// Async runtime could not be created or a loader task failed
    #[error("Runtime error: {message}")]
    Runtime {
        /// Description of the failure
        message: String,
    },
}

impl From<std::io::Error> for ReconcileError {
    fn from(error: std::io::Error) -> Self {
        ReconcileError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for ReconcileError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        ReconcileError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl From<csv_async::Error> for ReconcileError {
    fn from(error: csv_async::Error) -> Self {
        ReconcileError::ParseError {
            line: None,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl ReconcileError {
    /// Create an UnknownStrategy error
    pub fn unknown_strategy(name: &str) -> Self {
        ReconcileError::UnknownStrategy {
            name: name.to_string(),
        }
    }

    /// Create an InvalidArgument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        ReconcileError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an InvalidHeader error
    pub fn invalid_header(path: &str, message: impl Into<String>) -> Self {
        ReconcileError::InvalidHeader {
            path: path.to_string(),
            message: message.into(),
        }
    }

    /// Create a FileNotFound error
    pub fn file_not_found(path: &str) -> Self {
        ReconcileError::FileNotFound {
            path: path.to_string(),
        }
    }

    /// Create a Runtime error
    pub fn runtime(message: impl Into<String>) -> Self {
        ReconcileError::Runtime {
            message: message.into(),
        }
    }
}
