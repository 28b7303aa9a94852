//! Calendar date normalization
//!
//! Transactions carry a UTC timestamp while bank statements carry a plain
//! calendar date. Both are normalized to `NaiveDate` before comparison.

use crate::types::ReconcileError;
use chrono::{NaiveDate, NaiveDateTime};

/// Timestamp layout used by the internal transaction export
pub const TRANSACTION_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Date layout used by bank statement files
pub const STATEMENT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Date layout used for the reconciliation window on the command line
pub const WINDOW_DATE_FORMAT: &str = "%Y%m%d";

/// Parse a transaction timestamp (`2025-06-05T08:01:00Z`) into its calendar date
pub fn parse_transaction_time(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw.trim(), TRANSACTION_TIME_FORMAT).map(|dt| dt.date())
}

/// Parse a bank statement date (`2025-06-05`)
pub fn parse_statement_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(raw.trim(), STATEMENT_DATE_FORMAT)
}

/// Parse a window boundary (`20250605`)
pub fn parse_window_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(raw.trim(), WINDOW_DATE_FORMAT)
}

/// Inclusive `[start, end]` reconciliation window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a window, rejecting one that ends before it starts
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ReconcileError> {
        if end < start {
            return Err(ReconcileError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}
