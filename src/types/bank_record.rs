//! Bank statement record types

use super::dates::parse_statement_date;
use super::transaction::Direction;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Name of the external ledger a bank record belongs to (e.g. `bankA`)
pub type SourceName = String;

/// Entry from an external bank statement
///
/// The owning source is implicit: records are stored under their source name
/// in the record store and are never moved between sources.
#[derive(Debug, Clone, PartialEq)]
pub struct BankRecord {
    /// Statement line identifier (`unique_identifier` column)
    pub id: String,

    /// Signed amount; the sign encodes the direction
    pub amount: Decimal,

    /// Raw date as read from the statement file
    pub raw_date: String,

    date: Option<NaiveDate>,
    matched: bool,
}

impl BankRecord {
    /// Create an unmatched bank record, parsing its statement date
    pub fn new(id: impl Into<String>, amount: Decimal, raw_date: impl Into<String>) -> Self {
        let raw_date = raw_date.into();
        let date = parse_statement_date(&raw_date).ok();
        Self {
            id: id.into(),
            amount,
            raw_date,
            date,
            matched: false,
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn is_valid(&self) -> bool {
        self.date.is_some()
    }

    /// Direction implied by the sign of the amount
    pub fn direction(&self) -> Option<Direction> {
        Direction::from_signed(self.amount)
    }

    pub fn is_matched(&self) -> bool {
        self.matched
    }

    /// Transition the record to matched
    ///
    /// Callers must hold whichever lock owns this record under the active
    /// strategy; the `&mut` receiver makes that exclusivity a compile-time fact.
    pub(crate) fn mark_matched(&mut self) {
        debug_assert!(!self.matched, "bank record {} matched twice", self.id);
        self.matched = true;
    }
}
