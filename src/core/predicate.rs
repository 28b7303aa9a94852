//! Match predicate
//!
//! A transaction and a bank record represent the same event iff:
//! - their calendar dates are equal,
//! - their amount magnitudes are exactly equal (no tolerance),
//! - the transaction direction agrees with the sign of the bank amount.
//!
//! The predicate is equivalent to equality of the two records' `MatchKey`s,
//! which is what lets the indexed matcher replace the scan with a lookup.

use crate::types::{BankRecord, Direction, Transaction};
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Bucket key of the indexed matcher: (date, magnitude, direction)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchKey {
    pub date: NaiveDate,
    /// Absolute amount, normalized so `100.0` and `100.00` share a key
    pub magnitude: Decimal,
    pub direction: Direction,
}

impl MatchKey {
    /// Key of a transaction, `None` if its timestamp did not parse
    pub fn for_transaction(transaction: &Transaction) -> Option<Self> {
        Some(Self {
            date: transaction.date()?,
            magnitude: transaction.amount.abs().normalize(),
            direction: transaction.direction,
        })
    }

    /// Key of a bank record
    ///
    /// `None` if its date did not parse or its amount is zero (no direction).
    pub fn for_bank_record(record: &BankRecord) -> Option<Self> {
        Some(Self {
            date: record.date()?,
            magnitude: record.amount.abs().normalize(),
            direction: record.direction()?,
        })
    }
}

/// Whether a transaction direction agrees with a signed bank amount
pub fn direction_consistent(direction: Direction, bank_amount: Decimal) -> bool {
    Direction::from_signed(bank_amount) == Some(direction)
}

/// Decide whether a transaction and a bank record are the same event
pub fn is_match(transaction: &Transaction, record: &BankRecord) -> bool {
    let (Some(tx_date), Some(record_date)) = (transaction.date(), record.date()) else {
        return false;
    };

    tx_date == record_date
        && transaction.amount.abs() == record.amount.abs()
        && direction_consistent(transaction.direction, record.amount)
}

/// Mark the first unmatched candidate that matches `transaction`
///
/// First-fit: candidates are tried in iteration order and the search stops
/// at the first eligible one. Returns whether a bank record was claimed; the
/// caller is responsible for marking the transaction itself.
pub fn claim_first_fit<'r, I>(transaction: &Transaction, candidates: I) -> bool
where
    I: IntoIterator<Item = &'r mut BankRecord>,
{
    match candidates
        .into_iter()
        .find(|record| !record.is_matched() && is_match(transaction, record))
    {
        Some(record) => {
            record.mark_matched();
            true
        }
        None => false,
    }
}
