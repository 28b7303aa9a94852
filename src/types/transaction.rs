//! Internal transaction types
//!
//! This module defines the direction of a money movement and the internal
//! transaction record that is reconciled against bank statements.

use super::dates::parse_transaction_time;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction of a money movement
///
/// Internal transactions state their direction explicitly. Bank records
/// encode it in the sign of the amount: negative is a debit, positive a credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Money coming in
    Credit,

    /// Money going out
    Debit,
}

impl Direction {
    /// Direction implied by a signed bank amount
    ///
    /// Returns `None` for a zero amount, which carries no direction and can
    /// therefore never be paired with a transaction.
    pub fn from_signed(amount: Decimal) -> Option<Self> {
        if amount.is_zero() {
            None
        } else if amount.is_sign_negative() {
            Some(Direction::Debit)
        } else {
            Some(Direction::Credit)
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Credit => "credit",
            Direction::Debit => "debit",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "credit" => Ok(Direction::Credit),
            "debit" => Ok(Direction::Debit),
            other => Err(format!(
                "invalid transaction type '{}', expected 'credit' or 'debit'",
                other
            )),
        }
    }
}

/// Internal transaction awaiting confirmation against a bank ledger
///
/// The calendar date is derived from the raw timestamp once, at construction.
/// A timestamp that fails to parse leaves `date` empty: the record is kept,
/// but the engine counts it as invalid and never matches it.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Transaction identifier (`trxID` column)
    pub id: String,

    /// Signed amount as exported by the internal system
    pub amount: Decimal,

    /// Credit or debit
    pub direction: Direction,

    /// Raw timestamp as read from the source file
    pub timestamp: String,

    date: Option<NaiveDate>,
    matched: bool,
}

impl Transaction {
    /// Create an unmatched transaction, parsing its timestamp
    pub fn new(
        id: impl Into<String>,
        amount: Decimal,
        direction: Direction,
        timestamp: impl Into<String>,
    ) -> Self {
        let timestamp = timestamp.into();
        let date = parse_transaction_time(&timestamp).ok();
        Self {
            id: id.into(),
            amount,
            direction,
            timestamp,
            date,
            matched: false,
        }
    }

    /// Calendar date of the transaction, if its timestamp parsed
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Whether the timestamp parsed into a calendar date
    pub fn is_valid(&self) -> bool {
        self.date.is_some()
    }

    pub fn is_matched(&self) -> bool {
        self.matched
    }

    /// Transition the record to matched
    ///
    /// The flag only ever moves from false to true; there is no way to clear it.
    pub(crate) fn mark_matched(&mut self) {
        debug_assert!(!self.matched, "transaction {} matched twice", self.id);
        self.matched = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("credit", Direction::Credit)]
    #[case("debit", Direction::Debit)]
    #[case("DEBIT", Direction::Debit)]
    #[case(" Credit ", Direction::Credit)]
    fn test_direction_from_str(#[case] raw: &str, #[case] expected: Direction) {
        assert_eq!(raw.parse::<Direction>().unwrap(), expected);
    }

    #[test]
    fn test_direction_from_str_rejects_unknown() {
        let err = "transfer".parse::<Direction>().unwrap_err();
        assert!(err.contains("invalid transaction type 'transfer'"));
    }

    #[rstest]
    #[case::negative(Decimal::new(-10000, 2), Some(Direction::Debit))]
    #[case::positive(Decimal::new(10000, 2), Some(Direction::Credit))]
    #[case::zero(Decimal::ZERO, None)]
    #[case::negative_zero(Decimal::new(-0, 2), None)]
    fn test_direction_from_signed(#[case] amount: Decimal, #[case] expected: Option<Direction>) {
        assert_eq!(Direction::from_signed(amount), expected);
    }

    #[test]
    fn test_new_transaction_parses_date() {
        let tx = Transaction::new(
            "TX1",
            Decimal::new(100, 0),
            Direction::Debit,
            "2025-06-05T08:01:00Z",
        );
        assert!(tx.is_valid());
        assert_eq!(tx.date(), NaiveDate::from_ymd_opt(2025, 6, 5));
        assert!(!tx.is_matched());
    }

    #[test]
    fn test_new_transaction_keeps_unparseable_timestamp() {
        let tx = Transaction::new("TX1", Decimal::new(100, 0), Direction::Debit, "not a date");
        assert!(!tx.is_valid());
        assert_eq!(tx.timestamp, "not a date");
    }

    #[test]
    fn test_mark_matched() {
        let mut tx =
            Transaction::new("TX1", Decimal::ONE, Direction::Credit, "2025-06-05T08:01:00Z");
        tx.mark_matched();
        assert!(tx.is_matched());
    }
}
