//! Reconciliation result types
//!
//! The `ReconciliationResult` is the sole product of a reconciliation run.
//! It is built by the aggregator from per-worker partial results plus the
//! final sweep over bank records that found no partner.

use super::bank_record::{BankRecord, SourceName};
use super::transaction::Transaction;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Final report of a reconciliation run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconciliationResult {
    /// Records that took part in matching: `matched * 2 + unmatched`
    pub total_processed: usize,

    /// Number of matched transaction/bank record pairs
    pub total_matched: usize,

    /// Unmatched records on both sides
    pub total_unmatched: usize,

    /// Unmatched internal transactions
    pub total_unmatched_transactions: usize,

    /// Unmatched bank records across all sources
    pub total_unmatched_bank_records: usize,

    /// Records whose date could not be parsed
    ///
    /// Only the count is reported; the individual causes are not retained.
    pub total_invalid: usize,

    /// Sum of absolute amounts of every valid record left unmatched
    pub total_discrepancy: Decimal,

    /// Transactions that found no bank record
    pub unmatched_transactions: Vec<Transaction>,

    /// Bank records that found no transaction, grouped by source
    pub unmatched_bank_records: BTreeMap<SourceName, Vec<BankRecord>>,
}

impl ReconciliationResult {
    /// Whether every valid record on both sides found a partner
    pub fn is_balanced(&self) -> bool {
        self.total_unmatched == 0
    }

    /// Number of input records accounted for, valid or not
    pub fn total_records(&self) -> usize {
        self.total_processed + self.total_invalid
    }
}
