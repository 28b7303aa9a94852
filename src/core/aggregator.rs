//! Result aggregation
//!
//! Every worker accumulates a private `PartialResult`. Once all workers have
//! terminated the partials are merged and the final sweep collects the bank
//! records that were never claimed.
//!
//! # Merge Laws
//!
//! `PartialResult::merge` sums counters and the discrepancy and concatenates
//! the unmatched transaction lists. Counter results are identical for any
//! fold order (commutative and associative); only the order of the
//! concatenated list depends on it.
//!
//! # Counting
//!
//! - a matched pair adds 2 to `processed` (both records took part)
//! - an unmatched transaction or bank record adds 1 to `processed`
//! - a record with an unparseable date adds 1 to `invalid` and nothing else

use crate::core::RecordStore;
use crate::types::{ReconciliationResult, Transaction};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Per-worker accumulator
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialResult {
    pub processed: usize,
    pub matched: usize,
    pub invalid: usize,
    pub discrepancy: Decimal,
    pub unmatched_transactions: Vec<Transaction>,
}

impl PartialResult {
    pub fn record_match(&mut self) {
        self.matched += 1;
        self.processed += 2;
    }

    pub fn record_unmatched(&mut self, transaction: &Transaction) {
        self.processed += 1;
        self.discrepancy += transaction.amount.abs();
        self.unmatched_transactions.push(transaction.clone());
    }

    pub fn record_invalid(&mut self) {
        self.invalid += 1;
    }

    /// Run one matching attempt for `transaction` and account for the outcome
    ///
    /// `search` is only called for transactions with a valid date. It must
    /// claim (mark) a bank record and return true, or return false.
    pub fn settle<F>(&mut self, transaction: &mut Transaction, search: F)
    where
        F: FnOnce(&Transaction) -> bool,
    {
        if !transaction.is_valid() {
            self.record_invalid();
            return;
        }

        if search(transaction) {
            transaction.mark_matched();
            self.record_match();
        } else {
            self.record_unmatched(transaction);
        }
    }

    /// Combine two partial results
    pub fn merge(mut self, other: PartialResult) -> PartialResult {
        self.processed += other.processed;
        self.matched += other.matched;
        self.invalid += other.invalid;
        self.discrepancy += other.discrepancy;
        self.unmatched_transactions.extend(other.unmatched_transactions);
        self
    }
}

/// Fold any number of partial results into one
pub fn merge_all<I>(partials: I) -> PartialResult
where
    I: IntoIterator<Item = PartialResult>,
{
    partials
        .into_iter()
        .fold(PartialResult::default(), PartialResult::merge)
}

/// Turn the merged partial into the final report
///
/// Runs the unmatched bank record sweep. Must be called exactly once per run,
/// after every worker has terminated; the shared `&RecordStore` borrow makes
/// it impossible to call while ledgers are still locked by workers.
pub fn finish(partial: PartialResult, store: &RecordStore) -> ReconciliationResult {
    let unmatched_transactions = partial.unmatched_transactions.len();
    let mut result = ReconciliationResult {
        total_processed: partial.processed,
        total_matched: partial.matched,
        total_unmatched: unmatched_transactions,
        total_unmatched_transactions: unmatched_transactions,
        total_unmatched_bank_records: 0,
        total_invalid: partial.invalid,
        total_discrepancy: partial.discrepancy,
        unmatched_transactions: partial.unmatched_transactions,
        unmatched_bank_records: BTreeMap::new(),
    };

    sweep_unmatched_bank_records(store, &mut result);
    result
}

/// Collect every bank record no worker claimed
fn sweep_unmatched_bank_records(store: &RecordStore, result: &mut ReconciliationResult) {
    for (source, record) in store.bank_records() {
        if !record.is_valid() {
            result.total_invalid += 1;
            continue;
        }
        if record.is_matched() {
            continue;
        }

        result
            .unmatched_bank_records
            .entry(source.to_string())
            .or_default()
            .push(record.clone());
        result.total_discrepancy += record.amount.abs();
        result.total_unmatched_bank_records += 1;
        result.total_unmatched += 1;
        result.total_processed += 1;
    }
}
