//! In-memory record store
//!
//! Holds the internal transactions and the bank ledgers keyed by source name.
//! The loader populates the store before any matcher runs; during a run the
//! only mutation is the matched flag on individual records.

use crate::types::{BankRecord, SourceName, Transaction};
use std::collections::HashMap;

/// Transactions plus bank ledgers grouped by source
///
/// Insertion order within a source is preserved. Order across sources is not
/// significant and follows `HashMap` iteration order.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    transactions: Vec<Transaction>,
    ledgers: HashMap<SourceName, Vec<BankRecord>>,
}

impl RecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from already-loaded records
    pub fn from_parts(
        transactions: Vec<Transaction>,
        ledgers: HashMap<SourceName, Vec<BankRecord>>,
    ) -> Self {
        Self {
            transactions,
            ledgers,
        }
    }

    pub fn add_transaction(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    pub fn add_bank_record(&mut self, source: &str, record: BankRecord) {
        self.ledger_entry(source).push(record);
    }

    /// Append records to a source, creating the source on first use
    pub fn extend_ledger<I>(&mut self, source: &str, records: I)
    where
        I: IntoIterator<Item = BankRecord>,
    {
        self.ledger_entry(source).extend(records);
    }

    fn ledger_entry(&mut self, source: &str) -> &mut Vec<BankRecord> {
        self.ledgers.entry(source.to_string()).or_default()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn ledgers(&self) -> &HashMap<SourceName, Vec<BankRecord>> {
        &self.ledgers
    }

    /// Records of a single source, in insertion order
    pub fn ledger(&self, source: &str) -> Option<&[BankRecord]> {
        self.ledgers.get(source).map(Vec::as_slice)
    }

    /// Iterate every bank record together with the name of its source
    pub fn bank_records(&self) -> impl Iterator<Item = (&str, &BankRecord)> {
        self.ledgers
            .iter()
            .flat_map(|(source, records)| records.iter().map(move |r| (source.as_str(), r)))
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn bank_record_count(&self) -> usize {
        self.ledgers.values().map(Vec::len).sum()
    }

    pub fn source_count(&self) -> usize {
        self.ledgers.len()
    }

    /// Whether any record on either side has already been matched
    pub fn has_matches(&self) -> bool {
        self.transactions.iter().any(Transaction::is_matched)
            || self.bank_records().any(|(_, r)| r.is_matched())
    }

    /// Borrow both sides mutably at once
    ///
    /// Matchers hand out the transactions through the work queue and the
    /// ledgers through their lock tables, so the two borrows must be disjoint.
    pub(crate) fn split_mut(
        &mut self,
    ) -> (&mut [Transaction], &mut HashMap<SourceName, Vec<BankRecord>>) {
        (self.transactions.as_mut_slice(), &mut self.ledgers)
    }
}
