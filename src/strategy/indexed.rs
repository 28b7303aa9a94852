//! Indexed concurrent matching strategy
//!
//! Builds a `MatchIndex` over every bank record in one single-threaded pass,
//! then dispatches transactions to the worker pool. Each transaction does a
//! direct key lookup and locks only its own bucket.

use crate::config::WorkerConfig;
use crate::core::aggregator::{finish, merge_all};
use crate::core::{MatchIndex, MatchKey, RecordStore, WorkerPool};
use crate::strategy::{ensure_unreconciled, MatchingStrategy};
use crate::types::{ReconcileError, ReconciliationResult};
use tracing::{debug, instrument};

/// Concurrent strategy over the (date, magnitude, direction) bucket index
#[derive(Debug, Clone)]
pub struct IndexedStrategy {
    config: WorkerConfig,
}

impl IndexedStrategy {
    pub fn new(config: WorkerConfig) -> Self {
        Self { config }
    }
}

impl Default for IndexedStrategy {
    fn default() -> Self {
        Self::new(WorkerConfig::default())
    }
}

impl MatchingStrategy for IndexedStrategy {
    fn name(&self) -> &'static str {
        "indexed"
    }

    #[instrument(
        name = "indexed_reconcile",
        skip_all,
        fields(
            workers = self.config.workers,
            transactions = store.transaction_count(),
            bank_records = store.bank_record_count()
        )
    )]
    fn reconcile(&self, store: &mut RecordStore) -> Result<ReconciliationResult, ReconcileError> {
        ensure_unreconciled(store)?;

        let (transactions, ledgers) = store.split_mut();

        let records = ledgers.values_mut().flat_map(|records| records.iter_mut());
        let index = MatchIndex::build(records);
        debug!(
            buckets = index.bucket_count(),
            indexed = index.indexed_records(),
            "match index built"
        );

        let pool = WorkerPool::new(self.config.workers);
        let partials = pool.run(transactions.iter_mut(), |transaction, partial| {
            partial.settle(transaction, |tx| {
                MatchKey::for_transaction(tx).is_some_and(|key| index.claim(&key))
            });
        });

        drop(index);

        let merged = merge_all(partials);
        debug!(matched = merged.matched, "matching pass complete");
        Ok(finish(merged, store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BankRecord, Direction, Transaction};
    use rust_decimal::Decimal;

    #[test]
    fn test_scale_does_not_affect_key() {
        let mut store = RecordStore::new();
        store.add_transaction(Transaction::new(
            "TX1",
            Decimal::new(10000, 2),
            Direction::Debit,
            "2025-06-05T08:00:00Z",
        ));
        store.add_bank_record("bankA", BankRecord::new("BA1", Decimal::new(-100, 0), "2025-06-05"));

        let strategy = IndexedStrategy::new(WorkerConfig::new(2));
        let result = strategy.reconcile(&mut store).unwrap();

        assert_eq!(result.total_matched, 1);
    }

    #[test]
    fn test_zero_amount_bank_record_is_never_matched() {
        let mut store = RecordStore::new();
        store.add_transaction(Transaction::new(
            "TX1",
            Decimal::ZERO,
            Direction::Credit,
            "2025-06-05T08:00:00Z",
        ));
        store.add_bank_record("bankA", BankRecord::new("BA1", Decimal::ZERO, "2025-06-05"));

        let strategy = IndexedStrategy::new(WorkerConfig::new(2));
        let result = strategy.reconcile(&mut store).unwrap();

        assert_eq!(result.total_matched, 0);
        assert_eq!(result.total_unmatched, 2);
        assert_eq!(result.total_discrepancy, Decimal::ZERO);
    }
}
