//! Sequential matching strategy
//!
//! Single-threaded baseline. For every transaction, sources are visited in
//! map order and records in stored order; the first unmatched record that
//! satisfies the predicate is claimed. Cost is
//! O(transactions × bank records).

use crate::core::aggregator::{finish, PartialResult};
use crate::core::predicate::claim_first_fit;
use crate::core::RecordStore;
use crate::strategy::{ensure_unreconciled, MatchingStrategy};
use crate::types::{ReconcileError, ReconciliationResult};
use tracing::{debug, instrument};

/// Sequential matching strategy
///
/// Holds no configuration and no locks. Useful as the reference result the
/// concurrent strategies are checked against.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialStrategy;

impl MatchingStrategy for SequentialStrategy {
    fn name(&self) -> &'static str {
        "sequential"
    }

    #[instrument(
        name = "sequential_reconcile",
        skip_all,
        fields(
            transactions = store.transaction_count(),
            sources = store.source_count()
        )
    )]
    fn reconcile(&self, store: &mut RecordStore) -> Result<ReconciliationResult, ReconcileError> {
        ensure_unreconciled(store)?;

        let mut partial = PartialResult::default();
        let (transactions, ledgers) = store.split_mut();

        for transaction in transactions.iter_mut() {
            partial.settle(transaction, |tx| {
                claim_first_fit(
                    tx,
                    ledgers.values_mut().flat_map(|records| records.iter_mut()),
                )
            });
        }

        debug!(matched = partial.matched, "matching pass complete");
        Ok(finish(partial, store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BankRecord, Direction, Transaction};
    use rust_decimal::Decimal;

    #[test]
    fn test_first_fit_follows_stored_order() {
        let mut store = RecordStore::new();
        store.add_transaction(Transaction::new(
            "TX1",
            Decimal::new(50, 0),
            Direction::Credit,
            "2025-06-05T10:00:00Z",
        ));
        store.extend_ledger(
            "bankA",
            vec![
                BankRecord::new("BA1", Decimal::new(50, 0), "2025-06-05"),
                BankRecord::new("BA2", Decimal::new(50, 0), "2025-06-05"),
            ],
        );

        let result = SequentialStrategy.reconcile(&mut store).unwrap();

        assert_eq!(result.total_matched, 1);
        let ledger = store.ledger("bankA").unwrap();
        assert!(ledger[0].is_matched());
        assert!(!ledger[1].is_matched());
        assert_eq!(result.unmatched_bank_records["bankA"][0].id, "BA2");
    }

    #[test]
    fn test_empty_store() {
        let mut store = RecordStore::new();
        let result = SequentialStrategy.reconcile(&mut store).unwrap();
        assert_eq!(result, ReconciliationResult::default());
    }
}
