//! Partitioned concurrent matching strategy
//!
//! One lock per ledger source. Workers pull transactions from the shared
//! queue and visit the sources one at a time, holding at most one source lock
//! while scanning it.
//!
//! # Contention
//!
//! With few sources every worker competes for the same handful of locks, so
//! throughput flattens quickly as the worker count grows. The indexed strategy
//! narrows the lock scope to a single bucket.

use crate::config::WorkerConfig;
use crate::core::aggregator::{finish, merge_all};
use crate::core::predicate::claim_first_fit;
use crate::core::{RecordStore, WorkerPool};
use crate::strategy::{ensure_unreconciled, MatchingStrategy};
use crate::types::{BankRecord, ReconcileError, ReconciliationResult};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, instrument};

/// Concurrent strategy locking whole sources
#[derive(Debug, Clone)]
pub struct PartitionedStrategy {
    config: WorkerConfig,
}

impl PartitionedStrategy {
    pub fn new(config: WorkerConfig) -> Self {
        Self { config }
    }
}

impl Default for PartitionedStrategy {
    fn default() -> Self {
        Self::new(WorkerConfig::default())
    }
}

impl MatchingStrategy for PartitionedStrategy {
    fn name(&self) -> &'static str {
        "partitioned"
    }

    #[instrument(
        name = "partitioned_reconcile",
        skip_all,
        fields(
            workers = self.config.workers,
            transactions = store.transaction_count(),
            sources = store.source_count()
        )
    )]
    fn reconcile(&self, store: &mut RecordStore) -> Result<ReconciliationResult, ReconcileError> {
        ensure_unreconciled(store)?;

        let (transactions, ledgers) = store.split_mut();

        // Built before dispatch, never resized while workers run
        let source_locks: HashMap<&str, Mutex<&mut [BankRecord]>> = ledgers
            .iter_mut()
            .map(|(source, records)| (source.as_str(), Mutex::new(records.as_mut_slice())))
            .collect();

        let pool = WorkerPool::new(self.config.workers);
        let partials = pool.run(transactions.iter_mut(), |transaction, partial| {
            partial.settle(transaction, |tx| {
                source_locks.values().any(|lock| {
                    let mut records = lock.lock().unwrap_or_else(PoisonError::into_inner);
                    claim_first_fit(tx, records.iter_mut())
                })
            });
        });

        drop(source_locks);

        let merged = merge_all(partials);
        debug!(matched = merged.matched, "matching pass complete");
        Ok(finish(merged, store))
    }
}
