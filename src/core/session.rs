//! Reconciliation session
//!
//! A `ReconciliationSession` owns the record store and the worker
//! configuration for exactly one reconciliation run. Separate sessions share
//! no state, so runs (and tests) can proceed in parallel.

use crate::config::WorkerConfig;
use crate::core::RecordStore;
use crate::strategy::{create_strategy, StrategyType};
use crate::types::{ReconcileError, ReconciliationResult};
use tracing::info;

/// Session owning the records of one reconciliation run
#[derive(Debug)]
pub struct ReconciliationSession {
    store: RecordStore,
    config: WorkerConfig,
    reconciled: bool,
}

impl ReconciliationSession {
    /// Create a session with the default worker configuration
    pub fn new(store: RecordStore) -> Self {
        Self::with_config(store, WorkerConfig::default())
    }

    pub fn with_config(store: RecordStore, config: WorkerConfig) -> Self {
        Self {
            store,
            config,
            reconciled: false,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Give back the store, including the matched flags of a completed run
    pub fn into_store(self) -> RecordStore {
        self.store
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn is_reconciled(&self) -> bool {
        self.reconciled
    }

    /// Run the strategy named `strategy_name`
    ///
    /// # Errors
    ///
    /// - `UnknownStrategy` if the name is not one of sequential, partitioned
    ///   or indexed. No record is touched in that case.
    /// - `AlreadyReconciled` if this session already ran or its store
    ///   already holds matched records.
    pub fn run(&mut self, strategy_name: &str) -> Result<ReconciliationResult, ReconcileError> {
        let strategy_type: StrategyType = strategy_name.parse()?;
        self.run_with(strategy_type)
    }

    /// Run an already-parsed strategy
    pub fn run_with(
        &mut self,
        strategy_type: StrategyType,
    ) -> Result<ReconciliationResult, ReconcileError> {
        if self.reconciled {
            return Err(ReconcileError::AlreadyReconciled);
        }

        let strategy = create_strategy(strategy_type, self.config.clone());
        info!(
            strategy = strategy.name(),
            workers = self.config.workers,
            transactions = self.store.transaction_count(),
            bank_records = self.store.bank_record_count(),
            sources = self.store.source_count(),
            "starting reconciliation"
        );

        let result = strategy.reconcile(&mut self.store)?;
        self.reconciled = true;

        info!(
            processed = result.total_processed,
            matched = result.total_matched,
            unmatched = result.total_unmatched,
            invalid = result.total_invalid,
            discrepancy = %result.total_discrepancy,
            "reconciliation finished"
        );
        Ok(result)
    }
}
