//! Matching strategy module
//!
//! This module defines the Strategy pattern for the matching engine. Three
//! interchangeable strategies consume the same `RecordStore` and produce the
//! same `ReconciliationResult` shape:
//!
//! - **sequential**: single-threaded baseline, scans every source per transaction
//! - **partitioned**: worker pool, one lock per ledger source
//! - **indexed**: worker pool, precomputed bucket index with one lock per bucket
//!
//! Given identical input, matched, unmatched, discrepancy and invalid totals
//! are identical across strategies. Which bank record a duplicated
//! transaction pairs with is first-fit and may differ between runs.

use crate::config::WorkerConfig;
use crate::core::RecordStore;
use crate::types::{ReconcileError, ReconciliationResult};
use std::fmt;
use std::str::FromStr;

pub mod indexed;
pub mod partitioned;
pub mod sequential;

pub use indexed::IndexedStrategy;
pub use partitioned::PartitionedStrategy;
pub use sequential::SequentialStrategy;

/// Matching strategy trait
///
/// A strategy runs one complete reconciliation over a record store: every
/// transaction gets exactly one matching attempt, matched flags are set on
/// both sides of every pair, and the unmatched bank record sweep runs once
/// at the end.
pub trait MatchingStrategy: Send + Sync {
    /// Name used to select the strategy
    fn name(&self) -> &'static str;

    /// Reconcile every record of `store`
    ///
    /// Bad data never aborts a run; records with unparseable dates are
    /// counted as invalid in the result.
    ///
    /// # Errors
    ///
    /// `AlreadyReconciled` if any record of `store` is already matched. The
    /// store is left untouched in that case.
    fn reconcile(&self, store: &mut RecordStore) -> Result<ReconciliationResult, ReconcileError>;
}

/// Reject a store that carries matched flags from an earlier run
pub(crate) fn ensure_unreconciled(store: &RecordStore) -> Result<(), ReconcileError> {
    if store.has_matches() {
        return Err(ReconcileError::AlreadyReconciled);
    }
    Ok(())
}

/// Available matching strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyType {
    Sequential,
    Partitioned,
    Indexed,
}

impl StrategyType {
    pub const ALL: [StrategyType; 3] = [
        StrategyType::Sequential,
        StrategyType::Partitioned,
        StrategyType::Indexed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyType::Sequential => "sequential",
            StrategyType::Partitioned => "partitioned",
            StrategyType::Indexed => "indexed",
        }
    }
}

impl fmt::Display for StrategyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyType {
    type Err = ReconcileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sequential" => Ok(StrategyType::Sequential),
            "partitioned" => Ok(StrategyType::Partitioned),
            "indexed" => Ok(StrategyType::Indexed),
            _ => Err(ReconcileError::unknown_strategy(s)),
        }
    }
}

/// Create a matching strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The strategy to create
/// * `config` - Worker configuration (ignored by the sequential strategy)
///
/// # Returns
///
/// A boxed trait object implementing the MatchingStrategy trait
pub fn create_strategy(
    strategy_type: StrategyType,
    config: WorkerConfig,
) -> Box<dyn MatchingStrategy> {
    match strategy_type {
        StrategyType::Sequential => Box::new(SequentialStrategy),
        StrategyType::Partitioned => Box::new(PartitionedStrategy::new(config)),
        StrategyType::Indexed => Box::new(IndexedStrategy::new(config)),
    }
}
