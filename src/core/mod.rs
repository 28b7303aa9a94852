//! Core reconciliation components
//!
//! This module contains the building blocks the matchers are assembled from:
//! - `record_store` - Transactions and ledgers keyed by source
//! - `predicate` - The match predicate and the index key it implies
//! - `match_index` - (date, magnitude, direction) bucket index with per-bucket locks
//! - `worker_pool` - Fixed worker pool over a shared queue
//! - `aggregator` - Partial result merge and the final unmatched sweep
//! - `session` - Owner of the store for a single run

pub mod aggregator;
pub mod match_index;
pub mod predicate;
pub mod record_store;
pub mod session;
pub mod worker_pool;

pub use aggregator::PartialResult;
pub use match_index::MatchIndex;
pub use predicate::{is_match, MatchKey};
pub use record_store::RecordStore;
pub use session::ReconciliationSession;
pub use worker_pool::WorkerPool;
