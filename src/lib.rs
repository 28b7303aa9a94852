//! Bank Reconciler Library
//! # Overview
//!
//! This library reconciles internal transactions against one or more bank
//! statement ledgers and reports every record that found no partner.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Transaction, BankRecord, results, errors)
//! - [`cli`] - CLI arguments parsing and validation
//! - [`config`] - Worker configuration and environment variable names
//! - [`core`] - Matching building blocks:
//!   - [`core::record_store`] - Transactions and ledgers keyed by source
//!   - [`core::predicate`] - The match predicate
//!   - [`core::match_index`] - Bucket index used by the indexed strategy
//!   - [`core::worker_pool`] - Worker threads over a shared queue
//!   - [`core::aggregator`] - Partial result merge and the unmatched sweep
//!   - [`core::session`] - One reconciliation run over an owned store
//! - [`strategy`] - Sequential, partitioned and indexed matchers
//! - [`io`] - CSV loading (sync and async) and report output
//!
//! # Matching
//!
//! A transaction and a bank record match when their calendar dates are
//! equal, their amounts have the same magnitude, and the transaction's
//! direction agrees with the sign of the bank amount (debit pairs with a
//! negative amount, credit with a positive one). Matching is first-fit and
//! every record is matched at most once, at any worker count.
//!
//! # Example
//!
//! ```
//! use bank_reconciler::{BankRecord, Direction, RecordStore, ReconciliationSession, Transaction};
//! use rust_decimal::Decimal;
//!
//! let mut store = RecordStore::new();
//! store.add_transaction(Transaction::new(
//!     "TX1",
//!     Decimal::new(100, 0),
//!     Direction::Debit,
//!     "2025-06-05T08:01:00Z",
//! ));
//! store.add_bank_record("bankA", BankRecord::new("BA1", Decimal::new(-100, 0), "2025-06-05"));
//!
//! let mut session = ReconciliationSession::new(store);
//! let result = session.run("indexed").unwrap();
//! assert_eq!(result.total_matched, 1);
//! assert_eq!(result.total_unmatched, 0);
//! ```

// Module declarations
pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use config::WorkerConfig;
pub use core::{RecordStore, ReconciliationSession};
pub use strategy::{create_strategy, MatchingStrategy, StrategyType};
pub use types::{
    BankRecord, DateRange, Direction, ReconcileError, ReconciliationResult, SourceName,
    Transaction,
};
