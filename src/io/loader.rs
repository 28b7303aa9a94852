//! Record loading
//!
//! Reads the transactions file and every statement file into a
//! `RecordStore`. Two loaders produce identical stores:
//!
//! - `load_sync` reads the files one after another with `csv`
//! - `load_async` reads all files concurrently with `csv-async`, one tokio
//!   task per file, on a multi-threaded runtime
//!
//! # Row Policy
//!
//! - Rejected rows (missing column, empty field, bad amount, unknown type)
//!   are skipped with a warning
//! - Rows with a valid date outside the window are skipped
//! - Rows whose date does not parse are kept; the engine counts them invalid

use crate::core::RecordStore;
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::{source_name_from_path, CsvRow, StatementRow, TransactionRow};
use crate::io::sync_reader::SyncReader;
use crate::types::{BankRecord, DateRange, ReconcileError, SourceName, Transaction};
use futures::future::try_join_all;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Rows read per batch by the async reader
pub const ASYNC_BATCH_SIZE: usize = 1000;

/// Files and window for one load
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest {
    pub transactions: PathBuf,
    /// Statement files, in argument order
    pub statements: Vec<PathBuf>,
    pub range: DateRange,
}

/// Load every file sequentially
pub fn load_sync(request: &LoadRequest) -> Result<RecordStore, ReconcileError> {
    let transactions = read_sync::<TransactionRow>(&request.transactions, &request.range)?;

    let mut ledgers = Vec::with_capacity(request.statements.len());
    for path in &request.statements {
        let records = read_sync::<StatementRow>(path, &request.range)?;
        ledgers.push((source_name_from_path(path), records));
    }

    Ok(assemble(transactions, ledgers))
}

/// Load every file concurrently on a dedicated tokio runtime
pub fn load_async(request: &LoadRequest) -> Result<RecordStore, ReconcileError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| ReconcileError::runtime(format!("failed to start runtime: {}", e)))?;

    runtime.block_on(load_concurrently(request))
}

/// Async body of `load_async`, for callers already inside a runtime
pub async fn load_concurrently(request: &LoadRequest) -> Result<RecordStore, ReconcileError> {
    let range = request.range;

    let transactions_task = tokio::spawn(read_async::<TransactionRow>(
        request.transactions.clone(),
        range,
    ));
    let statement_tasks: Vec<_> = request
        .statements
        .iter()
        .map(|path| tokio::spawn(read_async::<StatementRow>(path.clone(), range)))
        .collect();

    // Awaited in argument order, so ledger order does not depend on which
    // task finished first
    let transactions = join(transactions_task).await?;
    let statements = try_join_all(statement_tasks.into_iter().map(join)).await?;

    let ledgers: Vec<_> = request
        .statements
        .iter()
        .map(|path| source_name_from_path(path))
        .zip(statements)
        .collect();

    Ok(assemble(transactions, ledgers))
}

async fn join<T>(
    task: tokio::task::JoinHandle<Result<T, ReconcileError>>,
) -> Result<T, ReconcileError> {
    task.await
        .map_err(|e| ReconcileError::runtime(format!("loader task failed: {}", e)))?
}

fn read_sync<T: CsvRow>(path: &Path, range: &DateRange) -> Result<Vec<T::Record>, ReconcileError> {
    let label = path.display().to_string();
    let rows = SyncReader::<T>::open(path)?;
    Ok(admit::<T, _>(&label, rows, range))
}

async fn read_async<T: CsvRow>(
    path: PathBuf,
    range: DateRange,
) -> Result<Vec<T::Record>, ReconcileError> {
    let label = path.display().to_string();
    let rows = AsyncReader::<T, _>::open(&path)
        .await?
        .read_all(ASYNC_BATCH_SIZE)
        .await;
    Ok(admit::<T, _>(&label, rows, &range))
}

/// Apply the row policy to the rows of one file
fn admit<T, I>(label: &str, rows: I, range: &DateRange) -> Vec<T::Record>
where
    T: CsvRow,
    I: IntoIterator<Item = Result<T::Record, String>>,
{
    let mut records = Vec::new();
    let mut rejected = 0usize;
    let mut out_of_range = 0usize;

    for row in rows {
        match row {
            Ok(record) => match T::record_date(&record) {
                Some(date) if !range.contains(date) => out_of_range += 1,
                _ => records.push(record),
            },
            Err(e) => {
                warn!(file = label, error = %e, "skipping row");
                rejected += 1;
            }
        }
    }

    if out_of_range > 0 {
        debug!(file = label, out_of_range, "rows outside the reconciliation window");
    }
    info!(
        file = label,
        loaded = records.len(),
        rejected,
        out_of_range,
        "file loaded"
    );
    records
}

fn assemble<L>(transactions: Vec<Transaction>, ledgers: L) -> RecordStore
where
    L: IntoIterator<Item = (SourceName, Vec<BankRecord>)>,
{
    let mut store = RecordStore::new();
    for transaction in transactions {
        store.add_transaction(transaction);
    }
    for (source, records) in ledgers {
        store.extend_ledger(&source, records);
    }
    store
}
