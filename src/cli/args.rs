use crate::config::{WorkerConfig, DEFAULT_STRATEGY, STRATEGY_ENV, WORKERS_ENV};
use crate::io::LoadRequest;
use crate::types::dates::parse_window_date;
use crate::types::{DateRange, ReconcileError};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

/// Reconcile internal transactions against bank statements
#[derive(Parser, Debug)]
#[command(name = "bank-reconciler")]
#[command(about = "Reconcile internal transactions against bank statements", long_about = None)]
pub struct CliArgs {
    /// Transactions CSV file
    #[arg(value_name = "TRANSACTIONS", help = "Path to the system transactions CSV file")]
    pub transactions: PathBuf,

    /// Bank statement CSV files, comma separated
    #[arg(
        value_name = "STATEMENTS",
        help = "Comma-separated bank statement CSV files (e.g. bankA_20250605.csv,bankB_20250605.csv)"
    )]
    pub statements: String,

    /// First day of the reconciliation window
    #[arg(value_name = "START", help = "Start date, YYYYMMDD")]
    pub start_date: String,

    /// Last day of the reconciliation window
    #[arg(value_name = "END", help = "End date, YYYYMMDD")]
    pub end_date: String,

    /// Matching strategy
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        env = STRATEGY_ENV,
        default_value = DEFAULT_STRATEGY,
        help = "Matching strategy: 'sequential', 'partitioned' or 'indexed'"
    )]
    pub strategy: String,

    /// Worker threads for the concurrent strategies
    #[arg(
        long = "workers",
        value_name = "COUNT",
        env = WORKERS_ENV,
        help = "Worker threads for partitioned/indexed matching (default: 2 x CPU cores)"
    )]
    pub workers: Option<usize>,

    /// How input files are read
    #[arg(
        long = "loader",
        value_name = "LOADER",
        default_value = "async",
        help = "File loader: 'sync' reads files one by one, 'async' reads them concurrently"
    )]
    pub loader: LoaderType,

    /// Export unmatched records to this CSV file
    #[arg(long = "unmatched-csv", value_name = "PATH")]
    pub unmatched_csv: Option<PathBuf>,
}

/// Available file loaders
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LoaderType {
    Sync,
    Async,
}

impl CliArgs {
    /// Validate file names and the date window
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if a file does not end in `.csv` or a date is not
    ///   `YYYYMMDD`
    /// - `InvalidDateRange` if the end date is before the start date
    pub fn validate(&self) -> Result<LoadRequest, ReconcileError> {
        if !has_csv_extension(&self.transactions) {
            return Err(ReconcileError::invalid_argument(format!(
                "invalid file format for system transactions: expected .csv, got {}",
                self.transactions.display()
            )));
        }

        let statements = self.statement_paths();
        if statements.is_empty() {
            return Err(ReconcileError::invalid_argument(
                "at least one bank statement file is required",
            ));
        }
        if let Some(bad) = statements.iter().find(|p| !has_csv_extension(p)) {
            return Err(ReconcileError::invalid_argument(format!(
                "invalid file format for bank statements: expected .csv, got {}",
                bad.display()
            )));
        }

        let start = parse_window_date(&self.start_date).map_err(|e| {
            ReconcileError::invalid_argument(format!(
                "invalid start date format: {}. expected YYYYMMDD",
                e
            ))
        })?;
        let end = parse_window_date(&self.end_date).map_err(|e| {
            ReconcileError::invalid_argument(format!(
                "invalid end date format: {}. expected YYYYMMDD",
                e
            ))
        })?;

        Ok(LoadRequest {
            transactions: self.transactions.clone(),
            statements,
            range: DateRange::new(start, end)?,
        })
    }

    /// Statement files in argument order
    pub fn statement_paths(&self) -> Vec<PathBuf> {
        self.statements
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .collect()
    }

    /// Create a WorkerConfig from CLI arguments
    ///
    /// Falls back to the default when no worker count was given; a zero
    /// count falls back with a warning.
    pub fn to_worker_config(&self) -> WorkerConfig {
        self.workers.map(WorkerConfig::new).unwrap_or_default()
    }
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "csv")
}
