//! Bank Reconciler CLI
//!
//! Command-line interface for reconciling internal transactions against one
//! or more bank statements.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- transactions.csv bankA_20250605.csv,bankB_20250605.csv 20250601 20250630
//! cargo run -- transactions.csv bankA_20250605.csv 20250601 20250630 --strategy sequential
//! cargo run -- transactions.csv bankA_20250605.csv 20250601 20250630 --workers 16 --loader sync
//! RECONCILIATION_STRATEGY=partitioned cargo run -- transactions.csv bankA.csv 20250601 20250630
//! ```
//!
//! The summary goes to stdout, logs go to stderr (`RUST_LOG` controls the
//! level). Settings may also come from a `.env` file in the working
//! directory.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (bad arguments, unknown strategy, missing or malformed file, etc.)

use bank_reconciler::cli::{self, CliArgs, LoaderType};
use bank_reconciler::io::{load_async, load_sync, write_summary, write_unmatched_csv};
use bank_reconciler::{ReconcileError, ReconciliationSession, StrategyType};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::process;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &CliArgs) -> Result<(), ReconcileError> {
    let started = Instant::now();

    let request = args.validate()?;
    // Reject an unknown strategy before any file is read
    let strategy: StrategyType = args.strategy.parse()?;

    let store = match args.loader {
        LoaderType::Sync => load_sync(&request)?,
        LoaderType::Async => load_async(&request)?,
    };

    let mut session = ReconciliationSession::with_config(store, args.to_worker_config());
    let result = session.run_with(strategy)?;

    let mut stdout = std::io::stdout().lock();
    write_summary(&result, &mut stdout)?;

    if let Some(path) = &args.unmatched_csv {
        let mut file = BufWriter::new(File::create(path)?);
        write_unmatched_csv(&result, &mut file)?;
        file.flush()?;
        info!(path = %path.display(), "unmatched records exported");
    }

    writeln!(stdout)?;
    writeln!(stdout, "Elapsed time: {:.2?}", started.elapsed())?;
    Ok(())
}
