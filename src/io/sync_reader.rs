//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over the records of one transactions or
//! statement file. Delegates CSV format concerns to the csv_format module.
//!
//! # Iterator Interface
//!
//! `SyncReader<T>` implements the Iterator trait, yielding
//! `Result<T::Record, String>` for each CSV row:
//!
//! ```no_run
//! use bank_reconciler::io::csv_format::TransactionRow;
//! use bank_reconciler::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::<TransactionRow>::open(Path::new("transactions.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(transaction) => println!("Loaded transaction: {:?}", transaction),
//!         Err(e) => eprintln!("Skipped row: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - File-level errors (not found, empty, wrong header) are returned from `open()`
//! - Individual row errors are yielded as Err variants in the iterator
//! - Line numbers are included in row error messages

use crate::io::csv_format::{validate_header, CsvRow};
use crate::types::ReconcileError;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::Path;

/// Synchronous CSV reader over rows of kind `T`
#[derive(Debug)]
pub struct SyncReader<T> {
    reader: csv::Reader<File>,
    line_num: u64,
    _row: PhantomData<T>,
}

impl<T: CsvRow> SyncReader<T> {
    /// Open a CSV file and validate its header
    ///
    /// # Errors
    ///
    /// - `FileNotFound` if the path does not exist
    /// - `EmptyFile` if the file has no header line
    /// - `InvalidHeader` if the columns differ from `T::HEADER`
    pub fn open(path: &Path) -> Result<Self, ReconcileError> {
        let label = path.display().to_string();
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ReconcileError::file_not_found(&label),
            _ => ReconcileError::from(e),
        })?;

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        let headers = reader.headers()?;
        if headers.is_empty() {
            return Err(ReconcileError::EmptyFile { path: label });
        }
        validate_header(&label, headers.iter(), T::HEADER)?;

        Ok(Self {
            reader,
            line_num: 1,
            _row: PhantomData,
        })
    }
}

impl<T: CsvRow> Iterator for SyncReader<T> {
    type Item = Result<T::Record, String>;

    /// Get the next record, or the reason the next row was rejected
    fn next(&mut self) -> Option<Self::Item> {
        let mut rows = self.reader.deserialize::<T>();
        let next = rows.next()?;
        self.line_num += 1;

        Some(match next {
            Ok(row) => row
                .into_record()
                .map_err(|e| format!("Line {}: {}", self.line_num, e)),
            Err(e) => Err(format!("Line {}: CSV parse error: {}", self.line_num, e)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::csv_format::{StatementRow, TransactionRow};
    use rust_decimal::Decimal;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_reads_transactions() {
        let file = create_temp_csv(
            "trxID,amount,type,transactionTime\n\
             TX1,100.00,debit,2025-06-05T08:01:00Z\n\
             TX2,50,CREDIT,2025-06-06T10:00:00Z\n",
        );

        let records: Vec<_> = SyncReader::<TransactionRow>::open(file.path())
            .unwrap()
            .collect();

        assert_eq!(records.len(), 2);
        let first = records[0].as_ref().unwrap();
        assert_eq!(first.id, "TX1");
        assert_eq!(first.amount, Decimal::new(10000, 2));
        assert!(records[1].is_ok());
    }

    #[test]
    fn test_reads_statements() {
        let file = create_temp_csv("unique_identifier,amount,date\nBA1,-100.00,2025-06-05\n");

        let records: Vec<_> = SyncReader::<StatementRow>::open(file.path())
            .unwrap()
            .filter_map(Result::ok)
            .collect();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].amount, Decimal::new(-10000, 2));
    }

    #[test]
    fn test_missing_file() {
        let err = SyncReader::<TransactionRow>::open(Path::new("nonexistent.csv")).unwrap_err();
        assert_eq!(err, ReconcileError::file_not_found("nonexistent.csv"));
    }

    #[test]
    fn test_empty_file() {
        let file = create_temp_csv("");
        let err = SyncReader::<StatementRow>::open(file.path()).unwrap_err();
        assert!(matches!(err, ReconcileError::EmptyFile { .. }));
    }

    #[test]
    fn test_wrong_header_kind() {
        // A statement file passed where transactions are expected
        let file = create_temp_csv("unique_identifier,amount,date\nBA1,-100.00,2025-06-05\n");
        let err = SyncReader::<TransactionRow>::open(file.path()).unwrap_err();
        assert!(err.to_string().contains("expected 4 columns, got 3"));
    }

    #[test]
    fn test_includes_line_numbers_in_errors() {
        let file = create_temp_csv(
            "trxID,amount,type,transactionTime\n\
             TX1,100.00,debit,2025-06-05T08:01:00Z\n\
             TX2,oops,debit,2025-06-05T08:01:00Z\n\
             TX3,5,debit\n\
             TX4,5,debit,2025-06-05T08:01:00Z\n",
        );

        let records: Vec<_> = SyncReader::<TransactionRow>::open(file.path())
            .unwrap()
            .collect();

        assert_eq!(records.len(), 4);
        assert!(records[0].is_ok());
        let amount_error = records[1].as_ref().unwrap_err();
        assert!(amount_error.contains("Line 3"));
        assert!(amount_error.contains("Invalid amount"));
        let column_error = records[2].as_ref().unwrap_err();
        assert!(column_error.contains("Line 4"));
        assert!(records[3].is_ok());
    }

    #[test]
    fn test_handles_whitespace() {
        let file =
            create_temp_csv("unique_identifier,amount,date\n  BA1  ,  -5.5 ,  2025-06-05  \n");

        let records: Vec<_> = SyncReader::<StatementRow>::open(file.path())
            .unwrap()
            .filter_map(Result::ok)
            .collect();

        assert_eq!(records[0].id, "BA1");
        assert_eq!(records[0].amount, Decimal::new(-55, 1));
        assert!(records[0].is_valid());
    }

    #[test]
    fn test_header_only() {
        let file = create_temp_csv("unique_identifier,amount,date\n");
        let reader = SyncReader::<StatementRow>::open(file.path()).unwrap();
        assert_eq!(reader.count(), 0);
    }
}
