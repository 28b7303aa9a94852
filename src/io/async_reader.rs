//! Asynchronous CSV reader with batch interface
//!
//! Reads one transactions or statement file with csv-async on the tokio
//! runtime. Used by the async loader to read every input file concurrently.
//!
//! # Architecture
//!
//! ```text
//! tokio::fs::File → compat → AsyncReader<T> → batches of T::Record
//!                                 ↓
//!                          csv_format module
//!                     (CsvRow, validate_header)
//! ```

use crate::io::csv_format::{validate_header, CsvRow};
use crate::types::ReconcileError;
use csv_async::{AsyncReaderBuilder, Trim};
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::Path;
use tokio_util::compat::{Compat, TokioAsyncReadCompatExt};

/// Asynchronous CSV reader over rows of kind `T`
pub struct AsyncReader<T, R: AsyncRead + Unpin> {
    deserializer: csv_async::AsyncDeserializer<R>,
    line_num: u64,
    _row: PhantomData<T>,
}

impl<T: CsvRow> AsyncReader<T, Compat<tokio::fs::File>> {
    /// Open a CSV file with tokio and validate its header
    pub async fn open(path: &Path) -> Result<Self, ReconcileError> {
        let label = path.display().to_string();
        let file = tokio::fs::File::open(path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => ReconcileError::file_not_found(&label),
            _ => ReconcileError::from(e),
        })?;

        Self::new(&label, file.compat()).await
    }
}

impl<T: CsvRow, R: AsyncRead + Unpin + Send + 'static> AsyncReader<T, R> {
    /// Wrap an async reader and validate its header
    ///
    /// `label` names the input in error messages.
    pub async fn new(label: &str, reader: R) -> Result<Self, ReconcileError> {
        let mut deserializer = AsyncReaderBuilder::new()
            .trim(Trim::All)
            .create_deserializer(reader);

        let headers = deserializer.headers().await?;
        if headers.is_empty() {
            return Err(ReconcileError::EmptyFile {
                path: label.to_string(),
            });
        }
        validate_header(label, headers.iter(), T::HEADER)?;

        Ok(Self {
            deserializer,
            line_num: 1,
            _row: PhantomData,
        })
    }

    /// Read up to `batch_size` rows
    ///
    /// Rejected rows are returned as `Err` with their line number. An empty
    /// vector means the end of the file was reached.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<Result<T::Record, String>> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut rows = self.deserializer.deserialize::<T>();

        while batch.len() < batch_size {
            let Some(next) = rows.next().await else {
                break;
            };
            self.line_num += 1;

            batch.push(match next {
                Ok(row) => row
                    .into_record()
                    .map_err(|e| format!("Line {}: {}", self.line_num, e)),
                Err(e) => Err(format!("Line {}: CSV parse error: {}", self.line_num, e)),
            });
        }

        batch
    }

    /// Read every remaining row
    pub async fn read_all(mut self, batch_size: usize) -> Vec<Result<T::Record, String>> {
        let mut rows = Vec::new();
        loop {
            let batch = self.read_batch(batch_size).await;
            if batch.is_empty() {
                break;
            }
            rows.extend(batch);
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::csv_format::{StatementRow, TransactionRow};
    use futures::io::Cursor;
    use rust_decimal::Decimal;

    fn cursor(content: &str) -> Cursor<Vec<u8>> {
        Cursor::new(content.as_bytes().to_vec())
    }

    #[tokio::test]
    async fn test_read_batch() {
        let content = "trxID,amount,type,transactionTime\n\
            TX1,100,debit,2025-06-05T08:01:00Z\n\
            TX2,50,credit,2025-06-05T09:00:00Z\n\
            TX3,25,debit,2025-06-06T10:00:00Z\n";
        let mut reader = AsyncReader::<TransactionRow, _>::new("tx.csv", cursor(content))
            .await
            .unwrap();

        let batch = reader.read_batch(2).await;
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].as_ref().unwrap().id, "TX1");
        assert_eq!(batch[1].as_ref().unwrap().id, "TX2");

        let batch = reader.read_batch(2).await;
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].as_ref().unwrap().id, "TX3");

        assert!(reader.read_batch(2).await.is_empty());
    }

    #[tokio::test]
    async fn test_header_only() {
        let input = cursor("unique_identifier,amount,date\n");
        let reader = AsyncReader::<StatementRow, _>::new("s.csv", input).await.unwrap();
        assert!(reader.read_all(10).await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_input() {
        let result = AsyncReader::<StatementRow, _>::new("s.csv", cursor("")).await;
        assert!(matches!(result, Err(ReconcileError::EmptyFile { .. })));
    }

    #[tokio::test]
    async fn test_invalid_header() {
        let input = cursor("id,amount,date\nBA1,1,2025-06-05\n");
        let result = AsyncReader::<StatementRow, _>::new("s.csv", input).await;
        assert_eq!(
            result.err(),
            Some(ReconcileError::invalid_header(
                "s.csv",
                "expected column unique_identifier, got id"
            ))
        );
    }

    #[tokio::test]
    async fn test_invalid_row_is_reported_and_reading_continues() {
        let content = "unique_identifier,amount,date\n\
            BA1,ten,2025-06-05\n\
            BA2,-10.00,2025-06-05\n";
        let reader = AsyncReader::<StatementRow, _>::new("s.csv", cursor(content))
            .await
            .unwrap();

        let rows = reader.read_all(10).await;

        assert_eq!(rows.len(), 2);
        assert!(rows[0].as_ref().unwrap_err().contains("Line 2"));
        assert_eq!(rows[1].as_ref().unwrap().amount, Decimal::new(-1000, 2));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let result = AsyncReader::<TransactionRow, _>::open(Path::new("missing.csv")).await;
        assert_eq!(result.err(), Some(ReconcileError::file_not_found("missing.csv")));
    }
}
