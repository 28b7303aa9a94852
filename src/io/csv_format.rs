//! CSV format handling for transaction and bank statement files
//!
//! This module centralizes all CSV format concerns, providing:
//! - Row structures for deserialization of both file kinds
//! - Conversion from rows to domain records
//! - Header validation
//! - Source name derivation from statement file names
//!
//! All functions are pure (no I/O) for easy testing.

use crate::types::{BankRecord, Direction, ReconcileError, SourceName, Transaction};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

/// Columns of the internal transactions export
pub const TRANSACTION_HEADER: &[&str] = &["trxID", "amount", "type", "transactionTime"];

/// Columns of a bank statement file
pub const STATEMENT_HEADER: &[&str] = &["unique_identifier", "amount", "date"];

/// A CSV row kind that converts into a domain record
///
/// Implemented by both row structures so the readers and the loader can be
/// written once for either file kind.
pub trait CsvRow: DeserializeOwned + Send + 'static {
    /// Expected header, in column order
    const HEADER: &'static [&'static str];

    /// Domain record produced by a valid row
    type Record: Send + 'static;

    /// Convert a deserialized row, or describe why it is malformed
    fn into_record(self) -> Result<Self::Record, String>;

    /// Calendar date of a converted record, `None` if it did not parse
    fn record_date(record: &Self::Record) -> Option<NaiveDate>;
}

/// Transactions file row: `trxID,amount,type,transactionTime`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TransactionRow {
    #[serde(rename = "trxID")]
    pub id: String,
    pub amount: String,
    #[serde(rename = "type")]
    pub tx_type: String,
    #[serde(rename = "transactionTime")]
    pub transaction_time: String,
}

/// Bank statement row: `unique_identifier,amount,date`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct StatementRow {
    #[serde(rename = "unique_identifier")]
    pub id: String,
    pub amount: String,
    pub date: String,
}

impl CsvRow for TransactionRow {
    const HEADER: &'static [&'static str] = TRANSACTION_HEADER;
    type Record = Transaction;

    fn into_record(self) -> Result<Transaction, String> {
        convert_transaction_row(self)
    }

    fn record_date(record: &Transaction) -> Option<NaiveDate> {
        record.date()
    }
}

impl CsvRow for StatementRow {
    const HEADER: &'static [&'static str] = STATEMENT_HEADER;
    type Record = BankRecord;

    fn into_record(self) -> Result<BankRecord, String> {
        convert_statement_row(self)
    }

    fn record_date(record: &BankRecord) -> Option<NaiveDate> {
        record.date()
    }
}

/// Convert a TransactionRow to a Transaction
///
/// Every column must be filled in, the amount must be a decimal number and
/// the type must be `credit` or `debit` (any case). The timestamp is kept
/// as-is: a timestamp that does not parse yields a transaction without a
/// date, which the engine counts as invalid.
pub fn convert_transaction_row(row: TransactionRow) -> Result<Transaction, String> {
    if row.id.is_empty()
        || row.amount.is_empty()
        || row.tx_type.is_empty()
        || row.transaction_time.is_empty()
    {
        return Err("all columns must be filled in for system transaction record".to_string());
    }

    let amount = parse_amount(&row.amount, &row.id)?;
    let direction = Direction::from_str(&row.tx_type)?;

    Ok(Transaction::new(row.id, amount, direction, row.transaction_time))
}

/// Convert a StatementRow to a BankRecord
///
/// Same rules as transactions; the sign of the amount is preserved.
pub fn convert_statement_row(row: StatementRow) -> Result<BankRecord, String> {
    if row.id.is_empty() || row.amount.is_empty() || row.date.is_empty() {
        return Err("all columns must be filled in for bank statement record".to_string());
    }

    let amount = parse_amount(&row.amount, &row.id)?;

    Ok(BankRecord::new(row.id, amount, row.date))
}

fn parse_amount(raw: &str, id: &str) -> Result<Decimal, String> {
    Decimal::from_str(raw).map_err(|_| format!("Invalid amount '{}' for record {}", raw, id))
}

/// Check a header line against the expected columns
///
/// Column count is checked first, then each column name in order.
pub fn validate_header<'h, I>(
    path: &str,
    header: I,
    expected: &[&str],
) -> Result<(), ReconcileError>
where
    I: IntoIterator<Item = &'h str>,
{
    let header: Vec<&str> = header.into_iter().collect();

    if header.len() != expected.len() {
        return Err(ReconcileError::invalid_header(
            path,
            format!("expected {} columns, got {}", expected.len(), header.len()),
        ));
    }

    if let Some((want, got)) = expected
        .iter()
        .zip(header.iter())
        .find(|(want, got)| want != got)
    {
        return Err(ReconcileError::invalid_header(
            path,
            format!("expected column {}, got {}", want, got),
        ));
    }

    Ok(())
}

/// Ledger source name for a statement file
///
/// The prefix of the file name before the first `_`, so
/// `statements/bankA_20250605.csv` belongs to `bankA`. A name without `_`
/// uses the whole file stem.
pub fn source_name_from_path(path: &Path) -> SourceName {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    match stem.split_once('_') {
        Some((prefix, _)) if !prefix.is_empty() => prefix.to_string(),
        _ => stem,
    }
}
