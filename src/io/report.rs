//! Report output
//!
//! - `write_summary` prints the human-readable summary
//! - `write_unmatched_csv` exports every unmatched record as CSV
//!
//! Sources are written in name order and amounts with two decimals, so the
//! output is deterministic apart from the order of unmatched transactions.

use crate::types::{ReconcileError, ReconciliationResult};
use csv::Writer;
use std::io::Write;

/// Header of the unmatched records export
pub const UNMATCHED_HEADER: [&str; 5] = ["side", "source", "id", "amount", "date"];

/// Write the text summary of a run
pub fn write_summary(
    result: &ReconciliationResult,
    output: &mut dyn Write,
) -> Result<(), ReconcileError> {
    writeln!(output, "Reconciliation summary")?;
    writeln!(output, "  Total processed records:    {}", result.total_processed)?;
    writeln!(output, "  Matched transactions:       {}", result.total_matched)?;
    writeln!(
        output,
        "  Unmatched records:          {} (system: {}, bank: {})",
        result.total_unmatched,
        result.total_unmatched_transactions,
        result.total_unmatched_bank_records
    )?;
    writeln!(output, "  Invalid records:            {}", result.total_invalid)?;
    writeln!(output, "  Total discrepancies:        {:.2}", result.total_discrepancy)?;

    if !result.unmatched_transactions.is_empty() {
        writeln!(output)?;
        writeln!(output, "Unmatched system transactions:")?;
        for transaction in &result.unmatched_transactions {
            writeln!(
                output,
                "  {}  {:.2}  {}  {}",
                transaction.id, transaction.amount, transaction.direction, transaction.timestamp
            )?;
        }
    }

    if !result.unmatched_bank_records.is_empty() {
        writeln!(output)?;
        writeln!(output, "Unmatched bank statement records:")?;
        for (source, records) in &result.unmatched_bank_records {
            writeln!(output, "  {}:", source)?;
            for record in records {
                writeln!(output, "    {}  {:.2}  {}", record.id, record.amount, record.raw_date)?;
            }
        }
    }

    output.flush()?;
    Ok(())
}

/// Write every unmatched record as CSV
///
/// Columns: side (`system` or `bank`), source (empty for system
/// transactions), id, amount, date. System transactions come first.
pub fn write_unmatched_csv(
    result: &ReconciliationResult,
    output: &mut dyn Write,
) -> Result<(), ReconcileError> {
    let mut writer = Writer::from_writer(output);
    writer.write_record(UNMATCHED_HEADER)?;

    for transaction in &result.unmatched_transactions {
        let amount = format!("{:.2}", transaction.amount);
        writer.write_record([
            "system",
            "",
            transaction.id.as_str(),
            amount.as_str(),
            transaction.timestamp.as_str(),
        ])?;
    }

    for (source, records) in &result.unmatched_bank_records {
        for record in records {
            let amount = format!("{:.2}", record.amount);
            writer.write_record([
                "bank",
                source.as_str(),
                record.id.as_str(),
                amount.as_str(),
                record.raw_date.as_str(),
            ])?;
        }
    }

    writer.flush()?;
    Ok(())
}
