//! CSV format handling for rename maps and transaction export
//!
//! This module centralizes all CSV format concerns, providing:
//! - RenameRecord structure for reading memo rename maps
//! - Transaction output serialization
//!
//! Functions take readers and writers, never paths, so they are easy to test.

use crate::core::rename::RenameMap;
use crate::types::{Result, Transaction};
use serde::Deserialize;
use std::io::{Read, Write};

/// CSV record structure for rename-map deserialization
///
/// Matches the input CSV format with columns: prefix, replacement.
/// An empty replacement is allowed and leaves matching memos unchanged.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RenameRecord {
    pub prefix: String,
    #[serde(default)]
    pub replacement: String,
}

/// Read a rename map from CSV
///
/// Fields are not trimmed, so a prefix may end in a space. Rows with an
/// empty prefix are skipped since they would match every memo.
///
/// # Errors
///
/// Returns a `Csv` error carrying the line number for malformed rows.
pub fn read_rename_map<R: Read>(input: R) -> Result<RenameMap> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input);

    let mut pairs = Vec::new();
    for record in reader.deserialize::<RenameRecord>() {
        let record = record?;
        if record.prefix.is_empty() {
            continue;
        }
        pairs.push((record.prefix, record.replacement));
    }
    Ok(RenameMap::new(pairs))
}

/// Write transactions to CSV format
///
/// Writes transactions in document order with columns:
/// posted, type, amount, currency, fitid, name, memo.
/// Dates are written as `YYYY-MM-DD` in the statement's own offset.
///
/// # Arguments
///
/// * `transactions` - Transactions to write
/// * `output` - Mutable reference to a writer for outputting CSV
pub fn write_transactions_csv(transactions: &[Transaction], output: &mut dyn Write) -> Result<()> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["posted", "type", "amount", "currency", "fitid", "name", "memo"])?;

    for transaction in transactions {
        writer.write_record([
            transaction.posted.format("%Y-%m-%d").to_string().as_str(),
            transaction.kind.as_str(),
            transaction.amount.to_string().as_str(),
            transaction.currency.as_str(),
            transaction.fit_id.as_str(),
            transaction.name.as_deref().unwrap_or_default(),
            transaction.memo.as_deref().unwrap_or_default(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
