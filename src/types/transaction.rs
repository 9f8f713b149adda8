//! Transaction-related types for the OFX statement reader
//!
//! This module defines a single statement transaction (`STMTTRN`) and the
//! statement period reported by the transaction list.

use crate::core::tree::NodeId;
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;

/// Statement transaction
///
/// Transactions keep the order in which the institution emitted them; the
/// reader never re-sorts them.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Transaction type code (`TRNTYPE`), e.g. DEBIT, CREDIT, POS, CHECK
    pub kind: String,

    /// Date the transaction was posted (`DTPOSTED`)
    pub posted: DateTime<FixedOffset>,

    /// Date the user initiated the transaction (`DTUSER`), if reported
    pub user_date: Option<DateTime<FixedOffset>>,

    /// Signed amount (`TRNAMT`); negative values are debits
    pub amount: Decimal,

    /// Currency qualifying the amount, the statement's `CURDEF`
    pub currency: String,

    /// Institution-assigned unique identifier (`FITID`)
    pub fit_id: String,

    /// Payee or short description (`NAME`)
    pub name: Option<String>,

    /// Free-form memo text (`MEMO`)
    pub memo: Option<String>,

    /// Check number (`CHECKNUM`)
    pub check_number: Option<String>,

    /// Reference number (`REFNUM`)
    pub reference: Option<String>,

    /// The `STMTTRN` node this transaction was read from
    pub(crate) node: NodeId,
}

impl Transaction {
    /// Memo text if present, otherwise the payee name
    pub fn description(&self) -> &str {
        self.memo
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
    }
}

/// Period covered by the transaction list (`DTSTART` / `DTEND`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementPeriod {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}
