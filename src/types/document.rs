//! The assembled statement document
//!
//! A `StatementDocument` is created once per parse call and is read-only
//! afterwards, apart from the renaming utility which rewrites transaction
//! memos in place. It owns the parsed tree so such edits show up in the
//! rendered markup as well.

use super::account::{Account, AccountType};
use super::balance::Balance;
use super::signon::SignOn;
use super::transaction::{StatementPeriod, Transaction};
use crate::core::tree::Tree;
use std::fmt;

/// A parsed bank or credit-card statement
#[derive(Debug, Clone)]
pub struct StatementDocument {
    pub(crate) period: Option<StatementPeriod>,
    pub(crate) account_type: AccountType,
    pub(crate) currency: String,
    pub(crate) signon: SignOn,
    pub(crate) account: Account,
    pub(crate) balance: Balance,
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) header: String,
    pub(crate) tree: Tree,
}

impl StatementDocument {
    /// Period covered by the transaction list, when the statement reports one
    pub fn period(&self) -> Option<&StatementPeriod> {
        self.period.as_ref()
    }

    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    /// Three-letter default currency of the statement (`CURDEF`)
    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn signon(&self) -> &SignOn {
        &self.signon
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn balance(&self) -> &Balance {
        &self.balance
    }

    /// Transactions in the order the institution emitted them
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Plaintext header block; empty for documents that were already XML
    pub fn header(&self) -> &str {
        &self.header
    }

    /// The parsed markup tree
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Short human-readable overview of the statement
    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!(
                "{} account {} ({})",
                self.account_type, self.account.account_id, self.currency
            ),
            format!(
                "Server status: {} {}",
                self.signon.status_code, self.signon.severity
            ),
        ];
        if let Some(period) = &self.period {
            lines.push(format!(
                "Period: {} to {}",
                period.start.format("%Y-%m-%d"),
                period.end.format("%Y-%m-%d")
            ));
        }
        lines.push(format!(
            "Ledger balance: {} as of {}",
            self.balance.ledger.amount,
            self.balance.ledger.as_of.format("%Y-%m-%d")
        ));
        if let Some(available) = &self.balance.available {
            lines.push(format!(
                "Available balance: {} as of {}",
                available.amount,
                available.as_of.format("%Y-%m-%d")
            ));
        }
        lines.push(format!("Transactions: {}", self.transactions.len()));
        lines.join("\n")
    }
}

impl fmt::Display for StatementDocument {
    /// Header text, a blank line, then the normalized markup
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let markup = self.tree.to_xml().map_err(|_| fmt::Error)?;
        write!(f, "{}\n\n{}", self.header, markup)
    }
}
