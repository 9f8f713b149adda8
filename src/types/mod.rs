//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account type and account descriptor
//! - `balance`: Ledger and available balances
//! - `signon`: Sign-on status block
//! - `transaction`: Statement transactions and period
//! - `document`: The assembled statement document
//! - `error`: Error types for the statement reader

pub mod account;
pub mod balance;
pub mod document;
pub mod error;
pub mod signon;
pub mod transaction;

pub use account::{Account, AccountType};
pub use balance::{Balance, BalanceAmount};
pub use document::StatementDocument;
pub use error::{OfxError, Result};
pub use signon::{Institution, SignOn};
pub use transaction::{StatementPeriod, Transaction};
