//! OFX Statement Reader Library
//! # Overview
//!
//! This library reads Open Financial Exchange (OFX) bank and credit-card
//! statements, both the SGML dialect of OFX 1.x and the XML dialect of
//! OFX 2.x, into a typed [`types::StatementDocument`].
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (StatementDocument, Transaction, Balance, etc.)
//! - [`cli`] - CLI arguments parsing and the command runner
//! - [`core`] - Parsing pipeline:
//!   - [`core::header`] - Plaintext header validation
//!   - [`core::sgml`] - SGML to XML normalization
//!   - [`core::tree`] - Arena tree over the normalized markup
//!   - [`core::classifier`] and [`core::path`] - Statement type and section lookup
//!   - [`core::extract`] - Typed field extraction
//!   - [`core::assembler`] - Pipeline orchestration
//!   - [`core::rename`] - Memo renaming
//! - [`io`] - Input decoding and CSV handling
//!
//! # Example
//!
//! ```
//! let xml = "<OFX><SIGNONMSGSRSV1><SONRS><STATUS><CODE>0</CODE><SEVERITY>INFO</SEVERITY>\
//!     </STATUS><DTSERVER>20240131</DTSERVER><LANGUAGE>ENG</LANGUAGE></SONRS></SIGNONMSGSRSV1>\
//!     <BANKMSGSRSV1><STMTTRNRS><STMTRS><CURDEF>USD</CURDEF>\
//!     <BANKACCTFROM><BANKID>1</BANKID><ACCTID>42</ACCTID></BANKACCTFROM>\
//!     <LEDGERBAL><BALAMT>10.00</BALAMT><DTASOF>20240131</DTASOF></LEDGERBAL>\
//!     </STMTRS></STMTTRNRS></BANKMSGSRSV1></OFX>";
//!
//! let document = ofx_statement::parse_str(xml).unwrap();
//! assert_eq!(document.account().account_id, "42");
//! assert!(document.transactions().is_empty());
//! ```
//!
//! # Failure Model
//!
//! Every error is fatal for the parse call that raised it. No partial
//! document is returned, and nothing is retried.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod types;

pub use core::{parse_file, parse_str, rename_transactions, RenameMap, StatementParser};
pub use io::{read_rename_map, write_transactions_csv};
pub use types::{
    Account, AccountType, Balance, BalanceAmount, Institution, OfxError, Result, SignOn,
    StatementDocument, StatementPeriod, Transaction,
};
