//! Structural paths to the sections of a statement
//!
//! Bank and credit-card statements carry the same sections under different
//! parent aggregates. This module keeps the account-type/section dispatch in a
//! small enum-keyed table so callers never assemble path strings by hand.
//!
//! | AccountType | base path |
//! |---|---|
//! | Bank | `OFX/BANKMSGSRSV1/STMTTRNRS/STMTRS` |
//! | CreditCard | `OFX/CREDITCARDMSGSRSV1/CCSTMTTRNRS/CCSTMTRS` |
//!
//! The sign-on section lives at `OFX/SIGNONMSGSRSV1/SONRS` whatever the
//! account type.

use crate::types::{AccountType, OfxError};
use std::fmt;
use std::str::FromStr;

/// Transaction list aggregate, shared by both account types
pub const TRANLIST_TAG: &str = "BANKTRANLIST";

/// Default currency element
pub const CURDEF_TAG: &str = "CURDEF";

/// A single statement transaction
pub const TRANSACTION_TAG: &str = "STMTTRN";

/// Transaction memo element
pub const MEMO_TAG: &str = "MEMO";

const SIGNON_PATH: [&str; 3] = ["OFX", "SIGNONMSGSRSV1", "SONRS"];
const BANK_BASE: [&str; 4] = ["OFX", "BANKMSGSRSV1", "STMTTRNRS", "STMTRS"];
const CREDIT_CARD_BASE: [&str; 4] = ["OFX", "CREDITCARDMSGSRSV1", "CCSTMTTRNRS", "CCSTMTRS"];

/// Logical section of a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Signon,
    AccountInfo,
    Transactions,
    Balance,
    Currency,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Signon,
        Section::AccountInfo,
        Section::Transactions,
        Section::Balance,
        Section::Currency,
    ];
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::Signon => "Signon",
            Section::AccountInfo => "AccountInfo",
            Section::Transactions => "Transactions",
            Section::Balance => "Balance",
            Section::Currency => "Currency",
        };
        f.write_str(name)
    }
}

impl FromStr for Section {
    type Err = OfxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| OfxError::unknown_section(s))
    }
}

/// Absolute path of element names, starting at the root element
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OfxPath {
    segments: Vec<&'static str>,
}

impl OfxPath {
    pub fn new(segments: impl IntoIterator<Item = &'static str>) -> Self {
        OfxPath {
            segments: segments.into_iter().collect(),
        }
    }

    pub fn segments(&self) -> &[&'static str] {
        &self.segments
    }

    fn join(mut self, segment: &'static str) -> Self {
        self.segments.push(segment);
        self
    }
}

impl fmt::Display for OfxPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

/// Statement response aggregate for an account type
pub fn base_path(account_type: AccountType) -> OfxPath {
    match account_type {
        AccountType::Bank => OfxPath::new(BANK_BASE),
        AccountType::CreditCard => OfxPath::new(CREDIT_CARD_BASE),
    }
}

/// Account descriptor aggregate for an account type
pub fn account_from_tag(account_type: AccountType) -> &'static str {
    match account_type {
        AccountType::Bank => "BANKACCTFROM",
        AccountType::CreditCard => "CCACCTFROM",
    }
}

/// Resolve the structural path to a section's root
///
/// A pure function of its inputs: the same pair always yields the same path.
pub fn resolve(account_type: AccountType, section: Section) -> OfxPath {
    match section {
        Section::Signon => OfxPath::new(SIGNON_PATH),
        Section::AccountInfo => base_path(account_type).join(account_from_tag(account_type)),
        Section::Balance => base_path(account_type),
        Section::Transactions => base_path(account_type).join(TRANLIST_TAG),
        Section::Currency => base_path(account_type).join(CURDEF_TAG),
    }
}

/// Resolve a path from textual account type and section names
///
/// Both names are validated; the error names whichever value is not
/// recognised.
pub fn resolve_named(account_type: &str, section: &str) -> Result<OfxPath, OfxError> {
    let account_type = account_type.parse::<AccountType>()?;
    let section = section.parse::<Section>()?;
    Ok(resolve(account_type, section))
}
