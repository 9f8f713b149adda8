//! Account type detection
//!
//! Classification runs on the raw text, before any tree exists, because the
//! account type decides which paths are used to read the tree. Markers are
//! matched ignoring ASCII case, like SGML tag names.

use crate::types::{AccountType, OfxError, Result};
use tracing::debug;

/// Marker of a credit-card statement response
pub const CREDIT_CARD_MARKER: &str = "<CREDITCARDMSGSRSV1>";

/// Marker of a bank statement response
pub const BANK_MARKER: &str = "<BANKMSGSRSV1>";

/// Decide whether the statement belongs to a bank or a credit-card account
///
/// The credit-card marker is checked first, so a document carrying both
/// markers is classified as a credit-card statement.
pub fn classify(text: &str) -> Result<AccountType> {
    let account_type = if contains_marker(text, CREDIT_CARD_MARKER) {
        AccountType::CreditCard
    } else if contains_marker(text, BANK_MARKER) {
        AccountType::Bank
    } else {
        return Err(OfxError::unsupported_account_type(
            "no bank or credit card statement response found",
        ));
    };
    debug!(%account_type, "classified statement");
    Ok(account_type)
}

fn contains_marker(text: &str, marker: &str) -> bool {
    text.as_bytes()
        .windows(marker.len())
        .any(|window| window.eq_ignore_ascii_case(marker.as_bytes()))
}
