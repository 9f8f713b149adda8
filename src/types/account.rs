//! Account-related types for the OFX statement reader
//!
//! This module defines the account type that drives every structural lookup
//! and the account descriptor extracted from the statement.

use super::error::OfxError;
use std::fmt;
use std::str::FromStr;

/// Kind of account a statement belongs to
///
/// Bank and credit-card statements nest the same fields under different
/// parent tags, so the account type selects the path template used for every
/// section lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountType {
    /// Checking, savings and other deposit accounts (`BANKMSGSRSV1`)
    Bank,

    /// Credit-card accounts (`CREDITCARDMSGSRSV1`)
    CreditCard,
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountType::Bank => write!(f, "Bank"),
            AccountType::CreditCard => write!(f, "CreditCard"),
        }
    }
}

impl FromStr for AccountType {
    type Err = OfxError;

    /// Parse an account type name, case-insensitively
    ///
    /// Unsupported names are a hard failure rather than a default.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bank" => Ok(AccountType::Bank),
            "creditcard" | "credit_card" | "credit-card" => Ok(AccountType::CreditCard),
            _ => Err(OfxError::unsupported_account_type(s)),
        }
    }
}

/// Identifying information for the statement's account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// The resolved account type
    pub account_type: AccountType,

    /// Routing number (`BANKID`), bank accounts only
    pub bank_id: Option<String>,

    /// Branch identifier (`BRANCHID`), rarely present
    pub branch_id: Option<String>,

    /// Account number (`ACCTID`)
    pub account_id: String,

    /// Deposit account kind (`ACCTTYPE`), e.g. CHECKING or SAVINGS
    pub account_kind: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Bank", AccountType::Bank)]
    #[case("bank", AccountType::Bank)]
    #[case("CreditCard", AccountType::CreditCard)]
    #[case("credit_card", AccountType::CreditCard)]
    fn test_account_type_from_str(#[case] input: &str, #[case] expected: AccountType) {
        assert_eq!(input.parse::<AccountType>().unwrap(), expected);
    }

    #[test]
    fn test_account_type_unsupported() {
        let err = "Investment".parse::<AccountType>().unwrap_err();
        assert_eq!(err, OfxError::unsupported_account_type("Investment"));
        assert!(err.to_string().contains("Investment"));
    }

    #[test]
    fn test_account_type_display_round_trips() {
        for account_type in [AccountType::Bank, AccountType::CreditCard] {
            assert_eq!(
                account_type.to_string().parse::<AccountType>().unwrap(),
                account_type
            );
        }
    }
}
