//! Balance types for the OFX statement reader

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;

/// An amount reported as of a point in time (`BALAMT` + `DTASOF`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceAmount {
    pub amount: Decimal,
    pub as_of: DateTime<FixedOffset>,
}

/// Balance snapshot of the account
///
/// The ledger balance is always present. Some institutions omit the
/// available balance entirely, so it is optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Balance {
    /// Current posted balance (`LEDGERBAL`)
    pub ledger: BalanceAmount,

    /// Balance including pending holds (`AVAILBAL`)
    pub available: Option<BalanceAmount>,
}
