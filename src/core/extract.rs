//! Field extractors
//!
//! Typed constructors for the statement entities. Each extractor receives the
//! subtree located by the path resolver and reads its fields by fixed relative
//! path. A missing required field fails the whole parse with the entity's
//! named error.

use crate::core::path::{self, Section, TRANSACTION_TAG};
use crate::core::traits::Extract;
use crate::core::tree::{NodeId, Tree};
use crate::types::{
    Account, AccountType, Balance, BalanceAmount, Institution, OfxError, Result, SignOn,
    StatementPeriod, Transaction,
};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::{debug, warn};

/// Error message when the default currency is absent
pub const CURRENCY_MISSING: &str = "Currency not found";

/// Parse an OFX date-time: `YYYYMMDD[HHMM[SS[.fff]]][[offset[:TZ]]]`
///
/// The offset is given in hours and may be fractional (`[-3.5:NST]`). Without
/// an offset the value is taken to be GMT.
pub fn parse_datetime(value: &str) -> Result<DateTime<FixedOffset>> {
    let invalid = || OfxError::parse(format!("Invalid date '{}'", value));
    let value = value.trim();

    let (stamp, zone) = match value.split_once('[') {
        Some((stamp, zone)) => (stamp, Some(zone.trim_end_matches(']'))),
        None => (value, None),
    };
    let (digits, fraction) = match stamp.split_once('.') {
        Some((digits, fraction)) => (digits, Some(fraction)),
        None => (stamp, None),
    };
    if !matches!(digits.len(), 8 | 12 | 14) || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let field = |range: std::ops::Range<usize>| -> u32 {
        digits
            .get(range)
            .and_then(|s| s.parse().ok())
            .unwrap_or(0)
    };
    let date = NaiveDate::from_ymd_opt(field(0..4) as i32, field(4..6), field(6..8))
        .ok_or_else(invalid)?;

    let millis = match fraction {
        Some(fraction) if !fraction.is_empty() => {
            if !fraction.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            let padded: String = fraction.chars().chain("000".chars()).take(3).collect();
            padded.parse::<u32>().map_err(|_| invalid())?
        }
        _ => 0,
    };
    let time = NaiveTime::from_hms_milli_opt(field(8..10), field(10..12), field(12..14), millis)
        .ok_or_else(invalid)?;

    let offset = match zone {
        Some(zone) => parse_offset(zone).ok_or_else(invalid)?,
        None => FixedOffset::east_opt(0).ok_or_else(invalid)?,
    };

    offset
        .from_local_datetime(&NaiveDateTime::new(date, time))
        .single()
        .ok_or_else(invalid)
}

fn parse_offset(zone: &str) -> Option<FixedOffset> {
    let hours = zone.split(':').next()?.trim();
    let hours = Decimal::from_str(hours.trim_start_matches('+')).ok()?;
    let seconds = (hours * Decimal::from(3600)).round().to_i32()?;
    FixedOffset::east_opt(seconds)
}

/// Parse a signed decimal amount
///
/// A comma is accepted as the decimal separator, as some institutions emit it.
pub fn parse_amount(value: &str) -> Result<Decimal> {
    let normalized = value.trim().replace(',', ".");
    let normalized = normalized.strip_prefix('+').unwrap_or(&normalized);
    Decimal::from_str(normalized)
        .map_err(|_| OfxError::parse(format!("Invalid amount '{}'", value.trim())))
}

fn required<'t>(tree: &'t Tree, node: NodeId, path: &str, missing: &str) -> Result<&'t str> {
    tree.text_at(node, path).ok_or_else(|| {
        debug!(path, "required element missing");
        OfxError::parse(missing)
    })
}

fn optional(tree: &Tree, node: NodeId, path: &str) -> Option<String> {
    tree.text_at(node, path).map(str::to_string)
}

/// Locate a section with the path resolver and extract it
///
/// An absent section fails with the entity's named error.
pub fn locate<T: Extract>(tree: &Tree, account_type: AccountType, section: Section) -> Result<T> {
    let section_path = path::resolve(account_type, section);
    let node = tree
        .find(&section_path)
        .ok_or_else(|| OfxError::parse(T::MISSING))?;
    T::extract(tree, node, account_type)
}

impl Extract for SignOn {
    const MISSING: &'static str = "Sign On information not found";

    fn extract(tree: &Tree, node: NodeId, _account_type: AccountType) -> Result<Self> {
        let code = required(tree, node, "STATUS/CODE", Self::MISSING)?;
        let status_code = code
            .parse::<u32>()
            .map_err(|_| OfxError::parse(format!("Invalid status code '{}'", code)))?;

        let institution = tree.select(node, "FI").and_then(|fi| {
            optional(tree, fi, "ORG").map(|organization| Institution {
                organization,
                fid: optional(tree, fi, "FID"),
            })
        });

        Ok(SignOn {
            status_code,
            severity: required(tree, node, "STATUS/SEVERITY", Self::MISSING)?.to_string(),
            status_message: optional(tree, node, "STATUS/MESSAGE"),
            server_time: parse_datetime(required(tree, node, "DTSERVER", Self::MISSING)?)?,
            language: required(tree, node, "LANGUAGE", Self::MISSING)?.to_string(),
            institution,
        })
    }
}

impl Extract for Account {
    const MISSING: &'static str = "Account information not found";

    fn extract(tree: &Tree, node: NodeId, account_type: AccountType) -> Result<Self> {
        Ok(Account {
            account_type,
            bank_id: optional(tree, node, "BANKID"),
            branch_id: optional(tree, node, "BRANCHID"),
            account_id: required(tree, node, "ACCTID", Self::MISSING)?.to_string(),
            account_kind: optional(tree, node, "ACCTTYPE"),
        })
    }
}

impl Extract for Balance {
    const MISSING: &'static str = "Balance information not found";

    fn extract(tree: &Tree, node: NodeId, _account_type: AccountType) -> Result<Self> {
        let ledger = tree
            .select(node, "LEDGERBAL")
            .ok_or_else(|| OfxError::parse(Self::MISSING))?;
        let ledger = BalanceAmount {
            amount: parse_amount(required(tree, ledger, "BALAMT", Self::MISSING)?)?,
            as_of: parse_datetime(required(tree, ledger, "DTASOF", Self::MISSING)?)?,
        };

        let available = match tree.select(node, "AVAILBAL") {
            Some(available) => match (
                tree.text_at(available, "BALAMT"),
                tree.text_at(available, "DTASOF"),
            ) {
                (Some(amount), Some(as_of)) => Some(BalanceAmount {
                    amount: parse_amount(amount)?,
                    as_of: parse_datetime(as_of)?,
                }),
                _ => {
                    warn!("incomplete available balance ignored");
                    None
                }
            },
            None => {
                debug!("statement has no available balance");
                None
            }
        };

        Ok(Balance { ledger, available })
    }
}

impl Extract for Transaction {
    const MISSING: &'static str = "Transaction information not found";

    /// Reads one `STMTTRN`. The currency is the transaction's own
    /// `CURRENCY/CURSYM` or `ORIGCURRENCY/CURSYM` when present, otherwise
    /// empty until the statement currency is applied.
    fn extract(tree: &Tree, node: NodeId, _account_type: AccountType) -> Result<Self> {
        let user_date = tree
            .text_at(node, "DTUSER")
            .map(parse_datetime)
            .transpose()?;
        let currency = optional(tree, node, "CURRENCY/CURSYM")
            .or_else(|| optional(tree, node, "ORIGCURRENCY/CURSYM"))
            .unwrap_or_default();

        Ok(Transaction {
            kind: required(tree, node, "TRNTYPE", Self::MISSING)?.to_string(),
            posted: parse_datetime(required(tree, node, "DTPOSTED", Self::MISSING)?)?,
            user_date,
            amount: parse_amount(required(tree, node, "TRNAMT", Self::MISSING)?)?,
            currency,
            fit_id: required(tree, node, "FITID", Self::MISSING)?.to_string(),
            name: optional(tree, node, "NAME").or_else(|| optional(tree, node, "PAYEE/NAME")),
            memo: optional(tree, node, "MEMO"),
            check_number: optional(tree, node, "CHECKNUM"),
            reference: optional(tree, node, "REFNUM"),
            node,
        })
    }
}

/// Read the statement's default currency (`CURDEF`)
pub fn extract_currency(tree: &Tree, account_type: AccountType) -> Result<String> {
    let node = tree
        .find(&path::resolve(account_type, Section::Currency))
        .ok_or_else(|| OfxError::parse(CURRENCY_MISSING))?;
    let code = tree
        .text(node)
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .ok_or_else(|| OfxError::parse(CURRENCY_MISSING))?;
    if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(OfxError::parse(format!("Invalid currency code '{}'", code)));
    }
    Ok(code.to_ascii_uppercase())
}

/// Read the transaction list: statement period and transactions in document order
///
/// Every `STMTTRN` beneath the list is collected, however deeply nested. A
/// statement without a transaction list has no period and no transactions.
pub fn extract_transactions(
    tree: &Tree,
    account_type: AccountType,
    currency: &str,
) -> Result<(Option<StatementPeriod>, Vec<Transaction>)> {
    let Some(list) = tree.find(&path::resolve(account_type, Section::Transactions)) else {
        warn!("statement has no transaction list");
        return Ok((None, Vec::new()));
    };

    let period = match (tree.text_at(list, "DTSTART"), tree.text_at(list, "DTEND")) {
        (Some(start), Some(end)) => Some(StatementPeriod {
            start: parse_datetime(start)?,
            end: parse_datetime(end)?,
        }),
        _ => None,
    };

    let transactions = tree
        .descendants(list, TRANSACTION_TAG)
        .into_iter()
        .map(|node| {
            let mut transaction = Transaction::extract(tree, node, account_type)?;
            if transaction.currency.is_empty() {
                transaction.currency = currency.to_string();
            }
            Ok(transaction)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok((period, transactions))
}
