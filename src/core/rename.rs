//! Transaction memo renaming
//!
//! Rewrites cryptic memo text such as `POS 1234 GROCERY STORE #123` into a
//! friendlier label using a prefix table. The edit is applied to the retained
//! tree and to the typed transactions, so both the rendered markup and the
//! transaction list reflect it.
//!
//! Keys are tried longest first, ties in lexicographic order, and the first
//! key that prefixes a memo decides its fate. An empty replacement leaves the
//! memo unchanged.

use crate::core::path::{MEMO_TAG, TRANLIST_TAG};
use crate::types::{OfxError, Result, StatementDocument};
use std::cmp::Reverse;
use tracing::{debug, trace};

/// Memo prefix to replacement table with a deterministic match order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameMap {
    rules: Vec<(String, String)>,
}

impl RenameMap {
    /// Build a map from prefix/replacement pairs
    ///
    /// Duplicate prefixes keep their last replacement.
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut rules: Vec<(String, String)> = Vec::new();
        for (prefix, replacement) in pairs {
            let prefix = prefix.into();
            let replacement = replacement.into();
            match rules.iter_mut().find(|(p, _)| *p == prefix) {
                Some(rule) => rule.1 = replacement,
                None => rules.push((prefix, replacement)),
            }
        }
        rules.sort_by(|(a, _), (b, _)| Reverse(a.len()).cmp(&Reverse(b.len())).then(a.cmp(b)));
        RenameMap { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Rules in match order
    pub fn rules(&self) -> &[(String, String)] {
        &self.rules
    }

    /// Replacement for a memo, if its matching rule has a non-empty value
    pub fn lookup(&self, memo: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|(prefix, _)| memo.starts_with(prefix.as_str()))
            .map(|(_, replacement)| replacement.as_str())
            .filter(|replacement| !replacement.is_empty())
    }
}

/// Rename transaction memos in place
///
/// Memos are looked up under the first transaction list in the document.
/// Returns the number of memos that were replaced.
///
/// # Errors
///
/// Returns `InvalidArgument` if the statement has no transactions or the map
/// is empty.
pub fn rename_transactions(document: &mut StatementDocument, map: &RenameMap) -> Result<usize> {
    if document.transactions.is_empty() {
        return Err(OfxError::invalid_argument("statement has no transactions"));
    }
    if map.is_empty() {
        return Err(OfxError::invalid_argument("rename mapping is empty"));
    }

    let list = document
        .tree
        .find_first(TRANLIST_TAG)
        .ok_or_else(|| OfxError::invalid_argument("statement has no transaction list"))?;

    let mut renamed = 0;
    for memo in document.tree.descendants(list, MEMO_TAG) {
        let Some(text) = document.tree.text(memo) else {
            continue;
        };
        if let Some(replacement) = map.lookup(text.trim()) {
            trace!(from = text, to = replacement, "renaming memo");
            let replacement = replacement.to_string();
            document.tree.set_text(memo, replacement);
            renamed += 1;
        }
    }

    let tree = &document.tree;
    for transaction in &mut document.transactions {
        transaction.memo = tree
            .text_at(transaction.node, MEMO_TAG)
            .map(str::to_string);
    }

    debug!(renamed, "renamed transaction memos");
    Ok(renamed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assembler::parse_str;
    use rstest::rstest;

    fn statement(memos: &[&str]) -> StatementDocument {
        let transactions: String = memos
            .iter()
            .enumerate()
            .map(|(i, memo)| {
                format!(
                    "<STMTTRN><TRNTYPE>DEBIT</TRNTYPE><DTPOSTED>20240102</DTPOSTED>\
                     <TRNAMT>-1.00</TRNAMT><FITID>{i}</FITID><MEMO>{memo}</MEMO></STMTTRN>"
                )
            })
            .collect();
        parse_str(&format!(
            "<OFX><SIGNONMSGSRSV1><SONRS><STATUS><CODE>0</CODE><SEVERITY>INFO</SEVERITY></STATUS>\
             <DTSERVER>20240131</DTSERVER><LANGUAGE>ENG</LANGUAGE></SONRS></SIGNONMSGSRSV1>\
             <BANKMSGSRSV1><STMTTRNRS><STMTRS><CURDEF>USD</CURDEF>\
             <BANKACCTFROM><BANKID>1</BANKID><ACCTID>2</ACCTID></BANKACCTFROM>\
             <BANKTRANLIST>{transactions}</BANKTRANLIST>\
             <LEDGERBAL><BALAMT>0</BALAMT><DTASOF>20240131</DTASOF></LEDGERBAL>\
             </STMTRS></STMTTRNRS></BANKMSGSRSV1></OFX>"
        ))
        .unwrap()
    }

    fn memos(document: &StatementDocument) -> Vec<Option<&str>> {
        document
            .transactions()
            .iter()
            .map(|t| t.memo.as_deref())
            .collect()
    }

    #[test]
    fn test_rename_with_empty_replacement_is_noop() {
        let mut document = statement(&["GROCERY STORE #123", "GAS STATION"]);
        let map = RenameMap::new([("GROCERY", "Groceries"), ("GAS", "")]);

        let renamed = rename_transactions(&mut document, &map).unwrap();

        assert_eq!(renamed, 1);
        assert_eq!(memos(&document), vec![Some("Groceries"), Some("GAS STATION")]);
        let markup = document.tree().to_xml().unwrap();
        assert!(markup.contains("<MEMO>Groceries</MEMO>"));
        assert!(markup.contains("<MEMO>GAS STATION</MEMO>"));
    }

    #[test]
    fn test_longest_prefix_wins() {
        let mut document = statement(&["AMAZON PRIME", "AMAZON MKTPLACE"]);
        let map = RenameMap::new([("AMAZON", "Shopping"), ("AMAZON PRIME", "Subscriptions")]);

        rename_transactions(&mut document, &map).unwrap();

        assert_eq!(memos(&document), vec![Some("Subscriptions"), Some("Shopping")]);
    }

    #[test]
    fn test_rule_order_is_deterministic() {
        let a = RenameMap::new([("B", "1"), ("A", "2"), ("CC", "3")]);
        let b = RenameMap::new([("CC", "3"), ("A", "2"), ("B", "1")]);
        assert_eq!(a, b);
        let prefixes: Vec<_> = a.rules().iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(prefixes, vec!["CC", "A", "B"]);
    }

    #[test]
    fn test_duplicate_prefix_keeps_last() {
        let map = RenameMap::new([("GAS", "Fuel"), ("GAS", "Transport")]);
        assert_eq!(map.len(), 1);
        assert_eq!(map.lookup("GAS STATION"), Some("Transport"));
    }

    #[rstest]
    #[case::no_transactions(&[], RenameMap::new([("A", "B")]), "statement has no transactions")]
    #[case::empty_map(&["A"], RenameMap::default(), "rename mapping is empty")]
    fn test_invalid_arguments(
        #[case] memos: &[&str],
        #[case] map: RenameMap,
        #[case] message: &str,
    ) {
        let mut document = statement(memos);
        let err = rename_transactions(&mut document, &map).unwrap_err();
        assert_eq!(err, OfxError::invalid_argument(message));
    }
}
