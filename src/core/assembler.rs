//! Statement document assembly
//!
//! This module provides the `StatementParser` that runs the whole pipeline:
//!
//! 1. Header validation and SGML normalization, skipped when the input is
//!    already well-formed markup (no `OFXHEADER:100` marker)
//! 2. Tree construction
//! 3. Account type classification on the raw text
//! 4. Section lookup and field extraction
//!
//! Any failure aborts the parse; a document is either complete or not
//! returned at all.

use crate::core::classifier::classify;
use crate::core::extract::{extract_currency, extract_transactions, locate};
use crate::core::header;
use crate::core::path::Section;
use crate::core::sgml::{self, TagModel};
use crate::core::tree::Tree;
use crate::io::source;
use crate::types::{Account, Balance, Result, SignOn, StatementDocument};
use encoding_rs::Encoding;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Statement parser
///
/// Holds the tag model used to normalize SGML bodies. Parsers keep no state
/// between calls.
#[derive(Debug, Clone, Default)]
pub struct StatementParser {
    model: TagModel,
}

impl StatementParser {
    /// Create a parser using the OFX tag model
    pub fn new() -> Self {
        StatementParser {
            model: TagModel::ofx(),
        }
    }

    /// Create a parser with a custom tag model
    pub fn with_tag_model(model: TagModel) -> Self {
        StatementParser { model }
    }

    /// Parse decoded statement text
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The SGML header is invalid
    /// - The markup cannot be normalized or read into a tree
    /// - The statement is neither a bank nor a credit-card statement
    /// - The currency, sign-on, account or ledger balance is missing
    /// - A date or amount cannot be parsed
    pub fn parse_str(&self, text: &str) -> Result<StatementDocument> {
        let (header_text, markup) = if header::is_sgml(text) {
            let header = header::read_header(text)?;
            let (_, body) = header::split(text);
            let markup = sgml::normalize_with(body, &self.model)?;
            (header.text().to_string(), markup)
        } else {
            debug!("no SGML header marker, reading as XML");
            (String::new(), text.to_string())
        };

        let account_type = classify(text)?;
        let tree = Tree::parse(&markup)?;

        let currency = extract_currency(&tree, account_type)?;
        let signon: SignOn = locate(&tree, account_type, Section::Signon)?;
        let account: Account = locate(&tree, account_type, Section::AccountInfo)?;
        let balance: Balance = locate(&tree, account_type, Section::Balance)?;
        let (period, transactions) = extract_transactions(&tree, account_type, &currency)?;

        info!(
            %account_type,
            account = %account.account_id,
            transactions = transactions.len(),
            "parsed statement"
        );

        Ok(StatementDocument {
            period,
            account_type,
            currency,
            signon,
            account,
            balance,
            transactions,
            header: header_text,
            tree,
        })
    }

    /// Decode bytes and parse them
    ///
    /// Without an explicit encoding the header's `CHARSET` decides between
    /// windows-1252 and UTF-8.
    pub fn parse_bytes(
        &self,
        bytes: &[u8],
        encoding: Option<&'static Encoding>,
    ) -> Result<StatementDocument> {
        let text = source::decode(bytes, encoding);
        self.parse_str(&text)
    }

    /// Read a whole stream into memory and parse it
    pub fn parse_reader<R: Read>(
        &self,
        reader: R,
        encoding: Option<&'static Encoding>,
    ) -> Result<StatementDocument> {
        let bytes = source::read_all(reader)?;
        self.parse_bytes(&bytes, encoding)
    }

    /// Read a file and parse it
    pub fn parse_file(
        &self,
        path: &Path,
        encoding: Option<&'static Encoding>,
    ) -> Result<StatementDocument> {
        let bytes = source::read_file(path)?;
        self.parse_bytes(&bytes, encoding)
    }
}

/// Parse decoded statement text with the default parser
pub fn parse_str(text: &str) -> Result<StatementDocument> {
    StatementParser::new().parse_str(text)
}

/// Read and parse a statement file with the default parser
pub fn parse_file(path: &Path, encoding: Option<&'static Encoding>) -> Result<StatementDocument> {
    StatementParser::new().parse_file(path, encoding)
}
