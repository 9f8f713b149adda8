//! SGML tag-soup normalization
//!
//! OFX 1.x bodies are SGML: leaf elements usually have no end tag, tag names
//! are case-insensitive and attributes may be unquoted. This module rewrites
//! such a body into well-formed, single-line XML.
//!
//! # Design
//!
//! The body is read with `sgmlish`, which expands entities and reports tags
//! without checking their nesting. Its events are folded into tokens (start
//! tag, end tag, character data). A cursor then walks the tokens keeping a
//! stack of open aggregates and at most one open leaf element:
//!
//! - A start tag implicitly closes the open leaf, if any.
//! - An aggregate start tag implicitly closes an open aggregate of the same
//!   name on top of the stack, so a missing `</STMTTRN>` yields siblings.
//! - Character data is only valid inside a leaf.
//! - An end tag closes the open leaf if the names match; otherwise it closes
//!   the nearest open aggregate with that name, implicitly closing every
//!   aggregate opened after it.
//!
//! Whether a start tag opens a leaf or an aggregate comes from a [`TagModel`].
//! Tags the model does not know are classified by lookahead: a tag followed by
//! character data is a leaf, a tag followed by another tag is an aggregate.

use crate::types::{OfxError, Result};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use sgmlish::{SgmlEvent, SgmlFragment};
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt::Display;
use tracing::{debug, trace};

/// Content model of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// Contains only elements and always has an explicit end tag
    Aggregate,
    /// Holds character data; the end tag is optional
    Leaf,
}

const OFX_AGGREGATES: &[&str] = &[
    "OFX",
    "SIGNONMSGSRSV1",
    "SONRS",
    "STATUS",
    "FI",
    "BANKMSGSRSV1",
    "STMTTRNRS",
    "STMTRS",
    "BANKACCTFROM",
    "BANKACCTTO",
    "BANKTRANLIST",
    "STMTTRN",
    "PAYEE",
    "CURRENCY",
    "ORIGCURRENCY",
    "LEDGERBAL",
    "AVAILBAL",
    "BALLIST",
    "BAL",
    "CREDITCARDMSGSRSV1",
    "CCSTMTTRNRS",
    "CCSTMTRS",
    "CCACCTFROM",
    "CCACCTTO",
];

const OFX_LEAVES: &[&str] = &[
    "CODE",
    "SEVERITY",
    "MESSAGE",
    "DTSERVER",
    "USERKEY",
    "TSKEYEXPIRE",
    "LANGUAGE",
    "DTPROFUP",
    "DTACCTUP",
    "ORG",
    "FID",
    "SESSCOOKIE",
    "INTU.BID",
    "INTU.USERID",
    "TRNUID",
    "CLTCOOKIE",
    "CURDEF",
    "BANKID",
    "BRANCHID",
    "ACCTID",
    "ACCTTYPE",
    "ACCTKEY",
    "DTSTART",
    "DTEND",
    "TRNTYPE",
    "DTPOSTED",
    "DTUSER",
    "DTAVAIL",
    "TRNAMT",
    "FITID",
    "CORRECTFITID",
    "CORRECTACTION",
    "SRVRTID",
    "CHECKNUM",
    "REFNUM",
    "SIC",
    "PAYEEID",
    "NAME",
    "MEMO",
    "CURRATE",
    "CURSYM",
    "BALAMT",
    "DTASOF",
    "DESC",
    "BALTYPE",
    "VALUE",
    "MKTGINFO",
];

/// DTD-like description of which OFX elements are aggregates and which are leaves
#[derive(Debug, Clone)]
pub struct TagModel {
    aggregates: HashSet<String>,
    leaves: HashSet<String>,
}

impl TagModel {
    /// A model with no known tags; every tag is classified by lookahead
    pub fn empty() -> Self {
        TagModel {
            aggregates: HashSet::new(),
            leaves: HashSet::new(),
        }
    }

    /// The OFX 1.x banking and credit-card element set
    pub fn ofx() -> Self {
        let mut model = TagModel::empty();
        for name in OFX_AGGREGATES {
            model.add(name, TagKind::Aggregate);
        }
        for name in OFX_LEAVES {
            model.add(name, TagKind::Leaf);
        }
        model
    }

    /// Register a tag, replacing any earlier classification
    pub fn add(&mut self, name: &str, kind: TagKind) {
        let name = name.to_uppercase();
        match kind {
            TagKind::Aggregate => {
                self.leaves.remove(&name);
                self.aggregates.insert(name);
            }
            TagKind::Leaf => {
                self.aggregates.remove(&name);
                self.leaves.insert(name);
            }
        }
    }

    /// Classification of a known tag
    pub fn kind(&self, name: &str) -> Option<TagKind> {
        let name = name.to_uppercase();
        if self.aggregates.contains(&name) {
            Some(TagKind::Aggregate)
        } else if self.leaves.contains(&name) {
            Some(TagKind::Leaf)
        } else {
            None
        }
    }
}

impl Default for TagModel {
    fn default() -> Self {
        TagModel::ofx()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    Start {
        name: String,
        attributes: Vec<(String, String)>,
    },
    End {
        name: String,
    },
    Text(Cow<'a, str>),
}

/// Read the body with the SGML parser, expanding the entities OFX producers use
fn read_events(body: &str) -> Result<SgmlFragment<'_>> {
    sgmlish::Parser::builder()
        .expand_entities(|entity| match entity {
            "lt" => Some("<"),
            "gt" => Some(">"),
            "amp" => Some("&"),
            "quot" => Some("\""),
            "apos" => Some("'"),
            "nbsp" => Some(" "),
            _ => None,
        })
        .parse(body)
        .map_err(|e| OfxError::markup(e.to_string()))
}

/// Fold parser events into start tags with their attributes, end tags and text
///
/// Names are upper-cased. Declarations, comments, processing instructions
/// and marked sections carry no statement data and are dropped.
fn tokenize(fragment: SgmlFragment<'_>) -> Result<Vec<Token<'_>>> {
    let mut tokens = Vec::new();
    let mut pending: Option<(String, Vec<(String, String)>)> = None;

    for event in fragment {
        match event {
            SgmlEvent::OpenStartTag { name } => {
                pending = Some((name.to_ascii_uppercase(), Vec::new()));
            }
            SgmlEvent::Attribute { name, value } => {
                let (_, attributes) = pending
                    .as_mut()
                    .ok_or_else(|| OfxError::markup(format!("attribute '{}' outside of a tag", name)))?;
                let key = name.to_ascii_uppercase();
                let value = value.map(|v| v.into_owned()).unwrap_or_else(|| key.clone());
                attributes.push((key, value));
            }
            SgmlEvent::CloseStartTag => {
                let (name, attributes) = pending
                    .take()
                    .ok_or_else(|| OfxError::markup("start tag closed before it was opened"))?;
                tokens.push(Token::Start { name, attributes });
            }
            SgmlEvent::XmlCloseEmptyElement => {
                let (name, attributes) = pending
                    .take()
                    .ok_or_else(|| OfxError::markup("empty element closed before it was opened"))?;
                tokens.push(Token::Start {
                    name: name.clone(),
                    attributes,
                });
                tokens.push(Token::End { name });
            }
            SgmlEvent::EndTag { name } => {
                if name.is_empty() {
                    return Err(OfxError::markup("end tag without a name"));
                }
                tokens.push(Token::End {
                    name: name.to_ascii_uppercase(),
                });
            }
            SgmlEvent::Character(text) => tokens.push(Token::Text(text)),
            _ => {}
        }
    }

    match pending {
        Some((name, _)) => Err(OfxError::markup(format!("truncated tag <{}", name))),
        None => Ok(tokens),
    }
}

fn write_error<E: Display>(e: E) -> OfxError {
    OfxError::markup(e.to_string())
}

struct Cursor<'m> {
    model: &'m TagModel,
    writer: Writer<Vec<u8>>,
    open: Vec<String>,
    leaf: Option<String>,
}

impl<'m> Cursor<'m> {
    fn new(model: &'m TagModel) -> Self {
        Cursor {
            model,
            writer: Writer::new(Vec::new()),
            open: Vec::new(),
            leaf: None,
        }
    }

    fn emit(&mut self, event: Event<'_>) -> Result<()> {
        self.writer.write_event(event).map_err(write_error)?;
        Ok(())
    }

    fn close_leaf(&mut self) -> Result<()> {
        if let Some(name) = self.leaf.take() {
            self.emit(Event::End(BytesEnd::new(name)))?;
        }
        Ok(())
    }

    fn start(&mut self, name: &str, attributes: &[(String, String)], next: Option<&Token<'_>>) -> Result<()> {
        if let Some(leaf) = &self.leaf {
            trace!(leaf = %leaf, next = name, "implicitly closing leaf element");
        }
        self.close_leaf()?;

        let kind = self.model.kind(name).unwrap_or_else(|| match next {
            Some(Token::Text(_)) => TagKind::Leaf,
            Some(Token::End { name: end }) if end == name => TagKind::Leaf,
            _ => TagKind::Aggregate,
        });

        if kind == TagKind::Aggregate && self.open.last().map(String::as_str) == Some(name) {
            trace!(element = name, "implicitly closing sibling aggregate");
            self.open.pop();
            self.emit(Event::End(BytesEnd::new(name)))?;
        }

        let mut start = BytesStart::new(name);
        for (key, value) in attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }
        self.emit(Event::Start(start))?;

        match kind {
            TagKind::Leaf => self.leaf = Some(name.to_string()),
            TagKind::Aggregate => self.open.push(name.to_string()),
        }
        Ok(())
    }

    fn text(&mut self, raw: &str) -> Result<()> {
        let text = raw.trim();
        if text.is_empty() {
            return Ok(());
        }
        if self.leaf.is_none() {
            let context = match self.open.last() {
                Some(parent) => format!("inside <{}>", parent),
                None => "outside of any element".to_string(),
            };
            return Err(OfxError::markup(format!(
                "unexpected text '{}' {}",
                text, context
            )));
        }
        self.emit(Event::Text(BytesText::new(text)))
    }

    fn end(&mut self, name: &str) -> Result<()> {
        if self.leaf.as_deref() == Some(name) {
            return self.close_leaf();
        }
        self.close_leaf()?;

        let position = self
            .open
            .iter()
            .rposition(|open| open == name)
            .ok_or_else(|| OfxError::markup(format!("unmatched end tag </{}>", name)))?;
        while self.open.len() > position {
            if let Some(open) = self.open.pop() {
                if open != name {
                    trace!(element = %open, closed_by = name, "implicitly closing aggregate");
                }
                self.emit(Event::End(BytesEnd::new(open)))?;
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Result<String> {
        self.close_leaf()?;
        if let Some(open) = self.open.last() {
            return Err(OfxError::markup(format!(
                "element <{}> is never closed",
                open
            )));
        }
        let output = String::from_utf8(self.writer.into_inner()).map_err(write_error)?;
        Ok(output.replace(['\r', '\n'], ""))
    }
}

/// Normalize an SGML body using the OFX tag model
pub fn normalize(body: &str) -> Result<String> {
    normalize_with(body, &TagModel::ofx())
}

/// Normalize an SGML body into single-line, well-formed XML
///
/// # Errors
///
/// Returns a `Markup` error for markup the SGML parser rejects, an end tag
/// with no matching open element, character data directly inside an
/// aggregate, or aggregates still open at the end of the input.
pub fn normalize_with(body: &str, model: &TagModel) -> Result<String> {
    let tokens = tokenize(read_events(body)?)?;
    let mut cursor = Cursor::new(model);

    for (index, token) in tokens.iter().enumerate() {
        match token {
            Token::Start { name, attributes } => {
                let next = tokens[index + 1..]
                    .iter()
                    .find(|t| !matches!(t, Token::Text(text) if text.trim().is_empty()));
                cursor.start(name, attributes, next)?;
            }
            Token::End { name } => cursor.end(name)?,
            Token::Text(text) => cursor.text(text)?,
        }
    }

    let output = cursor.finish()?;
    debug!(tokens = tokens.len(), length = output.len(), "normalized SGML body");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::implicit_leaf_close(
        "<STATUS><CODE>0<SEVERITY>INFO</STATUS>",
        "<STATUS><CODE>0</CODE><SEVERITY>INFO</SEVERITY></STATUS>"
    )]
    #[case::explicit_leaf_close(
        "<STATUS><CODE>0</CODE><SEVERITY>INFO</SEVERITY></STATUS>",
        "<STATUS><CODE>0</CODE><SEVERITY>INFO</SEVERITY></STATUS>"
    )]
    #[case::case_insensitive_names(
        "<status><Code>0</code><severity>INFO</STATUS>",
        "<STATUS><CODE>0</CODE><SEVERITY>INFO</SEVERITY></STATUS>"
    )]
    #[case::nested_implicit_close(
        "<OFX><BANKMSGSRSV1><STMTTRNRS><STMTRS><CURDEF>USD</OFX>",
        "<OFX><BANKMSGSRSV1><STMTTRNRS><STMTRS><CURDEF>USD</CURDEF></STMTRS></STMTTRNRS></BANKMSGSRSV1></OFX>"
    )]
    #[case::whitespace_and_line_breaks(
        "<STMTTRN>\r\n  <TRNTYPE>DEBIT\r\n  <MEMO>  two\r\nlines  \r\n</STMTTRN>\r\n",
        "<STMTTRN><TRNTYPE>DEBIT</TRNTYPE><MEMO>twolines</MEMO></STMTTRN>"
    )]
    #[case::entities(
        "<STMTTRN><NAME>A &amp; B &lt;C<MEMO>AT&amp;T&nbsp;CORP</STMTTRN>",
        "<STMTTRN><NAME>A &amp; B &lt;C</NAME><MEMO>AT&amp;T CORP</MEMO></STMTTRN>"
    )]
    #[case::comments_and_instructions(
        "<?OFX x?><!-- note --><OFX><!DOCTYPE junk><CURDEF>EUR</OFX>",
        "<OFX><CURDEF>EUR</CURDEF></OFX>"
    )]
    #[case::known_leaf_without_data(
        "<STMTTRN><NAME><MEMO>x</STMTTRN>",
        "<STMTTRN><NAME></NAME><MEMO>x</MEMO></STMTTRN>"
    )]
    #[case::sibling_aggregate_without_end_tag(
        "<BANKTRANLIST><STMTTRN><FITID>1<STMTTRN><FITID>2</BANKTRANLIST>",
        "<BANKTRANLIST><STMTTRN><FITID>1</FITID></STMTTRN><STMTTRN><FITID>2</FITID></STMTTRN></BANKTRANLIST>"
    )]
    #[case::nested_aggregate_of_other_name_stays_nested(
        "<STMTTRN><PAYEE><NAME>X</PAYEE><MEMO>y</STMTTRN>",
        "<STMTTRN><PAYEE><NAME>X</NAME></PAYEE><MEMO>y</MEMO></STMTTRN>"
    )]
    #[case::self_closing(
        "<STMTTRN><NAME/><MEMO>x</STMTTRN>",
        "<STMTTRN><NAME></NAME><MEMO>x</MEMO></STMTTRN>"
    )]
    fn test_normalize(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize(input).unwrap(), expected);
    }

    #[rstest]
    #[case::unknown_leaf("<OFX><XFOO>bar<CURDEF>USD</OFX>", "<OFX><XFOO>bar</XFOO><CURDEF>USD</CURDEF></OFX>")]
    #[case::unknown_aggregate(
        "<OFX><XWRAP><CODE>1</XWRAP></OFX>",
        "<OFX><XWRAP><CODE>1</CODE></XWRAP></OFX>"
    )]
    #[case::unknown_empty_leaf("<OFX><XFLAG></XFLAG></OFX>", "<OFX><XFLAG></XFLAG></OFX>")]
    fn test_unknown_tags_use_lookahead(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize(input).unwrap(), expected);
    }

    #[test]
    fn test_attributes_are_quoted() {
        let output = normalize("<OFX><STMTTRN id=7 kind=\"a b\"><MEMO>x</STMTTRN></OFX>").unwrap();
        assert_eq!(
            output,
            "<OFX><STMTTRN ID=\"7\" KIND=\"a b\"><MEMO>x</MEMO></STMTTRN></OFX>"
        );
    }

    #[test]
    fn test_custom_model_overrides_lookahead() {
        let mut model = TagModel::empty();
        model.add("WRAP", TagKind::Aggregate);
        let err = normalize_with("<WRAP>text</WRAP>", &model).unwrap_err();
        assert_eq!(
            err,
            OfxError::markup("unexpected text 'text' inside <WRAP>")
        );
        assert_eq!(model.kind("wrap"), Some(TagKind::Aggregate));
        assert_eq!(model.kind("other"), None);
    }

    #[rstest]
    #[case::unmatched_end("<OFX><CURDEF>USD</STMTRS></OFX>", "unmatched end tag </STMTRS>")]
    #[case::unclosed("<OFX><BANKMSGSRSV1><CURDEF>USD", "element <BANKMSGSRSV1> is never closed")]
    #[case::text_in_aggregate("<OFX>loose<CURDEF>USD</OFX>", "unexpected text 'loose' inside <OFX>")]
    fn test_malformed(#[case] input: &str, #[case] message: &str) {
        assert_eq!(normalize(input).unwrap_err(), OfxError::markup(message));
    }

    #[rstest]
    #[case::truncated_end_tag("<OFX><CURDEF>USD</OF")]
    #[case::truncated_start_tag("<OFX><CURDEF>USD</CURDEF><MEMO")]
    fn test_truncated_markup(#[case] input: &str) {
        let err = normalize(input).unwrap_err();
        assert!(matches!(err, OfxError::Markup { .. }), "got {:?}", err);
    }
}
