//! OFX 1.x plaintext header
//!
//! An SGML statement starts with a block of `KEY:VALUE` lines before the first
//! markup tag. Only one dialect is accepted: the eight fields below must appear
//! first, in this order, with one of the listed values.
//!
//! | # | field | accepted values |
//! |---|---|---|
//! | 1 | OFXHEADER | 100 |
//! | 2 | DATA | OFXSGML |
//! | 3 | VERSION | 102 |
//! | 4 | SECURITY | NONE |
//! | 5 | ENCODING | USASCII, UTF-8 |
//! | 6 | CHARSET | 1252, NONE |
//! | 7 | COMPRESSION | NONE |
//! | 8 | OLDFILEUID | NONE |
//!
//! Fields after the eighth (usually `NEWFILEUID`) are kept but not validated.

use crate::types::{OfxError, Result};
use tracing::debug;

/// Literal that marks a document as SGML with a plaintext header
pub const SGML_MARKER: &str = "OFXHEADER:100";

const REQUIRED_FIELDS: [(&str, &[&str]); 8] = [
    ("OFXHEADER", &["100"]),
    ("DATA", &["OFXSGML"]),
    ("VERSION", &["102"]),
    ("SECURITY", &["NONE"]),
    ("ENCODING", &["USASCII", "UTF-8"]),
    ("CHARSET", &["1252", "NONE"]),
    ("COMPRESSION", &["NONE"]),
    ("OLDFILEUID", &["NONE"]),
];

/// Validated OFX header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfxHeader {
    fields: Vec<(String, String)>,
    text: String,
}

impl OfxHeader {
    /// The header block as it appeared in the input, trimmed
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Value of a header field
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// All fields in input order
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }
}

/// Whether the text is an SGML document carrying a plaintext header
pub fn is_sgml(text: &str) -> bool {
    text.contains(SGML_MARKER)
}

/// Split raw text into the header block and the markup body
///
/// The body starts at the first `<`. Text without any markup is all header.
pub fn split(text: &str) -> (&str, &str) {
    match text.find('<') {
        Some(index) => text.split_at(index),
        None => (text, ""),
    }
}

/// Read and validate the header block preceding the first markup tag
///
/// # Errors
///
/// - `MissingHeader` naming the first required field that is absent
/// - `InvalidHeader` naming the field that has the wrong key or value,
///   together with the text actually found
pub fn read_header(text: &str) -> Result<OfxHeader> {
    let (block, _) = split(text);
    let block = block.trim_start_matches('\u{feff}').trim();

    // Headers are normally one field per line; some producers put them on a
    // single line separated by spaces.
    let entries: Vec<&str> = block.split_whitespace().collect();

    let mut fields = Vec::with_capacity(entries.len());
    for (index, (field, accepted)) in REQUIRED_FIELDS.iter().enumerate() {
        let entry = entries
            .get(index)
            .ok_or_else(|| OfxError::missing_header(field))?;
        let (key, value) = entry
            .split_once(':')
            .ok_or_else(|| OfxError::invalid_header(field, entry))?;
        if !key.eq_ignore_ascii_case(field) {
            return Err(OfxError::invalid_header(field, entry));
        }
        if !accepted.iter().any(|a| a.eq_ignore_ascii_case(value)) {
            return Err(OfxError::invalid_header(field, value));
        }
        fields.push((field.to_string(), value.to_string()));
    }

    for entry in entries.iter().skip(REQUIRED_FIELDS.len()) {
        if let Some((key, value)) = entry.split_once(':') {
            fields.push((key.to_uppercase(), value.to_string()));
        }
    }

    debug!(fields = fields.len(), "validated OFX header");
    Ok(OfxHeader {
        fields,
        text: block.to_string(),
    })
}
