//! Statement input and text decoding
//!
//! Statements are small, so every input is buffered whole before parsing.
//! Decoding uses an explicit encoding when one is given. Otherwise the
//! encoding is sniffed from the ASCII prologue:
//!
//! - a byte-order mark wins
//! - an SGML header with `CHARSET:1252` selects windows-1252
//! - an XML declaration's `encoding="..."` label is honoured
//! - anything else is read as UTF-8
//!
//! Malformed sequences are replaced rather than rejected.

use crate::types::{OfxError, Result};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use std::fs;
use std::io::{ErrorKind, Read};
use std::path::Path;
use tracing::{debug, warn};

/// How many leading bytes are searched when sniffing the encoding
const PROLOGUE_LEN: usize = 512;

/// Look up an encoding by its WHATWG label (e.g. `utf-8`, `windows-1252`, `latin1`)
pub fn encoding_for_label(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| OfxError::encoding(label))
}

/// Guess the encoding of a statement from its first bytes
pub fn sniff_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }

    let prologue = String::from_utf8_lossy(&bytes[..bytes.len().min(PROLOGUE_LEN)]);
    let compact: String = prologue.split_whitespace().collect();
    if compact.contains("CHARSET:1252") {
        return WINDOWS_1252;
    }
    if let Some(label) = xml_declared_encoding(&prologue) {
        if let Some(encoding) = Encoding::for_label(label.as_bytes()) {
            return encoding;
        }
    }
    UTF_8
}

fn xml_declared_encoding(prologue: &str) -> Option<&str> {
    let start = prologue.find("<?xml")?;
    let declaration = &prologue[start..start + prologue[start..].find("?>")?];
    let after = &declaration[declaration.find("encoding")? + "encoding".len()..];
    let after = after.trim_start().strip_prefix('=')?.trim_start();
    let quote = after.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &after[1..];
    Some(&value[..value.find(quote)?])
}

/// Decode statement bytes into text
pub fn decode(bytes: &[u8], encoding: Option<&'static Encoding>) -> String {
    let encoding = encoding.unwrap_or_else(|| sniff_encoding(bytes));
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        warn!(encoding = used.name(), "replaced malformed byte sequences");
    }
    debug!(encoding = used.name(), bytes = bytes.len(), "decoded statement");
    text.into_owned()
}

/// Read a whole stream into memory
pub fn read_all<R: Read>(mut reader: R) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Read a whole file into memory
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => OfxError::file_not_found(&path.display().to_string()),
        _ => OfxError::Io {
            message: format!("Failed to read '{}': {}", path.display(), e),
        },
    })
}
