//! Error types for the OFX statement reader
//!
//! This module defines all error types that can occur while reading a statement.
//! Every failure is fatal for the current parse call: no partial document is ever
//! returned, and the caller's only remedy is to fix the input and try again.
//!
//! # Error Categories
//!
//! - **Format Errors**: unsupported account type, unknown logical section
//! - **Parse Errors**: invalid header fields, missing required structure, bad field values
//! - **Markup Errors**: tag soup the SGML cursor cannot resolve, malformed XML
//! - **Argument Errors**: invalid input to the renaming utility
//! - **I/O Errors**: file access, text decoding and CSV handling

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, OfxError>;

/// Main error type for the OFX statement reader
///
/// Each variant carries enough context to name the offending field, section
/// or value in its message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OfxError {
    /// Neither a bank nor a credit-card statement marker was found,
    /// or an account type name could not be recognised
    #[error("Unsupported account type: {value}")]
    UnsupportedAccountType {
        /// The offending value
        value: String,
    },

    /// A logical section name could not be recognised
    #[error("Unknown section: {value}")]
    UnknownSection {
        /// The offending value
        value: String,
    },

    /// A header field has the wrong key or an unrecognised value
    #[error("Invalid OFX header field {field}: '{value}'")]
    InvalidHeader {
        /// The header field that was expected at this position
        field: String,
        /// The text actually found
        value: String,
    },

    /// The header block ended before all required fields were read
    #[error("Missing OFX header field {field}")]
    MissingHeader {
        /// The first header field that is absent
        field: String,
    },

    /// Required structure is missing or a field value could not be parsed
    #[error("{message}")]
    Parse {
        /// Description of the failure
        message: String,
    },

    /// The markup could not be turned into a tree
    #[error("Malformed markup: {message}")]
    Markup {
        /// Description of the failure
        message: String,
    },

    /// A utility was called with arguments it cannot work with
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the failure
        message: String,
    },

    /// Input file not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading input
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    /// Rename-map loading or transaction export failed
    #[error("CSV error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Csv {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the CSV error
        message: String,
    },

    /// An encoding label is not known to the decoder
    #[error("Unknown text encoding '{label}'")]
    Encoding {
        /// The label that was requested
        label: String,
    },
}

impl From<std::io::Error> for OfxError {
    fn from(error: std::io::Error) -> Self {
        OfxError::Io {
            message: error.to_string(),
        }
    }
}

impl From<quick_xml::Error> for OfxError {
    fn from(error: quick_xml::Error) -> Self {
        OfxError::Markup {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error, keeping the line number if available
impl From<csv::Error> for OfxError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        OfxError::Csv {
            line,
            message: error.to_string(),
        }
    }
}

impl OfxError {
    /// Create an UnsupportedAccountType error
    pub fn unsupported_account_type(value: &str) -> Self {
        OfxError::UnsupportedAccountType {
            value: value.to_string(),
        }
    }

    /// Create an UnknownSection error
    pub fn unknown_section(value: &str) -> Self {
        OfxError::UnknownSection {
            value: value.to_string(),
        }
    }

    /// Create an InvalidHeader error
    pub fn invalid_header(field: &str, value: &str) -> Self {
        OfxError::InvalidHeader {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    /// Create a MissingHeader error
    pub fn missing_header(field: &str) -> Self {
        OfxError::MissingHeader {
            field: field.to_string(),
        }
    }

    /// Create a Parse error
    pub fn parse(message: impl Into<String>) -> Self {
        OfxError::Parse {
            message: message.into(),
        }
    }

    /// Create a Markup error
    pub fn markup(message: impl Into<String>) -> Self {
        OfxError::Markup {
            message: message.into(),
        }
    }

    /// Create an InvalidArgument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        OfxError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a FileNotFound error
    pub fn file_not_found(path: &str) -> Self {
        OfxError::FileNotFound {
            path: path.to_string(),
        }
    }

    /// Create an Encoding error
    pub fn encoding(label: &str) -> Self {
        OfxError::Encoding {
            label: label.to_string(),
        }
    }

    /// Whether this is a general format/usage error
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            OfxError::UnsupportedAccountType { .. } | OfxError::UnknownSection { .. }
        )
    }

    /// Whether this is a parse-validation error
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            OfxError::InvalidHeader { .. }
                | OfxError::MissingHeader { .. }
                | OfxError::Parse { .. }
                | OfxError::Markup { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::unsupported_account_type(
        OfxError::unsupported_account_type("INVSTMTRS"),
        "Unsupported account type: INVSTMTRS"
    )]
    #[case::unknown_section(OfxError::unknown_section("Holdings"), "Unknown section: Holdings")]
    #[case::invalid_header(
        OfxError::invalid_header("VERSION", "VERSION:103"),
        "Invalid OFX header field VERSION: 'VERSION:103'"
    )]
    #[case::missing_header(
        OfxError::missing_header("OLDFILEUID"),
        "Missing OFX header field OLDFILEUID"
    )]
    #[case::parse(OfxError::parse("Currency not found"), "Currency not found")]
    #[case::markup(
        OfxError::markup("unmatched end tag </STMTRS>"),
        "Malformed markup: unmatched end tag </STMTRS>"
    )]
    #[case::invalid_argument(
        OfxError::invalid_argument("rename mapping is empty"),
        "Invalid argument: rename mapping is empty"
    )]
    #[case::file_not_found(
        OfxError::file_not_found("statement.ofx"),
        "File not found: statement.ofx"
    )]
    #[case::csv_with_line(
        OfxError::Csv { line: Some(3), message: "found record with 1 field".to_string() },
        "CSV error at line 3: found record with 1 field"
    )]
    #[case::encoding(OfxError::encoding("klingon"), "Unknown text encoding 'klingon'")]
    fn test_error_display(#[case] error: OfxError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case(OfxError::unsupported_account_type("X"), true, false)]
    #[case(OfxError::unknown_section("X"), true, false)]
    #[case(OfxError::invalid_header("DATA", "DATA:XML"), false, true)]
    #[case(OfxError::parse("Balance information not found"), false, true)]
    #[case(OfxError::markup("truncated tag"), false, true)]
    #[case(OfxError::invalid_argument("empty"), false, false)]
    fn test_error_kinds(#[case] error: OfxError, #[case] format: bool, #[case] parse: bool) {
        assert_eq!(error.is_format_error(), format);
        assert_eq!(error.is_parse_error(), parse);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "No such file");
        let error: OfxError = io_error.into();
        assert!(matches!(error, OfxError::Io { .. }));
        assert_eq!(error.to_string(), "I/O error: No such file");
    }
}
