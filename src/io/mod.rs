//! I/O module
//!
//! Handles statement input and CSV files.
//!
//! # Components
//!
//! - `source` - Reading statement bytes and decoding them to text
//! - `csv_format` - Rename-map loading and transaction export

pub mod csv_format;
pub mod source;

pub use csv_format::{read_rename_map, write_transactions_csv, RenameRecord};
pub use source::{decode, encoding_for_label, sniff_encoding};
