//! Core parsing module
//!
//! This module contains the statement reading pipeline:
//! - `header` - SGML header block validation
//! - `sgml` - SGML to XML normalization
//! - `tree` - Arena tree built from normalized markup
//! - `classifier` - Bank vs credit-card detection
//! - `path` - Logical section to element path resolution
//! - `traits` - Extraction trait shared by statement entities
//! - `extract` - Typed field extraction
//! - `assembler` - Pipeline orchestration into a `StatementDocument`
//! - `rename` - In-place memo renaming

pub mod assembler;
pub mod classifier;
pub mod extract;
pub mod header;
pub mod path;
pub mod rename;
pub mod sgml;
pub mod traits;
pub mod tree;

pub use assembler::{parse_file, parse_str, StatementParser};
pub use classifier::classify;
pub use header::{read_header, OfxHeader};
pub use path::{resolve, OfxPath, Section};
pub use rename::{rename_transactions, RenameMap};
pub use sgml::{normalize, normalize_with, TagKind, TagModel};
pub use traits::Extract;
pub use tree::{NodeId, Tree};
