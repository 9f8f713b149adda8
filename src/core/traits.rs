//! Core traits for reading typed entities out of the statement tree
//!
//! Every field extractor implements [`Extract`]: it is handed the subtree the
//! path resolver located for its section and pulls the fields it needs with
//! relative lookups.

use crate::core::tree::{NodeId, Tree};
use crate::types::{AccountType, Result};

/// Trait for building a typed entity from a located subtree
pub trait Extract: Sized {
    /// Message of the parse error raised when the entity's subtree or one of
    /// its required children is absent
    const MISSING: &'static str;

    /// Build the entity from the subtree rooted at `node`
    fn extract(tree: &Tree, node: NodeId, account_type: AccountType) -> Result<Self>;
}
