//! Error types for the merge pipeline.

use crate::model::{Span, TreeOrigin};
use thiserror::Error;

/// Result type for merge operations.
pub type Result<T> = std::result::Result<T, MergeError>;

/// Errors that can end a single source/stub merge.
#[derive(Error, Debug)]
pub enum MergeError {
    /// One of the two inputs failed to parse. Fatal for this file pair.
    #[error("syntax error in {origin} input at line {line}")]
    Parse { origin: TreeOrigin, line: usize },

    /// Two planned edits overlap. Upstream invariants make this
    /// unreachable; reported instead of splicing corrupt output.
    #[error("internal edit conflict: {first} overlaps {second}")]
    SpanConflict { first: Span, second: Span },

    /// The Python grammar could not be loaded into the parser.
    #[error("parser setup failed: {0}")]
    Grammar(String),
}

impl MergeError {
    /// Create a parse error for the given input at a 1-based line.
    pub fn parse(origin: TreeOrigin, line: usize) -> Self {
        Self::Parse { origin, line }
    }

    /// Create a grammar/setup error.
    pub fn grammar(msg: impl Into<String>) -> Self {
        Self::Grammar(msg.into())
    }
}
