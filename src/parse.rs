//! Thin wrapper around the tree-sitter Python parser.
//!
//! The rest of the pipeline treats parsing as a black box: text in,
//! concrete syntax tree out. Both `.py` and `.pyi` files use the same
//! grammar. A tree containing error nodes is a parse failure for the
//! whole file pair — no recovery is attempted.

use crate::error::{MergeError, Result};
use crate::model::TreeOrigin;
use tree_sitter::{Node, Parser, Tree};

/// Parse one input into a syntax tree, failing on any syntax error.
pub fn parse_module(text: &str, origin: TreeOrigin) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| MergeError::grammar(format!("failed to load python grammar: {e}")))?;

    let tree = parser
        .parse(text, None)
        .ok_or_else(|| MergeError::grammar("parser produced no tree"))?;

    let root = tree.root_node();
    if root.has_error() {
        let line = first_error_row(root).unwrap_or(0) + 1;
        return Err(MergeError::parse(origin, line));
    }

    Ok(tree)
}

/// Row of the first error or missing node, depth-first.
fn first_error_row(node: Node) -> Option<usize> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_position().row);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(row) = first_error_row(child) {
            return Some(row);
        }
    }
    None
}
