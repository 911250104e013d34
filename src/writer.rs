//! Writer — splices planned edits into the original stub text.
//!
//! Edits are applied in descending start order so earlier splices never
//! shift the offsets of the ones still pending. Everything outside the
//! edited spans is copied through byte-for-byte.

use crate::error::{MergeError, Result};
use crate::model::{EditOp, Span};

/// Apply all edits to the stub text and return the merged result.
///
/// Upstream invariants guarantee the edits are disjoint (one edit per
/// stub node, nodes do not share spans); an overlap here is an internal
/// inconsistency and fails with [`MergeError::SpanConflict`] rather
/// than producing corrupt output.
pub fn apply_edits(text: &str, mut ops: Vec<EditOp>) -> Result<String> {
    ops.sort_by(|a, b| b.start().cmp(&a.start()));

    let mut out = text.to_string();
    let mut previous: Option<Span> = None;
    for op in ops {
        if let Some(prev) = previous {
            if op.end() > prev.start {
                return Err(MergeError::SpanConflict {
                    first: Span::new(op.start(), op.end()),
                    second: prev,
                });
            }
        }
        previous = Some(Span::new(op.start(), op.end()));
        out.replace_range(op.start()..op.end(), op.text());
    }

    Ok(out)
}
