//! Merger — turns match pairs into edit operations against the stub.
//!
//! Policy per pair: an absent source docstring is always a no-op (stub
//! content is never removed or fabricated); an existing non-empty stub
//! docstring is kept unless the policy allows overwriting; otherwise
//! the normalized source docstring is inserted at the node's insertion
//! point, re-indented to the body indentation.

use crate::docstring;
use crate::model::{Definition, EditOp, InsertPoint, MatchPair, MergePolicy};

/// Plan the edits for one merged stub. Nodes without a change
/// contribute nothing; each node contributes at most one edit.
pub fn plan_edits(
    pairs: &[MatchPair],
    stub_defs: &[Definition],
    source_defs: &[Definition],
    stub_text: &str,
    policy: MergePolicy,
) -> Vec<EditOp> {
    let mut ops = Vec::new();

    for pair in pairs {
        let Some(source_idx) = pair.source else {
            continue;
        };
        let Some(doc) = source_defs[source_idx]
            .docstring
            .as_deref()
            .and_then(docstring::normalize)
        else {
            continue;
        };

        let stub = &stub_defs[pair.stub];
        let op = match stub.doc_span {
            Some(span) => {
                let existing = stub.docstring.as_deref().and_then(docstring::normalize);
                match existing {
                    // Non-empty stub docstring: hand-authored docs win
                    // unless overwriting was requested.
                    Some(existing) => {
                        if policy == MergePolicy::Overwrite && existing != doc {
                            let indent = line_indent(stub_text, span.start);
                            Some(EditOp::Replace {
                                span,
                                text: render_docstring(&doc, &indent, false),
                            })
                        } else {
                            None
                        }
                    }
                    // Whitespace-only placeholder literal: replace it.
                    None => {
                        let indent = line_indent(stub_text, span.start);
                        Some(EditOp::Replace {
                            span,
                            text: render_docstring(&doc, &indent, false),
                        })
                    }
                }
            }
            None => Some(insert_op(stub, &doc)),
        };

        if let Some(op) = op {
            log::debug!("documenting {}", stub.display_path());
            ops.push(op);
        }
    }

    ops
}

/// Build the insert/replace op for a stub node with no docstring.
fn insert_op(stub: &Definition, doc: &str) -> EditOp {
    match &stub.insert {
        InsertPoint::ModuleTop => EditOp::Insert {
            at: 0,
            text: format!("{}\n", render_docstring(doc, "", true)),
        },
        InsertPoint::BlockStart { at, indent } => EditOp::Insert {
            at: *at,
            text: format!("{}\n{indent}", render_docstring(doc, indent, false)),
        },
        InsertPoint::InlineBody { span, indent, body } => EditOp::Replace {
            span: *span,
            text: format!("\n{}\n{indent}{body}", render_docstring(doc, indent, true)),
        },
        InsertPoint::AfterNode { at, indent } => EditOp::Insert {
            at: *at,
            text: format!("\n{}", render_docstring(doc, indent, true)),
        },
    }
}

/// Render normalized docstring text as a triple-quoted literal at the
/// given indentation. `indent_first` is false when the edit lands at an
/// already-indented column.
fn render_docstring(text: &str, indent: &str, indent_first: bool) -> String {
    let safe = text.replace("\"\"\"", "\\\"\\\"\\\"");
    let first_prefix = if indent_first { indent } else { "" };

    // A literal ending in a quote or backslash cannot close on the same
    // line; fall through to the multi-line form.
    if !safe.contains('\n') && !safe.ends_with('"') && !safe.ends_with('\\') {
        return format!("{first_prefix}\"\"\"{safe}\"\"\"");
    }

    let mut out = String::new();
    out.push_str(first_prefix);
    out.push_str("\"\"\"");
    let mut lines = safe.lines();
    if let Some(first) = lines.next() {
        out.push_str(first);
    }
    for line in lines {
        out.push('\n');
        if !line.is_empty() {
            out.push_str(indent);
            out.push_str(line);
        }
    }
    out.push('\n');
    out.push_str(indent);
    out.push_str("\"\"\"");
    out
}

/// Leading text of the line containing `offset` — the indentation of a
/// statement that starts there.
fn line_indent(text: &str, offset: usize) -> String {
    let line_start = text[..offset].rfind('\n').map_or(0, |i| i + 1);
    text[line_start..offset].to_string()
}
