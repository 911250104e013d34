//! stubdoc — merge docstrings from Python sources into interface stubs.
//!
//! Takes an implementation module (`.py`) and its interface-only stub
//! (`.pyi`) and re-emits the stub with the implementation's docstrings
//! attached to the matching symbols. The pipeline is a straight line:
//!
//! 1. **parse** — both texts through tree-sitter (black box)
//! 2. **walk** — each tree into a flat, ordered definition list
//! 3. **match** — stub definitions to source definitions by qualified
//!    path, signature-aware for overloads
//! 4. **merge** — decide per pair whether a docstring is inserted,
//!    replaced, or left alone
//! 5. **write** — splice the edits into the original stub text,
//!    touching nothing outside them
//!
//! Hand-written stub docstrings are preserved by default; pass
//! [`MergePolicy::Overwrite`] to replace ones that drifted from the
//! source. The merge is a pure text-to-text transform: no state
//! survives a call, and concurrent calls do not interact.

pub mod docstring;
pub mod error;
pub mod matcher;
pub mod merger;
pub mod model;
pub mod parse;
pub mod walker;
pub mod writer;

pub use error::{MergeError, Result};
pub use model::{DefKind, Definition, EditOp, MatchPair, MergePolicy, Span, TreeOrigin};

/// Merge the source module's docstrings into the stub text.
///
/// Returns the merged stub; everything outside the inserted or replaced
/// docstring spans is byte-identical to the input stub.
pub fn merge_stub(source_text: &str, stub_text: &str, policy: MergePolicy) -> Result<String> {
    let source_tree = parse::parse_module(source_text, TreeOrigin::Source)?;
    let stub_tree = parse::parse_module(stub_text, TreeOrigin::Stub)?;

    let source_defs = walker::walk(&source_tree, source_text, TreeOrigin::Source);
    let stub_defs = walker::walk(&stub_tree, stub_text, TreeOrigin::Stub);

    let pairs = matcher::match_definitions(&stub_defs, &source_defs);
    let edits = merger::plan_edits(&pairs, &stub_defs, &source_defs, stub_text, policy);
    writer::apply_edits(stub_text, edits)
}
