//! Data model for the merge pipeline — parser-agnostic.

use std::fmt;

/// Which of the two inputs a tree or definition came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeOrigin {
    /// Implementation file (`.py`), the docstring donor.
    Source,
    /// Interface stub (`.pyi`), the docstring recipient.
    Stub,
}

impl fmt::Display for TreeOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeOrigin::Source => write!(f, "source"),
            TreeOrigin::Stub => write!(f, "stub"),
        }
    }
}

/// A contiguous byte range of input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bytes {}..{}", self.start, self.end)
    }
}

/// Kind of a documentable symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefKind {
    Module,
    Class,
    Function,
    Attribute,
}

/// One parameter of a function signature fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub has_default: bool,
    pub is_variadic: bool,
}

/// Ordered parameter fingerprint used to disambiguate overloads.
///
/// Bare `*` and `/` separators participate as markers so keyword-only
/// and positional-only overloads fingerprint differently.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Signature {
    pub params: Vec<Param>,
}

impl Signature {
    /// Number of entries, separators included.
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// Where a docstring can be added for a stub node that has none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertPoint {
    /// Very top of the stub text (module docstring).
    ModuleTop,
    /// Start of the first statement of an indented body.
    BlockStart { at: usize, indent: String },
    /// Header-only definition (`def f(): ...`): the inline body is
    /// replaced by a docstring plus the original body on the next line.
    InlineBody {
        span: Span,
        indent: String,
        body: String,
    },
    /// End of the line holding an attribute declaration.
    AfterNode { at: usize, indent: String },
}

/// One documentable symbol found by the tree walker.
#[derive(Debug, Clone)]
pub struct Definition {
    /// Names from the module root down to this symbol; empty for the
    /// module itself. A child's path is its parent's path plus its own
    /// name — the walker's stack guarantees this.
    pub path: Vec<String>,
    pub kind: DefKind,
    /// Present for functions only.
    pub signature: Option<Signature>,
    /// Carries a `@property` / `@x.setter`-style decorator.
    pub is_property: bool,
    /// Raw docstring literal, quotes included, if the node has one.
    pub docstring: Option<String>,
    /// Byte range of the existing docstring statement, if any.
    pub doc_span: Option<Span>,
    /// Where a docstring would be inserted when none is present.
    pub insert: InsertPoint,
}

impl Definition {
    /// Dotted path for map keys and diagnostics; `<module>` for the root.
    pub fn display_path(&self) -> String {
        if self.path.is_empty() {
            "<module>".to_string()
        } else {
            self.path.join(".")
        }
    }

    /// Map key shared by all symbols at the same qualified path.
    pub fn path_key(&self) -> String {
        self.path.join(".")
    }
}

/// Pairing of one stub definition with at most one source definition,
/// both as indices into the walker's definition lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchPair {
    pub stub: usize,
    pub source: Option<usize>,
}

/// Whether existing stub docstrings may be replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// Never touch a non-empty stub docstring (default).
    #[default]
    KeepExisting,
    /// Replace a stub docstring when the source text differs. An absent
    /// source docstring still never removes stub content.
    Overwrite,
}

/// A single planned change to the stub text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    Insert { at: usize, text: String },
    Replace { span: Span, text: String },
}

impl EditOp {
    pub fn start(&self) -> usize {
        match self {
            EditOp::Insert { at, .. } => *at,
            EditOp::Replace { span, .. } => span.start,
        }
    }

    pub fn end(&self) -> usize {
        match self {
            EditOp::Insert { at, .. } => *at,
            EditOp::Replace { span, .. } => span.end,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            EditOp::Insert { text, .. } | EditOp::Replace { text, .. } => text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_display() {
        assert_eq!(Span::new(3, 9).to_string(), "bytes 3..9");
    }

    #[test]
    fn signature_equality_is_exact() {
        let a = Signature {
            params: vec![Param {
                name: "x".into(),
                has_default: false,
                is_variadic: false,
            }],
        };
        let b = Signature {
            params: vec![Param {
                name: "x".into(),
                has_default: true,
                is_variadic: false,
            }],
        };
        assert_ne!(a, b);
        assert_eq!(a.arity(), 1);
    }

    #[test]
    fn edit_op_bounds() {
        let ins = EditOp::Insert {
            at: 5,
            text: "x".into(),
        };
        assert_eq!(ins.start(), 5);
        assert_eq!(ins.end(), 5);

        let rep = EditOp::Replace {
            span: Span::new(2, 7),
            text: "y".into(),
        };
        assert_eq!(rep.start(), 2);
        assert_eq!(rep.end(), 7);
    }
}
