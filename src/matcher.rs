//! Matcher — pairs every stub definition with at most one source
//! definition.
//!
//! Pairing is driven by qualified path; same-path function groups
//! (overloads) are disambiguated by signature fingerprint with a
//! documented best-effort fallback. Each resolution rule lives in its
//! own policy function so a stricter strategy can replace it without
//! touching the rest of the pipeline.

use crate::model::{DefKind, Definition, MatchPair};
use std::collections::HashMap;

/// Produce one [`MatchPair`] per stub definition, in stub order.
///
/// A chosen source definition is consumed and cannot pair with a later
/// stub definition of the same path (first-match-wins).
pub fn match_definitions(stub_defs: &[Definition], source_defs: &[Definition]) -> Vec<MatchPair> {
    let mut by_path: HashMap<&str, Vec<usize>> = HashMap::new();
    let keys: Vec<String> = source_defs.iter().map(Definition::path_key).collect();
    for (i, key) in keys.iter().enumerate() {
        by_path.entry(key.as_str()).or_default().push(i);
    }

    let mut consumed = vec![false; source_defs.len()];
    let mut pairs = Vec::with_capacity(stub_defs.len());

    for (stub_idx, stub) in stub_defs.iter().enumerate() {
        let key = stub.path_key();
        let candidates: Vec<usize> = by_path
            .get(key.as_str())
            .map(|v| v.iter().copied().filter(|&i| !consumed[i]).collect())
            .unwrap_or_default();

        let chosen = match stub.kind {
            DefKind::Function => function_candidate(stub, &candidates, source_defs),
            DefKind::Attribute => attribute_candidate(&candidates, source_defs),
            DefKind::Module | DefKind::Class => {
                structural_candidate(stub.kind, &candidates, source_defs)
            }
        };

        match chosen {
            Some(idx) => consumed[idx] = true,
            None if candidates.is_empty() => {
                log::debug!(
                    "no source definition for {}; leaving stub untouched",
                    stub.display_path()
                );
            }
            None => {
                log::warn!(
                    "no usable source candidate for {} ({} same-path definitions of another kind)",
                    stub.display_path(),
                    candidates.len()
                );
            }
        }

        pairs.push(MatchPair {
            stub: stub_idx,
            source: chosen,
        });
    }

    pairs
}

/// Overload resolution for a stub function. Best effort, not exact:
/// when no fingerprint matches, the first same-path source function
/// wins and the ambiguity is logged.
fn function_candidate(
    stub: &Definition,
    candidates: &[usize],
    source_defs: &[Definition],
) -> Option<usize> {
    let fns: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|&i| source_defs[i].kind == DefKind::Function)
        .collect();

    match fns.as_slice() {
        [] => None,
        [only] => Some(*only),
        _ => {
            let matching: Vec<usize> = fns
                .iter()
                .copied()
                .filter(|&i| source_defs[i].signature == stub.signature)
                .collect();
            match matching.as_slice() {
                [exact] => Some(*exact),
                [] => {
                    log::warn!(
                        "no overload of {} matches the stub signature; \
                         falling back to the first in source order",
                        stub.display_path()
                    );
                    fns.first().copied()
                }
                [first, ..] => {
                    log::warn!(
                        "{} overloads of {} share the stub signature; \
                         taking the first in source order",
                        matching.len(),
                        stub.display_path()
                    );
                    Some(*first)
                }
            }
        }
    }
}

/// A stub attribute takes the first same-path source definition that is
/// an attribute or a property accessor — by convention the getter.
/// Best effort, not exact.
fn attribute_candidate(candidates: &[usize], source_defs: &[Definition]) -> Option<usize> {
    candidates.iter().copied().find(|&i| {
        let def = &source_defs[i];
        def.kind == DefKind::Attribute || (def.kind == DefKind::Function && def.is_property)
    })
}

/// Modules and classes match on path alone, preferring their own kind
/// when a same-named attribute shares the path.
fn structural_candidate(
    kind: DefKind,
    candidates: &[usize],
    source_defs: &[Definition],
) -> Option<usize> {
    candidates
        .iter()
        .copied()
        .find(|&i| source_defs[i].kind == kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TreeOrigin;
    use crate::parse::parse_module;
    use crate::walker;
    use pretty_assertions::assert_eq;

    fn defs(text: &str, origin: TreeOrigin) -> Vec<Definition> {
        let tree = parse_module(text, origin).unwrap();
        walker::walk(&tree, text, origin)
    }

    fn source_path_of(
        pair: &MatchPair,
        stub_defs: &[Definition],
        source_defs: &[Definition],
    ) -> (String, Option<String>) {
        (
            stub_defs[pair.stub].display_path(),
            pair.source.map(|i| source_defs[i].display_path()),
        )
    }

    #[test]
    fn pairs_by_qualified_path() {
        let source = defs(
            "class C:\n    def m(self):\n        pass\n\ndef f():\n    pass\n",
            TreeOrigin::Source,
        );
        let stub = defs(
            "class C:\n    def m(self): ...\n\ndef f() -> None: ...\n",
            TreeOrigin::Stub,
        );
        let pairs = match_definitions(&stub, &source);
        assert_eq!(pairs.len(), stub.len());
        for pair in &pairs {
            let (stub_path, source_path) = source_path_of(pair, &stub, &source);
            assert_eq!(Some(stub_path), source_path);
        }
    }

    #[test]
    fn unbacked_stub_symbol_matches_nothing() {
        let source = defs("def f():\n    pass\n", TreeOrigin::Source);
        let stub = defs("def f() -> None: ...\ndef reexported() -> None: ...\n", TreeOrigin::Stub);
        let pairs = match_definitions(&stub, &source);
        assert_eq!(pairs[2].source, None);
    }

    #[test]
    fn overloads_pair_by_signature_not_order() {
        let source = defs(
            "def f(a):\n    pass\n\ndef f(a, b):\n    pass\n",
            TreeOrigin::Source,
        );
        // Stub lists the two-argument overload first.
        let stub = defs("def f(a, b): ...\ndef f(a): ...\n", TreeOrigin::Stub);
        let pairs = match_definitions(&stub, &source);

        let two_arg = pairs[1].source.unwrap();
        let one_arg = pairs[2].source.unwrap();
        assert_eq!(source[two_arg].signature.as_ref().unwrap().arity(), 2);
        assert_eq!(source[one_arg].signature.as_ref().unwrap().arity(), 1);
    }

    #[test]
    fn unmatched_signature_falls_back_to_first_overload() {
        let source = defs(
            "def f(a):\n    pass\n\ndef f(a, b):\n    pass\n",
            TreeOrigin::Source,
        );
        let stub = defs("def f(x, y, z): ...\n", TreeOrigin::Stub);
        let pairs = match_definitions(&stub, &source);
        assert_eq!(
            pairs[1].source.map(|i| source[i].signature.as_ref().unwrap().arity()),
            Some(1)
        );
    }

    #[test]
    fn consumed_overloads_cannot_pair_twice() {
        let source = defs(
            "def f(a):\n    pass\n\ndef f(a):\n    pass\n",
            TreeOrigin::Source,
        );
        let stub = defs("def f(a): ...\ndef f(a): ...\n", TreeOrigin::Stub);
        let pairs = match_definitions(&stub, &source);
        let first = pairs[1].source.unwrap();
        let second = pairs[2].source.unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn stub_attribute_matches_property_getter() {
        let source = defs(
            "class C:\n    @property\n    def v(self):\n        \"\"\"Getter doc.\"\"\"\n        return 1\n    @v.setter\n    def v(self, x):\n        \"\"\"Setter doc.\"\"\"\n        pass\n",
            TreeOrigin::Source,
        );
        let stub = defs("class C:\n    v: int\n", TreeOrigin::Stub);
        let pairs = match_definitions(&stub, &source);
        let attr_pair = pairs
            .iter()
            .find(|p| stub[p.stub].kind == DefKind::Attribute)
            .unwrap();
        let chosen = &source[attr_pair.source.unwrap()];
        assert_eq!(
            chosen.docstring.as_deref(),
            Some("\"\"\"Getter doc.\"\"\"")
        );
    }

    #[test]
    fn stub_function_ignores_same_named_attribute() {
        let source = defs("v: int = 1\n", TreeOrigin::Source);
        let stub = defs("def v() -> int: ...\n", TreeOrigin::Stub);
        let pairs = match_definitions(&stub, &source);
        assert_eq!(pairs[1].source, None);
    }

    #[test]
    fn class_prefers_class_over_same_named_attribute() {
        // Attribute first in source order; the class must still win.
        let source = defs(
            "C: int = 0\n\nclass C:\n    \"\"\"Class doc.\"\"\"\n",
            TreeOrigin::Source,
        );
        let stub = defs("class C: ...\n", TreeOrigin::Stub);
        let pairs = match_definitions(&stub, &source);
        let chosen = &source[pairs[1].source.unwrap()];
        assert_eq!(chosen.kind, DefKind::Class);
    }

    #[test]
    fn module_roots_always_pair() {
        let source = defs("\"\"\"Doc.\"\"\"\n", TreeOrigin::Source);
        let stub = defs("x: int\n", TreeOrigin::Stub);
        let pairs = match_definitions(&stub, &source);
        assert_eq!(pairs[0].source, Some(0));
        assert_eq!(source[0].kind, DefKind::Module);
    }
}
