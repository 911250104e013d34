//! Tree walker — flattens a parsed module into documentable definitions.
//!
//! Emits modules, classes, functions/methods, and annotated attribute
//! declarations in pre-order declaration order, with qualified paths,
//! signature fingerprints, existing-docstring spans, and insertion
//! points. Statement shapes it does not recognize are skipped; the walk
//! itself never fails on a syntactically valid tree.

use crate::model::{DefKind, Definition, InsertPoint, Param, Signature, Span, TreeOrigin};
use tree_sitter::{Node, Tree};

/// Indentation added to a definition's own column for a synthesized body.
const BODY_INDENT: usize = 4;

/// Walk a parsed module and return its definitions, module root first.
pub fn walk(tree: &Tree, text: &str, origin: TreeOrigin) -> Vec<Definition> {
    let root = tree.root_node();
    let mut walker = Walker {
        text,
        origin,
        defs: Vec::new(),
    };

    let (docstring, doc_span) = match docstring_statement(root, text) {
        Some((raw, span)) => (Some(raw), Some(span)),
        None => (None, None),
    };
    walker.defs.push(Definition {
        path: Vec::new(),
        kind: DefKind::Module,
        signature: None,
        is_property: false,
        docstring,
        doc_span,
        insert: InsertPoint::ModuleTop,
    });

    let mut path = Vec::new();
    walker.walk_container(root, &mut path, Scope::Module);
    walker.defs
}

/// Lexical scope of the statements currently being walked.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Scope {
    Module,
    Class,
    Function,
}

struct Walker<'a> {
    text: &'a str,
    origin: TreeOrigin,
    defs: Vec<Definition>,
}

impl<'a> Walker<'a> {
    fn walk_container(&mut self, container: Node, path: &mut Vec<String>, scope: Scope) {
        let stmts = statements(container);
        for (i, stmt) in stmts.iter().enumerate() {
            match stmt.kind() {
                "function_definition" => self.on_function(*stmt, &[], path),
                "class_definition" => self.on_class(*stmt, path),
                "decorated_definition" => {
                    let decorators = decorator_names(*stmt, self.text);
                    let Some(inner) = stmt.child_by_field_name("definition") else {
                        continue;
                    };
                    match inner.kind() {
                        "function_definition" => self.on_function(inner, &decorators, path),
                        "class_definition" => self.on_class(inner, path),
                        _ => {}
                    }
                }
                "expression_statement" if scope != Scope::Function => {
                    self.on_maybe_attribute(*stmt, stmts.get(i + 1).copied(), path);
                }
                _ => {}
            }
        }
    }

    fn on_function(&mut self, node: Node, decorators: &[String], path: &mut Vec<String>) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let Some(body) = node.child_by_field_name("body") else {
            return;
        };
        let name = self.slice(name_node).to_string();
        let signature = node
            .child_by_field_name("parameters")
            .map(|p| signature_of(p, self.text));

        path.push(name);
        let (docstring, doc_span, insert) = self.body_layout(node, body);
        self.defs.push(Definition {
            path: path.clone(),
            kind: DefKind::Function,
            signature,
            is_property: is_property_decorator(decorators),
            docstring,
            doc_span,
            insert,
        });
        // Stubs carry no executable bodies, so nested defs only exist on
        // the source side; they never match anything the stub lacks.
        if self.origin == TreeOrigin::Source {
            self.walk_container(body, path, Scope::Function);
        }
        path.pop();
    }

    fn on_class(&mut self, node: Node, path: &mut Vec<String>) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let Some(body) = node.child_by_field_name("body") else {
            return;
        };
        let name = self.slice(name_node).to_string();

        path.push(name);
        let (docstring, doc_span, insert) = self.body_layout(node, body);
        self.defs.push(Definition {
            path: path.clone(),
            kind: DefKind::Class,
            signature: None,
            is_property: false,
            docstring,
            doc_span,
            insert,
        });
        self.walk_container(body, path, Scope::Class);
        path.pop();
    }

    /// Assignment statements only count as attributes when they carry an
    /// explicit type annotation and a plain-identifier target.
    fn on_maybe_attribute(&mut self, stmt: Node, next: Option<Node>, path: &mut Vec<String>) {
        let Some(expr) = named_non_comment_child(stmt, 0) else {
            return;
        };
        if expr.kind() != "assignment" || expr.child_by_field_name("type").is_none() {
            return;
        }
        let Some(left) = expr.child_by_field_name("left") else {
            return;
        };
        if left.kind() != "identifier" {
            return;
        }

        // Attribute docstrings trail the declaration as a bare string
        // statement on the following line.
        let (docstring, doc_span) = match next.and_then(|n| string_statement(n, self.text)) {
            Some((raw, span)) => (Some(raw), Some(span)),
            None => (None, None),
        };

        path.push(self.slice(left).to_string());
        self.defs.push(Definition {
            path: path.clone(),
            kind: DefKind::Attribute,
            signature: None,
            is_property: false,
            docstring,
            doc_span,
            insert: InsertPoint::AfterNode {
                at: line_end(self.text, stmt.end_byte()),
                indent: " ".repeat(stmt.start_position().column),
            },
        });
        path.pop();
    }

    /// Existing docstring plus the insertion point for a def/class body.
    fn body_layout(
        &self,
        def_node: Node,
        body: Node,
    ) -> (Option<String>, Option<Span>, InsertPoint) {
        if let Some((raw, span)) = docstring_statement(body, self.text) {
            let insert = InsertPoint::BlockStart {
                at: span.start,
                indent: " ".repeat(def_node.start_position().column + BODY_INDENT),
            };
            return (Some(raw), Some(span), insert);
        }

        let indent = " ".repeat(def_node.start_position().column + BODY_INDENT);
        if let Some(colon_end) = inline_colon_end(def_node, body) {
            // Replace from just after the colon so the spacing before
            // the inline body goes away with it.
            let insert = InsertPoint::InlineBody {
                span: Span::new(colon_end, body.end_byte()),
                indent,
                body: self.text[body.start_byte()..body.end_byte()].to_string(),
            };
            return (None, None, insert);
        }

        let insert = match statements(body).first() {
            Some(first) => InsertPoint::BlockStart {
                at: first.start_byte(),
                indent: " ".repeat(first.start_position().column),
            },
            None => InsertPoint::BlockStart {
                at: body.start_byte(),
                indent,
            },
        };
        (None, None, insert)
    }

    fn slice(&self, node: Node) -> &'a str {
        &self.text[node.start_byte()..node.end_byte()]
    }
}

/// Named statements of a block or module, comments dropped.
fn statements(container: Node) -> Vec<Node> {
    let mut cursor = container.walk();
    container
        .named_children(&mut cursor)
        .filter(|n| n.kind() != "comment")
        .collect()
}

fn named_non_comment_child(node: Node, index: usize) -> Option<Node> {
    let mut cursor = node.walk();
    let result = node
        .named_children(&mut cursor)
        .filter(|n| n.kind() != "comment")
        .nth(index);
    result
}

/// Docstring in first-statement position of a block or module.
fn docstring_statement(container: Node, text: &str) -> Option<(String, Span)> {
    string_statement(*statements(container).first()?, text)
}

/// A bare string expression statement, as raw literal text plus the span
/// of the whole statement.
fn string_statement(stmt: Node, text: &str) -> Option<(String, Span)> {
    if stmt.kind() != "expression_statement" {
        return None;
    }
    let expr = named_non_comment_child(stmt, 0)?;
    if expr.kind() != "string" && expr.kind() != "concatenated_string" {
        return None;
    }
    Some((
        text[expr.start_byte()..expr.end_byte()].to_string(),
        Span::new(stmt.start_byte(), stmt.end_byte()),
    ))
}

/// End byte of the header colon when the body starts on the same line
/// (`def f(): ...`), else `None`.
fn inline_colon_end(def_node: Node, body: Node) -> Option<usize> {
    let mut colon = None;
    let mut cursor = def_node.walk();
    for child in def_node.children(&mut cursor) {
        if child.kind() == ":" {
            colon = Some(child);
        }
    }
    let colon = colon?;
    (colon.end_position().row == body.start_position().row).then(|| colon.end_byte())
}

/// Decorator names without the `@` or call arguments.
fn decorator_names(decorated: Node, text: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut cursor = decorated.walk();
    for child in decorated.children(&mut cursor) {
        if child.kind() != "decorator" {
            continue;
        }
        let raw = text[child.start_byte()..child.end_byte()]
            .trim_start_matches('@')
            .trim();
        let name = raw.split('(').next().unwrap_or(raw).trim();
        names.push(name.to_string());
    }
    names
}

fn is_property_decorator(decorators: &[String]) -> bool {
    decorators.iter().any(|d| {
        d == "property"
            || d.ends_with(".setter")
            || d.ends_with(".getter")
            || d.ends_with(".deleter")
    })
}

/// Parameter fingerprint of a `parameters` node.
fn signature_of(params: Node, text: &str) -> Signature {
    let mut out = Vec::new();
    let mut cursor = params.walk();
    for child in params.named_children(&mut cursor) {
        let param = match child.kind() {
            "identifier" => Some(plain_param(&text[child.start_byte()..child.end_byte()])),
            "typed_parameter" => first_identifier(child, text).map(|(name, variadic)| Param {
                name,
                has_default: false,
                is_variadic: variadic,
            }),
            "default_parameter" | "typed_default_parameter" => child
                .child_by_field_name("name")
                .map(|n| &text[n.start_byte()..n.end_byte()])
                .map(|name| Param {
                    name: name.to_string(),
                    has_default: true,
                    is_variadic: false,
                }),
            "list_splat_pattern" | "dictionary_splat_pattern" => {
                first_identifier(child, text).map(|(name, _)| Param {
                    name,
                    has_default: false,
                    is_variadic: true,
                })
            }
            "keyword_separator" => Some(plain_param("*")),
            "positional_separator" => Some(plain_param("/")),
            _ => None,
        };
        if let Some(param) = param {
            out.push(param);
        }
    }
    Signature { params: out }
}

fn plain_param(name: &str) -> Param {
    Param {
        name: name.to_string(),
        has_default: false,
        is_variadic: false,
    }
}

/// Innermost identifier of a (possibly splat-wrapped) parameter node,
/// plus whether it was behind `*`/`**`.
fn first_identifier(node: Node, text: &str) -> Option<(String, bool)> {
    if node.kind() == "identifier" {
        return Some((text[node.start_byte()..node.end_byte()].to_string(), false));
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "identifier" => {
                return Some((
                    text[child.start_byte()..child.end_byte()].to_string(),
                    node.kind() != "typed_parameter",
                ))
            }
            "list_splat_pattern" | "dictionary_splat_pattern" => {
                return first_identifier(child, text).map(|(name, _)| (name, true));
            }
            _ => {}
        }
    }
    None
}

/// Offset of the end of the line containing `offset`.
fn line_end(text: &str, offset: usize) -> usize {
    text[offset..]
        .find('\n')
        .map_or(text.len(), |i| offset + i)
}
