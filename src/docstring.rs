//! Docstring extraction — literal decoding and whitespace normalization.
//!
//! Docstring internals (parameter sections, return blocks, …) are opaque
//! text to this module; only the surrounding quotes and indentation are
//! interpreted.

use regex::Regex;
use std::sync::LazyLock;

// Opening of a Python string literal: optional r/b/u/f prefix, then one
// of the four quote styles. The closing quote mirrors the opening one.
static RE_OPENING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^(?i)(?:[rbuf]{1,2})?("""|'''|"|')"#).unwrap());

/// Strip prefix and quotes from a string literal, leaving the body text.
///
/// The body is not unescaped — it is re-emitted between triple quotes
/// later, so escape sequences keep their original meaning.
pub fn decode_literal(raw: &str) -> &str {
    match RE_OPENING.captures(raw) {
        Some(caps) => {
            let quote = caps.get(1).expect("quote group");
            let body = &raw[quote.end()..];
            body.strip_suffix(quote.as_str()).unwrap_or(body)
        }
        None => raw.trim(),
    }
}

/// Normalize a raw docstring literal for comparison and re-insertion.
///
/// The first line is trimmed; continuation lines are dedented to their
/// minimum common leading whitespace; leading and trailing blank lines
/// are dropped; interior blank lines stay. Returns `None` when nothing
/// but whitespace remains.
pub fn normalize(raw: &str) -> Option<String> {
    let decoded = decode_literal(raw);
    let lines: Vec<&str> = decoded.lines().collect();

    let first = lines.first().map_or("", |l| l.trim());
    let rest = lines.get(1..).unwrap_or(&[]);

    let margin = rest
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    out.push(first.to_string());
    for line in rest {
        if line.trim().is_empty() {
            out.push(String::new());
        } else {
            out.push(line[margin.min(line.len())..].trim_end().to_string());
        }
    }

    while out.first().is_some_and(|l| l.is_empty()) {
        out.remove(0);
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }

    if out.is_empty() {
        None
    } else {
        Some(out.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decode_triple_double() {
        assert_eq!(decode_literal("\"\"\"hello\"\"\""), "hello");
    }

    #[test]
    fn decode_triple_single() {
        assert_eq!(decode_literal("'''hello'''"), "hello");
    }

    #[test]
    fn decode_single_quotes() {
        assert_eq!(decode_literal("'hi'"), "hi");
        assert_eq!(decode_literal("\"hi\""), "hi");
    }

    #[test]
    fn decode_prefixed_literal() {
        assert_eq!(decode_literal("r\"\"\"raw\\path\"\"\""), "raw\\path");
        assert_eq!(decode_literal("Rb'''bytes'''"), "bytes");
        assert_eq!(decode_literal("u\"text\""), "text");
    }

    #[test]
    fn normalize_single_line() {
        assert_eq!(
            normalize("\"\"\"  hello there  \"\"\"").as_deref(),
            Some("hello there")
        );
    }

    #[test]
    fn normalize_dedents_continuation_lines() {
        let raw = "\"\"\"First line.\n\n        Second block.\n            Indented deeper.\n        \"\"\"";
        assert_eq!(
            normalize(raw).as_deref(),
            Some("First line.\n\nSecond block.\n    Indented deeper.")
        );
    }

    #[test]
    fn normalize_strips_leading_and_trailing_blanks() {
        let raw = "\"\"\"\n\n    body\n\n\n\"\"\"";
        assert_eq!(normalize(raw).as_deref(), Some("body"));
    }

    #[test]
    fn normalize_keeps_interior_blank_lines() {
        let raw = "\"\"\"a\n\n    b\"\"\"";
        assert_eq!(normalize(raw).as_deref(), Some("a\n\nb"));
    }

    #[test]
    fn normalize_empty_is_none() {
        assert_eq!(normalize("\"\"\"\"\"\""), None);
        assert_eq!(normalize("\"\"\"   \n   \"\"\""), None);
    }

    #[test]
    fn normalize_is_quote_style_neutral() {
        assert_eq!(normalize("'''doc'''"), normalize("\"\"\"doc\"\"\""));
    }
}
