//! Lexical scanning of C source text.
//!
//! Comment stripping, `#include` extraction and identifier collection are
//! regex based approximations. Macros are not expanded and conditional
//! compilation is ignored; extra identifiers picked up from keywords or
//! literals only add noise to an overlap measure.

use regex::{Captures, Regex};
use std::collections::HashSet;
use std::sync::LazyLock;

/// Matches a block comment (unterminated ones run to end of input) or a
/// line comment, whichever starts first.
static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?(?:\*/|\z)|//[^\n]*").unwrap());

/// `#include "name"` or `#include <name>`, with at most one whitespace
/// character after the directive.
static INCLUDE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"#include\s?(?:"(?P<quoted>[-\w.]+)"|<(?P<angled>[-\w.]+)>)"#).unwrap()
});

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").unwrap());

/// Removes line and block comments from C text.
///
/// Line comments are removed up to, not including, the newline. A block
/// comment becomes a single space instead of nothing, so the text on either
/// side never fuses: `a/**/b` scans as the two identifiers `a` and `b`, and
/// `a/**//b` cannot turn into the line comment `//b` on a second pass.
/// Stripping is therefore idempotent.
///
/// # Example
///
/// ```
/// use headerprobe::parser::strip_comments;
///
/// let text = "int a; // counter\n/* multi\n line */int b;";
/// assert_eq!(strip_comments(text), "int a; \n int b;");
/// ```
pub fn strip_comments(text: &str) -> String {
    COMMENT_RE
        .replace_all(text, |caps: &Captures| {
            if caps[0].starts_with("/*") {
                " "
            } else {
                ""
            }
        })
        .into_owned()
}

/// Returns the file names named by `#include` directives, in source order.
///
/// Names are literal: no search path is applied and duplicates are kept.
///
/// # Example
///
/// ```
/// use headerprobe::parser::parse_includes;
///
/// let text = "#include <stdio.h>\n#include\"list.h\"\n#include <stdio.h>\n";
/// assert_eq!(parse_includes(text), vec!["stdio.h", "list.h", "stdio.h"]);
/// ```
pub fn parse_includes(text: &str) -> Vec<String> {
    INCLUDE_RE
        .captures_iter(text)
        .filter_map(|caps| caps.name("quoted").or_else(|| caps.name("angled")))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Collects every run of word characters that has a non-word character on
/// both sides.
///
/// Tokens touching the very start or end of the text are not bounded on
/// that side and are left out.
pub fn extract_identifiers(text: &str) -> HashSet<String> {
    WORD_RE
        .find_iter(text)
        .filter(|m| m.start() > 0 && m.end() < text.len())
        .map(|m| m.as_str().to_string())
        .collect()
}
