//! Lexical import specifier extraction.
//!
//! Finds the module specifiers of `import ... from`, side-effect imports,
//! `export ... from`, `require()` and literal dynamic `import()` calls.
//! Comments are blanked out first so commented-out imports are ignored.

use std::sync::LazyLock;

use regex::Regex;

static IMPORT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // import x from "y", import type { x } from "y", import * as x from "y"
        r#"\bimport\s+(?:type\s+)?[\w$*{},\s]*?\bfrom\s*["']([^"'\r\n]+)["']"#,
        // import "y"
        r#"\bimport\s*["']([^"'\r\n]+)["']"#,
        // export * from "y", export { x } from "y"
        r#"\bexport\s+(?:type\s+)?(?:\*(?:\s+as\s+[\w$]+)?|\{[^}]*\})\s*from\s*["']([^"'\r\n]+)["']"#,
        // require("y"), import("y")
        r#"\b(?:require|import)\s*\(\s*["']([^"'\r\n]+)["']\s*\)"#,
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("import pattern is valid"))
    .collect()
});

/// Extract import specifiers in source order, without duplicates.
pub fn extract_imports(source: &str) -> Vec<String> {
    let code = strip_comments(source);
    let mut found: Vec<(usize, &str)> = Vec::new();
    for pattern in IMPORT_PATTERNS.iter() {
        for caps in pattern.captures_iter(&code) {
            if let Some(spec) = caps.get(1) {
                found.push((spec.start(), spec.as_str()));
            }
        }
    }
    found.sort_by_key(|(offset, _)| *offset);

    let mut specifiers: Vec<String> = Vec::with_capacity(found.len());
    for (_, spec) in found {
        if !specifiers.iter().any(|s| s == spec) {
            specifiers.push(spec.to_string());
        }
    }
    specifiers
}

/// Replace `//` and `/* */` comments with spaces, leaving string literals
/// intact. Byte offsets and line breaks are preserved.
pub(crate) fn strip_comments(source: &str) -> String {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Code,
        Str(char),
        LineComment,
        BlockComment,
    }

    let mut out = String::with_capacity(source.len());
    let mut state = State::Code;
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            State::Code => match c {
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    out.push_str("  ");
                    state = State::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    out.push_str("  ");
                    state = State::BlockComment;
                }
                '"' | '\'' | '`' => {
                    out.push(c);
                    state = State::Str(c);
                }
                _ => out.push(c),
            },
            State::Str(quote) => {
                out.push(c);
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                } else if c == quote || (c == '\n' && quote != '`') {
                    state = State::Code;
                }
            }
            State::LineComment => {
                if c == '\n' || c == '\r' {
                    out.push(c);
                    state = State::Code;
                } else {
                    blank(&mut out, c);
                }
            }
            State::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    out.push_str("  ");
                    state = State::Code;
                } else if c == '\n' || c == '\r' {
                    out.push(c);
                } else {
                    blank(&mut out, c);
                }
            }
        }
    }
    out
}

fn blank(out: &mut String, c: char) {
    for _ in 0..c.len_utf8() {
        out.push(' ');
    }
}
