//! Directive detection.
//!
//! A module declares a directive when its text, after at most one leading
//! single-line comment and any whitespace, starts with the string literal
//! `"use <name>"` (single or double quoted). This is a convention check on
//! the first statement, not a parse.

use std::path::{Component, Path};

use compact_str::CompactString;
use tracing::trace;
use usetree_core::{ClassifyConfig, ClassifyError, Property};

use crate::reader::SourceReader;

/// Check whether `text` declares `"use <directive>"`.
pub fn declares_directive(text: &str, directive: &str) -> bool {
    let rest = strip_leading_comment(text).trim_start_matches(is_leading_blank);
    let Some(quote) = rest.chars().next().filter(|c| *c == '"' || *c == '\'') else {
        return false;
    };
    rest[1..]
        .strip_prefix("use ")
        .and_then(|r| r.strip_prefix(directive))
        .is_some_and(|r| r.starts_with(quote))
}

fn is_leading_blank(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// Remove a `//` comment or a `/* ... */` comment closed on the first line.
fn strip_leading_comment(text: &str) -> &str {
    let line_end = text.find(['\n', '\r']).unwrap_or(text.len());
    let first_line = &text[..line_end];

    if first_line.starts_with("//") {
        return &text[line_end..];
    }
    if first_line.starts_with("/*") {
        // Greedy: the last `*/` on the line closes the comment.
        if let Some(close) = first_line[2..].rfind("*/") {
            return &text[2 + close + 2..];
        }
    }
    text
}

/// Resolves the own property of a module path.
#[derive(Debug, Clone)]
pub struct DirectiveDetector {
    /// Directive names in priority order, paired with their property.
    directives: Vec<(CompactString, Property)>,
    vendor_marker: CompactString,
}

impl DirectiveDetector {
    /// Create a detector for the default `client`/`server` directives.
    pub fn new() -> Self {
        Self::with_config(&ClassifyConfig::default())
    }

    /// Create a detector from a classification config.
    pub fn with_config(config: &ClassifyConfig) -> Self {
        Self {
            directives: config
                .directives
                .iter()
                .map(|name| (name.clone(), Property::directive(name.clone())))
                .collect(),
            vendor_marker: config.vendor_marker.clone(),
        }
    }

    /// Check if a path lies under the vendor marker segment.
    pub fn is_vendored(&self, path: &Path) -> bool {
        path.components().any(|c| match c {
            Component::Normal(segment) => segment.to_str() == Some(self.vendor_marker.as_str()),
            _ => false,
        })
    }

    /// Property declared by `text`, testing directives in priority order.
    pub fn detect(&self, text: &str) -> Property {
        self.directives
            .iter()
            .find(|(name, _)| declares_directive(text, name))
            .map_or(Property::None, |(_, property)| property.clone())
    }

    /// Resolve the own property of `path`.
    ///
    /// Vendored paths are answered structurally and never read. Read
    /// failures are returned as [`ClassifyError::FileAccess`].
    pub fn classify_path<R>(&self, path: &Path, reader: &R) -> Result<Property, ClassifyError>
    where
        R: SourceReader + ?Sized,
    {
        if self.is_vendored(path) {
            return Ok(Property::Vendored);
        }
        let text = reader.read(path).map_err(|e| ClassifyError::io(path, e))?;
        let property = self.detect(&text);
        trace!(path = %path.display(), %property, "classified module");
        Ok(property)
    }
}

impl Default for DirectiveDetector {
    fn default() -> Self {
        Self::new()
    }
}
