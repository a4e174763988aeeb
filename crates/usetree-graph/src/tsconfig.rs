//! `tsconfig.json` path aliases.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use usetree_core::GraphError;

use crate::imports::strip_comments;

static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",(\s*[}\]])").expect("trailing comma pattern is valid"));

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTsConfig {
    #[serde(default)]
    compiler_options: RawCompilerOptions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCompilerOptions {
    base_url: Option<String>,
    #[serde(default)]
    paths: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PathPattern {
    prefix: String,
    /// None for an exact alias without `*`.
    suffix: Option<String>,
    targets: Vec<String>,
}

impl PathPattern {
    fn parse(key: &str, targets: Vec<String>) -> Self {
        match key.split_once('*') {
            Some((prefix, suffix)) => Self {
                prefix: prefix.to_string(),
                suffix: Some(suffix.to_string()),
                targets,
            },
            None => Self {
                prefix: key.to_string(),
                suffix: None,
                targets,
            },
        }
    }

    /// Return the text matched by `*` (empty for exact aliases).
    fn matches<'s>(&self, specifier: &'s str) -> Option<&'s str> {
        match &self.suffix {
            None => (specifier == self.prefix).then_some(""),
            Some(suffix) => {
                let rest = specifier.strip_prefix(self.prefix.as_str())?;
                let star = rest.strip_suffix(suffix.as_str())?;
                Some(star)
            }
        }
    }
}

/// Module resolution settings from a `tsconfig.json`.
#[derive(Debug, Clone, Default)]
pub struct TsPaths {
    base_url: Option<PathBuf>,
    root: PathBuf,
    patterns: Vec<PathPattern>,
}

impl TsPaths {
    /// Read and parse a `tsconfig.json` file.
    ///
    /// Comments and trailing commas are accepted. `extends` is not followed.
    pub fn load(path: &Path) -> Result<Self, GraphError> {
        let text = fs::read_to_string(path).map_err(|e| GraphError::io(path, e))?;
        let root = path.parent().unwrap_or(Path::new(".")).to_path_buf();
        Self::parse(&text, root).map_err(|source| GraphError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse `tsconfig.json` text, resolving relative paths against `root`.
    pub fn parse(text: &str, root: impl Into<PathBuf>) -> Result<Self, serde_json::Error> {
        let cleaned = strip_comments(text);
        let cleaned = TRAILING_COMMA.replace_all(&cleaned, "$1");
        let raw: RawTsConfig = serde_json::from_str(&cleaned)?;
        let root = root.into();

        let base_url = raw.compiler_options.base_url.map(|b| root.join(b));
        let mut patterns: Vec<PathPattern> = raw
            .compiler_options
            .paths
            .into_iter()
            .map(|(key, value)| {
                let targets = match value {
                    serde_json::Value::Array(items) => items
                        .into_iter()
                        .filter_map(|t| t.as_str().map(str::to_string))
                        .collect(),
                    serde_json::Value::String(s) => vec![s],
                    _ => Vec::new(),
                };
                PathPattern::parse(&key, targets)
            })
            .collect();
        // Exact aliases first, then the longest prefix.
        patterns.sort_by(|a, b| {
            a.suffix
                .is_some()
                .cmp(&b.suffix.is_some())
                .then(b.prefix.len().cmp(&a.prefix.len()))
        });

        Ok(Self {
            base_url,
            root,
            patterns,
        })
    }

    /// Check if nothing would ever be resolved through this config.
    pub fn is_empty(&self) -> bool {
        self.base_url.is_none() && self.patterns.is_empty()
    }

    /// Candidate paths for a specifier, in lookup order.
    pub fn candidates(&self, specifier: &str) -> Vec<PathBuf> {
        let base = self.base_url.as_deref().unwrap_or(&self.root);
        let mut out = Vec::new();
        for pattern in &self.patterns {
            if let Some(star) = pattern.matches(specifier) {
                out.extend(
                    pattern
                        .targets
                        .iter()
                        .map(|target| base.join(target.replacen('*', star, 1))),
                );
            }
        }
        if let Some(base_url) = &self.base_url {
            out.push(base_url.join(specifier));
        }
        out
    }
}
