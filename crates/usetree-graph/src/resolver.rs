//! Module specifier resolution.

use std::path::{Component, Path, PathBuf};

use compact_str::CompactString;
use tracing::debug;

use crate::tsconfig::TsPaths;

const NODE_BUILTINS: &[&str] = &[
    "assert",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "domain",
    "events",
    "fs",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "repl",
    "stream",
    "string_decoder",
    "sys",
    "timers",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

/// Check if a specifier names a Node.js core module (`fs`, `node:fs`, `fs/promises`).
pub fn is_node_builtin(specifier: &str) -> bool {
    if specifier.starts_with("node:") {
        return true;
    }
    let head = specifier.split('/').next().unwrap_or(specifier);
    NODE_BUILTINS.contains(&head)
}

/// Outcome of resolving one specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A source file on disk.
    File(PathBuf),
    /// A package import, placed under the vendor directory. Never read.
    Vendored(PathBuf),
    /// A Node.js core module; not part of the graph.
    Builtin,
    /// Nothing matched.
    Unresolved,
}

/// Resolves import specifiers relative to the importing file.
#[derive(Debug, Clone)]
pub struct ImportResolver {
    directory: PathBuf,
    extensions: Vec<CompactString>,
    vendor_dir: CompactString,
    ts_paths: Option<TsPaths>,
}

impl ImportResolver {
    /// Create a resolver rooted at `directory`.
    pub fn new(
        directory: impl Into<PathBuf>,
        extensions: Vec<CompactString>,
        vendor_dir: impl Into<CompactString>,
    ) -> Self {
        Self {
            directory: directory.into(),
            extensions,
            vendor_dir: vendor_dir.into(),
            ts_paths: None,
        }
    }

    /// Also resolve through `tsconfig.json` `baseUrl` and `paths`.
    pub fn with_ts_paths(mut self, ts_paths: TsPaths) -> Self {
        self.ts_paths = Some(ts_paths);
        self
    }

    /// Check if a path lies under the vendor directory.
    pub fn is_vendored(&self, path: &Path) -> bool {
        path.components().any(|c| match c {
            Component::Normal(segment) => segment.to_str() == Some(self.vendor_dir.as_str()),
            _ => false,
        })
    }

    /// Check if a file should be scanned for further imports.
    pub fn is_parseable(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }

    /// Resolve `specifier` as imported from a file in `from_dir`.
    pub fn resolve(&self, from_dir: &Path, specifier: &str) -> Resolution {
        if is_relative(specifier) {
            return self
                .find_file(&from_dir.join(specifier))
                .map_or(Resolution::Unresolved, Resolution::File);
        }

        if is_node_builtin(specifier) {
            return Resolution::Builtin;
        }

        if let Some(ts_paths) = &self.ts_paths {
            for candidate in ts_paths.candidates(specifier) {
                if let Some(found) = self.find_file(&candidate) {
                    debug!(specifier, path = %found.display(), "resolved through tsconfig");
                    return Resolution::File(found);
                }
            }
        }

        if is_bare(specifier) {
            return Resolution::Vendored(self.directory.join(self.vendor_dir.as_str()).join(specifier));
        }
        Resolution::Unresolved
    }

    /// Try the path as-is, with each extension appended, with a TypeScript
    /// source behind a `.js` specifier, and as a directory index.
    fn find_file(&self, candidate: &Path) -> Option<PathBuf> {
        if candidate.is_file() {
            return Some(canonical(candidate));
        }

        let mut with_ext = candidate.as_os_str().to_owned();
        for ext in &self.extensions {
            with_ext.push(".");
            with_ext.push(ext.as_str());
            let path = PathBuf::from(&with_ext);
            if path.is_file() {
                return Some(canonical(&path));
            }
            with_ext = candidate.as_os_str().to_owned();
        }

        if let Some(found) = self.find_ts_source(candidate) {
            return Some(found);
        }

        if candidate.is_dir() {
            for ext in &self.extensions {
                let index = candidate.join(format!("index.{ext}"));
                if index.is_file() {
                    return Some(canonical(&index));
                }
            }
        }
        None
    }

    fn find_ts_source(&self, candidate: &Path) -> Option<PathBuf> {
        let ext = candidate.extension()?.to_str()?;
        let alternatives: &[&str] = match ext {
            "js" => &["ts", "tsx"],
            "jsx" => &["tsx"],
            "mjs" => &["mts"],
            "cjs" => &["cts"],
            _ => return None,
        };
        alternatives
            .iter()
            .map(|alt| candidate.with_extension(alt))
            .find(|path| path.is_file())
            .map(|path| canonical(&path))
    }
}

fn is_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
        || specifier.starts_with('/')
}

fn is_bare(specifier: &str) -> bool {
    !specifier.is_empty() && !specifier.contains(':') && !specifier.starts_with('#')
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
