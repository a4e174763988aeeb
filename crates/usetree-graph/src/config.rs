//! Graph construction configuration.

use std::path::PathBuf;

use compact_str::CompactString;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Configuration for building an import graph from source files.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct GraphConfig {
    /// Entry file, relative to `directory` unless absolute.
    pub entry: PathBuf,

    /// Project directory (resolution root for packages and tsconfig).
    #[builder(default = "PathBuf::from(\".\")")]
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// Explicit `tsconfig.json`; `<directory>/tsconfig.json` is used when present.
    #[builder(default)]
    #[serde(default)]
    pub ts_config: Option<PathBuf>,

    /// File extensions tried during resolution and scanned for imports.
    #[builder(default = "default_extensions()")]
    #[serde(default = "default_extensions")]
    pub extensions: Vec<CompactString>,

    /// Directory that bare package specifiers resolve into.
    #[builder(default = "default_vendor_dir()")]
    #[serde(default = "default_vendor_dir")]
    pub vendor_dir: CompactString,
}

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_extensions() -> Vec<CompactString> {
    ["ts", "tsx", "js", "jsx", "mjs", "cjs", "mts", "cts"]
        .into_iter()
        .map(CompactString::const_new)
        .collect()
}

fn default_vendor_dir() -> CompactString {
    CompactString::const_new("node_modules")
}

impl GraphConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref entry) = self.entry {
            if entry.as_os_str().is_empty() {
                return Err("Entry point cannot be empty".to_string());
            }
        }
        if let Some(ref extensions) = self.extensions {
            if extensions.is_empty() {
                return Err("At least one extension is required".to_string());
            }
            if let Some(ext) = extensions.iter().find(|e| e.starts_with('.')) {
                return Err(format!("Extensions are given without a dot: {ext}"));
            }
        }
        if let Some(ref vendor_dir) = self.vendor_dir {
            if vendor_dir.is_empty() {
                return Err("Vendor directory cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

impl GraphConfig {
    /// Create a new config builder.
    pub fn builder() -> GraphConfigBuilder {
        GraphConfigBuilder::default()
    }

    /// Create a config with defaults for the given entry.
    pub fn new(entry: impl Into<PathBuf>) -> Self {
        Self {
            entry: entry.into(),
            directory: default_directory(),
            ts_config: None,
            extensions: default_extensions(),
            vendor_dir: default_vendor_dir(),
        }
    }

    /// Entry path joined onto the project directory.
    pub fn entry_path(&self) -> PathBuf {
        self.directory.join(&self.entry)
    }

    /// The tsconfig to load, if any.
    pub fn ts_config_path(&self) -> Option<PathBuf> {
        match &self.ts_config {
            Some(path) => Some(self.directory.join(path)),
            None => {
                let implicit = self.directory.join("tsconfig.json");
                implicit.is_file().then_some(implicit)
            }
        }
    }
}
