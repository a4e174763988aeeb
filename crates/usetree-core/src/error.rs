//! Error types for graph construction and classification.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that abort classification of a tree.
///
/// Nothing inside the classifier recovers from these: the first failure in
/// any branch surfaces to the caller and no partial tree is produced.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// A graph node was not the expected mapping of imports.
    #[error("Malformed graph at {path}: expected a mapping of imports, found {found}")]
    MalformedGraph { path: String, found: String },

    /// A non-vendored module could not be read.
    #[error("Cannot read {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl ClassifyError {
    /// Create a file access error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }

    /// Create a malformed graph error.
    pub fn malformed(path: impl Into<String>, found: impl Into<String>) -> Self {
        Self::MalformedGraph {
            path: path.into(),
            found: found.into(),
        }
    }
}

/// Errors that can occur while building or loading an import graph.
#[derive(Debug, Error)]
pub enum GraphError {
    /// No entry point was given.
    #[error("Entry point cannot be empty")]
    EmptyEntry,

    /// Entry point file not found on disk.
    #[error("Cannot find entry file {path}: {source}")]
    EntryNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Entry point refers to a directory.
    #[error("Entry point is a directory, not a source file: {path}")]
    EntryIsDirectory { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Graph document is not valid JSON.
    #[error("Invalid graph JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Graph document has the wrong shape.
    #[error("Malformed graph at {path}: expected a mapping of imports, found {found}")]
    MalformedGraph { path: String, found: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl GraphError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<GraphError> for ClassifyError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::MalformedGraph { path, found } => Self::MalformedGraph { path, found },
            GraphError::Io { path, source } | GraphError::EntryNotFound { path, source } => {
                Self::FileAccess { path, source }
            }
            other => Self::InvalidConfig {
                message: other.to_string(),
            },
        }
    }
}

/// Kind of graph construction warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Import specifier could not be resolved to a file.
    UnresolvedImport,
    /// File could not be read while scanning its imports.
    ReadError,
    /// `tsconfig.json` could not be read or parsed.
    TsConfig,
}

/// Non-fatal warning encountered while building a graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphWarning {
    /// Path where the warning occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl GraphWarning {
    /// Create a new graph warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create an unresolved import warning.
    pub fn unresolved(path: impl Into<PathBuf>, specifier: &str) -> Self {
        let path = path.into();
        Self {
            message: format!("Cannot resolve '{specifier}' from {}", path.display()),
            path,
            kind: WarningKind::UnresolvedImport,
        }
    }

    /// Create a read error warning.
    pub fn read_error(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        Self {
            message: format!("Read error: {error}"),
            path: path.into(),
            kind: WarningKind::ReadError,
        }
    }
}
