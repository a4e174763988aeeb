//! Import graph construction for usetree.
//!
//! Builds an [`ImportGraph`] by scanning JavaScript and TypeScript sources
//! for import specifiers and resolving them the way bundlers do: relative
//! paths with extension and index inference, `tsconfig.json` path aliases,
//! Node.js builtins (skipped) and packages (placed under the vendor
//! directory and never read). Graphs can also be loaded from JSON.
//!
//! # Example
//!
//! ```no_run
//! use usetree_graph::{GraphBuilder, GraphConfig};
//!
//! let config = GraphConfig::builder()
//!     .entry("app/page.tsx")
//!     .directory("/path/to/project")
//!     .build()
//!     .unwrap();
//!
//! let result = GraphBuilder::new(config).build().unwrap();
//! println!("{} modules", result.graph.node_count());
//! ```

mod builder;
mod config;
mod imports;
mod json;
mod resolver;
mod tsconfig;

pub use builder::{BuildResult, GraphBuilder};
pub use config::{GraphConfig, GraphConfigBuilder};
pub use imports::extract_imports;
pub use json::load_json_graph;
pub use resolver::{ImportResolver, Resolution, is_node_builtin};
pub use tsconfig::TsPaths;

// Re-export core types for convenience
pub use usetree_core::{GraphError, GraphId, GraphNode, GraphWarning, ImportGraph, WarningKind};
