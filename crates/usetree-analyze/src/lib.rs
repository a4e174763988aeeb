//! Boundary analysis for usetree.
//!
//! This crate turns an [`ImportGraph`] into a classified [`Tree`] and renders
//! it for display:
//!
//! - **Directive detection** - does a file start with `"use client"` (or any
//!   configured directive)?
//! - **Classification** - propagate each module's effective property down its
//!   import chains, pruning vendored subtrees
//! - **Rendering** - relative paths, indentation by depth, and a marker on
//!   rows carrying the highlighted property
//!
//! # Classification
//!
//! Sibling imports are classified concurrently on the rayon pool and joined
//! in source order, so the output is deterministic.
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use usetree_analyze::{Classifier, FsReader, normalize_paths, render};
//! use usetree_core::{ImportGraph, RenderConfig};
//!
//! let mut graph = ImportGraph::new();
//! let page = graph.add_node("/app/src/page.tsx");
//! let button = graph.add_node("/app/src/button.tsx");
//! graph.add_root(page);
//! graph.add_import(page, button);
//!
//! let tree = Classifier::new(FsReader).classify(&graph).unwrap();
//! let tree = normalize_paths(&tree, Path::new("/app"));
//!
//! for line in render(&tree, &RenderConfig::default()) {
//!     println!("{line}");
//! }
//! ```

mod classifier;
mod detector;
mod reader;
mod render;

pub use classifier::Classifier;
pub use detector::{DirectiveDetector, declares_directive};
pub use reader::{FsReader, SourceReader};
pub use render::{normalize_paths, render, render_json};

// Re-export core types
pub use usetree_core::{ClassifyConfig, ClassifyError, ImportGraph, Property, Tree, TreeNode};
