//! Core types for usetree.
//!
//! This crate provides the data structures shared by the graph builder,
//! the classifier and the renderer: boundary properties, the import graph
//! arena, classified trees, configuration and errors.

mod config;
mod error;
mod graph;
mod property;
mod tree;

pub use config::{ClassifyConfig, ClassifyConfigBuilder, RenderConfig, RenderConfigBuilder};
pub use error::{ClassifyError, GraphError, GraphWarning, WarningKind};
pub use graph::{GraphId, GraphNode, ImportGraph};
pub use property::{CLIENT, Property, SERVER};
pub use tree::{PropertyCounts, Tree, TreeIter, TreeNode};
