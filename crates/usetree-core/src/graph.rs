//! Import graph arena.
//!
//! An [`ImportGraph`] stores modules as dense [`GraphId`]-indexed nodes whose
//! imports are child indices. The top-level entries of the graph are its
//! `roots`. Graphs built from the filesystem deduplicate nodes by path, so
//! they may contain real cycles; graphs loaded from a nested JSON mapping
//! keep one node per occurrence and mirror the document shape exactly.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GraphError;

/// Index of a node within an [`ImportGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct GraphId(pub u32);

impl GraphId {
    /// Index into the node arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A single module in the graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: GraphId,
    pub path: PathBuf,
    /// Direct imports in source order.
    pub imports: Vec<GraphId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportGraph {
    pub nodes: Vec<GraphNode>,
    /// Top-level modules, in insertion order.
    pub roots: Vec<GraphId>,
    #[serde(skip)]
    path_to_id: HashMap<PathBuf, GraphId>,
}

impl ImportGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node for `path`, reusing the existing node if the path is known.
    pub fn add_node(&mut self, path: impl Into<PathBuf>) -> GraphId {
        let path = path.into();
        if let Some(&id) = self.path_to_id.get(&path) {
            return id;
        }
        let id = self.push_node(path.clone());
        self.path_to_id.insert(path, id);
        id
    }

    /// Add a node without path deduplication.
    #[allow(clippy::cast_possible_truncation)]
    fn push_node(&mut self, path: PathBuf) -> GraphId {
        let id = GraphId(self.nodes.len() as u32);
        self.nodes.push(GraphNode {
            id,
            path,
            imports: Vec::new(),
        });
        id
    }

    /// Record that `from` imports `to`. Repeated edges are ignored.
    pub fn add_import(&mut self, from: GraphId, to: GraphId) {
        let imports = &mut self.nodes[from.index()].imports;
        if !imports.contains(&to) {
            imports.push(to);
        }
    }

    /// Mark a node as a top-level entry.
    pub fn add_root(&mut self, id: GraphId) {
        if !self.roots.contains(&id) {
            self.roots.push(id);
        }
    }

    pub fn node(&self, id: GraphId) -> &GraphNode {
        &self.nodes[id.index()]
    }

    /// Look up a node by path (only paths added through [`Self::add_node`]).
    pub fn id_of(&self, path: &Path) -> Option<GraphId> {
        self.path_to_id.get(path).copied()
    }

    pub fn imports(&self, id: GraphId) -> &[GraphId] {
        &self.nodes[id.index()].imports
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.imports.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Check that every root and import refers to a node in the arena.
    pub fn validate(&self) -> Result<(), GraphError> {
        let len = self.nodes.len();
        for root in &self.roots {
            if root.index() >= len {
                return Err(GraphError::MalformedGraph {
                    path: "<root>".to_string(),
                    found: format!("dangling node reference {}", root.0),
                });
            }
        }
        for node in &self.nodes {
            if let Some(bad) = node.imports.iter().find(|c| c.index() >= len) {
                return Err(GraphError::MalformedGraph {
                    path: node.path.display().to_string(),
                    found: format!("dangling node reference {}", bad.0),
                });
            }
        }
        Ok(())
    }

    /// Build a graph from a nested mapping of `path -> { imported path -> {...} }`.
    ///
    /// Every occurrence of a key becomes its own node, so repeated subtrees
    /// are preserved as they appear in the document.
    pub fn from_json(value: &Value) -> Result<Self, GraphError> {
        let mut graph = Self::new();
        let top = expect_mapping("<root>", value)?;
        for (key, child) in top {
            let id = graph.push_json_node(key, child)?;
            graph.roots.push(id);
        }
        Ok(graph)
    }

    fn push_json_node(&mut self, key: &str, value: &Value) -> Result<GraphId, GraphError> {
        let children = expect_mapping(key, value)?;
        let id = self.push_node(PathBuf::from(key));
        self.path_to_id.entry(PathBuf::from(key)).or_insert(id);
        for (child_key, child_value) in children {
            let child = self.push_json_node(child_key, child_value)?;
            self.nodes[id.index()].imports.push(child);
        }
        Ok(id)
    }

    /// Serialize back into the nested mapping shape.
    ///
    /// Import chains that revisit a node on the current path are written as
    /// an empty mapping.
    pub fn to_json(&self) -> Value {
        let mut chain = Vec::new();
        let mut top = serde_json::Map::new();
        for &root in &self.roots {
            top.insert(
                self.node(root).path.display().to_string(),
                self.node_to_json(root, &mut chain),
            );
        }
        Value::Object(top)
    }

    fn node_to_json(&self, id: GraphId, chain: &mut Vec<GraphId>) -> Value {
        let mut map = serde_json::Map::new();
        if chain.contains(&id) {
            return Value::Object(map);
        }
        chain.push(id);
        for &child in self.imports(id) {
            map.insert(
                self.node(child).path.display().to_string(),
                self.node_to_json(child, chain),
            );
        }
        chain.pop();
        Value::Object(map)
    }
}

fn expect_mapping<'a>(
    key: &str,
    value: &'a Value,
) -> Result<&'a serde_json::Map<String, Value>, GraphError> {
    let found = match value {
        Value::Object(map) => return Ok(map),
        Value::String(s) => format!("the string {s:?}"),
        Value::Null => "null".to_string(),
        Value::Bool(_) => "a boolean".to_string(),
        Value::Number(_) => "a number".to_string(),
        Value::Array(_) => "an array".to_string(),
    };
    Err(GraphError::MalformedGraph {
        path: key.to_string(),
        found,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_add_node_deduplicates_by_path() {
        let mut g = ImportGraph::new();
        let a = g.add_node("a.js");
        let again = g.add_node("a.js");
        assert_eq!(a, again);
        assert_eq!(g.node_count(), 1);
    }

    #[test]
    fn test_add_import_ignores_repeats() {
        let mut g = ImportGraph::new();
        let a = g.add_node("a.js");
        let b = g.add_node("b.js");
        g.add_import(a, b);
        g.add_import(a, b);
        assert_eq!(g.imports(a), &[b]);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_from_json_keeps_repeated_subtrees() {
        let value = json!({
            "/p/entry.js": {
                "/p/a.js": { "/p/shared.js": {} },
                "/p/b.js": { "/p/shared.js": {} }
            }
        });
        let g = ImportGraph::from_json(&value).unwrap();
        assert_eq!(g.roots.len(), 1);
        assert_eq!(g.node_count(), 5);
        let entry = g.roots[0];
        let children: Vec<_> = g
            .imports(entry)
            .iter()
            .map(|&c| g.node(c).path.clone())
            .collect();
        assert_eq!(children, vec![PathBuf::from("/p/a.js"), PathBuf::from("/p/b.js")]);
    }

    #[test]
    fn test_from_json_rejects_bare_string() {
        let value = json!({ "/p/entry.js": { "/p/a.js": "oops" } });
        let err = ImportGraph::from_json(&value).unwrap_err();
        assert!(matches!(err, GraphError::MalformedGraph { ref path, .. } if path == "/p/a.js"));
    }

    #[test]
    fn test_validate_catches_dangling_import() {
        let mut g = ImportGraph::new();
        let a = g.add_node("a.js");
        g.add_root(a);
        g.nodes[0].imports.push(GraphId(7));
        assert!(g.validate().is_err());
    }

    #[test]
    fn test_to_json_cuts_cycles() {
        let mut g = ImportGraph::new();
        let a = g.add_node("a.js");
        let b = g.add_node("b.js");
        g.add_root(a);
        g.add_import(a, b);
        g.add_import(b, a);
        assert_eq!(
            g.to_json(),
            json!({ "a.js": { "b.js": { "a.js": {} } } })
        );
    }
}
