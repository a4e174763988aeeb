//! Classified tree and summary statistics.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::property::Property;

/// A classified module and the modules it imports.
///
/// The property is fixed when the node is built. Vendored nodes never have
/// children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Module path (absolute until normalized for display).
    pub path: PathBuf,

    /// Effective property: own directive, or the importer's effective property.
    pub property: Property,

    /// Imported modules in source order.
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create a node with children.
    pub fn new(path: impl Into<PathBuf>, property: Property, children: Vec<TreeNode>) -> Self {
        Self {
            path: path.into(),
            property,
            children,
        }
    }

    /// Create a vendored leaf.
    pub fn vendored(path: impl Into<PathBuf>) -> Self {
        Self::new(path, Property::Vendored, Vec::new())
    }

    /// Create a node without children.
    pub fn leaf(path: impl Into<PathBuf>, property: Property) -> Self {
        Self::new(path, property, Vec::new())
    }

    /// Get the number of direct children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Number of nodes in this subtree, including this one.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(TreeNode::subtree_len).sum::<usize>()
    }
}

/// Node counts per property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyCounts {
    pub vendored: u64,
    pub none: u64,
    /// Directive name and count, in order of first appearance.
    pub directives: Vec<(String, u64)>,
}

impl PropertyCounts {
    fn record(&mut self, property: &Property) {
        match property {
            Property::Vendored => self.vendored += 1,
            Property::None => self.none += 1,
            Property::Directive(name) => {
                match self.directives.iter_mut().find(|(n, _)| n == name.as_str()) {
                    Some((_, count)) => *count += 1,
                    None => self.directives.push((name.to_string(), 1)),
                }
            }
        }
    }

    /// Count for a given directive name.
    pub fn directive(&self, name: &str) -> u64 {
        self.directives
            .iter()
            .find(|(n, _)| n == name)
            .map_or(0, |(_, c)| *c)
    }

    /// Total number of nodes counted.
    pub fn total(&self) -> u64 {
        self.vendored + self.none + self.directives.iter().map(|(_, c)| c).sum::<u64>()
    }
}

/// An ordered sequence of classified root nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    pub roots: Vec<TreeNode>,
}

impl Tree {
    pub fn new(roots: Vec<TreeNode>) -> Self {
        Self { roots }
    }

    /// Total number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.roots.iter().map(TreeNode::subtree_len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Pre-order iterator yielding `(depth, node)`.
    pub fn iter(&self) -> TreeIter<'_> {
        TreeIter {
            stack: self.roots.iter().rev().map(|n| (0, n)).collect(),
        }
    }

    /// Count nodes by property.
    pub fn count_by_property(&self) -> PropertyCounts {
        let mut counts = PropertyCounts::default();
        for (_, node) in self.iter() {
            counts.record(&node.property);
        }
        counts
    }
}

/// Pre-order traversal over a [`Tree`].
pub struct TreeIter<'a> {
    stack: Vec<(usize, &'a TreeNode)>,
}

impl<'a> Iterator for TreeIter<'a> {
    type Item = (usize, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|c| (depth + 1, c)));
        Some((depth, node))
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = (usize, &'a TreeNode);
    type IntoIter = TreeIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
