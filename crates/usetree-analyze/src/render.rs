//! Text rendering of classified trees.

use std::path::{Path, PathBuf};

use usetree_core::{RenderConfig, Tree, TreeNode};

/// Rewrite every path relative to `base`.
///
/// Paths outside `base`, or equal to it, are kept as they are. Properties
/// and structure are untouched.
pub fn normalize_paths(tree: &Tree, base: &Path) -> Tree {
    Tree::new(
        tree.roots
            .iter()
            .map(|node| normalize_node(node, base))
            .collect(),
    )
}

fn normalize_node(node: &TreeNode, base: &Path) -> TreeNode {
    TreeNode {
        path: relative_to(&node.path, base),
        property: node.property.clone(),
        children: node
            .children
            .iter()
            .map(|child| normalize_node(child, base))
            .collect(),
    }
}

fn relative_to(path: &Path, base: &Path) -> PathBuf {
    match path.strip_prefix(base) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel.to_path_buf(),
        _ => path.to_path_buf(),
    }
}

/// Render the tree as display lines, one per non-vendored node, pre-order.
///
/// Each line is the marker (or blanks of the same width), then
/// `depth * indent_step` spaces, then the path.
pub fn render(tree: &Tree, config: &RenderConfig) -> Vec<String> {
    let mut lines = Vec::new();
    let blank = config.blank_marker();
    render_level(&tree.roots, 0, config, &blank, &mut lines);
    lines
}

fn render_level(
    nodes: &[TreeNode],
    pad: usize,
    config: &RenderConfig,
    blank: &str,
    lines: &mut Vec<String>,
) {
    for node in nodes {
        // Vendored nodes are always leaves, so skipping them drops the branch.
        if node.property.is_vendored() {
            continue;
        }
        let marker = if node.property == config.highlighted {
            config.marker.as_str()
        } else {
            blank
        };
        lines.push(format!("{marker}{:pad$}{}", "", node.path.display()));
        render_level(&node.children, pad + config.indent_step, config, blank, lines);
    }
}

/// Serialize the tree as pretty-printed JSON.
pub fn render_json(tree: &Tree) -> serde_json::Result<String> {
    serde_json::to_string_pretty(tree)
}
