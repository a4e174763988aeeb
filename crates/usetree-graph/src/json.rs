//! Loading pre-built graphs from JSON documents.

use std::fs;
use std::path::Path;

use tracing::debug;
use usetree_core::{GraphError, ImportGraph};

/// Load a `dependency-tree` style JSON document: a mapping from each
/// top-level path to a mapping of its imports, nested to any depth.
pub fn load_json_graph(path: &Path) -> Result<ImportGraph, GraphError> {
    let text = fs::read_to_string(path).map_err(|e| GraphError::io(path, e))?;
    let value: serde_json::Value = serde_json::from_str(&text).map_err(|source| GraphError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let graph = ImportGraph::from_json(&value)?;
    debug!(
        path = %path.display(),
        roots = graph.roots.len(),
        nodes = graph.node_count(),
        "loaded graph document"
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_nested_document() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("graph.json");
        fs::write(&path, r#"{"a.js": {"b.js": {"c.js": {}}}, "d.js": {}}"#).unwrap();

        let graph = load_json_graph(&path).unwrap();
        assert_eq!(graph.roots.len(), 2);
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.node(graph.roots[0]).path, Path::new("a.js"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_json_graph(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, GraphError::Io { .. }));
    }

    #[test]
    fn test_invalid_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("graph.json");
        fs::write(&path, "{").unwrap();
        assert!(matches!(load_json_graph(&path), Err(GraphError::Json { .. })));
    }

    #[test]
    fn test_wrong_shape() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("graph.json");
        fs::write(&path, r#"{"a.js": ["b.js"]}"#).unwrap();
        assert!(matches!(
            load_json_graph(&path),
            Err(GraphError::MalformedGraph { .. })
        ));
    }
}
