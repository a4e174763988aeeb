use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use compact_str::CompactString;
use serde_json::json;
use tempfile::TempDir;
use usetree_analyze::{
    Classifier, ClassifyConfig, ClassifyError, FsReader, ImportGraph, Property, SourceReader,
    Tree, TreeNode, normalize_paths, render,
};
use usetree_core::{GraphId, RenderConfig};

/// In-memory reader that records every path it is asked for.
#[derive(Default)]
struct RecordingReader {
    files: HashMap<PathBuf, String>,
    reads: Mutex<Vec<PathBuf>>,
}

impl RecordingReader {
    fn with(files: &[(&str, &str)]) -> Self {
        Self {
            files: files
                .iter()
                .map(|(p, text)| (PathBuf::from(p), text.to_string()))
                .collect(),
            reads: Mutex::new(Vec::new()),
        }
    }

    fn reads(&self) -> Vec<PathBuf> {
        self.reads.lock().unwrap().clone()
    }
}

impl SourceReader for RecordingReader {
    fn read(&self, path: &Path) -> io::Result<String> {
        self.reads.lock().unwrap().push(path.to_path_buf());
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }
}

fn chain(graph: &mut ImportGraph, paths: &[&str]) -> Vec<GraphId> {
    let ids: Vec<GraphId> = paths.iter().map(|p| graph.add_node(*p)).collect();
    graph.add_root(ids[0]);
    for pair in ids.windows(2) {
        graph.add_import(pair[0], pair[1]);
    }
    ids
}

fn find<'a>(tree: &'a Tree, path: &str) -> Vec<&'a TreeNode> {
    tree.iter()
        .filter(|(_, n)| n.path == Path::new(path))
        .map(|(_, n)| n)
        .collect()
}

#[test]
fn test_vendored_pruning_never_reads() {
    let mut graph = ImportGraph::new();
    let entry = graph.add_node("/app/entry.js");
    let pkg = graph.add_node("/app/node_modules/pkg/index.js");
    let nested = graph.add_node("/app/node_modules/pkg/lib/inner.js");
    let leaked = graph.add_node("/app/src/leaked.js");
    graph.add_root(entry);
    graph.add_import(entry, pkg);
    graph.add_import(pkg, nested);
    graph.add_import(pkg, leaked);

    let reader = RecordingReader::with(&[("/app/entry.js", "'use client'")]);
    let classifier = Classifier::new(reader);
    let tree = classifier.classify(&graph).unwrap();

    let vendored = &tree.roots[0].children[0];
    assert_eq!(vendored.property, Property::Vendored);
    assert!(vendored.children.is_empty());
    assert_eq!(classifier.reader().reads(), vec![PathBuf::from("/app/entry.js")]);
}

#[test]
fn test_inheritance_down_a_chain() {
    let mut graph = ImportGraph::new();
    chain(&mut graph, &["/a.js", "/b.js", "/c.js"]);
    let reader = RecordingReader::with(&[
        ("/a.js", "\"use client\";"),
        ("/b.js", "export const b = 1;"),
        ("/c.js", ""),
    ]);

    let tree = Classifier::new(reader).classify(&graph).unwrap();
    let c = find(&tree, "/c.js");
    assert_eq!(c.len(), 1);
    assert_eq!(c[0].property, Property::client());
}

#[test]
fn test_override_then_inherit() {
    let mut graph = ImportGraph::new();
    chain(&mut graph, &["/a.js", "/b.js", "/c.js"]);
    let reader = RecordingReader::with(&[
        ("/a.js", "'use client'"),
        ("/b.js", "'use server'"),
        ("/c.js", "export {}"),
    ]);

    let tree = Classifier::new(reader).classify(&graph).unwrap();
    assert_eq!(find(&tree, "/a.js")[0].property, Property::client());
    assert_eq!(find(&tree, "/b.js")[0].property, Property::server());
    assert_eq!(find(&tree, "/c.js")[0].property, Property::server());
}

#[test]
fn test_diamond_classified_per_path() {
    let mut graph = ImportGraph::new();
    let entry = graph.add_node("/entry.js");
    let left = graph.add_node("/left.js");
    let right = graph.add_node("/right.js");
    let shared = graph.add_node("/shared.js");
    graph.add_root(entry);
    graph.add_import(entry, left);
    graph.add_import(entry, right);
    graph.add_import(left, shared);
    graph.add_import(right, shared);

    let reader = RecordingReader::with(&[
        ("/entry.js", ""),
        ("/left.js", "'use client'"),
        ("/right.js", "'use server'"),
        ("/shared.js", "export default 1"),
    ]);

    let tree = Classifier::new(reader).classify(&graph).unwrap();
    let shared: Vec<Property> = find(&tree, "/shared.js")
        .into_iter()
        .map(|n| n.property.clone())
        .collect();
    assert_eq!(shared, vec![Property::client(), Property::server()]);
}

#[test]
fn test_sibling_order_is_source_order() {
    let mut graph = ImportGraph::new();
    let entry = graph.add_node("/entry.js");
    graph.add_root(entry);
    let names: Vec<String> = (0..64).map(|i| format!("/m{i}.js")).collect();
    let mut files = vec![("/entry.js".to_string(), String::new())];
    for name in &names {
        let id = graph.add_node(name.as_str());
        graph.add_import(entry, id);
        files.push((name.clone(), String::new()));
    }
    let pairs: Vec<(&str, &str)> = files.iter().map(|(p, t)| (p.as_str(), t.as_str())).collect();

    let tree = Classifier::new(RecordingReader::with(&pairs))
        .classify(&graph)
        .unwrap();
    let order: Vec<String> = tree.roots[0]
        .children
        .iter()
        .map(|c| c.path.display().to_string())
        .collect();
    assert_eq!(order, names);
}

#[test]
fn test_cycle_terminates() {
    let mut graph = ImportGraph::new();
    let ids = chain(&mut graph, &["/a.js", "/b.js"]);
    graph.add_import(ids[1], ids[0]);

    let reader = RecordingReader::with(&[("/a.js", "'use client'"), ("/b.js", "")]);
    let tree = Classifier::new(reader).classify(&graph).unwrap();

    // a -> b -> a (cut)
    assert_eq!(tree.len(), 3);
    let repeated = &tree.roots[0].children[0].children[0];
    assert_eq!(repeated.path, PathBuf::from("/a.js"));
    assert_eq!(repeated.property, Property::client());
    assert!(repeated.children.is_empty());
}

#[test]
fn test_self_import_terminates() {
    let mut graph = ImportGraph::new();
    let a = graph.add_node("/a.js");
    graph.add_root(a);
    graph.add_import(a, a);

    let reader = RecordingReader::with(&[("/a.js", "")]);
    let tree = Classifier::new(reader).classify(&graph).unwrap();
    assert_eq!(tree.len(), 2);
}

#[test]
fn test_file_access_error_propagates() {
    let mut graph = ImportGraph::new();
    let entry = graph.add_node("/entry.js");
    let ok = graph.add_node("/ok.js");
    let missing = graph.add_node("/missing.js");
    graph.add_root(entry);
    graph.add_import(entry, ok);
    graph.add_import(entry, missing);

    let reader = RecordingReader::with(&[("/entry.js", ""), ("/ok.js", "")]);
    let err = Classifier::new(reader).classify(&graph).unwrap_err();
    match err {
        ClassifyError::FileAccess { path, source } => {
            assert_eq!(path, PathBuf::from("/missing.js"));
            assert_eq!(source.kind(), io::ErrorKind::NotFound);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_dangling_reference_is_malformed() {
    let mut graph = ImportGraph::new();
    let entry = graph.add_node("/entry.js");
    graph.add_root(entry);
    graph.nodes[0].imports.push(GraphId(42));

    let reader = RecordingReader::default();
    let classifier = Classifier::new(reader);
    let err = classifier.classify(&graph).unwrap_err();
    assert!(matches!(err, ClassifyError::MalformedGraph { .. }));
    assert!(classifier.reader().reads().is_empty());
}

#[test]
fn test_render_skip_law() {
    let tree = Tree::new(vec![
        TreeNode::vendored("node_modules/a.js"),
        TreeNode::vendored("node_modules/b.js"),
    ]);
    assert!(render(&tree, &RenderConfig::default()).is_empty());
}

#[test]
fn test_indentation_law() {
    let mut graph = ImportGraph::new();
    chain(&mut graph, &["/d0.js", "/d1.js", "/d2.js", "/d3.js"]);
    let reader = RecordingReader::with(&[
        ("/d0.js", ""),
        ("/d1.js", ""),
        ("/d2.js", ""),
        ("/d3.js", ""),
    ]);
    let tree = Classifier::new(reader).classify(&graph).unwrap();

    let config = RenderConfig::builder().indent_step(3usize).build().unwrap();
    let lines = render(&tree, &config);
    for (depth, line) in lines.iter().enumerate() {
        let body = &line[2..];
        let indent = body.len() - body.trim_start().len();
        assert_eq!(indent, depth * 3, "line {line:?}");
    }
}

#[test]
fn test_client_server_example() {
    let mut graph = ImportGraph::new();
    let a = graph.add_node("a.js");
    let b = graph.add_node("b.js");
    let c = graph.add_node("vendor/c.js");
    graph.add_root(a);
    graph.add_import(a, b);
    graph.add_import(a, c);

    let reader = RecordingReader::with(&[("a.js", "'use client'"), ("b.js", "")]);
    let config = ClassifyConfig::builder()
        .directives(vec![CompactString::from("client"), CompactString::from("server")])
        .vendor_marker("vendor")
        .build()
        .unwrap();
    let classifier = Classifier::with_config(reader, config).unwrap();
    let tree = classifier.classify(&graph).unwrap();

    let lines = render(&tree, &RenderConfig::default());
    assert_eq!(lines, vec!["| a.js", "|   b.js"]);
    assert!(!classifier.reader().reads().contains(&PathBuf::from("vendor/c.js")));
}

#[test]
fn test_json_graph_with_repeated_subtrees() {
    let doc = json!({
        "/app/page.js": {
            "/app/client.js": { "/app/util.js": {} },
            "/app/util.js": {}
        }
    });
    let graph = ImportGraph::from_json(&doc).unwrap();
    let reader = RecordingReader::with(&[
        ("/app/page.js", ""),
        ("/app/client.js", "// boundary\n'use client'"),
        ("/app/util.js", ""),
    ]);

    let tree = Classifier::new(reader).classify(&graph).unwrap();
    let tree = normalize_paths(&tree, Path::new("/app"));
    let lines = render(&tree, &RenderConfig::default());
    assert_eq!(
        lines,
        vec!["  page.js", "|   client.js", "|     util.js", "    util.js"]
    );
}

#[test]
fn test_normalize_paths_is_pure() {
    let tree = Tree::new(vec![TreeNode::new(
        "/repo/src/a.ts",
        Property::client(),
        vec![TreeNode::vendored("/repo/node_modules/x/index.js")],
    )]);
    let normalized = normalize_paths(&tree, Path::new("/repo"));

    assert_eq!(tree.roots[0].path, PathBuf::from("/repo/src/a.ts"));
    assert_eq!(normalized.roots[0].path, PathBuf::from("src/a.ts"));
    assert_eq!(
        normalized.roots[0].children[0].path,
        PathBuf::from("node_modules/x/index.js")
    );
    assert_eq!(normalized.roots[0].children[0].property, Property::Vendored);
    assert_eq!(normalized.len(), tree.len());
}

#[test]
fn test_filesystem_end_to_end() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().canonicalize().unwrap();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::create_dir_all(root.join("node_modules/react")).unwrap();
    fs::write(root.join("src/layout.tsx"), "import Page from './page';\n").unwrap();
    fs::write(
        root.join("src/page.tsx"),
        "/* page */ 'use client';\nimport Button from './button';\n",
    )
    .unwrap();
    fs::write(root.join("src/button.tsx"), "export default function Button() {}\n").unwrap();

    let mut graph = ImportGraph::new();
    let layout = graph.add_node(root.join("src/layout.tsx"));
    let page = graph.add_node(root.join("src/page.tsx"));
    let button = graph.add_node(root.join("src/button.tsx"));
    // Never created on disk: vendored paths must not be read.
    let react = graph.add_node(root.join("node_modules/react/index.js"));
    graph.add_root(layout);
    graph.add_import(layout, page);
    graph.add_import(page, button);
    graph.add_import(page, react);

    let config = ClassifyConfig::builder().threads(2usize).build().unwrap();
    let tree = Classifier::with_config(FsReader, config)
        .unwrap()
        .classify(&graph)
        .unwrap();
    let lines = render(&normalize_paths(&tree, &root), &RenderConfig::default());

    assert_eq!(
        lines,
        vec!["  src/layout.tsx", "|   src/page.tsx", "|     src/button.tsx"]
    );
}
