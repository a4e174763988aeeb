//! Property propagation over an import graph.
//!
//! Every import occurrence is classified independently: a module reached
//! through two chains appears twice in the output, once per chain, with the
//! property inherited along that chain. Siblings fan out on rayon and are
//! joined in source order before their parent is finalized.

use rayon::prelude::*;
use tracing::debug;
use usetree_core::{ClassifyConfig, ClassifyError, GraphId, ImportGraph, Property, Tree, TreeNode};

use crate::detector::DirectiveDetector;
use crate::reader::SourceReader;

/// Ancestors of the node being classified, innermost first.
struct Chain<'a> {
    id: GraphId,
    parent: Option<&'a Chain<'a>>,
}

impl Chain<'_> {
    fn contains(&self, id: GraphId) -> bool {
        let mut link = Some(self);
        while let Some(current) = link {
            if current.id == id {
                return true;
            }
            link = current.parent;
        }
        false
    }
}

/// Classifies every module of an [`ImportGraph`] into a [`Tree`].
pub struct Classifier<R> {
    reader: R,
    detector: DirectiveDetector,
    config: ClassifyConfig,
}

impl<R: SourceReader> Classifier<R> {
    /// Create a classifier with the default configuration.
    pub fn new(reader: R) -> Self {
        let config = ClassifyConfig::default();
        Self {
            reader,
            detector: DirectiveDetector::with_config(&config),
            config,
        }
    }

    /// Create a classifier with a custom configuration.
    pub fn with_config(reader: R, config: ClassifyConfig) -> Result<Self, ClassifyError> {
        config
            .validate()
            .map_err(|message| ClassifyError::InvalidConfig { message })?;
        Ok(Self {
            reader,
            detector: DirectiveDetector::with_config(&config),
            config,
        })
    }

    /// Get the underlying reader.
    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Get the configuration in use.
    pub fn config(&self) -> &ClassifyConfig {
        &self.config
    }

    /// Classify the graph starting from its roots with no inherited property.
    pub fn classify(&self, graph: &ImportGraph) -> Result<Tree, ClassifyError> {
        self.classify_with(graph, &Property::None)
    }

    /// Classify the graph with `inherited` as the property of the roots' importer.
    pub fn classify_with(
        &self,
        graph: &ImportGraph,
        inherited: &Property,
    ) -> Result<Tree, ClassifyError> {
        graph.validate()?;

        let run = || self.classify_level(graph, &graph.roots, inherited, None, 0);
        let roots = match self.config.threads {
            0 => run()?,
            n => rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ClassifyError::InvalidConfig {
                    message: format!("Cannot start {n} classification threads: {e}"),
                })?
                .install(run)?,
        };

        debug!(
            roots = roots.len(),
            modules = graph.node_count(),
            "classified import graph"
        );
        Ok(Tree::new(roots))
    }

    fn classify_level(
        &self,
        graph: &ImportGraph,
        ids: &[GraphId],
        inherited: &Property,
        chain: Option<&Chain<'_>>,
        depth: usize,
    ) -> Result<Vec<TreeNode>, ClassifyError> {
        ids.par_iter()
            .map(|&id| self.classify_node(graph, id, inherited, chain, depth))
            .collect()
    }

    fn classify_node(
        &self,
        graph: &ImportGraph,
        id: GraphId,
        inherited: &Property,
        chain: Option<&Chain<'_>>,
        depth: usize,
    ) -> Result<TreeNode, ClassifyError> {
        let node = graph.node(id);
        let own = self.detector.classify_path(&node.path, &self.reader)?;
        if own.is_vendored() {
            return Ok(TreeNode::vendored(node.path.clone()));
        }

        let effective = own.inherit(inherited);

        if chain.is_some_and(|c| c.contains(id)) {
            debug!(path = %node.path.display(), "import cycle, not descending");
            return Ok(TreeNode::leaf(node.path.clone(), effective));
        }
        if self.config.max_depth.is_some_and(|max| depth >= max) {
            debug!(path = %node.path.display(), depth, "max depth reached");
            return Ok(TreeNode::leaf(node.path.clone(), effective));
        }

        let link = Chain { id, parent: chain };
        let children =
            self.classify_level(graph, graph.imports(id), &effective, Some(&link), depth + 1)?;

        Ok(TreeNode::new(node.path.clone(), effective, children))
    }
}
