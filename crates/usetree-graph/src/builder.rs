//! Breadth-first import graph construction.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, info, warn};
use usetree_core::{GraphError, GraphId, GraphWarning, ImportGraph, WarningKind};

use crate::config::GraphConfig;
use crate::imports::extract_imports;
use crate::resolver::{ImportResolver, Resolution};
use crate::tsconfig::TsPaths;

/// Result of building an import graph.
#[derive(Debug)]
pub struct BuildResult {
    /// The graph, rooted at the entry file.
    pub graph: ImportGraph,
    /// Non-fatal problems met along the way.
    pub warnings: Vec<GraphWarning>,
    /// Imported files that are not sources (images, styles, ...), left
    /// out of the graph.
    pub skipped_assets: Vec<PathBuf>,
    /// Number of files read and scanned for imports.
    pub files_parsed: usize,
    /// Wall time spent building.
    pub duration: Duration,
}

/// Builds an [`ImportGraph`] by following imports from an entry file.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    config: GraphConfig,
}

impl GraphBuilder {
    /// Create a builder for the given configuration.
    pub fn new(config: GraphConfig) -> Self {
        Self { config }
    }

    /// Get the configuration in use.
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Follow imports from the entry file until no new files are found.
    ///
    /// Each frontier of newly discovered files is read and scanned in
    /// parallel, then merged into the graph in discovery order so node ids
    /// and import order do not depend on scheduling.
    pub fn build(&self) -> Result<BuildResult, GraphError> {
        let start = Instant::now();
        let config = &self.config;

        if config.entry.as_os_str().is_empty() {
            return Err(GraphError::EmptyEntry);
        }
        let entry_path = config.entry_path();
        let entry = entry_path
            .canonicalize()
            .map_err(|source| GraphError::EntryNotFound {
                path: entry_path.clone(),
                source,
            })?;
        if entry.is_dir() {
            return Err(GraphError::EntryIsDirectory { path: entry });
        }
        let directory = config
            .directory
            .canonicalize()
            .map_err(|e| GraphError::io(&config.directory, e))?;

        let mut warnings = Vec::new();
        let resolver = self.resolver(&directory, &mut warnings);

        let mut graph = ImportGraph::new();
        let root = graph.add_node(entry.clone());
        graph.add_root(root);

        let mut frontier: Vec<(GraphId, PathBuf)> = vec![(root, entry)];
        let mut skipped_assets: Vec<PathBuf> = Vec::new();
        let mut files_parsed = 0;

        while !frontier.is_empty() {
            let scanned: Vec<(GraphId, PathBuf, std::io::Result<Vec<String>>)> = frontier
                .into_par_iter()
                .map(|(id, path)| {
                    let imports = fs::read_to_string(&path).map(|text| extract_imports(&text));
                    (id, path, imports)
                })
                .collect();

            let mut next = Vec::new();
            for (id, path, imports) in scanned {
                let specifiers = match imports {
                    Ok(specifiers) => specifiers,
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "cannot read source file");
                        warnings.push(GraphWarning::read_error(&path, &e));
                        continue;
                    }
                };
                files_parsed += 1;
                let from_dir = path.parent().unwrap_or(Path::new("."));

                for specifier in &specifiers {
                    let target = match resolver.resolve(from_dir, specifier) {
                        Resolution::File(target) | Resolution::Vendored(target) => target,
                        Resolution::Builtin => continue,
                        Resolution::Unresolved => {
                            warn!(
                                path = %path.display(),
                                specifier = specifier.as_str(),
                                "unresolved import"
                            );
                            warnings.push(GraphWarning::unresolved(&path, specifier));
                            continue;
                        }
                    };

                    let vendored = resolver.is_vendored(&target);
                    if !vendored && !resolver.is_parseable(&target) {
                        debug!(path = %target.display(), "skipping non-source import");
                        if !skipped_assets.contains(&target) {
                            skipped_assets.push(target);
                        }
                        continue;
                    }

                    let is_new = graph.id_of(&target).is_none();
                    let target_id = graph.add_node(target.clone());
                    graph.add_import(id, target_id);

                    if is_new && !vendored {
                        next.push((target_id, target));
                    }
                }
            }
            debug!(discovered = next.len(), "scanned import frontier");
            frontier = next;
        }

        let duration = start.elapsed();
        info!(
            modules = graph.node_count(),
            imports = graph.edge_count(),
            files_parsed,
            skipped_assets = skipped_assets.len(),
            warnings = warnings.len(),
            ?duration,
            "built import graph"
        );

        Ok(BuildResult {
            graph,
            warnings,
            skipped_assets,
            files_parsed,
            duration,
        })
    }

    fn resolver(&self, directory: &Path, warnings: &mut Vec<GraphWarning>) -> ImportResolver {
        let resolver = ImportResolver::new(
            directory,
            self.config.extensions.clone(),
            self.config.vendor_dir.clone(),
        );
        let Some(ts_path) = self.config.ts_config_path() else {
            return resolver;
        };
        match TsPaths::load(&ts_path) {
            Ok(ts_paths) if ts_paths.is_empty() => resolver,
            Ok(ts_paths) => {
                debug!(path = %ts_path.display(), "loaded tsconfig path aliases");
                resolver.with_ts_paths(ts_paths)
            }
            Err(e) => {
                warn!(path = %ts_path.display(), error = %e, "ignoring tsconfig");
                warnings.push(GraphWarning::new(&ts_path, e.to_string(), WarningKind::TsConfig));
                resolver
            }
        }
    }
}
