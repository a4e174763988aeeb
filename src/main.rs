//! usetree - show which modules of a JS/TS dependency tree sit behind a
//! directive boundary such as `"use client"`.
//!
//! Usage:
//!   usetree app/page.tsx                     Build the graph and print the tree
//!   usetree app/page.tsx --graph deps.json   Classify a pre-built graph
//!   usetree app/page.tsx --format json       Emit the classified tree as JSON
//!   usetree --help                           Show help

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use color_eyre::eyre::{Context, Result};
use compact_str::CompactString;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use usetree_analyze::{Classifier, FsReader, normalize_paths, render, render_json};
use usetree_core::{ClassifyConfig, GraphError, ImportGraph, Property, RenderConfig};
use usetree_graph::{GraphBuilder, GraphConfig, load_json_graph};

#[derive(Parser)]
#[command(
    name = "usetree",
    version,
    about = "Show the import tree of a module and mark its client boundary",
    long_about = "usetree follows the imports of an entry file and prints the resulting tree.\n\n\
                  Every module inherits the directive of its importer (\"use client\", \
                  \"use server\", ...) unless it declares its own. Rows carrying the \
                  highlighted directive are marked; vendored packages are omitted."
)]
struct Cli {
    /// Entry file, relative to --directory
    entry: String,

    /// Project directory used to resolve packages and tsconfig
    #[arg(short, long, default_value = ".")]
    directory: PathBuf,

    /// tsconfig.json with path aliases (defaults to <DIRECTORY>/tsconfig.json)
    #[arg(long)]
    ts_config: Option<PathBuf>,

    /// Classify a pre-built dependency-tree JSON graph instead of scanning sources
    #[arg(short, long)]
    graph: Option<PathBuf>,

    /// Directive names in priority order (repeatable)
    #[arg(long = "directive", value_name = "NAME", default_values_t = ["client".to_string(), "server".to_string()])]
    directives: Vec<String>,

    /// Path segment marking vendored modules
    #[arg(long, default_value = "node_modules")]
    vendor_marker: String,

    /// Directive whose rows are marked
    #[arg(long, value_name = "NAME", default_value = "client")]
    highlight: String,

    /// Indentation added per import level
    #[arg(short, long, default_value = "2")]
    indent: usize,

    /// Maximum import depth to descend
    #[arg(long)]
    max_depth: Option<usize>,

    /// Classification threads (0 = one per core)
    #[arg(short = 'j', long, default_value = "0")]
    threads: usize,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.entry.trim().is_empty() {
        return Err(GraphError::EmptyEntry.into());
    }

    let graph = match &cli.graph {
        Some(path) => load_json_graph(path)
            .with_context(|| format!("Failed to load graph from {}", path.display()))?,
        None => build_graph(&cli)?,
    };

    let classify_config = ClassifyConfig::builder()
        .directives(
            cli.directives
                .iter()
                .map(|d| CompactString::from(d.as_str()))
                .collect::<Vec<_>>(),
        )
        .vendor_marker(cli.vendor_marker.as_str())
        .max_depth(cli.max_depth)
        .threads(cli.threads)
        .build()
        .context("Invalid classification options")?;

    let render_config = RenderConfig::builder()
        .highlighted(Property::directive(cli.highlight.as_str()))
        .indent_step(cli.indent)
        .build()
        .context("Invalid render options")?;

    let classifier = Classifier::with_config(FsReader, classify_config)?;
    let tree = classifier.classify(&graph).context("Classification failed")?;

    let tree = normalize_paths(&tree, &display_base()?);

    let counts = tree.count_by_property();
    info!(
        rows = counts.total() - counts.vendored,
        vendored = counts.vendored,
        highlighted = counts.directive(&cli.highlight),
        "classified tree"
    );

    match cli.format {
        OutputFormat::Text => {
            for line in render(&tree, &render_config) {
                println!("{line}");
            }
        }
        OutputFormat::Json => {
            println!("{}", render_json(&tree)?);
        }
    }

    Ok(())
}

/// Install the stderr subscriber; stdout carries only the tree.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Current directory, canonicalized like the paths of a built graph.
fn display_base() -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("Cannot determine current directory")?;
    Ok(cwd.canonicalize().unwrap_or(cwd))
}

/// Graph options; packages land under the same marker the classifier prunes.
fn graph_config(cli: &Cli) -> Result<GraphConfig> {
    GraphConfig::builder()
        .entry(cli.entry.as_str())
        .directory(cli.directory.as_path())
        .ts_config(cli.ts_config.clone())
        .vendor_dir(cli.vendor_marker.as_str())
        .build()
        .context("Invalid graph options")
}

/// Scan sources from the entry file.
fn build_graph(cli: &Cli) -> Result<ImportGraph> {
    let config = graph_config(cli)?;

    let entry = config.entry_path();
    let result = GraphBuilder::new(config)
        .build()
        .with_context(|| format!("Failed to build import graph from {}", entry.display()))?;

    info!(
        modules = result.graph.node_count(),
        duration_ms = result.duration.as_millis() as u64,
        "graph ready"
    );
    if !result.warnings.is_empty() {
        warn!(count = result.warnings.len(), "warnings while building the graph");
    }
    for warning in &result.warnings {
        debug!(path = %warning.path.display(), kind = ?warning.kind, "{}", warning.message);
    }

    Ok(result.graph)
}
