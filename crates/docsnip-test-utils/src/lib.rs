//! Testing utilities for docsnip workspace
//!
//! Shared test collaborators, fixtures, and logging setup.

#![allow(missing_docs)]

use docsnip_core::{
    CollaboratorError, EntityId, GeneratorConfig, GraphDescription, GraphProvider, QueryExecutor,
    RepositoryLocator, SessionCoordinator, VisualizationRenderer,
};
use docsnip_fragment::{RenderHandle, TabularResult};
use regex::Regex;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

/// Install a test-friendly tracing subscriber; `RUST_LOG` controls the filter
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Graph built by [`MemoryGraph`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryGraph {
    pub nodes: Vec<(EntityId, String)>,
    pub relationships: Vec<(EntityId, String, EntityId)>,
}

impl InMemoryGraph {
    pub fn node(&self, id: EntityId) -> Option<&str> {
        self.nodes
            .iter()
            .find(|(node, _)| *node == id)
            .map(|(_, name)| name.as_str())
    }

    pub fn id_of(&self, name: &str) -> Option<EntityId> {
        self.nodes.iter().find(|(_, n)| n == name).map(|(id, _)| *id)
    }

    /// Graphviz description
    pub fn to_dot(&self, title: &str) -> String {
        let mut dot = String::new();
        let _ = writeln!(dot, "digraph \"{}\" {{", title.replace('"', "\\\""));
        for (id, name) in &self.nodes {
            let _ = writeln!(dot, "  N{id} [label=\"{name}\"];");
        }
        for (from, kind, to) in &self.relationships {
            let _ = writeln!(dot, "  N{from} -> N{to} [label=\"{kind}\"];");
        }
        dot.push('}');
        dot.push('\n');
        dot
    }
}

/// In-memory provider, executor and renderer
///
/// Node ids start at 1 in first-mention order. The executor understands
/// `start <var> = node(<id>) return <var>`; the renderer writes a `.dot`
/// file into its image directory and returns that file as the handle.
#[derive(Debug, Clone)]
pub struct MemoryGraph {
    image_dir: PathBuf,
}

impl MemoryGraph {
    pub fn new(image_dir: impl Into<PathBuf>) -> Self {
        Self {
            image_dir: image_dir.into(),
        }
    }

    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }
}

impl GraphProvider for MemoryGraph {
    type Graph = InMemoryGraph;

    fn materialize(&self, description: &GraphDescription) -> Result<InMemoryGraph, CollaboratorError> {
        let nodes: Vec<(EntityId, String)> = description
            .nodes()
            .iter()
            .zip(1..)
            .map(|(name, id)| (EntityId(id), name.clone()))
            .collect();
        let graph = InMemoryGraph {
            nodes,
            relationships: Vec::new(),
        };
        let relationships = description
            .relationships()
            .iter()
            .map(|rel| {
                let from = graph.id_of(&rel.from);
                let to = graph.id_of(&rel.to);
                match (from, to) {
                    (Some(from), Some(to)) => Ok((from, rel.kind.clone(), to)),
                    _ => Err(CollaboratorError::Provider(format!(
                        "relationship {} {} {} names an undeclared node",
                        rel.from, rel.kind, rel.to
                    ))),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(InMemoryGraph { relationships, ..graph })
    }

    fn lookup(&self, graph: &InMemoryGraph, name: &str) -> Option<EntityId> {
        graph.id_of(name)
    }
}

fn start_query() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^\s*start\s+(\w+)\s*=\s*node\((\d+)\)\s+return\s+(\w+)\s*;?\s*$")
            .unwrap_or_else(|e| panic!("invalid query pattern: {e}"))
    })
}

impl QueryExecutor<InMemoryGraph> for MemoryGraph {
    fn execute(&self, query: &str, graph: &InMemoryGraph) -> Result<TabularResult, CollaboratorError> {
        let fail = |reason: &str| CollaboratorError::Query {
            query: query.to_string(),
            reason: reason.to_string(),
        };
        let caps = start_query()
            .captures(query)
            .ok_or_else(|| fail("unsupported query"))?;
        if caps[1] != caps[3] {
            return Err(fail("returned identifier is not bound"));
        }
        let id = caps[2].parse().map(EntityId).map_err(|_| fail("bad node id"))?;

        let mut table = TabularResult::new([&caps[3]]);
        if let Some(name) = graph.node(id) {
            table = table.with_row([format!("Node[{id}]{{name:\"{name}\"}}")]);
        }
        Ok(table)
    }
}

impl VisualizationRenderer<InMemoryGraph> for MemoryGraph {
    fn render(&self, graph: &InMemoryGraph, title: &str) -> Result<RenderHandle, CollaboratorError> {
        let path = self
            .image_dir
            .join(format!("{}.dot", docsnip_output::slugify(title)));
        std::fs::create_dir_all(&self.image_dir)
            .and_then(|()| std::fs::write(&path, graph.to_dot(title)))
            .map_err(|e| CollaboratorError::Render {
                title: title.to_string(),
                reason: e.to_string(),
            })?;
        Ok(RenderHandle::new(path))
    }
}

/// Locator resolving repository-relative paths against `root`
///
/// Pass `env!("CARGO_MANIFEST_DIR")` to resolve against the calling crate.
pub fn fixture_locator(root: impl Into<PathBuf>) -> RepositoryLocator {
    RepositoryLocator::new(root)
}

/// Config writing into `dir` with no retry delay
pub fn scratch_config(dir: &Path, source_root: impl Into<PathBuf>) -> GeneratorConfig {
    GeneratorConfig::new()
        .with_output_dir(dir.join("docs"))
        .with_source_root(source_root)
        .with_repository_url("https://github.com/example/graphdb/blob/master")
        .with_retry_backoff(Duration::ZERO)
}

/// Scratch directory plus a coordinator writing into it
pub fn setup_coordinator(source_root: impl Into<PathBuf>) -> (tempfile::TempDir, SessionCoordinator) {
    init_tracing();
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("scratch dir: {e}"));
    let coordinator = SessionCoordinator::new(scratch_config(dir.path(), source_root));
    (dir, coordinator)
}
