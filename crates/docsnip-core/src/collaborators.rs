//! Collaborator interfaces
//!
//! The engine never talks to a graph database, a query engine or a drawing
//! library directly. Documented tests supply implementations of these traits;
//! `docsnip-test-utils` carries in-memory ones.

use crate::error::CollaboratorError;
use docsnip_fragment::{RenderHandle, SourceReference, TabularResult};
use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Identifier of a materialized graph entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u64);

impl Display for EntityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One `<from> <relationship> <to>` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipSpec {
    /// Start node name
    pub from: String,
    /// Relationship type
    pub kind: String,
    /// End node name
    pub to: String,
}

impl FromStr for RelationshipSpec {
    type Err = CollaboratorError;

    fn from_str(statement: &str) -> Result<Self, Self::Err> {
        let mut words = statement.split_whitespace();
        match (words.next(), words.next(), words.next(), words.next()) {
            (Some(from), Some(kind), Some(to), None) => Ok(Self {
                from: from.to_string(),
                kind: kind.to_string(),
                to: to.to_string(),
            }),
            _ => Err(CollaboratorError::InvalidStatement(statement.to_string())),
        }
    }
}

/// Declarative description of a small test graph
///
/// ```rust,ignore
/// let graph = GraphDescription::parse(["I know you"])?;
/// assert_eq!(graph.nodes(), ["I", "you"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphDescription {
    nodes: Vec<String>,
    relationships: Vec<RelationshipSpec>,
}

impl GraphDescription {
    /// Create empty description
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse statements; blank statements are ignored
    ///
    /// # Errors
    /// Returns `CollaboratorError::InvalidStatement` for a statement that is
    /// not exactly three words.
    pub fn parse<I, S>(statements: I) -> Result<Self, CollaboratorError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut description = Self::new();
        for statement in statements {
            let statement = statement.as_ref();
            if statement.trim().is_empty() {
                continue;
            }
            description.push(statement.parse()?);
        }
        Ok(description)
    }

    /// Add a relationship, declaring its nodes on first mention
    pub fn push(&mut self, relationship: RelationshipSpec) {
        for name in [&relationship.from, &relationship.to] {
            if !self.nodes.iter().any(|n| n == name) {
                self.nodes.push(name.clone());
            }
        }
        self.relationships.push(relationship);
    }

    /// Node names in first-mention order
    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    /// Relationships in declaration order
    #[inline]
    #[must_use]
    pub fn relationships(&self) -> &[RelationshipSpec] {
        &self.relationships
    }
}

/// Builds a graph from a description
pub trait GraphProvider {
    /// Materialized graph
    type Graph;

    /// Build the graph
    ///
    /// # Errors
    /// Implementation specific; reported as `CollaboratorError::Provider`.
    fn materialize(&self, description: &GraphDescription) -> Result<Self::Graph, CollaboratorError>;

    /// Id of the node with the given name
    fn lookup(&self, graph: &Self::Graph, name: &str) -> Option<EntityId>;
}

/// Runs queries against a graph
pub trait QueryExecutor<G> {
    /// Execute a query
    ///
    /// # Errors
    /// Returns `CollaboratorError::Query` when the query cannot run.
    fn execute(&self, query: &str, graph: &G) -> Result<TabularResult, CollaboratorError>;
}

/// Draws a graph and returns a handle to the image
pub trait VisualizationRenderer<G> {
    /// Render the graph
    ///
    /// # Errors
    /// Returns `CollaboratorError::Render` when no image can be produced.
    fn render(&self, graph: &G, title: &str) -> Result<RenderHandle, CollaboratorError>;
}

/// Resolves a source reference to a readable file
pub trait SourceLocator: Send + Sync {
    /// Absolute path of the referenced file, if it exists
    fn locate(&self, reference: &SourceReference) -> Option<PathBuf>;
}

/// Locator resolving repository-relative paths against a root directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLocator {
    root: PathBuf,
}

impl RepositoryLocator {
    /// Create locator rooted at `root`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SourceLocator for RepositoryLocator {
    fn locate(&self, reference: &SourceReference) -> Option<PathBuf> {
        let path = self.root.join(reference.path());
        path.is_file().then_some(path)
    }
}
