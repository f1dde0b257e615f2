//! docsnip Core
//!
//! Drives documentation capture for documented tests: a coordinator owns one
//! session per running test, hands out capture handles, and writes each
//! finished document to disk.
//!
//! # Core Concepts
//!
//! - [`SessionCoordinator`]: test id → live session; begin, end, abort, shutdown
//! - [`DocGenerator`]: per-test capture facade (`add_output`, `add_graph`, ...)
//! - [`GeneratorConfig`]: output directory, extension, separators, URLs (TOML)
//! - Collaborators: [`GraphProvider`], [`QueryExecutor`],
//!   [`VisualizationRenderer`], [`SourceLocator`]
//! - [`DocError`]: umbrella error for every operation
//!
//! # Example
//!
//! ```rust,ignore
//! use docsnip_core::{GeneratorConfig, SessionCoordinator};
//!
//! let coordinator = SessionCoordinator::new(GeneratorConfig::load("docsnip.toml")?);
//! let gen = coordinator.begin_session("manual::hello", "hello_world_Sample_Chapter")?;
//! gen.add_output("output", "Hello graphy world!")?;
//! coordinator.end_session("manual::hello")?;
//! coordinator.shutdown()?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod collaborators;
mod config;
mod coordinator;
mod error;
mod generator;
mod source_cache;

pub use collaborators::{
    EntityId, GraphDescription, GraphProvider, QueryExecutor, RelationshipSpec, RepositoryLocator,
    SourceLocator, VisualizationRenderer,
};
pub use config::GeneratorConfig;
pub use coordinator::{SessionCoordinator, SharedSession};
pub use error::{CollaboratorError, ConfigError, CoordinatorError, DocError};
pub use generator::DocGenerator;
pub use source_cache::SourceLoader;

// Re-exported so documented tests need a single dependency
pub use docsnip_fragment::{Anchor, Capture, Fragment, FragmentKind, RenderHandle, SourceReference, TabularResult};
pub use docsnip_output::{compose, read_artifact, WriteOutcome};
pub use docsnip_session::OutputArtifact;

/// Result type for docsnip operations
pub type Result<T> = std::result::Result<T, DocError>;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
