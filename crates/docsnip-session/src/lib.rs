//! docsnip Sessions
//!
//! Per-document capture state: the anchor registry, the session lifecycle
//! and the serialized document produced at finalize.
//!
//! # Core Concepts
//!
//! - [`DocumentSession`]: Open → Finalized lifecycle for one document
//! - [`SnippetRegistry`]: Ordered anchor → fragment map, one binding per anchor
//! - [`OutputArtifact`]: Finalized document; renders to and parses from text
//! - [`normalize_title`]: Test name → human-readable title
//!
//! # Example
//!
//! ```rust,ignore
//! use docsnip_fragment::{Anchor, ArtifactFormatter, Capture};
//! use docsnip_session::DocumentSession;
//!
//! let formatter = ArtifactFormatter::default();
//! let mut session = DocumentSession::open("hello_world_Sample_Chapter");
//! session.capture(Anchor::new("output")?, &Capture::Output("Hello graphy world!".into()), &formatter)?;
//! let artifact = session.finalize()?;
//! assert_eq!(artifact.title(), "hello world Sample Chapter");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod artifact;
mod error;
mod registry;
mod session;
mod title;

pub use artifact::OutputArtifact;
pub use error::{ArtifactParseError, SessionError};
pub use registry::{DuplicateAnchor, SnippetRegistry};
pub use session::{DocumentSession, SessionState};
pub use title::{normalize_title, DEFAULT_SEPARATOR};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
