//! docsnip Output
//!
//! Egress for finalized documents: deterministic destination paths, atomic
//! and idempotent writes, and the inverse operations used downstream.
//!
//! # Core Concepts
//!
//! - [`OutputWriter`]: `OutputArtifact` → `<dir>/<slug>.<ext>` via temp file + rename
//! - [`WriteOutcome`]: `Written` or `Unchanged`
//! - [`read_artifact`]: written file → `OutputArtifact`
//! - [`compose`]: replace `@@anchor` lines of a template with fragments
//!
//! # Example
//!
//! ```rust,ignore
//! use docsnip_output::{OutputWriter, WriterOptions};
//!
//! let writer = OutputWriter::new(WriterOptions::default());
//! let outcome = writer.write(&artifact, "target/docs".as_ref())?;
//! println!("{}", outcome.path().display());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod compose;
mod error;
mod layout;
mod reader;
mod writer;

pub use compose::compose;
pub use error::{ComposeError, ReadError, WriteError};
pub use layout::{destination_path, slugify, DEFAULT_EXTENSION, UNTITLED_STEM};
pub use reader::read_artifact;
pub use writer::{OutputWriter, WriteOutcome, WriterOptions};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
