//! docsnip Fragments
//!
//! Anchors, fragments and the pure formatting that turns captured test
//! artifacts into Asciidoc markup.
//!
//! # Core Concepts
//!
//! - [`Anchor`]: Name of a placeholder in a document template
//! - [`Fragment`]: Immutable formatted markup tagged with a [`FragmentKind`]
//! - [`Capture`]: A raw artifact (output, table, query, image, source)
//! - [`ArtifactFormatter`]: `Capture` → `Fragment`, deterministic and I/O free
//! - [`SourceReference`]: File plus optional marker-delimited region
//!
//! # Example
//!
//! ```rust,ignore
//! use docsnip_fragment::{ArtifactFormatter, Capture};
//!
//! let formatter = ArtifactFormatter::default();
//! let fragment = formatter.format(&Capture::Output("Hello graphy world!".into()))?;
//! assert_eq!(fragment.text(), "....\nHello graphy world!\n....");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod anchor;
mod digest;
mod format;
mod fragment;
pub mod region;
mod source;
mod table;

pub use anchor::{Anchor, AnchorError};
pub use digest::{ContentDigest, DigestError};
pub use format::{ArtifactFormatter, Capture, FormatError, FormatOptions, RenderHandle};
pub use fragment::{Fragment, FragmentKind, UnknownKind};
pub use region::{Region, RegionDefect};
pub use source::{LanguageTag, SourceReference};
pub use table::TabularResult;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
