//! Error types for document sessions
//!
//! Every variant names the document title, and the anchor where one is
//! involved, so a failed capture can be traced back to the test that issued it.

use docsnip_fragment::{Anchor, FormatError};

/// Errors raised by [`crate::DocumentSession`]
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Anchor bound twice in one document
    #[error("anchor '{anchor}' is already bound in document '{title}'")]
    DuplicateAnchor { title: String, anchor: Anchor },

    /// Capture issued after finalize or abort
    #[error("cannot capture '{anchor}': document '{title}' is closed")]
    SessionClosed { title: String, anchor: Anchor },

    /// Finalize called on a closed session
    #[error("document '{title}' is already finalized or aborted")]
    AlreadyFinalized { title: String },

    /// Formatting the captured artifact failed
    #[error("capture of '{anchor}' in document '{title}' failed: {source}")]
    Format {
        title: String,
        anchor: Anchor,
        #[source]
        source: FormatError,
    },
}

impl SessionError {
    /// Title of the document the error belongs to
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::DuplicateAnchor { title, .. }
            | Self::SessionClosed { title, .. }
            | Self::AlreadyFinalized { title }
            | Self::Format { title, .. } => title,
        }
    }

    /// Anchor involved, if any
    #[must_use]
    pub fn anchor(&self) -> Option<&Anchor> {
        match self {
            Self::DuplicateAnchor { anchor, .. }
            | Self::SessionClosed { anchor, .. }
            | Self::Format { anchor, .. } => Some(anchor),
            Self::AlreadyFinalized { .. } => None,
        }
    }
}

/// Errors parsing a serialized document back into bindings
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArtifactParseError {
    /// First line is not a `= title =` header
    #[error("line 1: expected document title header")]
    MissingHeader,

    /// Line does not fit the block structure
    #[error("line {line}: expected {expected}, found '{found}'")]
    UnexpectedLine {
        line: usize,
        expected: &'static str,
        found: String,
    },

    /// Block declares more lines than the document holds
    #[error("block '{anchor}' is truncated")]
    Truncated { anchor: String },

    /// Same anchor appears twice
    #[error("anchor '{anchor}' appears more than once")]
    DuplicateAnchor { anchor: String },
}
