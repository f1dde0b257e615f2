//! Error types for document output
//!
//! - [`WriteError`]: persisting a finalized document
//! - [`ReadError`]: loading a written document back
//! - [`ComposeError`]: substituting fragments into a template

use docsnip_session::ArtifactParseError;
use std::path::PathBuf;

/// Errors while persisting a document
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// Write failed after the retry
    #[error("failed to write document '{title}' to {}: {source}", path.display())]
    WriteFailure {
        title: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl WriteError {
    /// Destination path of the failed write
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::WriteFailure { path, .. } => path,
        }
    }
}

/// Errors while reading a written document
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// File could not be read
    #[error("io error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File content is not a rendered document
    #[error("malformed document {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ArtifactParseError,
    },
}

/// Errors while composing a template
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComposeError {
    /// Template references an anchor with no binding
    #[error("line {line}: anchor '{anchor}' has no binding")]
    UnboundAnchor { anchor: String, line: usize },
}
