//! Error types for docsnip Core
//!
//! Provides error handling for:
//! - Session lifecycle across tests (coordinator)
//! - Configuration loading
//! - Collaborator failures (graph, query, renderer)
//!
//! [`DocError`] is the umbrella every public operation of this crate returns;
//! the per-crate errors convert into it with `?`.

use docsnip_fragment::AnchorError;
use docsnip_output::{ComposeError, ReadError, WriteError};
use docsnip_session::SessionError;
use std::path::PathBuf;

/// Main docsnip error type
#[derive(Debug, thiserror::Error)]
pub enum DocError {
    /// Anchor name rejected
    #[error("invalid anchor: {0}")]
    InvalidAnchor(#[from] AnchorError),

    /// Capture or finalize failed
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Persisting a document failed
    #[error(transparent)]
    Write(#[from] WriteError),

    /// Reading a document back failed
    #[error(transparent)]
    Read(#[from] ReadError),

    /// Template composition failed
    #[error(transparent)]
    Compose(#[from] ComposeError),

    /// Session lifecycle misuse
    #[error(transparent)]
    Coordinator(#[from] CoordinatorError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Graph, query or renderer failure
    #[error("collaborator failed: {0}")]
    Collaborator(#[from] CollaboratorError),
}

impl DocError {
    /// Check if error is a write failure (the only retried operation)
    #[inline]
    #[must_use]
    pub fn is_write_failure(&self) -> bool {
        matches!(self, Self::Write(WriteError::WriteFailure { .. }))
    }

    /// Test id involved, if the error concerns the session lifecycle
    #[must_use]
    pub fn test_id(&self) -> Option<&str> {
        match self {
            Self::Coordinator(
                CoordinatorError::SessionAlreadyOpen { test_id }
                | CoordinatorError::NoSuchSession { test_id },
            ) => Some(test_id),
            _ => None,
        }
    }
}

/// Session lifecycle errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoordinatorError {
    /// Test already has an open session
    #[error("test '{test_id}' already has an open document session")]
    SessionAlreadyOpen { test_id: String },

    /// Test has no open session
    #[error("test '{test_id}' has no open document session")]
    NoSuchSession { test_id: String },

    /// Sessions still open at shutdown
    #[error("{} document session(s) never ended: {}", test_ids.len(), test_ids.join(", "))]
    ResidualSessions { test_ids: Vec<String> },
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("io error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`crate::GeneratorConfig`]
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Value out of range
    #[error("invalid value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Collaborator errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollaboratorError {
    /// Graph statement is not `<from> <relationship> <to>`
    #[error("invalid graph statement: '{0}'")]
    InvalidStatement(String),

    /// Graph could not be materialized
    #[error("graph provider failed: {0}")]
    Provider(String),

    /// Query could not be executed
    #[error("query '{query}' failed: {reason}")]
    Query { query: String, reason: String },

    /// Visualization could not be rendered
    #[error("rendering '{title}' failed: {reason}")]
    Render { title: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn residual_sessions_lists_ids() {
        let err = CoordinatorError::ResidualSessions {
            test_ids: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(err.to_string(), "2 document session(s) never ended: a, b");
    }

    #[test]
    fn umbrella_conversion_keeps_test_id() {
        let err: DocError = CoordinatorError::NoSuchSession {
            test_id: "suite::hello".to_string(),
        }
        .into();
        assert_eq!(err.test_id(), Some("suite::hello"));
        assert!(!err.is_write_failure());
        assert!(err.to_string().contains("suite::hello"));
    }

    #[test]
    fn anchor_error_converts() {
        let err: DocError = docsnip_fragment::Anchor::new("").unwrap_err().into();
        assert!(matches!(err, DocError::InvalidAnchor(_)));
    }
}
