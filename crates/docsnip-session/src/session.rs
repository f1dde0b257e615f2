//! Document sessions
//!
//! A [`DocumentSession`] is the live capture state of one document. It is
//! opened when a documented test starts, receives captures while the test
//! runs, and is finalized exactly once into an [`OutputArtifact`].

use crate::artifact::OutputArtifact;
use crate::error::SessionError;
use crate::registry::{DuplicateAnchor, SnippetRegistry};
use crate::title::{normalize_title, DEFAULT_SEPARATOR};
use docsnip_fragment::{Anchor, ArtifactFormatter, Capture, Fragment};

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Accepting captures
    Open,
    /// Finalized; captures are rejected
    Finalized,
    /// Discarded without output; captures are rejected
    Aborted,
}

/// Live capture state of one document
#[derive(Debug, Clone)]
pub struct DocumentSession {
    title: String,
    origin: Option<String>,
    registry: SnippetRegistry,
    state: SessionState,
}

impl DocumentSession {
    /// Open a session, deriving the title with the default `_` separator
    #[must_use]
    pub fn open(name: &str) -> Self {
        Self::open_with_separator(name, DEFAULT_SEPARATOR)
    }

    /// Open a session, deriving the title with a custom separator
    #[must_use]
    pub fn open_with_separator(name: &str, separator: &str) -> Self {
        let title = normalize_title(name, separator);
        tracing::debug!(title = %title, "document session opened");
        Self {
            title,
            origin: None,
            registry: SnippetRegistry::new(),
            state: SessionState::Open,
        }
    }

    /// Record the test identifier driving this session
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Normalized document title
    #[inline]
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Test identifier driving this session, if recorded
    #[inline]
    #[must_use]
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether captures are still accepted
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    /// Captured bindings so far
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &SnippetRegistry {
        &self.registry
    }

    /// Format a capture and bind it to an anchor
    ///
    /// # Errors
    /// - `SessionError::SessionClosed` after finalize or abort
    /// - `SessionError::DuplicateAnchor` if the anchor is already bound
    /// - `SessionError::Format` if the capture cannot be formatted
    pub fn capture(
        &mut self,
        anchor: Anchor,
        capture: &Capture,
        formatter: &ArtifactFormatter,
    ) -> Result<&Fragment, SessionError> {
        self.ensure_open(&anchor)?;
        if self.registry.contains(anchor.as_str()) {
            return Err(self.duplicate(anchor));
        }

        let fragment = formatter.format(capture).map_err(|source| SessionError::Format {
            title: self.title.clone(),
            anchor: anchor.clone(),
            source,
        })?;
        self.bind(anchor, fragment)
    }

    /// Bind an already formatted fragment to an anchor
    ///
    /// # Errors
    /// - `SessionError::SessionClosed` after finalize or abort
    /// - `SessionError::DuplicateAnchor` if the anchor is already bound
    pub fn insert(&mut self, anchor: Anchor, fragment: Fragment) -> Result<&Fragment, SessionError> {
        self.ensure_open(&anchor)?;
        self.bind(anchor, fragment)
    }

    /// Close the session and produce its output artifact
    ///
    /// # Errors
    /// Returns `SessionError::AlreadyFinalized` on the second call or after
    /// [`DocumentSession::abort`].
    pub fn finalize(&mut self) -> Result<OutputArtifact, SessionError> {
        if !self.is_open() {
            return Err(SessionError::AlreadyFinalized {
                title: self.title.clone(),
            });
        }
        self.state = SessionState::Finalized;
        tracing::debug!(title = %self.title, snippets = self.registry.len(), "document session finalized");

        let artifact = OutputArtifact::new(self.title.clone(), self.registry.to_bindings());
        Ok(match &self.origin {
            Some(origin) => artifact.with_origin(origin.clone()),
            None => artifact,
        })
    }

    /// Close the session without producing output
    ///
    /// Returns the number of snippets discarded; a closed session is left as is.
    pub fn abort(&mut self) -> usize {
        if !self.is_open() {
            return 0;
        }
        self.state = SessionState::Aborted;
        tracing::debug!(title = %self.title, snippets = self.registry.len(), "document session aborted");
        self.registry.len()
    }

    fn ensure_open(&self, anchor: &Anchor) -> Result<(), SessionError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(SessionError::SessionClosed {
                title: self.title.clone(),
                anchor: anchor.clone(),
            })
        }
    }

    fn bind(&mut self, anchor: Anchor, fragment: Fragment) -> Result<&Fragment, SessionError> {
        let key = anchor.clone();
        self.registry
            .register(anchor, fragment)
            .map_err(|DuplicateAnchor(anchor)| self.duplicate(anchor))?;
        tracing::trace!(title = %self.title, anchor = %key, "snippet captured");
        self.registry
            .get(key.as_str())
            .ok_or_else(|| self.duplicate(key.clone()))
    }

    fn duplicate(&self, anchor: Anchor) -> SessionError {
        SessionError::DuplicateAnchor {
            title: self.title.clone(),
            anchor,
        }
    }
}
