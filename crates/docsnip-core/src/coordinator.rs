//! Session coordinator
//!
//! Maps test ids to live document sessions. Each session sits behind its own
//! lock, so tests running on different threads never contend with each other;
//! the map itself is a `DashMap`, making begin/end atomic per test id.

use crate::collaborators::{RepositoryLocator, SourceLocator};
use crate::config::GeneratorConfig;
use crate::error::{CoordinatorError, DocError};
use crate::generator::DocGenerator;
use crate::source_cache::SourceLoader;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use docsnip_fragment::ArtifactFormatter;
use docsnip_output::{compose, read_artifact, OutputWriter, WriteOutcome};
use docsnip_session::{DocumentSession, OutputArtifact};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;

/// Shared handle to one live session
pub type SharedSession = Arc<Mutex<DocumentSession>>;

/// Owns every open document session of a test run
#[derive(Debug)]
pub struct SessionCoordinator {
    config: GeneratorConfig,
    formatter: ArtifactFormatter,
    writer: OutputWriter,
    sources: SourceLoader,
    sessions: DashMap<String, SharedSession>,
}

impl SessionCoordinator {
    /// Create coordinator; sources resolve against `config.source_root`
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        let locator = Arc::new(RepositoryLocator::new(config.source_root.clone()));
        Self::with_locator(config, locator)
    }

    /// Create coordinator with a custom source locator
    #[must_use]
    pub fn with_locator(config: GeneratorConfig, locator: Arc<dyn SourceLocator>) -> Self {
        Self {
            formatter: ArtifactFormatter::new(config.format_options()),
            writer: OutputWriter::new(config.writer_options()),
            sources: SourceLoader::new(locator, config.source_cache_capacity),
            sessions: DashMap::new(),
            config,
        }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Formatter shared by all sessions
    #[inline]
    #[must_use]
    pub fn formatter(&self) -> &ArtifactFormatter {
        &self.formatter
    }

    /// Writer shared by all sessions
    #[inline]
    #[must_use]
    pub fn writer(&self) -> &OutputWriter {
        &self.writer
    }

    /// Source cache shared by all sessions
    #[inline]
    #[must_use]
    pub fn sources(&self) -> &SourceLoader {
        &self.sources
    }

    /// Open a document session for a test
    ///
    /// `name` is the test's documentation name; it is normalized into the
    /// document title with the configured separator.
    ///
    /// # Errors
    /// Returns `CoordinatorError::SessionAlreadyOpen` if the test already has
    /// an open session.
    pub fn begin_session(&self, test_id: &str, name: &str) -> Result<DocGenerator<'_>, CoordinatorError> {
        let session = match self.sessions.entry(test_id.to_string()) {
            Entry::Occupied(_) => {
                return Err(CoordinatorError::SessionAlreadyOpen {
                    test_id: test_id.to_string(),
                })
            }
            Entry::Vacant(slot) => {
                let session = DocumentSession::open_with_separator(name, &self.config.title_separator)
                    .with_origin(test_id);
                let shared = Arc::new(Mutex::new(session));
                slot.insert(Arc::clone(&shared));
                shared
            }
        };
        tracing::info!(test_id, title = session.lock().title(), "document session started");
        Ok(DocGenerator::new(self, test_id, session))
    }

    /// Capture handle for a test's open session
    ///
    /// # Errors
    /// Returns `CoordinatorError::NoSuchSession` if the test has none.
    pub fn generator(&self, test_id: &str) -> Result<DocGenerator<'_>, CoordinatorError> {
        let session = self
            .sessions
            .get(test_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| no_such_session(test_id))?;
        Ok(DocGenerator::new(self, test_id, session))
    }

    /// Finalize, write and retire a test's session
    ///
    /// The session is retired even when the write fails; the error is
    /// returned and the test may open a fresh session.
    ///
    /// # Errors
    /// - `CoordinatorError::NoSuchSession` if the test has no open session
    /// - `SessionError::AlreadyFinalized` if the session was finalized elsewhere
    /// - `WriteError::WriteFailure` if the document cannot be persisted
    pub fn end_session(&self, test_id: &str) -> Result<WriteOutcome, DocError> {
        let (_, session) = self
            .sessions
            .remove(test_id)
            .ok_or_else(|| no_such_session(test_id))?;

        let artifact = session.lock().finalize()?;
        let outcome = self.writer.write(&artifact, &self.config.output_dir).map_err(|e| {
            tracing::error!(test_id, title = artifact.title(), error = %e, "document write failed");
            e
        })?;
        tracing::info!(
            test_id,
            title = artifact.title(),
            path = %outcome.path().display(),
            written = outcome.is_written(),
            "document session ended"
        );
        Ok(outcome)
    }

    /// Drop a test's session without writing it
    ///
    /// The session is closed, so handles that outlive the abort fail with
    /// `SessionError::SessionClosed` instead of capturing into nothing.
    ///
    /// # Errors
    /// Returns `CoordinatorError::NoSuchSession` if the test has none.
    pub fn abort_session(&self, test_id: &str) -> Result<(), CoordinatorError> {
        let (_, session) = self
            .sessions
            .remove(test_id)
            .ok_or_else(|| no_such_session(test_id))?;
        let mut session = session.lock();
        let discarded = session.abort();
        tracing::warn!(
            test_id,
            title = session.title(),
            snippets = discarded,
            "document session aborted, nothing written"
        );
        Ok(())
    }

    /// Ids of tests with an open session, sorted
    #[must_use]
    pub fn open_sessions(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sessions.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Path the document of a title is written to
    #[must_use]
    pub fn destination(&self, title: &str) -> PathBuf {
        self.writer.destination(&self.config.output_dir, title)
    }

    /// Read back the document written for a title
    ///
    /// # Errors
    /// Returns `ReadError` if the file is missing or not a rendered document.
    pub fn read_document(&self, title: &str) -> Result<OutputArtifact, DocError> {
        Ok(read_artifact(self.destination(title))?)
    }

    /// Fill the `@@anchor` lines of a template from a written document
    ///
    /// # Errors
    /// - `ReadError` if the document cannot be read back
    /// - `ComposeError::UnboundAnchor` if the template names an anchor the
    ///   document lacks
    pub fn compose_document(&self, title: &str, template: &str) -> Result<String, DocError> {
        let document = self.read_document(title)?;
        Ok(compose(template, document.bindings())?)
    }

    /// Shut the coordinator down
    ///
    /// # Errors
    /// Returns `CoordinatorError::ResidualSessions` listing tests whose
    /// sessions were never ended; those sessions are discarded.
    pub fn shutdown(self) -> Result<(), CoordinatorError> {
        let residual = self.open_sessions();
        self.sessions.clear();
        if residual.is_empty() {
            tracing::debug!("coordinator shut down cleanly");
            Ok(())
        } else {
            tracing::error!(sessions = ?residual, "coordinator shut down with open sessions");
            Err(CoordinatorError::ResidualSessions { test_ids: residual })
        }
    }
}

impl Drop for SessionCoordinator {
    fn drop(&mut self) {
        if !self.sessions.is_empty() {
            tracing::error!(
                sessions = ?self.open_sessions(),
                "coordinator dropped with open document sessions; their documents are lost"
            );
        }
    }
}

fn no_such_session(test_id: &str) -> CoordinatorError {
    CoordinatorError::NoSuchSession {
        test_id: test_id.to_string(),
    }
}
