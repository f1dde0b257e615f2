//! Capture facade handed to documented tests
//!
//! A [`DocGenerator`] is bound to one test's session. Its `add_*` methods turn
//! whatever the test produced into a capture, run it through the shared
//! formatter and bind it to an anchor. Collaborators (renderer, source
//! files) are consulted only after the anchor is known to be free.

use crate::collaborators::{QueryExecutor, VisualizationRenderer};
use crate::coordinator::{SessionCoordinator, SharedSession};
use crate::error::DocError;
use docsnip_fragment::{Anchor, Capture, FormatError, Fragment, SourceReference, TabularResult};
use docsnip_session::SessionError;
use std::sync::Arc;

/// Capture handle for one test's document
#[derive(Debug, Clone)]
pub struct DocGenerator<'c> {
    coordinator: &'c SessionCoordinator,
    test_id: String,
    session: SharedSession,
}

impl<'c> DocGenerator<'c> {
    pub(crate) fn new(coordinator: &'c SessionCoordinator, test_id: &str, session: SharedSession) -> Self {
        Self {
            coordinator,
            test_id: test_id.to_string(),
            session,
        }
    }

    /// Test id this handle captures for
    #[inline]
    #[must_use]
    pub fn test_id(&self) -> &str {
        &self.test_id
    }

    /// Title of the document being built
    #[must_use]
    pub fn title(&self) -> String {
        self.session.lock().title().to_string()
    }

    /// Fragment bound to an anchor so far
    #[must_use]
    pub fn fragment(&self, anchor: &str) -> Option<Fragment> {
        self.session.lock().registry().get(anchor).cloned()
    }

    /// Capture literal program output
    ///
    /// # Errors
    /// See [`DocGenerator::add_capture`].
    pub fn add_output(&self, anchor: &str, text: &str) -> Result<Fragment, DocError> {
        self.add_capture(anchor, &Capture::Output(text.to_string()))
    }

    /// Capture a query result as a text table
    ///
    /// # Errors
    /// See [`DocGenerator::add_capture`].
    pub fn add_table(&self, anchor: &str, table: &TabularResult) -> Result<Fragment, DocError> {
        self.add_capture(anchor, &Capture::Table(table.clone()))
    }

    /// Capture a query example
    ///
    /// # Errors
    /// See [`DocGenerator::add_capture`].
    pub fn add_query(&self, anchor: &str, query: &str) -> Result<Fragment, DocError> {
        self.add_capture(anchor, &Capture::Query(query.to_string()))
    }

    /// Run a query and capture its result table
    ///
    /// # Errors
    /// - `DocError::Collaborator` if the executor fails
    /// - see [`DocGenerator::add_capture`]
    pub fn add_query_result<G, E>(
        &self,
        anchor: &str,
        executor: &E,
        graph: &G,
        query: &str,
    ) -> Result<TabularResult, DocError>
    where
        E: QueryExecutor<G> + ?Sized,
    {
        let anchor = self.free_anchor(anchor)?;
        let table = executor.execute(query, graph)?;
        self.bind(anchor, &Capture::Table(table.clone()))?;
        Ok(table)
    }

    /// Render a graph and capture the image inclusion
    ///
    /// A renderer failure is reported as a missing source for the anchor.
    ///
    /// # Errors
    /// - `SessionError::Format` with `FormatError::MissingSource` if rendering fails
    /// - see [`DocGenerator::add_capture`]
    pub fn add_graph<G, R>(&self, anchor: &str, renderer: &R, graph: &G, title: &str) -> Result<Fragment, DocError>
    where
        R: VisualizationRenderer<G> + ?Sized,
    {
        let anchor = self.free_anchor(anchor)?;
        let image = renderer.render(graph, title).map_err(|e| {
            self.format_error(&anchor, FormatError::missing_source(format!("visualization '{title}'"), e.to_string()))
        })?;
        self.bind(
            anchor,
            &Capture::Visualization {
                title: title.to_string(),
                image,
            },
        )
    }

    /// Capture marker-delimited regions of a source file, one anchor per region
    ///
    /// Each region name doubles as its anchor. Every region is formatted
    /// before any is bound, so a bad region leaves the document untouched.
    ///
    /// # Errors
    /// - `SessionError::Format` with `FormatError::MissingSource` if the file
    ///   cannot be loaded, or `MalformedRegion` for bad markers
    /// - `SessionError::DuplicateAnchor` if a region is listed twice
    /// - see [`DocGenerator::add_capture`]
    pub fn add_source_snippets(&self, reference: &SourceReference, regions: &[&str]) -> Result<Vec<Fragment>, DocError> {
        let mut anchors: Vec<Anchor> = Vec::with_capacity(regions.len());
        for name in regions {
            let anchor = self.free_anchor(name)?;
            if anchors.contains(&anchor) {
                return Err(SessionError::DuplicateAnchor {
                    title: self.title(),
                    anchor,
                }
                .into());
            }
            anchors.push(anchor);
        }
        let Some(first) = anchors.first() else {
            return Ok(Vec::new());
        };
        let source = self
            .coordinator
            .sources()
            .load(reference)
            .map_err(|e| self.format_error(first, e))?;

        let formatter = self.coordinator.formatter();
        let formatted = anchors
            .into_iter()
            .map(|anchor| {
                let capture = Capture::SourceExcerpt {
                    reference: reference.clone().with_region(anchor.as_str()),
                    source: Arc::clone(&source),
                };
                match formatter.format(&capture) {
                    Ok(fragment) => Ok((anchor, fragment)),
                    Err(e) => Err(self.format_error(&anchor, e)),
                }
            })
            .collect::<Result<Vec<_>, DocError>>()?;

        let mut session = self.session.lock();
        formatted
            .into_iter()
            .map(|(anchor, fragment)| -> Result<Fragment, DocError> {
                Ok(session.insert(anchor, fragment)?.clone())
            })
            .collect()
    }

    /// Capture a link to a source file in the browsable repository
    ///
    /// With a region on the reference, the link points at its first line.
    ///
    /// # Errors
    /// - `SessionError::Format` if the region's file cannot be loaded
    /// - see [`DocGenerator::add_capture`]
    pub fn add_source_link(&self, anchor: &str, reference: &SourceReference) -> Result<Fragment, DocError> {
        let anchor = self.free_anchor(anchor)?;
        let source: Arc<str> = if reference.region().is_some() {
            self.coordinator
                .sources()
                .load(reference)
                .map_err(|e| self.format_error(&anchor, e))?
        } else {
            Arc::from("")
        };
        self.bind(
            anchor,
            &Capture::SourceLink {
                reference: reference.clone(),
                source,
            },
        )
    }

    /// Format any capture and bind it to an anchor
    ///
    /// # Errors
    /// - `DocError::InvalidAnchor` for a malformed anchor name
    /// - `SessionError::DuplicateAnchor` if the anchor is already bound
    /// - `SessionError::SessionClosed` if the session was ended or aborted
    /// - `SessionError::Format` if formatting fails
    pub fn add_capture(&self, anchor: &str, capture: &Capture) -> Result<Fragment, DocError> {
        self.bind(Anchor::new(anchor)?, capture)
    }

    fn bind(&self, anchor: Anchor, capture: &Capture) -> Result<Fragment, DocError> {
        let mut session = self.session.lock();
        let fragment = session
            .capture(anchor, capture, self.coordinator.formatter())?
            .clone();
        Ok(fragment)
    }

    /// Validate the anchor and check it is unbound in an open session
    fn free_anchor(&self, name: &str) -> Result<Anchor, DocError> {
        let anchor = Anchor::new(name)?;
        let session = self.session.lock();
        if !session.is_open() {
            return Err(SessionError::SessionClosed {
                title: session.title().to_string(),
                anchor,
            }
            .into());
        }
        if session.registry().contains(anchor.as_str()) {
            return Err(SessionError::DuplicateAnchor {
                title: session.title().to_string(),
                anchor,
            }
            .into());
        }
        Ok(anchor)
    }

    fn format_error(&self, anchor: &Anchor, source: FormatError) -> DocError {
        SessionError::Format {
            title: self.session.lock().title().to_string(),
            anchor: anchor.clone(),
            source,
        }
        .into()
    }
}
