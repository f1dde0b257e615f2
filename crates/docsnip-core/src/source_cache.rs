//! Cached source loading using moka
//!
//! Many documents excerpt the same file; each file is read once and shared
//! by every session of the coordinator.

use crate::collaborators::SourceLocator;
use docsnip_fragment::{FormatError, SourceReference};
use moka::sync::Cache;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Source texts keyed by resolved path
#[derive(Clone)]
pub struct SourceLoader {
    locator: Arc<dyn SourceLocator>,
    cache: Cache<PathBuf, Arc<str>>,
}

impl SourceLoader {
    /// Create loader with max number of cached files
    #[must_use]
    pub fn new(locator: Arc<dyn SourceLocator>, max_capacity: u64) -> Self {
        Self {
            locator,
            cache: Cache::new(max_capacity),
        }
    }

    /// Text of the referenced file
    ///
    /// # Errors
    /// Returns `FormatError::MissingSource` if the file cannot be located or read.
    pub fn load(&self, reference: &SourceReference) -> Result<Arc<str>, FormatError> {
        let path = self
            .locator
            .locate(reference)
            .ok_or_else(|| FormatError::missing_source(reference, "file not found"))?;

        self.cache
            .try_get_with(path.clone(), || {
                tracing::trace!(path = %path.display(), "reading source");
                std::fs::read_to_string(&path).map(Arc::from)
            })
            .map_err(|e| FormatError::missing_source(reference, e.to_string()))
    }

    /// Drop a cached file so the next load reads it again
    pub fn invalidate(&self, path: &Path) {
        self.cache.invalidate(path);
    }

    /// Number of cached files
    #[must_use]
    pub fn cached_files(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }
}

impl std::fmt::Debug for SourceLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceLoader")
            .field("cached_files", &self.cache.entry_count())
            .finish_non_exhaustive()
    }
}
