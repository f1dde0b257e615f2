//! Generator configuration
//!
//! Loaded from TOML or built in code; every field has a default so a config
//! file only needs the values it overrides.
//!
//! ```toml
//! output_dir = "target/docs"
//! extension = "adoc"
//! repository_url = "https://github.com/example/graphdb/blob/master"
//! durable = true
//! ```

use crate::error::ConfigError;
use docsnip_fragment::FormatOptions;
use docsnip_output::{WriterOptions, DEFAULT_EXTENSION};
use docsnip_session::DEFAULT_SEPARATOR;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for the documentation generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Directory documents are written to
    pub output_dir: PathBuf,
    /// Document file extension
    pub extension: String,
    /// Word separator in test names, replaced by spaces in titles
    pub title_separator: String,
    /// Base URL for source links
    pub repository_url: String,
    /// Root that repository-relative source paths resolve against
    pub source_root: PathBuf,
    /// Tab stop width for output snippets
    pub tab_width: usize,
    /// Language tag of query examples
    pub query_language: String,
    /// Flush documents to disk before the rename
    pub durable: bool,
    /// Pause before retrying a failed write
    pub retry_backoff_ms: u64,
    /// Maximum number of source files kept in memory
    pub source_cache_capacity: u64,
}

impl GeneratorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// - `ConfigError::Parse` for malformed TOML or unknown keys
    /// - `ConfigError::Invalid` for out-of-range values
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// - `ConfigError::Io` if the file cannot be read
    /// - see [`GeneratorConfig::from_toml_str`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// Returns `ConfigError::Invalid` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extension.contains(['/', '\\']) {
            return Err(ConfigError::Invalid {
                field: "extension",
                reason: format!("'{}' contains a path separator", self.extension),
            });
        }
        if self.query_language.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "query_language",
                reason: "must not be empty".to_string(),
            });
        }
        if self.source_cache_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "source_cache_capacity",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// With output directory
    #[inline]
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// With document extension
    #[inline]
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// With title separator
    #[inline]
    #[must_use]
    pub fn with_title_separator(mut self, separator: impl Into<String>) -> Self {
        self.title_separator = separator.into();
        self
    }

    /// With repository base URL
    #[inline]
    #[must_use]
    pub fn with_repository_url(mut self, url: impl Into<String>) -> Self {
        self.repository_url = url.into();
        self
    }

    /// With source root
    #[inline]
    #[must_use]
    pub fn with_source_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.source_root = root.into();
        self
    }

    /// With tab width
    #[inline]
    #[must_use]
    pub fn with_tab_width(mut self, width: usize) -> Self {
        self.tab_width = width;
        self
    }

    /// With durable writes
    #[inline]
    #[must_use]
    pub fn with_durable(mut self, durable: bool) -> Self {
        self.durable = durable;
        self
    }

    /// With retry backoff
    #[inline]
    #[must_use]
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff_ms = u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Formatter options derived from this config
    #[must_use]
    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            tab_width: self.tab_width,
            repository_url: self.repository_url.clone(),
            query_language: self.query_language.clone(),
        }
    }

    /// Writer options derived from this config
    #[must_use]
    pub fn writer_options(&self) -> WriterOptions {
        WriterOptions {
            extension: self.extension.clone(),
            durable: self.durable,
            retry_backoff: Duration::from_millis(self.retry_backoff_ms),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let format = FormatOptions::default();
        Self {
            output_dir: PathBuf::from("target/docs"),
            extension: DEFAULT_EXTENSION.to_string(),
            title_separator: DEFAULT_SEPARATOR.to_string(),
            repository_url: format.repository_url,
            source_root: PathBuf::from("."),
            tab_width: format.tab_width,
            query_language: format.query_language,
            durable: false,
            retry_backoff_ms: 50,
            source_cache_capacity: 256,
        }
    }
}
