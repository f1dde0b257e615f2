//! Source references and language tags
//!
//! A [`SourceReference`] names a source file (by module identifier and
//! repository-relative path) and optionally a marker-delimited region in it.

use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};

/// Reference to a source file, or a named region within it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceReference {
    module: String,
    region: Option<String>,
    path: PathBuf,
}

impl SourceReference {
    /// Reference a whole file
    #[must_use]
    pub fn new(module: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            module: module.into(),
            region: None,
            path: path.into(),
        }
    }

    /// Narrow the reference to a named region
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Module (or class) identifier the source belongs to
    #[inline]
    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Region marker name, if any
    #[inline]
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Repository-relative path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Repository-relative path with `/` separators, as used in URLs
    #[must_use]
    pub fn url_path(&self) -> String {
        self.path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// File name component, or the module identifier when there is none
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map_or_else(|| self.module.clone(), |n| n.to_string_lossy().into_owned())
    }

    /// Language tag derived from the file extension
    #[must_use]
    pub fn language(&self) -> LanguageTag {
        LanguageTag::for_path(&self.path)
    }
}

impl Display for SourceReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.module, self.path.display())?;
        if let Some(region) = &self.region {
            write!(f, "#{region}")?;
        }
        Ok(())
    }
}

/// Source-block language tag
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LanguageTag {
    /// Rust
    Rust,
    /// Java
    Java,
    /// Python
    Python,
    /// TypeScript
    TypeScript,
    /// JavaScript
    JavaScript,
    /// Go
    Go,
    /// Cypher query language
    Cypher,
    /// TOML
    Toml,
    /// JSON
    Json,
    /// YAML
    Yaml,
    /// Shell
    Bash,
    /// Unrecognized extension, used verbatim
    Other(String),
    /// No extension at all
    Text,
}

impl LanguageTag {
    /// Map a file extension (without dot) to a tag
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "rs" => LanguageTag::Rust,
            "java" => LanguageTag::Java,
            "py" => LanguageTag::Python,
            "ts" | "tsx" => LanguageTag::TypeScript,
            "js" | "jsx" => LanguageTag::JavaScript,
            "go" => LanguageTag::Go,
            "cypher" | "cyp" => LanguageTag::Cypher,
            "toml" => LanguageTag::Toml,
            "json" => LanguageTag::Json,
            "yaml" | "yml" => LanguageTag::Yaml,
            "sh" | "bash" => LanguageTag::Bash,
            "" => LanguageTag::Text,
            other => LanguageTag::Other(other.to_string()),
        }
    }

    /// Tag for a path, from its extension
    #[must_use]
    pub fn for_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map_or(LanguageTag::Text, Self::from_extension)
    }

    /// Name used in `[source,<name>]`
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            LanguageTag::Rust => "rust",
            LanguageTag::Java => "java",
            LanguageTag::Python => "python",
            LanguageTag::TypeScript => "typescript",
            LanguageTag::JavaScript => "javascript",
            LanguageTag::Go => "go",
            LanguageTag::Cypher => "cypher",
            LanguageTag::Toml => "toml",
            LanguageTag::Json => "json",
            LanguageTag::Yaml => "yaml",
            LanguageTag::Bash => "bash",
            LanguageTag::Other(ext) => ext,
            LanguageTag::Text => "text",
        }
    }
}
