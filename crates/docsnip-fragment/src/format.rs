//! Artifact formatting
//!
//! [`ArtifactFormatter`] turns a raw captured value into a normalized
//! Asciidoc [`Fragment`]. Formatting is pure: no state, no I/O. Source text
//! for excerpts and links is handed in already loaded.

use crate::fragment::{Fragment, FragmentKind};
use crate::region::{self, Region, RegionDefect};
use crate::source::SourceReference;
use crate::table::TabularResult;
use std::fmt::{self, Display, Formatter, Write as _};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Opaque result of a visualization renderer, usually an image path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderHandle(PathBuf);

impl RenderHandle {
    /// Wrap a rendered image location
    #[must_use]
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self(target.into())
    }

    /// Image location
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Target with `/` separators, as used in inclusion directives
    #[must_use]
    pub fn target(&self) -> String {
        self.0
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
            .replace("//", "/")
    }
}

impl Display for RenderHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.target())
    }
}

/// A captured artifact, ready to be formatted
#[derive(Debug, Clone, PartialEq)]
pub enum Capture {
    /// Literal output string
    Output(String),
    /// Tabular query result, rendered as captured output
    Table(TabularResult),
    /// Query-language example
    Query(String),
    /// Rendered graph with its caption title
    Visualization { title: String, image: RenderHandle },
    /// Excerpt of a loaded source file
    SourceExcerpt { reference: SourceReference, source: Arc<str> },
    /// Repository link to a loaded source file
    SourceLink { reference: SourceReference, source: Arc<str> },
}

impl Capture {
    /// Kind of fragment this capture produces
    #[must_use]
    pub fn kind(&self) -> FragmentKind {
        match self {
            Capture::Output(_) | Capture::Table(_) => FragmentKind::CapturedOutput,
            Capture::Query(_) => FragmentKind::QueryExample,
            Capture::Visualization { .. } => FragmentKind::Visualization,
            Capture::SourceExcerpt { .. } => FragmentKind::SourceExcerpt,
            Capture::SourceLink { .. } => FragmentKind::SourceLink,
        }
    }
}

/// Formatting options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Tab stop width used when expanding tabs in literal output
    pub tab_width: usize,
    /// Base URL of the browsable source repository
    pub repository_url: String,
    /// Language tag for query examples
    pub query_language: String,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            tab_width: 8,
            repository_url: String::new(),
            query_language: "cypher".to_string(),
        }
    }
}

/// Errors raised while formatting a capture
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// Region markers missing, unbalanced, nested or overlapping
    #[error("malformed region '{region}' in {reference}: {defect}")]
    MalformedRegion {
        reference: String,
        region: String,
        #[source]
        defect: RegionDefect,
    },

    /// Referenced source or rendering could not be obtained
    #[error("missing source {reference}: {reason}")]
    MissingSource { reference: String, reason: String },

    /// Visualization title cannot be used as a block caption
    #[error("visualization title {title:?} cannot be used as a caption")]
    InvalidCaption { title: String },
}

impl FormatError {
    /// Create missing source error
    pub fn missing_source(reference: impl Display, reason: impl Into<String>) -> Self {
        Self::MissingSource {
            reference: reference.to_string(),
            reason: reason.into(),
        }
    }
}

/// Pure formatter from captures to fragments
#[derive(Debug, Clone, Default)]
pub struct ArtifactFormatter {
    options: FormatOptions,
}

impl ArtifactFormatter {
    /// Create formatter with options
    #[inline]
    #[must_use]
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    /// Formatting options in use
    #[inline]
    #[must_use]
    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    /// Format a capture into a fragment
    ///
    /// # Errors
    /// - `FormatError::MalformedRegion` for bad region markers
    /// - `FormatError::InvalidCaption` for a blank visualization title or one
    ///   starting with `.`
    pub fn format(&self, capture: &Capture) -> Result<Fragment, FormatError> {
        let text = match capture {
            Capture::Output(text) => self.output_block(text),
            Capture::Table(table) => self.output_block(&table.render()),
            Capture::Query(query) => {
                let header = format!("[source,{}]", self.options.query_language);
                delimited_block(Some(header.as_str()), '-', query)
            }
            Capture::Visualization { title, image } => visualization(title, image)?,
            Capture::SourceExcerpt { reference, source } => {
                let region = select_region(reference, source)?;
                let header = format!("[source,{}]", reference.language().name());
                delimited_block(Some(header.as_str()), '-', &region.text())
            }
            Capture::SourceLink { reference, source } => {
                let region = reference
                    .region()
                    .map(|_| select_region(reference, source))
                    .transpose()?;
                self.source_link(reference, region.as_ref())
            }
        };
        Ok(Fragment::new(capture.kind(), text))
    }

    fn output_block(&self, text: &str) -> String {
        let expanded: Vec<String> = text
            .split('\n')
            .map(|line| expand_tabs(line.trim_end_matches('\r'), self.options.tab_width))
            .collect();
        delimited_block(None, '.', &expanded.join("\n"))
    }

    fn source_link(&self, reference: &SourceReference, region: Option<&Region<'_>>) -> String {
        let base = self.options.repository_url.trim_end_matches('/');
        let mut url = if base.is_empty() {
            reference.url_path()
        } else {
            format!("{base}/{}", reference.url_path())
        };
        if let Some(region) = region {
            let _ = write!(url, "#L{}", region.start_line);
        }
        format!("link:{url}[{}]", escape_brackets(&reference.file_name()))
    }
}

fn select_region<'a>(
    reference: &SourceReference,
    source: &'a str,
) -> Result<Region<'a>, FormatError> {
    match reference.region() {
        None => Ok(region::whole_source(source)),
        Some(name) => region::extract_region(source, name).map_err(|defect| {
            FormatError::MalformedRegion {
                reference: reference.to_string(),
                region: name.to_string(),
                defect,
            }
        }),
    }
}

/// Caption line plus image directive; whitespace runs in the title collapse
/// to one space so the caption stays a single block-title line
fn visualization(title: &str, image: &RenderHandle) -> Result<String, FormatError> {
    let caption = title.split_whitespace().collect::<Vec<_>>().join(" ");
    if caption.is_empty() || caption.starts_with('.') {
        return Err(FormatError::InvalidCaption {
            title: title.to_string(),
        });
    }
    Ok(format!(".{caption}\nimage::{}[{}]", image.target(), escape_brackets(&caption)))
}

fn escape_brackets(text: &str) -> String {
    text.replace(']', "\\]")
}

/// Delimiter of `ch` long enough that no body line can close the block early
fn block_delimiter(ch: char, body: &str) -> String {
    let mut len = 4;
    loop {
        let candidate: String = std::iter::repeat(ch).take(len).collect();
        if !body.lines().any(|line| line.trim_end() == candidate) {
            return candidate;
        }
        len += 1;
    }
}

fn delimited_block(header: Option<&str>, ch: char, body: &str) -> String {
    let body = body.trim_end_matches('\n');
    let delimiter = block_delimiter(ch, body);
    let mut out = String::new();
    if let Some(header) = header {
        out.push_str(header);
        out.push('\n');
    }
    out.push_str(&delimiter);
    out.push('\n');
    if !body.is_empty() {
        out.push_str(body);
        out.push('\n');
    }
    out.push_str(&delimiter);
    out
}

fn expand_tabs(line: &str, width: usize) -> String {
    if width == 0 || !line.contains('\t') {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len());
    let mut column = 0;
    for c in line.chars() {
        if c == '\t' {
            let pad = width - column % width;
            out.extend(std::iter::repeat(' ').take(pad));
            column += pad;
        } else {
            out.push(c);
            column += 1;
        }
    }
    out
}
