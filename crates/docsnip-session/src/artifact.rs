//! Output artifacts: the serialized form of a finalized document
//!
//! ```text
//! = hello world Sample Chapter =
//!
//! // tag::output[]
//! // fragment: captured-output, 3 lines
//! ....
//! Hello graphy world!
//! ....
//! // end::output[]
//! ```
//!
//! Blocks use Asciidoctor tagged-region comments, so a downstream composer can
//! pull a single fragment with `include::file[tag=output]`. The line count
//! makes the block boundary unambiguous whatever the fragment contains.

use crate::error::ArtifactParseError;
use docsnip_fragment::{Anchor, ContentDigest, Fragment, FragmentKind};
use std::collections::HashSet;
use std::fmt::Write as _;

/// A finalized document ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    title: String,
    origin: Option<String>,
    bindings: Vec<(Anchor, Fragment)>,
}

impl OutputArtifact {
    /// Create artifact from title and ordered bindings
    #[must_use]
    pub fn new(title: impl Into<String>, bindings: Vec<(Anchor, Fragment)>) -> Self {
        Self {
            title: title.into(),
            origin: None,
            bindings,
        }
    }

    /// Record the test identifier that produced this document
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Document title
    #[inline]
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Test identifier that produced the document, if known
    #[inline]
    #[must_use]
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// Bindings in registration order
    #[inline]
    #[must_use]
    pub fn bindings(&self) -> &[(Anchor, Fragment)] {
        &self.bindings
    }

    /// Fragment bound to an anchor
    #[must_use]
    pub fn get(&self, anchor: &str) -> Option<&Fragment> {
        self.bindings
            .iter()
            .find(|(a, _)| a.as_str() == anchor)
            .map(|(_, f)| f)
    }

    /// Serialized document text
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "= {} =", self.title);
        for (anchor, fragment) in &self.bindings {
            let count = fragment.line_count();
            out.push('\n');
            let _ = writeln!(out, "// tag::{anchor}[]");
            let _ = writeln!(
                out,
                "// fragment: {}, {count} {}",
                fragment.kind(),
                if count == 1 { "line" } else { "lines" }
            );
            for line in fragment.lines() {
                out.push_str(line);
                out.push('\n');
            }
            let _ = writeln!(out, "// end::{anchor}[]");
        }
        out
    }

    /// Digest of the serialized text
    #[must_use]
    pub fn digest(&self) -> ContentDigest {
        ContentDigest::of_text(&self.render())
    }

    /// Parse serialized text back into an artifact (origin is not recorded)
    ///
    /// # Errors
    /// Returns [`ArtifactParseError`] when the text is not a rendered document.
    pub fn parse(text: &str) -> Result<Self, ArtifactParseError> {
        let lines: Vec<&str> = text.split('\n').collect();
        let title = lines
            .first()
            .and_then(|l| l.strip_prefix("= "))
            .and_then(|l| l.strip_suffix(" ="))
            .ok_or(ArtifactParseError::MissingHeader)?;

        let mut bindings = Vec::new();
        let mut seen = HashSet::new();
        let mut idx = 1;
        while idx < lines.len() {
            let line = lines[idx];
            if line.is_empty() {
                idx += 1;
                continue;
            }

            let anchor = parse_tag(line, "// tag::").ok_or_else(|| unexpected(idx, "block start", line))?;
            let anchor = Anchor::new(anchor).map_err(|_| unexpected(idx, "block start", line))?;
            if !seen.insert(anchor.clone()) {
                return Err(ArtifactParseError::DuplicateAnchor {
                    anchor: anchor.into_string(),
                });
            }

            let meta = lines.get(idx + 1).copied().unwrap_or_default();
            let (kind, count) =
                parse_meta(meta).ok_or_else(|| unexpected(idx + 1, "fragment metadata", meta))?;

            let body_start = idx + 2;
            let body_end = body_start + count;
            if body_end >= lines.len() {
                return Err(ArtifactParseError::Truncated {
                    anchor: anchor.into_string(),
                });
            }
            let end = lines[body_end];
            if parse_tag(end, "// end::") != Some(anchor.as_str()) {
                return Err(unexpected(body_end, "block end", end));
            }

            let fragment = Fragment::new(kind, lines[body_start..body_end].join("\n"));
            bindings.push((anchor, fragment));
            idx = body_end + 1;
        }

        Ok(Self::new(title, bindings))
    }
}

fn unexpected(idx: usize, expected: &'static str, found: &str) -> ArtifactParseError {
    ArtifactParseError::UnexpectedLine {
        line: idx + 1,
        expected,
        found: found.to_string(),
    }
}

fn parse_tag<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    line.strip_prefix(prefix)?.strip_suffix("[]")
}

fn parse_meta(line: &str) -> Option<(FragmentKind, usize)> {
    let rest = line.strip_prefix("// fragment: ")?;
    let (kind, count) = rest.split_once(", ")?;
    let count = count
        .strip_suffix(" lines")
        .or_else(|| count.strip_suffix(" line"))?;
    Some((kind.parse().ok()?, count.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsnip_fragment::{ArtifactFormatter, Capture};
    use pretty_assertions::assert_eq;

    fn sample() -> OutputArtifact {
        OutputArtifact::new(
            "hello world Sample Chapter",
            vec![
                (
                    Anchor::new("output").unwrap(),
                    Fragment::new(FragmentKind::CapturedOutput, "....\nHello graphy world!\n...."),
                ),
                (
                    Anchor::new("github").unwrap(),
                    Fragment::new(FragmentKind::SourceLink, "link:src/doc.rs[doc.rs]"),
                ),
            ],
        )
    }

    #[test]
    fn render_layout() {
        let expected = "\
= hello world Sample Chapter =

// tag::output[]
// fragment: captured-output, 3 lines
....
Hello graphy world!
....
// end::output[]

// tag::github[]
// fragment: source-link, 1 line
link:src/doc.rs[doc.rs]
// end::github[]
";
        assert_eq!(sample().render(), expected);
    }

    #[test]
    fn parse_reverses_render() {
        let artifact = sample();
        let parsed = OutputArtifact::parse(&artifact.render()).unwrap();
        assert_eq!(parsed, artifact);
    }

    #[test]
    fn block_may_contain_delimiter_like_lines() {
        let tricky = Fragment::new(
            FragmentKind::CapturedOutput,
            "....\n// end::x[]\n\n// tag::y[]\n....",
        );
        let artifact = OutputArtifact::new("t", vec![(Anchor::new("x").unwrap(), tricky)]);
        let parsed = OutputArtifact::parse(&artifact.render()).unwrap();
        assert_eq!(parsed, artifact);
    }

    #[test]
    fn carriage_returns_survive_rewrite() {
        let fragment = ArtifactFormatter::default()
            .format(&Capture::Output("x\r\r\r\ny".to_string()))
            .unwrap();
        let artifact = OutputArtifact::new("t", vec![(Anchor::new("output").unwrap(), fragment)]);
        let parsed = OutputArtifact::parse(&artifact.render()).unwrap();
        assert_eq!(parsed.render(), artifact.render());
        assert_eq!(parsed, artifact);
    }

    #[test]
    fn empty_fragment_round_trips() {
        let artifact = OutputArtifact::new(
            "t",
            vec![(
                Anchor::new("empty").unwrap(),
                Fragment::new(FragmentKind::CapturedOutput, ""),
            )],
        );
        assert!(artifact.render().contains("// fragment: captured-output, 0 lines\n// end::empty[]"));
        assert_eq!(OutputArtifact::parse(&artifact.render()).unwrap(), artifact);
    }

    #[test]
    fn parse_rejects_missing_header() {
        assert_eq!(
            OutputArtifact::parse("no header"),
            Err(ArtifactParseError::MissingHeader)
        );
    }

    #[test]
    fn parse_rejects_truncated_block() {
        let text = "= t =\n\n// tag::a[]\n// fragment: query-example, 5 lines\nx\n";
        assert_eq!(
            OutputArtifact::parse(text),
            Err(ArtifactParseError::Truncated { anchor: "a".to_string() })
        );
    }

    #[test]
    fn parse_rejects_mismatched_end() {
        let text = "= t =\n\n// tag::a[]\n// fragment: query-example, 1 line\nx\n// end::b[]\n";
        assert!(matches!(
            OutputArtifact::parse(text),
            Err(ArtifactParseError::UnexpectedLine { line: 6, .. })
        ));
    }

    #[test]
    fn parse_rejects_duplicate_anchor() {
        let block = "// tag::a[]\n// fragment: query-example, 0 lines\n// end::a[]\n";
        let text = format!("= t =\n\n{block}\n{block}");
        assert_eq!(
            OutputArtifact::parse(&text),
            Err(ArtifactParseError::DuplicateAnchor { anchor: "a".to_string() })
        );
    }

    #[test]
    fn lookup_by_anchor() {
        let artifact = sample();
        assert_eq!(artifact.get("github").unwrap().kind(), FragmentKind::SourceLink);
        assert!(artifact.get("graph").is_none());
    }
}
