//! Formatted fragments
//!
//! A [`Fragment`] is the markup produced from one captured artifact. It is
//! immutable once built, and its text is normalized so that equal inputs
//! always produce byte-identical fragments.

use crate::digest::ContentDigest;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Kind of artifact a fragment was produced from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentKind {
    /// Rendered graph image inclusion
    Visualization,
    /// Syntax-tagged query block
    QueryExample,
    /// Literal block of captured output
    CapturedOutput,
    /// Hyperlink to the source repository
    SourceLink,
    /// Language-tagged excerpt of a source file
    SourceExcerpt,
}

impl FragmentKind {
    /// All kinds, in declaration order
    pub const ALL: [FragmentKind; 5] = [
        FragmentKind::Visualization,
        FragmentKind::QueryExample,
        FragmentKind::CapturedOutput,
        FragmentKind::SourceLink,
        FragmentKind::SourceExcerpt,
    ];

    /// Stable textual tag, used in serialized documents
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            FragmentKind::Visualization => "visualization",
            FragmentKind::QueryExample => "query-example",
            FragmentKind::CapturedOutput => "captured-output",
            FragmentKind::SourceLink => "source-link",
            FragmentKind::SourceExcerpt => "source-excerpt",
        }
    }
}

impl Display for FragmentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FragmentKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// Unrecognized fragment kind tag
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown fragment kind: '{0}'")]
pub struct UnknownKind(pub String);

/// Formatted markup for one captured artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    kind: FragmentKind,
    text: String,
}

impl Fragment {
    /// Build a fragment, normalizing line endings and trailing newlines
    #[must_use]
    pub fn new(kind: FragmentKind, text: impl AsRef<str>) -> Self {
        let lines: Vec<&str> = text
            .as_ref()
            .split('\n')
            .map(|line| line.trim_end_matches('\r'))
            .collect();
        let text = lines.join("\n").trim_end_matches('\n').to_string();
        Self { kind, text }
    }

    /// Fragment kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> FragmentKind {
        self.kind
    }

    /// Markup text, without a trailing newline
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text split into lines; empty text has no lines
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        let text = self.text.as_str();
        (!text.is_empty())
            .then(|| text.split('\n'))
            .into_iter()
            .flatten()
    }

    /// Number of lines in [`Fragment::lines`]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines().count()
    }

    /// Digest of kind tag and text
    #[must_use]
    pub fn digest(&self) -> ContentDigest {
        ContentDigest::of_text(&format!("{}\n{}", self.kind, self.text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_tag() {
        for kind in FragmentKind::ALL {
            assert_eq!(kind.as_str().parse::<FragmentKind>().unwrap(), kind);
        }
    }

    #[test]
    fn kind_rejects_unknown_tag() {
        let err = "diagram".parse::<FragmentKind>().unwrap_err();
        assert_eq!(err.to_string(), "unknown fragment kind: 'diagram'");
    }

    #[test]
    fn fragment_normalizes_line_endings() {
        let fragment = Fragment::new(FragmentKind::CapturedOutput, "a\r\nb\n\n");
        assert_eq!(fragment.text(), "a\nb");
        assert_eq!(fragment.line_count(), 2);
    }

    #[test]
    fn carriage_return_runs_are_normalized_once() {
        let fragment = Fragment::new(FragmentKind::CapturedOutput, "x\r\r\r\ny\r");
        assert_eq!(fragment.text(), "x\ny");
        assert_eq!(Fragment::new(fragment.kind(), fragment.text()), fragment);
    }

    #[test]
    fn inner_carriage_return_is_kept() {
        let fragment = Fragment::new(FragmentKind::CapturedOutput, "a\rb\r\n");
        assert_eq!(fragment.text(), "a\rb");
    }

    #[test]
    fn empty_fragment_has_no_lines() {
        let fragment = Fragment::new(FragmentKind::CapturedOutput, "");
        assert_eq!(fragment.line_count(), 0);
    }

    #[test]
    fn fragment_preserves_blank_inner_lines() {
        let fragment = Fragment::new(FragmentKind::SourceExcerpt, "a\n\nb");
        let lines: Vec<_> = fragment.lines().collect();
        assert_eq!(lines, vec!["a", "", "b"]);
    }

    #[test]
    fn digest_depends_on_kind() {
        let a = Fragment::new(FragmentKind::CapturedOutput, "x");
        let b = Fragment::new(FragmentKind::QueryExample, "x");
        assert_ne!(a.digest(), b.digest());
        assert_eq!(a.digest(), a.clone().digest());
    }
}
