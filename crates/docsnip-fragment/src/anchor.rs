//! Anchor names for document placeholders
//!
//! Provides [`Anchor`], the validated name of a placeholder inside a document
//! template (`graph`, `cypher`, `output`, a source-snippet id, ...).

use std::borrow::Borrow;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Name of a placeholder in a document template
///
/// Anchors are embedded in the delimiter lines of the serialized document,
/// so they may not be empty and may not contain whitespace or square brackets.
///
/// # Examples
/// - `graph`, `cypher`, `output`, `github`
/// - `sampleDocumentation`, `_sampleDocumentation`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Anchor(String);

impl Anchor {
    /// Create a validated anchor
    ///
    /// # Errors
    /// Returns error if the name is empty or contains forbidden characters
    pub fn new(name: impl Into<String>) -> Result<Self, AnchorError> {
        let name = name.into();
        if name.is_empty() {
            return Err(AnchorError::Empty);
        }
        if let Some(c) = name.chars().find(|c| c.is_whitespace() || *c == '[' || *c == ']') {
            return Err(AnchorError::InvalidCharacter { anchor: name, character: c });
        }
        Ok(Self(name))
    }

    /// Anchor name as a string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the owned name
    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Placeholder line used in templates (`@@name`)
    #[inline]
    #[must_use]
    pub fn placeholder(&self) -> String {
        format!("@@{}", self.0)
    }
}

impl Display for Anchor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Anchor {
    type Err = AnchorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for Anchor {
    type Error = AnchorError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for Anchor {
    type Error = AnchorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl AsRef<str> for Anchor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Anchor {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Errors related to anchor names
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnchorError {
    /// Empty anchor name
    #[error("anchor name is empty")]
    Empty,

    /// Forbidden character in anchor name
    #[error("invalid anchor '{anchor}': character {character:?} is not allowed")]
    InvalidCharacter { anchor: String, character: char },
}
