//! Snippet registry
//!
//! Single-writer map from anchor to fragment: each anchor may be bound exactly
//! once per document, and iteration follows registration order.

use docsnip_fragment::{Anchor, Fragment};
use indexmap::map::Entry;
use indexmap::IndexMap;

/// Anchor already bound in this registry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("anchor '{0}' is already bound")]
pub struct DuplicateAnchor(pub Anchor);

/// Ordered, single-writer anchor → fragment map
#[derive(Debug, Clone, Default)]
pub struct SnippetRegistry {
    bindings: IndexMap<Anchor, Fragment>,
}

impl SnippetRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a fragment to an anchor
    ///
    /// # Errors
    /// Returns [`DuplicateAnchor`] if the anchor is already bound, whatever the
    /// fragment; the existing binding is left untouched.
    pub fn register(&mut self, anchor: Anchor, fragment: Fragment) -> Result<(), DuplicateAnchor> {
        match self.bindings.entry(anchor) {
            Entry::Occupied(entry) => Err(DuplicateAnchor(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(fragment);
                Ok(())
            }
        }
    }

    /// Fragment bound to an anchor
    #[inline]
    #[must_use]
    pub fn get(&self, anchor: &str) -> Option<&Fragment> {
        self.bindings.get(anchor)
    }

    /// Check if anchor is bound
    #[inline]
    #[must_use]
    pub fn contains(&self, anchor: &str) -> bool {
        self.bindings.contains_key(anchor)
    }

    /// Bindings in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&Anchor, &Fragment)> {
        self.bindings.iter()
    }

    /// Anchor names in registration order
    pub fn anchors(&self) -> impl Iterator<Item = &Anchor> {
        self.bindings.keys()
    }

    /// Number of bindings
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Owned copy of the bindings, in registration order
    #[must_use]
    pub fn to_bindings(&self) -> Vec<(Anchor, Fragment)> {
        self.bindings
            .iter()
            .map(|(a, f)| (a.clone(), f.clone()))
            .collect()
    }
}
