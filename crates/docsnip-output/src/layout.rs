//! Destination layout: document title → file path

use std::path::{Path, PathBuf};

/// Extension used when none is configured
pub const DEFAULT_EXTENSION: &str = "asciidoc";

/// File stem used for titles with no alphanumeric characters
pub const UNTITLED_STEM: &str = "untitled";

/// File stem derived from a document title
///
/// Lowercased; every run of non-alphanumeric characters collapses into a
/// single `-`; leading and trailing `-` are trimmed.
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        UNTITLED_STEM.to_string()
    } else {
        slug
    }
}

/// `<dir>/<slug>.<extension>`
#[must_use]
pub fn destination_path(dir: &Path, title: &str, extension: &str) -> PathBuf {
    let stem = slugify(title);
    let extension = extension.trim_start_matches('.');
    if extension.is_empty() {
        dir.join(stem)
    } else {
        dir.join(format!("{stem}.{extension}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn sample_chapter_slug() {
        assert_eq!(slugify("hello world Sample Chapter"), "hello-world-sample-chapter");
    }

    #[test]
    fn runs_collapse_and_edges_trim() {
        assert_eq!(slugify("  Cypher -- Start / Return!  "), "cypher-start-return");
    }

    #[test]
    fn empty_title_falls_back() {
        assert_eq!(slugify("***"), UNTITLED_STEM);
        assert_eq!(slugify(""), UNTITLED_STEM);
    }

    #[test]
    fn destination_uses_extension() {
        let dir = Path::new("target/docs");
        assert_eq!(
            destination_path(dir, "hello world", DEFAULT_EXTENSION),
            dir.join("hello-world.asciidoc")
        );
        assert_eq!(destination_path(dir, "hello world", ".adoc"), dir.join("hello-world.adoc"));
        assert_eq!(destination_path(dir, "hello world", ""), dir.join("hello-world"));
    }

    proptest! {
        #[test]
        fn slug_is_clean(title in "[A-Za-z0-9 _./:!-]{0,40}") {
            let slug = slugify(&title);
            prop_assert!(!slug.starts_with('-'));
            prop_assert!(!slug.ends_with('-'));
            prop_assert!(!slug.contains("--"));
            prop_assert_eq!(slugify(&slug), slug.clone());
        }
    }
}
