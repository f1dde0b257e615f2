//! Document titles derived from test names

/// Default separator between words of a documented test name
pub const DEFAULT_SEPARATOR: &str = "_";

/// Turn a test name into a human-readable title
///
/// Every occurrence of `separator` becomes a single space, so
/// `hello_world_Sample_Chapter` reads `hello world Sample Chapter`. Applying
/// it to an already normalized title returns the title unchanged. An empty
/// separator leaves the name as is.
#[must_use]
pub fn normalize_title(name: &str, separator: &str) -> String {
    if separator.is_empty() {
        return name.to_string();
    }
    name.replace(separator, " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn replaces_separator_with_space() {
        assert_eq!(
            normalize_title("hello_world_Sample_Chapter", DEFAULT_SEPARATOR),
            "hello world Sample Chapter"
        );
    }

    #[test]
    fn multi_character_separator() {
        assert_eq!(normalize_title("a__b_c", "__"), "a b_c");
    }

    #[test]
    fn empty_separator_is_noop() {
        assert_eq!(normalize_title("a_b", ""), "a_b");
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(name in "[A-Za-z0-9_ ]{0,40}") {
            let once = normalize_title(&name, DEFAULT_SEPARATOR);
            let twice = normalize_title(&once, DEFAULT_SEPARATOR);
            prop_assert_eq!(once, twice);
        }
    }
}
