//! Template composition
//!
//! A template line consisting solely of `@@<anchor>` (surrounding whitespace
//! ignored) is replaced by the fragment bound to that anchor. Everything else
//! passes through untouched.

use crate::error::ComposeError;
use docsnip_fragment::{Anchor, Fragment};

/// Substitute bound fragments into a template
///
/// # Errors
/// Returns `ComposeError::UnboundAnchor` for a placeholder with no binding.
pub fn compose(template: &str, bindings: &[(Anchor, Fragment)]) -> Result<String, ComposeError> {
    let mut out = Vec::new();
    for (idx, line) in template.split('\n').enumerate() {
        let Some(name) = placeholder(line) else {
            out.push(line);
            continue;
        };
        let fragment = bindings
            .iter()
            .find(|(anchor, _)| anchor.as_str() == name)
            .map(|(_, fragment)| fragment)
            .ok_or_else(|| ComposeError::UnboundAnchor {
                anchor: name.to_string(),
                line: idx + 1,
            })?;
        out.push(fragment.text());
    }
    Ok(out.join("\n"))
}

fn placeholder(line: &str) -> Option<&str> {
    let name = line.trim().strip_prefix("@@")?;
    Anchor::new(name).ok().map(|_| name)
}
