//! Loading written documents back

use crate::error::ReadError;
use docsnip_session::OutputArtifact;
use std::path::Path;

/// Read a written document back into title and ordered bindings
///
/// # Errors
/// - `ReadError::Io` if the file cannot be read
/// - `ReadError::Parse` if the content is not a rendered document
pub fn read_artifact(path: impl AsRef<Path>) -> Result<OutputArtifact, ReadError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    OutputArtifact::parse(&text).map_err(|source| ReadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_artifact(dir.path().join("absent.asciidoc")).unwrap_err();
        assert!(matches!(err, ReadError::Io { .. }));
    }

    #[test]
    fn garbage_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.asciidoc");
        std::fs::write(&path, "not a document\n").unwrap();
        let err = read_artifact(&path).unwrap_err();
        assert!(matches!(err, ReadError::Parse { .. }));
        assert!(err.to_string().contains("junk.asciidoc"));
    }
}
