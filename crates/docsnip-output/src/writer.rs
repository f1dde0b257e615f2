//! Output writer
//!
//! Persists a finalized document to `<dir>/<slug>.<ext>`. The file is staged
//! in a temporary file inside the destination directory and atomically
//! renamed over the target, so readers never observe a partial document and
//! concurrent writers of distinct titles never interfere. Rewriting identical
//! content leaves the file untouched.

use crate::error::WriteError;
use crate::layout::{destination_path, DEFAULT_EXTENSION};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use docsnip_fragment::ContentDigest;
use docsnip_session::OutputArtifact;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;

/// Writer behaviour
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterOptions {
    /// File extension, without the dot
    pub extension: String,
    /// `sync_all` the staged file before the rename
    pub durable: bool,
    /// Pause before the single retry
    pub retry_backoff: Duration,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            durable: false,
            retry_backoff: Duration::from_millis(50),
        }
    }
}

/// Result of a successful write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// New content persisted
    Written(PathBuf),
    /// Existing file already held identical content
    Unchanged(PathBuf),
}

impl WriteOutcome {
    /// Destination path
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Written(path) | Self::Unchanged(path) => path,
        }
    }

    /// Check if the file was (re)written
    #[must_use]
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written(_))
    }
}

/// Atomic, idempotent document writer
///
/// Shared across sessions; remembers which test last wrote each path so
/// title collisions between tests can be reported.
#[derive(Debug, Default)]
pub struct OutputWriter {
    options: WriterOptions,
    writers: DashMap<PathBuf, String>,
}

impl OutputWriter {
    /// Create writer with options
    #[must_use]
    pub fn new(options: WriterOptions) -> Self {
        Self {
            options,
            writers: DashMap::new(),
        }
    }

    /// Writer options
    #[inline]
    #[must_use]
    pub fn options(&self) -> &WriterOptions {
        &self.options
    }

    /// Path a document with this title is written to
    #[must_use]
    pub fn destination(&self, dir: &Path, title: &str) -> PathBuf {
        destination_path(dir, title, &self.options.extension)
    }

    /// Test id that last wrote a path, if any
    #[must_use]
    pub fn last_writer(&self, path: &Path) -> Option<String> {
        self.writers.get(path).map(|origin| origin.value().clone())
    }

    /// Persist a finalized document
    ///
    /// # Errors
    /// Returns `WriteError::WriteFailure` naming title and path when both the
    /// first attempt and the retry fail.
    pub fn write(&self, artifact: &OutputArtifact, dir: &Path) -> Result<WriteOutcome, WriteError> {
        let path = self.destination(dir, artifact.title());
        self.record_writer(artifact, &path);

        let text = artifact.render();
        if existing_digest(&path) == Some(ContentDigest::of_text(&text)) {
            tracing::debug!(title = artifact.title(), path = %path.display(), "document unchanged");
            return Ok(WriteOutcome::Unchanged(path));
        }

        if let Err(first) = self.persist(dir, &path, &text) {
            tracing::warn!(
                title = artifact.title(),
                path = %path.display(),
                error = %first,
                "document write failed, retrying"
            );
            std::thread::sleep(self.options.retry_backoff);
            self.persist(dir, &path, &text)
                .map_err(|source| WriteError::WriteFailure {
                    title: artifact.title().to_string(),
                    path: path.clone(),
                    source,
                })?;
        }

        tracing::info!(
            title = artifact.title(),
            path = %path.display(),
            snippets = artifact.bindings().len(),
            "document written"
        );
        Ok(WriteOutcome::Written(path))
    }

    fn persist(&self, dir: &Path, path: &Path, text: &str) -> std::io::Result<()> {
        std::fs::create_dir_all(dir)?;
        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(text.as_bytes())?;
        if self.options.durable {
            staged.as_file().sync_all()?;
        }
        staged.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn record_writer(&self, artifact: &OutputArtifact, path: &Path) {
        let Some(origin) = artifact.origin() else {
            return;
        };
        match self.writers.entry(path.to_path_buf()) {
            Entry::Occupied(mut previous) => {
                if previous.get() != origin {
                    tracing::warn!(
                        title = artifact.title(),
                        path = %path.display(),
                        previous = %previous.get(),
                        test_id = origin,
                        "title collision: document overwritten by another test"
                    );
                    previous.insert(origin.to_string());
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(origin.to_string());
            }
        }
    }
}

fn existing_digest(path: &Path) -> Option<ContentDigest> {
    std::fs::read(path).ok().map(|bytes| ContentDigest::of(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsnip_fragment::{Anchor, Fragment, FragmentKind};
    use pretty_assertions::assert_eq;
    use std::fmt::Write as _;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    /// Calls its hook with the message of every warn-level event
    struct WarnHook<F>(F);

    struct MessageVisitor<'a>(&'a mut String);

    impl tracing::field::Visit for MessageVisitor<'_> {
        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
            if field.name() == "message" {
                let _ = write!(self.0, "{value:?}");
            }
        }
    }

    impl<S, F> Layer<S> for WarnHook<F>
    where
        S: tracing::Subscriber,
        F: Fn(&str) + Send + Sync + 'static,
    {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == tracing::Level::WARN {
                let mut message = String::new();
                event.record(&mut MessageVisitor(&mut message));
                (self.0)(&message);
            }
        }
    }

    /// Run `f` on this thread, collecting warn messages and passing each to `on_warn`
    fn warnings_during<T>(
        on_warn: impl Fn(&str) + Send + Sync + 'static,
        f: impl FnOnce() -> T,
    ) -> (T, Vec<String>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let hook = WarnHook(move |message: &str| {
            on_warn(message);
            sink.lock().unwrap().push(message.to_string());
        });
        let result = tracing::subscriber::with_default(tracing_subscriber::registry().with(hook), f);
        let warnings = seen.lock().unwrap().clone();
        (result, warnings)
    }

    fn artifact(title: &str, output: &str) -> OutputArtifact {
        OutputArtifact::new(
            title,
            vec![(
                Anchor::new("output").unwrap(),
                Fragment::new(FragmentKind::CapturedOutput, format!("....\n{output}\n....")),
            )],
        )
    }

    fn quick() -> OutputWriter {
        OutputWriter::new(WriterOptions {
            retry_backoff: Duration::ZERO,
            ..WriterOptions::default()
        })
    }

    #[test]
    fn writes_rendered_text_to_slug_path() {
        let dir = tempfile::tempdir().unwrap();
        let doc = artifact("hello world Sample Chapter", "Hello graphy world!");

        let outcome = quick().write(&doc, dir.path()).unwrap();
        assert!(outcome.is_written());
        assert_eq!(outcome.path(), dir.path().join("hello-world-sample-chapter.asciidoc"));
        assert_eq!(std::fs::read_to_string(outcome.path()).unwrap(), doc.render());
    }

    #[test]
    fn identical_content_is_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let writer = quick();
        let doc = artifact("t", "x");

        assert!(writer.write(&doc, dir.path()).unwrap().is_written());
        let second = writer.write(&doc, dir.path()).unwrap();
        assert_eq!(second, WriteOutcome::Unchanged(writer.destination(dir.path(), "t")));
    }

    #[test]
    fn changed_content_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let writer = quick();
        writer.write(&artifact("t", "old"), dir.path()).unwrap();
        let outcome = writer.write(&artifact("t", "new"), dir.path()).unwrap();
        assert!(outcome.is_written());
        assert!(std::fs::read_to_string(outcome.path()).unwrap().contains("\nnew\n"));
    }

    #[test]
    fn creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let outcome = quick().write(&artifact("t", "x"), &nested).unwrap();
        assert!(outcome.path().starts_with(&nested));
        assert!(outcome.path().exists());
    }

    #[test]
    fn durable_mode_writes() {
        let dir = tempfile::tempdir().unwrap();
        let writer = OutputWriter::new(WriterOptions {
            durable: true,
            ..WriterOptions::default()
        });
        assert!(writer.write(&artifact("t", "x"), dir.path()).unwrap().is_written());
    }

    #[test]
    fn failure_after_retry_names_title_and_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let err = quick().write(&artifact("hello world", "x"), &blocker).unwrap_err();
        let WriteError::WriteFailure { title, path, .. } = &err;
        assert_eq!(title, "hello world");
        assert_eq!(path, &blocker.join("hello-world.asciidoc"));
        assert!(err.to_string().contains("hello world"));
    }

    #[test]
    fn retry_recovers_from_transient_failure() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        std::fs::write(&out, "in the way of the first attempt").unwrap();

        let blocker = out.clone();
        let (outcome, warnings) = warnings_during(
            move |message| {
                if message.contains("retrying") {
                    std::fs::remove_file(&blocker).unwrap();
                }
            },
            || quick().write(&artifact("t", "x"), &out),
        );

        let outcome = outcome.unwrap();
        assert!(outcome.is_written());
        assert_eq!(outcome.path(), out.join("t.asciidoc"));
        assert_eq!(warnings, vec!["document write failed, retrying".to_string()]);
    }

    #[test]
    fn tracks_last_writer_per_path() {
        let dir = tempfile::tempdir().unwrap();
        let writer = quick();
        let first = artifact("same title", "a").with_origin("tests::first");
        let second = artifact("same title", "b").with_origin("tests::second");

        let path = writer.write(&first, dir.path()).unwrap().path().to_path_buf();
        assert_eq!(writer.last_writer(&path).as_deref(), Some("tests::first"));

        let (rewrite, warnings) = warnings_during(|_| {}, || writer.write(&first, dir.path()));
        assert!(!rewrite.unwrap().is_written());
        assert!(warnings.is_empty());

        let (outcome, warnings) = warnings_during(|_| {}, || writer.write(&second, dir.path()));
        outcome.unwrap();
        assert_eq!(
            warnings,
            vec!["title collision: document overwritten by another test".to_string()]
        );
        assert_eq!(writer.last_writer(&path).as_deref(), Some("tests::second"));
        assert!(std::fs::read_to_string(&path).unwrap().contains("\nb\n"));
    }
}
