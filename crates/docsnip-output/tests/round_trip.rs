//! Write → read → compose through the public API

use docsnip_fragment::{Anchor, ArtifactFormatter, Capture, TabularResult};
use docsnip_output::{compose, read_artifact, OutputWriter, WriteOutcome, WriterOptions};
use docsnip_session::DocumentSession;
use pretty_assertions::assert_eq;

#[test]
fn written_document_reads_back_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let formatter = ArtifactFormatter::default();
    let mut session = DocumentSession::open("round_trip_Chapter");
    let table = TabularResult::new(["n"]).with_row(["Node[1]{name:\"you\"}"]);
    let captures = [
        ("cypher", Capture::Query("start n = node(1) return n".into())),
        ("result", Capture::Table(table)),
        ("output", Capture::Output("line one\n\tindented".into())),
    ];
    for (name, capture) in &captures {
        session
            .capture(Anchor::new(*name).unwrap(), capture, &formatter)
            .unwrap();
    }
    let artifact = session.finalize().unwrap();

    let writer = OutputWriter::new(WriterOptions::default());
    let outcome = writer.write(&artifact, dir.path()).unwrap();
    assert!(matches!(outcome, WriteOutcome::Written(_)));

    let read = read_artifact(outcome.path()).unwrap();
    assert_eq!(read, artifact);
    let anchors: Vec<_> = read.bindings().iter().map(|(a, _)| a.as_str()).collect();
    assert_eq!(anchors, vec!["cypher", "result", "output"]);

    let composed = compose("@@cypher\n\n@@result\n", read.bindings()).unwrap();
    assert!(composed.contains("start n = node(1) return n"));
    assert!(composed.contains("| n "));
}

#[test]
fn rewrite_of_read_document_is_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let formatter = ArtifactFormatter::default();
    let mut session = DocumentSession::open("stable");
    session
        .capture(Anchor::new("output").unwrap(), &Capture::Output("same".into()), &formatter)
        .unwrap();
    let artifact = session.finalize().unwrap();

    let writer = OutputWriter::new(WriterOptions::default());
    let path = writer.write(&artifact, dir.path()).unwrap().path().to_path_buf();
    let reread = read_artifact(&path).unwrap();
    assert_eq!(
        writer.write(&reread, dir.path()).unwrap(),
        WriteOutcome::Unchanged(path)
    );
}
