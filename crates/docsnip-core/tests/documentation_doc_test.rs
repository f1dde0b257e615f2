//! The sample chapter of the manual, produced by a documented test.
//!
//! The test builds a tiny graph, queries it, and records five snippets: the
//! rendered graph, the query, a captured output line, its own source code
//! (the region between the markers below) and a link to this file.

use anyhow::Context;
use docsnip_core::{
    read_artifact, FragmentKind, GraphDescription, GraphProvider, QueryExecutor, SourceReference,
};
use docsnip_test_utils::{setup_coordinator, MemoryGraph};
use pretty_assertions::assert_eq;

const TEST_ID: &str = "documentation_doc_test::hello_world_Sample_Chapter";

fn this_file() -> SourceReference {
    SourceReference::new("docsnip-core", "tests/documentation_doc_test.rs")
}

#[test]
#[allow(non_snake_case)]
fn hello_world_Sample_Chapter() -> anyhow::Result<()> {
    let (dir, coordinator) = setup_coordinator(env!("CARGO_MANIFEST_DIR"));
    let graphs = MemoryGraph::new(dir.path().join("images"));
    let description = GraphDescription::parse(["I know you"])?;

    // START SNIPPET: sampleDocumentation
    let graph = graphs.materialize(&description)?;
    let gen = coordinator.begin_session(TEST_ID, "hello_world_Sample_Chapter")?;
    gen.add_graph("graph", &graphs, &graph, "Hello World Graph")?;

    let me = graphs.lookup(&graph, "I").context("node 'I' was not created")?;
    let query = format!("start n = node({me}) return n");
    gen.add_query("cypher", &query)?;
    let result = graphs.execute(&query, &graph)?;
    assert!(result.render().contains("I"));

    gen.add_output("output", "Hello graphy world!")?;
    gen.add_source_snippets(&this_file(), &["sampleDocumentation"])?;
    gen.add_source_link("github", &this_file())?;
    // END SNIPPET: sampleDocumentation

    assert_eq!(gen.title(), "hello world Sample Chapter");
    drop(gen);
    let outcome = coordinator.end_session(TEST_ID)?;
    assert!(outcome.is_written());
    assert_eq!(
        outcome.path(),
        dir.path().join("docs").join("hello-world-sample-chapter.asciidoc")
    );

    let document = read_artifact(outcome.path())?;
    assert_eq!(document.title(), "hello world Sample Chapter");
    let anchors: Vec<_> = document.bindings().iter().map(|(a, _)| a.as_str()).collect();
    assert_eq!(
        anchors,
        vec!["graph", "cypher", "output", "sampleDocumentation", "github"]
    );

    let graph_snippet = document.get("graph").context("graph snippet")?;
    assert_eq!(graph_snippet.kind(), FragmentKind::Visualization);
    assert!(graph_snippet.text().starts_with(".Hello World Graph\nimage::"));
    assert!(graph_snippet.text().ends_with("hello-world-graph.dot[Hello World Graph]"));

    let cypher = document.get("cypher").context("cypher snippet")?;
    assert_eq!(
        cypher.text(),
        "[source,cypher]\n----\nstart n = node(1) return n\n----"
    );

    let output = document.get("output").context("output snippet")?;
    assert_eq!(output.text(), "....\nHello graphy world!\n....");

    let excerpt = document.get("sampleDocumentation").context("source snippet")?;
    assert!(excerpt.text().starts_with("[source,rust]\n----\n"));
    assert!(excerpt
        .text()
        .contains("    gen.add_output(\"output\", \"Hello graphy world!\")?;"));
    assert!(!excerpt.text().contains("SNIPPET"));

    let github = document.get("github").context("github link")?;
    assert_eq!(
        github.text(),
        "link:https://github.com/example/graphdb/blob/master/tests/documentation_doc_test.rs[documentation_doc_test.rs]"
    );

    coordinator.shutdown()?;
    Ok(())
}

#[test]
fn region_link_points_at_first_region_line() -> anyhow::Result<()> {
    let (_dir, coordinator) = setup_coordinator(env!("CARGO_MANIFEST_DIR"));
    let gen = coordinator.begin_session("documentation_doc_test::region_link", "region_link")?;
    let link = gen.add_source_link("github", &this_file().with_region("sampleDocumentation"))?;

    let marker = concat!("START", " SNIPPET:");
    let marker_line = include_str!("documentation_doc_test.rs")
        .lines()
        .position(|line| line.contains(marker))
        .context("start marker present")?
        + 1;
    assert!(link.text().ends_with(&format!(
        "documentation_doc_test.rs#L{}[documentation_doc_test.rs]",
        marker_line + 1
    )));

    drop(gen);
    coordinator.abort_session("documentation_doc_test::region_link")?;
    coordinator.shutdown()?;
    Ok(())
}
