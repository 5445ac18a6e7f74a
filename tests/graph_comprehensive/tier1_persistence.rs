//! Tier 1: Persistence
//!
//! File format, load leniency, and atomic save through the store.

use crate::test_utils::*;
use kgraph::storage::{self, FileLock};
use kgraph::{
    DuplicatePolicy, EdgeKey, GraphStore, KgError, NewEdge, NewNode, StoreConfig, Violation,
};
use std::fs;
use tempfile::TempDir;

#[test]
fn saved_file_is_tagged_jsonl_nodes_first() {
    let (_dir, store) = scratch_store();
    let nodes = store
        .create_nodes(vec![NewNode::new(["A"]), NewNode::new(["B"])])
        .unwrap();
    store
        .create_edges(vec![NewEdge::new(nodes[0].id, "REL", nodes[1].id)])
        .unwrap();
    store.create_nodes(vec![NewNode::new(["C"])]).unwrap();

    let content = fs::read_to_string(store.path()).unwrap();
    assert!(!content.ends_with('\n'));
    let kinds: Vec<String> = content
        .lines()
        .map(|line| {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            value["kind"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(kinds, vec!["node", "node", "node", "edge"]);
    assert!(content.lines().next().unwrap().starts_with(r#"{"kind":"node","id":"#));
}

#[test]
fn legacy_untagged_file_is_readable_and_upgraded_on_write() {
    let (_dir, store) = scratch_store();
    let a = "5f0c8b62-4a36-4c1e-9d5e-0f2b7c1a9e01";
    let b = "5f0c8b62-4a36-4c1e-9d5e-0f2b7c1a9e02";
    let legacy = format!(
        concat!(
            r#"{{"id":"{a}","labels":["Person"],"properties":{{"name":"Alice"}}}}"#,
            "\n",
            r#"{{"id":"{b}","labels":["Person"],"properties":{{}}}}"#,
            "\n",
            r#"{{"id":"6a1d0c73-5b47-4d2f-8e6f-1a3c8d2b0f10","type":"KNOWS","from":"{a}","to":"{b}"}}"#,
        ),
        a = a,
        b = b
    );
    fs::write(store.path(), legacy).unwrap();

    let graph = store.read_graph().unwrap();
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 1);
    assert!(graph.edges[0].properties.is_empty());

    let alice = graph.nodes[0].id;
    store.add_node_labels(alice, &["Admin"]).unwrap();
    let content = fs::read_to_string(store.path()).unwrap();
    assert!(content.lines().all(|l| l.contains(r#""kind":"#)));
}

#[test]
fn unreadable_lines_are_skipped_not_fatal() {
    let (_dir, store) = scratch_store();
    let node = store.create_nodes(vec![NewNode::new(["A"])]).unwrap().remove(0);
    let mut content = fs::read_to_string(store.path()).unwrap();
    content.push_str("\nnot json at all\n{\"kind\":\"node\",\"id\":\"bad\",\"labels\":[\"X\"]}\n\n");
    fs::write(store.path(), content).unwrap();

    let graph = store.read_graph().unwrap();
    assert_eq!(graph.nodes, vec![node]);
    let report = store.inspect().unwrap();
    assert_eq!(report.skipped.len(), 2);
    assert_eq!(report.nodes, 1);
}

#[test]
fn non_utf8_line_does_not_block_the_store() {
    let (_dir, store) = scratch_store();
    let node = store.create_nodes(vec![NewNode::new(["A"])]).unwrap().remove(0);
    let mut bytes = fs::read(store.path()).unwrap();
    bytes.extend_from_slice(b"\n{\"kind\":\"node\",\"id\":\"\xff\xfe\"}");
    fs::write(store.path(), &bytes).unwrap();

    assert_eq!(store.read_graph().unwrap().nodes, vec![node.clone()]);
    let report = store.inspect().unwrap();
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].line(), 2);

    // the next write drops the bad line
    store.add_node_labels(node.id, &["B"]).unwrap();
    assert!(store.inspect().unwrap().is_clean());
}

#[test]
fn corrupt_node_line_does_not_block_unrelated_writes() {
    let (_dir, store) = scratch_store();
    let nodes = store
        .create_nodes(vec![NewNode::new(["A"]), NewNode::new(["B"])])
        .unwrap();
    store
        .create_edges(vec![NewEdge::new(nodes[0].id, "REL", nodes[1].id)])
        .unwrap();

    let content = fs::read_to_string(store.path()).unwrap();
    let b_line = format!(r#"{{"kind":"node","id":"{}""#, nodes[1].id);
    let corrupted: Vec<String> = content
        .lines()
        .map(|line| {
            if line.starts_with(&b_line) {
                line.replace(r#""labels":["B"]"#, r#""labels":[]"#)
            } else {
                line.to_string()
            }
        })
        .collect();
    fs::write(store.path(), corrupted.join("\n")).unwrap();

    let report = store.inspect().unwrap();
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.dangling_dropped, 1);

    let created = store.create_nodes(vec![NewNode::new(["C"])]).unwrap();
    let graph = store.read_graph().unwrap();
    assert_eq!(ids(&graph.nodes), vec![nodes[0].id, created[0].id]);
    assert!(graph.edges.is_empty());
}

#[test]
fn failed_save_leaves_file_byte_identical_until_repaired() {
    let (_dir, store) = scratch_store();
    let nodes = store
        .create_nodes(vec![NewNode::new(["A"]), NewNode::new(["B"])])
        .unwrap();
    let edge = store
        .create_edges(vec![NewEdge::new(nodes[0].id, "REL", nodes[1].id)])
        .unwrap()
        .remove(0);

    // hand-edit a second edge with the same triple
    let mut twin = edge.clone();
    twin.id = kgraph::EdgeId::new();
    let mut content = fs::read_to_string(store.path()).unwrap();
    content.push('\n');
    content.push_str(&storage::encode_record(&storage::Record::Edge(twin)).unwrap());
    fs::write(store.path(), &content).unwrap();

    let err = store.add_node_labels(nodes[0].id, &["X"]).unwrap_err();
    match err {
        KgError::InvariantViolation { violations } => {
            assert!(violations
                .iter()
                .any(|v| matches!(v, Violation::DuplicateTriple { .. })));
        }
        other => panic!("expected invariant violation, got {other}"),
    }
    assert_eq!(fs::read_to_string(store.path()).unwrap(), content);

    assert_eq!(store.delete_edges(&[edge.key()]).unwrap(), 2);
    store.add_node_labels(nodes[0].id, &["X"]).unwrap();
    assert!(store.read_graph().unwrap().check().is_ok());
}

#[test]
fn duplicate_ids_keep_first_by_default_and_reject_when_configured() {
    let (dir, store) = scratch_store();
    let node = store.create_nodes(vec![NewNode::new(["A"])]).unwrap().remove(0);
    let line = fs::read_to_string(store.path()).unwrap();
    fs::write(store.path(), format!("{line}\n{line}")).unwrap();

    assert_eq!(store.read_graph().unwrap().nodes, vec![node]);
    assert_eq!(store.inspect().unwrap().duplicates_dropped, 1);

    let strict = GraphStore::open(
        dir.path(),
        StoreConfig::default().with_duplicate_ids(DuplicatePolicy::Reject),
    );
    assert!(strict.read_graph().unwrap_err().is_invariant_violation());
}

#[test]
fn memory_file_override_creates_missing_directories() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let store = GraphStore::open(
        dir.path(),
        StoreConfig::default().with_memory_file("deep/nested/kg.jsonl"),
    );
    assert!(store.read_graph().unwrap().is_empty());
    store.create_nodes(vec![NewNode::new(["A"])]).unwrap();
    assert!(dir.path().join("deep/nested/kg.jsonl").exists());
    assert!(FileLock::lock_path(store.path()).exists());
}

#[test]
fn empty_and_whitespace_files_are_empty_graphs() {
    let (_dir, store) = scratch_store();
    fs::write(store.path(), "").unwrap();
    assert!(store.read_graph().unwrap().is_empty());
    fs::write(store.path(), "\n   \n\t").unwrap();
    assert!(store.read_graph().unwrap().is_empty());
}

#[test]
fn unlocked_store_still_round_trips() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let store = GraphStore::open(dir.path(), StoreConfig::default().with_locking(false));
    let nodes = store
        .create_nodes(vec![NewNode::new(["A"]), NewNode::new(["B"])])
        .unwrap();
    store
        .create_edges(vec![NewEdge::new(nodes[0].id, "REL", nodes[1].id)])
        .unwrap();
    assert!(!FileLock::lock_path(store.path()).exists());
    assert_eq!(
        store
            .delete_edges(&[EdgeKey::new(nodes[0].id, "REL", nodes[1].id)])
            .unwrap(),
        1
    );
}
