//! Tier 4: Concurrency
//!
//! Many writers on one memory file must not lose updates, and readers must
//! only ever see complete graphs.

use crate::test_utils::*;
use kgraph::{GraphStore, NewEdge, NewNode, PropertyValue};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

const THREADS: usize = 8;
const PER_THREAD: usize = 10;

#[test]
fn concurrent_creates_lose_no_updates() {
    let (_dir, store) = scratch_store();

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let store = store.clone();
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    store
                        .create_nodes(vec![NewNode::new(["Worker"])
                            .with_property("thread", t as i64)
                            .with_property("seq", i as i64)])
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let graph = store.read_graph().unwrap();
    assert_eq!(graph.node_count(), THREADS * PER_THREAD);
    assert!(graph.check().is_ok());
}

#[test]
fn separately_opened_stores_share_the_writer_gate() {
    let (dir, store) = scratch_store();
    let node = store
        .create_nodes(vec![NewNode::new(["Shared"])])
        .unwrap()
        .remove(0);

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let store = GraphStore::open(dir.path(), store.config().clone());
            let id = node.id;
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    let label = format!("L{t}_{i}");
                    store.add_node_labels(id, &[label]).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // every label added by every thread survived
    let node = store.get_node(node.id).unwrap().unwrap();
    assert_eq!(node.labels.len(), 1 + THREADS * PER_THREAD);
}

#[test]
fn concurrent_edge_creation_between_shared_nodes() {
    let (_dir, store) = scratch_store();
    let hub = store.create_nodes(vec![NewNode::new(["Hub"])]).unwrap().remove(0);

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let store = store.clone();
            let hub = hub.id;
            thread::spawn(move || {
                let spoke = store
                    .create_nodes(vec![NewNode::new(["Spoke"])])
                    .unwrap()
                    .remove(0);
                // every thread links the hub to its own spoke
                store
                    .create_edges(vec![
                        NewEdge::new(hub, "LINK", spoke.id),
                        NewEdge::new(spoke.id, format!("BACK{t}"), hub),
                    ])
                    .unwrap()
                    .len()
            })
        })
        .collect();
    let created: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

    assert_eq!(created, THREADS * 2);
    let graph = store.read_graph().unwrap();
    assert_eq!(graph.edge_count(), THREADS * 2);
    assert!(graph.check().is_ok());
}

#[test]
fn readers_see_complete_graphs_during_writes() {
    let (_dir, store) = scratch_store();
    let done = Arc::new(AtomicBool::new(false));

    let reader = {
        let store = store.clone();
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let payload = PropertyValue::from("x".repeat(64));
            let mut reads = 0usize;
            loop {
                let graph = store.read_graph().unwrap();
                assert!(graph.check().is_ok());
                assert!(graph
                    .nodes
                    .iter()
                    .all(|n| n.properties.get("payload") == Some(&payload)));
                reads += 1;
                if done.load(Ordering::SeqCst) {
                    break;
                }
            }
            reads
        })
    };

    for _ in 0..50 {
        store
            .create_nodes(vec![NewNode::new(["Blob"]).with_property("payload", "x".repeat(64))])
            .unwrap();
    }
    done.store(true, Ordering::SeqCst);
    let reads = reader.join().unwrap();
    assert!(reads > 0);
    assert_eq!(store.read_graph().unwrap().node_count(), 50);
}
