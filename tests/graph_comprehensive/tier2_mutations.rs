//! Tier 2: Mutations
//!
//! Node and edge operations observed through a fresh load after each call.

use crate::test_utils::*;
use kgraph::{EdgeId, EdgeKey, KgError, NewEdge, NewNode, NodeId, Properties, PropertyValue};

#[test]
fn create_nodes_returns_input_order_and_persists() {
    let (_dir, store) = scratch_store();
    let created = store
        .create_nodes(vec![
            NewNode::new(["Person"]).with_property("name", "Alice"),
            NewNode::new(["City"]).with_property("name", "Paris"),
            NewNode::new(["Person", "Admin"]).with_property("active", true),
        ])
        .unwrap();
    assert_eq!(created.len(), 3);
    assert_eq!(created[1].name(), Some("Paris"));
    assert_eq!(store.read_graph().unwrap().nodes, created);
}

#[test]
fn explicit_id_collision_fails_whole_batch() {
    let (_dir, store) = scratch_store();
    let existing = store.create_nodes(vec![NewNode::new(["A"])]).unwrap().remove(0);

    let err = store
        .create_nodes(vec![
            NewNode::new(["B"]),
            NewNode::new(["C"]).with_id(existing.id),
        ])
        .unwrap_err();
    assert!(matches!(err, KgError::DuplicateId { id } if id == existing.id));
    assert_eq!(store.read_graph().unwrap().node_count(), 1);

    let fresh = NodeId::new();
    let created = store
        .create_nodes(vec![NewNode::new(["D"]).with_id(fresh)])
        .unwrap();
    assert_eq!(created[0].id, fresh);
}

#[test]
fn delete_nodes_cascades_and_reports_deleted_ids() {
    let (_dir, store) = scratch_store();
    let nodes = store
        .create_nodes(vec![NewNode::new(["A"]), NewNode::new(["B"]), NewNode::new(["C"])])
        .unwrap();
    let (a, b, c) = (nodes[0].id, nodes[1].id, nodes[2].id);
    store
        .create_edges(vec![
            NewEdge::new(a, "R", b),
            NewEdge::new(c, "R", a),
            NewEdge::new(b, "R", c),
        ])
        .unwrap();

    let deleted = store.delete_nodes(&[NodeId::new(), a, a]).unwrap();
    assert_eq!(deleted, vec![a]);

    let graph = store.read_graph().unwrap();
    assert_eq!(ids(&graph.nodes), vec![b, c]);
    assert_eq!(graph.edges.len(), 1);
    assert!(graph.edges.iter().all(|e| !e.touches(a)));
}

#[test]
fn property_update_merges_and_replace_overwrites() {
    let (_dir, store) = scratch_store();
    let node = store
        .create_nodes(vec![NewNode::new(["A"])
            .with_property("keep", "yes")
            .with_property("change", 1i64)])
        .unwrap()
        .remove(0);

    let updated = store
        .update_node_properties(node.id, props(vec![("change", 2i64), ("added", 3i64)]))
        .unwrap();
    assert_eq!(updated.properties.len(), 3);
    assert_eq!(updated.properties["keep"], PropertyValue::from("yes"));
    assert_eq!(updated.properties["change"], PropertyValue::from(2i64));

    let replaced = store
        .replace_node_properties(node.id, props(vec![("only", PropertyValue::Null)]))
        .unwrap();
    assert_eq!(replaced.properties.len(), 1);
    assert!(replaced.properties["only"].is_null());
    assert_eq!(store.get_node(node.id).unwrap(), Some(replaced));
}

#[test]
fn updates_on_missing_entities_are_not_found() {
    let (_dir, store) = scratch_store();
    let missing = NodeId::new();
    assert!(store
        .update_node_properties(missing, Properties::new())
        .unwrap_err()
        .is_not_found());
    assert!(store
        .replace_node_properties(missing, Properties::new())
        .unwrap_err()
        .is_not_found());
    assert!(store.add_node_labels(missing, &["A"]).unwrap_err().is_not_found());
    assert!(store
        .replace_edge_properties(EdgeId::new(), Properties::new())
        .unwrap_err()
        .is_not_found());
}

#[test]
fn label_floor_is_enforced() {
    let (_dir, store) = scratch_store();
    let node = store.create_nodes(vec![NewNode::new(["Only"])]).unwrap().remove(0);

    let err = store.remove_node_labels(node.id, &["Only"]).unwrap_err();
    assert!(matches!(err, KgError::LastLabel { .. }));
    assert_eq!(store.get_node(node.id).unwrap().unwrap().labels, node.labels);

    store.add_node_labels(node.id, &["Second"]).unwrap();
    let after = store.remove_node_labels(node.id, &["Only"]).unwrap();
    assert_eq!(after.labels.as_slice(), &["Second".to_string()]);
}

#[test]
fn create_edges_skips_what_it_cannot_create() {
    let (_dir, store) = scratch_store();
    let nodes = store
        .create_nodes(vec![NewNode::new(["A"]), NewNode::new(["B"])])
        .unwrap();
    let (a, b) = (nodes[0].id, nodes[1].id);

    let created = store
        .create_edges(vec![
            NewEdge::new(a, "KNOWS", b),
            NewEdge::new(a, "KNOWS", NodeId::new()),
            NewEdge::new(a, "KNOWS", b),
            NewEdge::new(a, "", b),
        ])
        .unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(store.read_graph().unwrap().edges, created);
}

#[test]
fn delete_edges_counts_and_ignores_unknown_triples() {
    let (_dir, store) = scratch_store();
    let nodes = store
        .create_nodes(vec![NewNode::new(["A"]), NewNode::new(["B"])])
        .unwrap();
    let (a, b) = (nodes[0].id, nodes[1].id);
    store
        .create_edges(vec![NewEdge::new(a, "X", b), NewEdge::new(a, "Y", b)])
        .unwrap();

    let removed = store
        .delete_edges(&[EdgeKey::new(a, "X", b), EdgeKey::new(b, "X", a)])
        .unwrap();
    assert_eq!(removed, 1);
    assert_eq!(store.list_relation_types().unwrap(), vec!["Y"]);
    assert_eq!(store.delete_edges(&[EdgeKey::new(a, "X", b)]).unwrap(), 0);
}

#[test]
fn edge_properties_merge_and_replace() {
    let (_dir, store) = scratch_store();
    let nodes = store
        .create_nodes(vec![NewNode::new(["A"]), NewNode::new(["B"])])
        .unwrap();
    let edge = store
        .create_edges(vec![
            NewEdge::new(nodes[0].id, "RATED", nodes[1].id).with_property("score", 3i64)
        ])
        .unwrap()
        .remove(0);

    let updated = store
        .update_edge_properties(edge.id, props(vec![("note", "good")]))
        .unwrap();
    assert_eq!(updated.properties.len(), 2);

    let replaced = store
        .replace_edge_properties(edge.id, Properties::new())
        .unwrap();
    assert!(replaced.properties.is_empty());
    assert_eq!(store.get_edge(edge.id).unwrap(), Some(replaced));
}
