//! Node mutations: create, delete (with edge cascade), property and label updates.

use std::collections::HashSet;
use tracing::debug;

use kgraph_core::{KgError, KgResult, KnowledgeGraph, Node, NodeId, Properties};

use super::entity::{check_keys, merge_properties, project, replace_properties};
use super::types::{Mutation, NewNode};
use super::GraphStore;

/// Generate an id not present in `taken` and reserve it.
fn reserve_id(taken: &mut HashSet<NodeId>) -> NodeId {
    loop {
        let id = NodeId::new();
        if taken.insert(id) {
            return id;
        }
    }
}

fn check_labels<S: AsRef<str>>(labels: &[S]) -> KgResult<()> {
    if labels.iter().any(|l| l.as_ref().is_empty()) {
        return Err(KgError::invalid_input("labels must not be empty strings"));
    }
    Ok(())
}

fn check_input(index: usize, input: &NewNode) -> KgResult<()> {
    if input.labels.is_empty() {
        return Err(KgError::invalid_input(format!(
            "node input {} has no labels: a node needs at least one label",
            index
        )));
    }
    check_labels(&input.labels)
        .and_then(|()| check_keys(&input.properties))
        .map_err(|e| KgError::invalid_input(format!("node input {}: {}", index, e)))
}

/// Create nodes, all or nothing.
///
/// Every input is validated and every explicit id checked for collisions
/// before anything is added. Returns the created nodes in input order.
pub fn create_nodes(graph: &mut KnowledgeGraph, inputs: Vec<NewNode>) -> KgResult<Mutation<Vec<Node>>> {
    for (index, input) in inputs.iter().enumerate() {
        check_input(index, input)?;
    }

    let mut taken = graph.node_ids();
    for id in inputs.iter().filter_map(|input| input.id) {
        if !taken.insert(id) {
            return Err(KgError::DuplicateId { id });
        }
    }

    let created: Vec<Node> = inputs
        .into_iter()
        .map(|input| {
            let id = input.id.unwrap_or_else(|| reserve_id(&mut taken));
            Node {
                id,
                labels: input.labels.into_iter().collect(),
                properties: input.properties,
            }
        })
        .collect();

    graph.nodes.extend(created.iter().cloned());
    let changed = !created.is_empty();
    Ok(Mutation::new(created, changed))
}

/// Delete nodes and every edge touching them.
///
/// Unknown ids are ignored. Returns the ids actually removed, in input
/// order and without repeats.
pub fn delete_nodes(graph: &mut KnowledgeGraph, ids: &[NodeId]) -> Mutation<Vec<NodeId>> {
    let existing = graph.node_ids();
    let mut seen = HashSet::new();
    let deleted: Vec<NodeId> = ids
        .iter()
        .copied()
        .filter(|id| existing.contains(id) && seen.insert(*id))
        .collect();

    if deleted.is_empty() {
        return Mutation::unchanged(deleted);
    }

    graph.nodes.retain(|n| !seen.contains(&n.id));
    let edges_before = graph.edges.len();
    graph
        .edges
        .retain(|e| !seen.contains(&e.from) && !seen.contains(&e.to));
    debug!(
        nodes = deleted.len(),
        edges = edges_before - graph.edges.len(),
        "Deleted nodes with incident edges"
    );
    Mutation::changed(deleted)
}

/// Add labels to a node. Labels already present are ignored.
pub fn add_node_labels<S: AsRef<str>>(
    graph: &mut KnowledgeGraph,
    id: NodeId,
    labels: &[S],
) -> KgResult<Mutation<Node>> {
    check_labels(labels)?;
    project(graph, id, |node: &mut Node| {
        node.labels.extend_from(labels.iter().map(|l| l.as_ref()));
        Ok(())
    })
}

/// Remove labels from a node.
///
/// Fails with `LastLabel`, changing nothing, if no label would remain.
pub fn remove_node_labels<S: AsRef<str>>(
    graph: &mut KnowledgeGraph,
    id: NodeId,
    labels: &[S],
) -> KgResult<Mutation<Node>> {
    project(graph, id, |node: &mut Node| {
        let remaining = node.labels.without(labels);
        if remaining.is_empty() {
            return Err(KgError::LastLabel { id: node.id });
        }
        node.labels = remaining;
        Ok(())
    })
}

impl GraphStore {
    /// Create nodes. See [`create_nodes`].
    pub fn create_nodes(&self, inputs: Vec<NewNode>) -> KgResult<Vec<Node>> {
        self.mutate("create_nodes", |graph| create_nodes(graph, inputs))
    }

    /// Delete nodes and their edges. See [`delete_nodes`].
    pub fn delete_nodes(&self, ids: &[NodeId]) -> KgResult<Vec<NodeId>> {
        self.mutate("delete_nodes", |graph| Ok(delete_nodes(graph, ids)))
    }

    /// Merge `patch` into a node's properties.
    pub fn update_node_properties(&self, id: NodeId, patch: Properties) -> KgResult<Node> {
        self.mutate("update_node_properties", |graph| {
            merge_properties(graph, id, patch)
        })
    }

    /// Replace a node's properties.
    pub fn replace_node_properties(&self, id: NodeId, properties: Properties) -> KgResult<Node> {
        self.mutate("replace_node_properties", |graph| {
            replace_properties(graph, id, properties)
        })
    }

    /// Add labels to a node.
    pub fn add_node_labels<S: AsRef<str>>(&self, id: NodeId, labels: &[S]) -> KgResult<Node> {
        self.mutate("add_node_labels", |graph| add_node_labels(graph, id, labels))
    }

    /// Remove labels from a node, keeping at least one.
    pub fn remove_node_labels<S: AsRef<str>>(&self, id: NodeId, labels: &[S]) -> KgResult<Node> {
        self.mutate("remove_node_labels", |graph| {
            remove_node_labels(graph, id, labels)
        })
    }
}
