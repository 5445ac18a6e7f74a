//! Edge mutations.
//!
//! Edge creation is lenient: an input that cannot be created is logged and
//! left out of the result rather than failing the batch.

use tracing::warn;

use kgraph_core::{Edge, EdgeId, EdgeKey, KgResult, KnowledgeGraph, Properties};

use super::entity::{merge_properties, replace_properties};
use super::types::{Mutation, NewEdge};
use super::GraphStore;

/// Create edges between existing nodes.
///
/// Skipped with a warning: a missing endpoint, a `(from, to, type)` triple
/// already stored or earlier in the batch, an empty type, an empty property
/// key. Returns only the created edges.
pub fn create_edges(graph: &mut KnowledgeGraph, inputs: Vec<NewEdge>) -> Mutation<Vec<Edge>> {
    let nodes = graph.node_ids();
    let mut keys = graph.edge_keys();
    let mut edge_ids = graph.edge_ids();
    let mut created = Vec::new();

    for input in inputs {
        if input.edge_type.is_empty() {
            warn!(from = %input.from, to = %input.to, "Skipping edge with empty type");
            continue;
        }
        if input.properties.keys().any(String::is_empty) {
            warn!(
                from = %input.from,
                to = %input.to,
                edge_type = %input.edge_type,
                "Skipping edge with empty property key"
            );
            continue;
        }
        let missing = [input.from, input.to]
            .into_iter()
            .find(|id| !nodes.contains(id));
        if let Some(node) = missing {
            warn!(
                from = %input.from,
                to = %input.to,
                edge_type = %input.edge_type,
                missing = %node,
                "Skipping edge with missing endpoint"
            );
            continue;
        }
        let key = EdgeKey::new(input.from, input.edge_type.clone(), input.to);
        if !keys.insert(key.clone()) {
            warn!(edge = %key, "Skipping duplicate edge");
            continue;
        }

        let mut edge = Edge::new(input.from, input.edge_type, input.to);
        while !edge_ids.insert(edge.id) {
            edge.id = EdgeId::new();
        }
        edge.properties = input.properties;
        created.push(edge);
    }

    graph.edges.extend(created.iter().cloned());
    let changed = !created.is_empty();
    Mutation::new(created, changed)
}

/// Delete every edge matching any of `keys`. Returns how many were removed.
pub fn delete_edges(graph: &mut KnowledgeGraph, keys: &[EdgeKey]) -> Mutation<usize> {
    let before = graph.edges.len();
    graph
        .edges
        .retain(|edge| !keys.iter().any(|key| edge.matches(key)));
    let removed = before - graph.edges.len();
    Mutation::new(removed, removed > 0)
}

impl GraphStore {
    /// Create edges. See [`create_edges`].
    pub fn create_edges(&self, inputs: Vec<NewEdge>) -> KgResult<Vec<Edge>> {
        self.mutate("create_edges", |graph| Ok(create_edges(graph, inputs)))
    }

    /// Delete edges by `(from, to, type)`. See [`delete_edges`].
    pub fn delete_edges(&self, keys: &[EdgeKey]) -> KgResult<usize> {
        self.mutate("delete_edges", |graph| Ok(delete_edges(graph, keys)))
    }

    /// Merge `patch` into an edge's properties.
    pub fn update_edge_properties(&self, id: EdgeId, patch: Properties) -> KgResult<Edge> {
        self.mutate("update_edge_properties", |graph| {
            merge_properties(graph, id, patch)
        })
    }

    /// Replace an edge's properties.
    pub fn replace_edge_properties(&self, id: EdgeId, properties: Properties) -> KgResult<Edge> {
        self.mutate("replace_edge_properties", |graph| {
            replace_properties(graph, id, properties)
        })
    }
}
