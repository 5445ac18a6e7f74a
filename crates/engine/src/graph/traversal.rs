//! One-hop related-node lookup.

use std::collections::HashSet;

use kgraph_core::{Edge, KgResult, KnowledgeGraph, Node, NodeId};

use super::types::{Direction, Page, RelatedOptions};
use super::GraphStore;

/// The node on the far side of `edge` from `start`, if the edge is followed
/// in `direction`.
fn far_end(edge: &Edge, start: NodeId, direction: Direction) -> Option<NodeId> {
    let outgoing = edge.from == start;
    let incoming = edge.to == start;
    match direction {
        Direction::Outgoing if outgoing => Some(edge.to),
        Direction::Incoming if incoming => Some(edge.from),
        Direction::Both if outgoing => Some(edge.to),
        Direction::Both if incoming => Some(edge.from),
        _ => None,
    }
}

/// Nodes one edge away from `start`.
///
/// Edges are filtered by `relation_type` first, resulting nodes by
/// `end_label`. The start node is never part of the result, so self-loops
/// contribute nothing. Each node appears once, in the order its first
/// connecting edge appears. An unknown start yields an empty page.
pub fn find_related_nodes(graph: &KnowledgeGraph, start: NodeId, options: &RelatedOptions) -> Page<Node> {
    let mut seen = HashSet::new();
    let related: Vec<Node> = graph
        .edges
        .iter()
        .filter(|edge| {
            options
                .relation_type
                .as_deref()
                .map_or(true, |t| edge.edge_type == t)
        })
        .filter_map(|edge| far_end(edge, start, options.direction))
        .filter(|id| *id != start && seen.insert(*id))
        .filter_map(|id| graph.node(id))
        .filter(|node| {
            options
                .end_label
                .as_deref()
                .map_or(true, |label| node.has_label(label))
        })
        .cloned()
        .collect();
    options.page.apply(related)
}

impl GraphStore {
    /// Related nodes. See [`find_related_nodes`].
    pub fn find_related_nodes(&self, start: NodeId, options: &RelatedOptions) -> KgResult<Page<Node>> {
        self.read(|graph| find_related_nodes(graph, start, options))
    }
}
