//! The in-memory graph aggregate.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::edge::{Edge, EdgeKey};
use crate::error::KgResult;
use crate::node::Node;
use crate::types::{EdgeId, NodeId};
use crate::validation::{validate_graph, ValidationResult};

/// All nodes and edges at a point in time.
///
/// Lists keep load order; lookups are linear, which matches the
/// load-operate-save lifecycle where a graph lives for one operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeGraph {
    /// Nodes, unique by id
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// Edges, unique by id
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl KnowledgeGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph from parts.
    pub fn with_data(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    /// Whether the graph has neither nodes nor edges.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Look up a node by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Mutable node lookup.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Look up an edge by id.
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Mutable edge lookup.
    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.edges.iter_mut().find(|e| e.id == id)
    }

    /// Whether a node with this id exists.
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Set of all node ids.
    pub fn node_ids(&self) -> HashSet<NodeId> {
        self.nodes.iter().map(|n| n.id).collect()
    }

    /// Set of all edge ids.
    pub fn edge_ids(&self) -> HashSet<EdgeId> {
        self.edges.iter().map(|e| e.id).collect()
    }

    /// Set of all `(from, to, type)` triples.
    pub fn edge_keys(&self) -> HashSet<EdgeKey> {
        self.edges.iter().map(Edge::key).collect()
    }

    /// Run every invariant check.
    pub fn validate(&self) -> ValidationResult {
        validate_graph(self)
    }

    /// `Ok(())` if every invariant holds.
    pub fn check(&self) -> KgResult<()> {
        self.validate().into_result()
    }
}
