//! Graph invariant validation
//!
//! Invariants checked against a complete candidate graph before every save:
//! - Node ids are unique
//! - Every node has at least one label, and no label is empty
//! - Property keys are non-empty
//! - Edge ids are unique, edge types are non-empty
//! - Every edge endpoint names an existing node
//! - No two edges share a `(from, to, type)` triple
//!
//! Validation never stops at the first problem: all violations are
//! accumulated so the resulting error names every offending entity.

use std::collections::HashSet;
use std::fmt;

use crate::edge::{Edge, EdgeKey};
use crate::error::{EntityRef, KgError, KgResult};
use crate::graph::KnowledgeGraph;
use crate::node::Node;
use crate::types::{EdgeId, NodeId};
use crate::value::Properties;

/// Which end of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// The `from` side
    From,
    /// The `to` side
    To,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::From => f.write_str("from"),
            Endpoint::To => f.write_str("to"),
        }
    }
}

/// A single broken invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Two or more nodes share this id.
    DuplicateNodeId {
        /// The repeated id
        id: NodeId,
    },
    /// Node has no labels.
    EmptyLabelSet {
        /// Offending node
        node: NodeId,
    },
    /// Node carries an empty label string.
    EmptyLabel {
        /// Offending node
        node: NodeId,
    },
    /// Entity has a property with an empty key.
    EmptyPropertyKey {
        /// Offending entity
        entity: EntityRef,
    },
    /// Two or more edges share this id.
    DuplicateEdgeId {
        /// The repeated id
        id: EdgeId,
    },
    /// Edge has an empty type.
    EmptyEdgeType {
        /// Offending edge
        edge: EdgeId,
    },
    /// Edge endpoint names a node that does not exist.
    DanglingEndpoint {
        /// Offending edge
        edge: EdgeId,
        /// Which endpoint
        endpoint: Endpoint,
        /// The missing node
        node: NodeId,
    },
    /// A second edge with an already-present triple.
    DuplicateTriple {
        /// The later edge
        edge: EdgeId,
        /// The shared triple
        key: EdgeKey,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::DuplicateNodeId { id } => write!(f, "duplicate node id {}", id),
            Violation::EmptyLabelSet { node } => write!(f, "node {} has no labels", node),
            Violation::EmptyLabel { node } => write!(f, "node {} has an empty label", node),
            Violation::EmptyPropertyKey { entity } => {
                write!(f, "{} has an empty property key", entity)
            }
            Violation::DuplicateEdgeId { id } => write!(f, "duplicate edge id {}", id),
            Violation::EmptyEdgeType { edge } => write!(f, "edge {} has an empty type", edge),
            Violation::DanglingEndpoint {
                edge,
                endpoint,
                node,
            } => write!(
                f,
                "edge {} '{}' endpoint references missing node {}",
                edge, endpoint, node
            ),
            Violation::DuplicateTriple { edge, key } => {
                write!(f, "edge {} duplicates existing relation {}", edge, key)
            }
        }
    }
}

/// Accumulated outcome of a validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    /// All violations found
    pub violations: Vec<Violation>,
}

impl ValidationResult {
    /// A passing result.
    pub fn ok() -> Self {
        Self::default()
    }

    /// Record a violation.
    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Whether no violations were found.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Merge another result into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        self.violations.extend(other.violations);
    }

    /// Number of violations.
    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    /// `Ok(())` when valid, otherwise `KgError::InvariantViolation`.
    pub fn into_result(self) -> KgResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(KgError::invariant(self.violations))
        }
    }
}

fn check_property_keys(entity: EntityRef, properties: &Properties, result: &mut ValidationResult) {
    if properties.keys().any(String::is_empty) {
        result.push(Violation::EmptyPropertyKey { entity });
    }
}

/// Entity-local checks for a node (labels and property keys).
pub fn validate_node(node: &Node) -> ValidationResult {
    let mut result = ValidationResult::ok();
    if node.labels.is_empty() {
        result.push(Violation::EmptyLabelSet { node: node.id });
    } else if node.labels.iter().any(String::is_empty) {
        result.push(Violation::EmptyLabel { node: node.id });
    }
    check_property_keys(node.id.into(), &node.properties, &mut result);
    result
}

/// Entity-local checks for an edge (type and property keys).
pub fn validate_edge(edge: &Edge) -> ValidationResult {
    let mut result = ValidationResult::ok();
    if edge.edge_type.is_empty() {
        result.push(Violation::EmptyEdgeType { edge: edge.id });
    }
    check_property_keys(edge.id.into(), &edge.properties, &mut result);
    result
}

/// Validate every invariant over a complete graph.
pub fn validate_graph(graph: &KnowledgeGraph) -> ValidationResult {
    let mut result = ValidationResult::ok();

    let mut node_ids: HashSet<NodeId> = HashSet::with_capacity(graph.nodes.len());
    let mut reported_nodes: HashSet<NodeId> = HashSet::new();
    for node in &graph.nodes {
        if !node_ids.insert(node.id) && reported_nodes.insert(node.id) {
            result.push(Violation::DuplicateNodeId { id: node.id });
        }
        result.merge(validate_node(node));
    }

    let mut edge_ids: HashSet<EdgeId> = HashSet::with_capacity(graph.edges.len());
    let mut reported_edges: HashSet<EdgeId> = HashSet::new();
    let mut triples: HashSet<EdgeKey> = HashSet::with_capacity(graph.edges.len());
    for edge in &graph.edges {
        if !edge_ids.insert(edge.id) && reported_edges.insert(edge.id) {
            result.push(Violation::DuplicateEdgeId { id: edge.id });
        }
        result.merge(validate_edge(edge));
        for (endpoint, node) in [(Endpoint::From, edge.from), (Endpoint::To, edge.to)] {
            if !node_ids.contains(&node) {
                result.push(Violation::DanglingEndpoint {
                    edge: edge.id,
                    endpoint,
                    node,
                });
            }
        }
        let key = edge.key();
        if triples.contains(&key) {
            result.push(Violation::DuplicateTriple { edge: edge.id, key });
        } else {
            triples.insert(key);
        }
    }

    result
}
