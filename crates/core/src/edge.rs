//! Graph edges and their `(from, to, type)` identity.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{EdgeId, NodeId};
use crate::value::{Properties, PropertyValue};

/// A typed, directed relationship between two nodes.
///
/// Field order here is the on-disk field order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Unique edge id.
    pub id: EdgeId,
    /// Relation type, e.g. `KNOWS`.
    #[serde(rename = "type")]
    pub edge_type: String,
    /// Source node.
    pub from: NodeId,
    /// Target node.
    pub to: NodeId,
    /// Scalar properties, possibly empty.
    #[serde(default)]
    pub properties: Properties,
}

impl Edge {
    /// Create an edge with a fresh id and no properties.
    pub fn new(from: NodeId, edge_type: impl Into<String>, to: NodeId) -> Self {
        Self {
            id: EdgeId::new(),
            edge_type: edge_type.into(),
            from,
            to,
            properties: Properties::new(),
        }
    }

    /// Builder-style property setter.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// The `(from, to, type)` triple identifying this edge for dedup and deletion.
    pub fn key(&self) -> EdgeKey {
        EdgeKey {
            from: self.from,
            to: self.to,
            edge_type: self.edge_type.clone(),
        }
    }

    /// Whether this edge has the given triple.
    pub fn matches(&self, key: &EdgeKey) -> bool {
        self.from == key.from && self.to == key.to && self.edge_type == key.edge_type
    }

    /// Whether `node` is either endpoint.
    pub fn touches(&self, node: NodeId) -> bool {
        self.from == node || self.to == node
    }
}

/// Edge identity used for creation-time dedup and for deletion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeKey {
    /// Source node.
    pub from: NodeId,
    /// Target node.
    pub to: NodeId,
    /// Relation type.
    #[serde(rename = "type")]
    pub edge_type: String,
}

impl EdgeKey {
    /// Build a triple.
    pub fn new(from: NodeId, edge_type: impl Into<String>, to: NodeId) -> Self {
        Self {
            from,
            to,
            edge_type: edge_type.into(),
        }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})-[{}]->({})", self.from, self.edge_type, self.to)
    }
}
