//! Graph nodes.

use serde::{Deserialize, Serialize};

use crate::labels::LabelSet;
use crate::types::NodeId;
use crate::value::{Properties, PropertyValue};

/// Property key inspected by name searches.
pub const NAME_PROPERTY: &str = "name";

/// A labeled entity with a unique id and a scalar property map.
///
/// Field order here is the on-disk field order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Immutable, globally unique id.
    pub id: NodeId,
    /// Non-empty set of non-empty labels.
    pub labels: LabelSet,
    /// Scalar properties.
    #[serde(default)]
    pub properties: Properties,
}

impl Node {
    /// Create a node with a fresh id and no properties.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_id(NodeId::new(), labels)
    }

    /// Create a node with the given id and no properties.
    pub fn with_id<I, S>(id: NodeId, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id,
            labels: labels.into_iter().collect(),
            properties: Properties::new(),
        }
    }

    /// Builder-style property setter.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Whether the node carries `label`.
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    /// The `name` property, when it is a string.
    pub fn name(&self) -> Option<&str> {
        self.properties.get(NAME_PROPERTY).and_then(PropertyValue::as_str)
    }

    /// Iterate over every string-valued property.
    pub fn string_properties(&self) -> impl Iterator<Item = &str> {
        self.properties.values().filter_map(PropertyValue::as_str)
    }
}
