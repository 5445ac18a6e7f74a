//! Argument and result types for graph operations.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use kgraph_core::{KgError, NodeId, Properties, PropertyValue};

/// Input for `create_nodes`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewNode {
    /// Explicit id. A fresh one is generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NodeId>,
    /// Labels, at least one. Duplicates are collapsed.
    pub labels: Vec<String>,
    /// Initial properties.
    #[serde(default)]
    pub properties: Properties,
}

impl NewNode {
    /// Node input with the given labels.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: None,
            labels: labels.into_iter().map(Into::into).collect(),
            properties: Properties::new(),
        }
    }

    /// Use an explicit id.
    pub fn with_id(mut self, id: NodeId) -> Self {
        self.id = Some(id);
        self
    }

    /// Add a property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// Input for `create_edges`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEdge {
    /// Source node.
    pub from: NodeId,
    /// Target node.
    pub to: NodeId,
    /// Relation type.
    #[serde(rename = "type")]
    pub edge_type: String,
    /// Initial properties.
    #[serde(default)]
    pub properties: Properties,
}

impl NewEdge {
    /// Edge input without properties.
    pub fn new(from: NodeId, edge_type: impl Into<String>, to: NodeId) -> Self {
        Self {
            from,
            to,
            edge_type: edge_type.into(),
            properties: Properties::new(),
        }
    }

    /// Add a property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// Direction for related-node lookups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Follow edges leaving the start node (from → to).
    #[default]
    Outgoing,
    /// Follow edges arriving at the start node (to → from).
    Incoming,
    /// Follow edges either way.
    Both,
}

impl FromStr for Direction {
    type Err = KgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "outgoing" => Ok(Direction::Outgoing),
            "incoming" => Ok(Direction::Incoming),
            "both" => Ok(Direction::Both),
            other => Err(KgError::invalid_input(format!(
                "invalid direction '{}': expected outgoing, incoming, or both",
                other
            ))),
        }
    }
}

/// Which parts of a node `find_nodes` inspects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    /// The `name` property, when it is a string.
    Name,
    /// Each label.
    Labels,
    /// Every string-valued property.
    Properties,
    /// Any of the above.
    #[default]
    All,
}

impl FromStr for SearchField {
    type Err = KgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(SearchField::Name),
            "labels" => Ok(SearchField::Labels),
            "properties" => Ok(SearchField::Properties),
            "all" => Ok(SearchField::All),
            other => Err(KgError::invalid_input(format!(
                "invalid search field '{}': expected name, labels, properties, or all",
                other
            ))),
        }
    }
}

/// How `find_nodes` compares text. Both modes ignore case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Candidate contains the query.
    #[default]
    Substring,
    /// Candidate equals the query.
    Exact,
}

impl MatchMode {
    /// Compare an already-lowercased query against a candidate.
    pub(crate) fn matches(self, needle: &str, candidate: &str) -> bool {
        let candidate = candidate.to_lowercase();
        match self {
            MatchMode::Substring => candidate.contains(needle),
            MatchMode::Exact => candidate == needle,
        }
    }
}

impl FromStr for MatchMode {
    type Err = KgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "substring" => Ok(MatchMode::Substring),
            "exact" => Ok(MatchMode::Exact),
            other => Err(KgError::invalid_input(format!(
                "invalid match mode '{}': expected substring or exact",
                other
            ))),
        }
    }
}

/// Limit and offset applied after filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Maximum items returned. `None` means all.
    #[serde(default)]
    pub limit: Option<usize>,
    /// Items skipped before the first returned one.
    #[serde(default)]
    pub offset: usize,
}

impl Pagination {
    /// Everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// `limit` items starting at `offset`.
    pub fn new(limit: usize, offset: usize) -> Self {
        Self {
            limit: Some(limit),
            offset,
        }
    }

    /// Slice `items`, keeping the pre-pagination count.
    pub fn apply<T>(self, items: Vec<T>) -> Page<T> {
        let total_count = items.len();
        let items = items
            .into_iter()
            .skip(self.offset)
            .take(self.limit.unwrap_or(usize::MAX))
            .collect();
        Page { items, total_count }
    }
}

/// A window of results plus the total before pagination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items in this window.
    pub items: Vec<T>,
    /// Matches before limit/offset.
    pub total_count: usize,
}

impl<T> Page<T> {
    /// Whether this window holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items in this window.
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Options for `find_nodes`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Fields inspected.
    pub search_in: SearchField,
    /// Comparison mode.
    pub mode: MatchMode,
    /// Window.
    pub page: Pagination,
}

impl SearchOptions {
    /// Restrict the inspected fields.
    pub fn search_in(mut self, field: SearchField) -> Self {
        self.search_in = field;
        self
    }

    /// Set the comparison mode.
    pub fn mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the window.
    pub fn page(mut self, page: Pagination) -> Self {
        self.page = page;
        self
    }
}

/// Options for `find_related_nodes`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelatedOptions {
    /// Edge direction relative to the start node.
    pub direction: Direction,
    /// Only follow edges of this type.
    pub relation_type: Option<String>,
    /// Only return nodes carrying this label.
    pub end_label: Option<String>,
    /// Window.
    pub page: Pagination,
}

impl RelatedOptions {
    /// Set the direction.
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Filter edges by type.
    pub fn relation_type(mut self, relation_type: impl Into<String>) -> Self {
        self.relation_type = Some(relation_type.into());
        self
    }

    /// Filter resulting nodes by label.
    pub fn end_label(mut self, label: impl Into<String>) -> Self {
        self.end_label = Some(label.into());
        self
    }

    /// Set the window.
    pub fn page(mut self, page: Pagination) -> Self {
        self.page = page;
        self
    }
}

/// Summary counts for a graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    /// Number of nodes.
    pub node_count: usize,
    /// Number of edges.
    pub edge_count: usize,
    /// Distinct labels across all nodes.
    pub label_count: usize,
    /// Distinct edge types.
    pub relation_type_count: usize,
}

/// Result of a pure graph operation and whether it changed the graph.
///
/// The store persists only when `changed` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation<T> {
    /// Value handed back to the caller.
    pub value: T,
    /// Whether the graph must be saved.
    pub changed: bool,
}

impl<T> Mutation<T> {
    /// The graph was modified.
    pub fn changed(value: T) -> Self {
        Self {
            value,
            changed: true,
        }
    }

    /// The graph is as it was.
    pub fn unchanged(value: T) -> Self {
        Self {
            value,
            changed: false,
        }
    }

    /// Construct from a flag.
    pub fn new(value: T, changed: bool) -> Self {
        Self { value, changed }
    }
}
