//! Read-only queries. Each call loads a fresh graph and never writes.

use std::collections::BTreeSet;

use kgraph_core::{Edge, EdgeId, KgResult, KnowledgeGraph, Node, NodeId};

use super::types::{GraphStats, MatchMode, Page, Pagination, SearchField, SearchOptions};
use super::GraphStore;

fn node_matches(node: &Node, needle: &str, field: SearchField, mode: MatchMode) -> bool {
    let by_name = || node.name().map_or(false, |name| mode.matches(needle, name));
    let by_labels = || node.labels.iter().any(|label| mode.matches(needle, label));
    let by_properties = || node.string_properties().any(|value| mode.matches(needle, value));

    match field {
        SearchField::Name => by_name(),
        SearchField::Labels => by_labels(),
        SearchField::Properties => by_properties(),
        SearchField::All => by_name() || by_labels() || by_properties(),
    }
}

/// Nodes whose inspected text matches `query`, ignoring case.
pub fn find_nodes(graph: &KnowledgeGraph, query: &str, options: SearchOptions) -> Page<Node> {
    let needle = query.to_lowercase();
    let matches = graph
        .nodes
        .iter()
        .filter(|node| node_matches(node, &needle, options.search_in, options.mode))
        .cloned()
        .collect();
    options.page.apply(matches)
}

/// All nodes, or those carrying `label` (exact match), in load order.
pub fn list_nodes(graph: &KnowledgeGraph, label: Option<&str>, page: Pagination) -> Page<Node> {
    let nodes = graph
        .nodes
        .iter()
        .filter(|node| label.map_or(true, |label| node.has_label(label)))
        .cloned()
        .collect();
    page.apply(nodes)
}

/// Distinct labels, sorted.
pub fn list_labels(graph: &KnowledgeGraph) -> Vec<String> {
    graph
        .nodes
        .iter()
        .flat_map(|node| node.labels.iter())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct edge types, sorted.
pub fn list_relation_types(graph: &KnowledgeGraph) -> Vec<String> {
    graph
        .edges
        .iter()
        .map(|edge| edge.edge_type.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Counts over the whole graph.
pub fn graph_stats(graph: &KnowledgeGraph) -> GraphStats {
    GraphStats {
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        label_count: list_labels(graph).len(),
        relation_type_count: list_relation_types(graph).len(),
    }
}

impl GraphStore {
    /// Look up a node by id.
    pub fn get_node(&self, id: NodeId) -> KgResult<Option<Node>> {
        self.read(|graph| graph.node(id).cloned())
    }

    /// Look up an edge by id.
    pub fn get_edge(&self, id: EdgeId) -> KgResult<Option<Edge>> {
        self.read(|graph| graph.edge(id).cloned())
    }

    /// Search nodes. See [`find_nodes`].
    pub fn find_nodes(&self, query: &str, options: SearchOptions) -> KgResult<Page<Node>> {
        self.read(|graph| find_nodes(graph, query, options))
    }

    /// List nodes, optionally by label. See [`list_nodes`].
    pub fn list_nodes(&self, label: Option<&str>, page: Pagination) -> KgResult<Page<Node>> {
        self.read(|graph| list_nodes(graph, label, page))
    }

    /// Distinct labels, sorted.
    pub fn list_labels(&self) -> KgResult<Vec<String>> {
        self.read(list_labels)
    }

    /// Distinct relation types, sorted.
    pub fn list_relation_types(&self) -> KgResult<Vec<String>> {
        self.read(list_relation_types)
    }

    /// Node, edge, label and relation-type counts.
    pub fn graph_stats(&self) -> KgResult<GraphStats> {
        self.read(graph_stats)
    }
}
