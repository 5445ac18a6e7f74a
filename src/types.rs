//! Public types for the kgraph API.
//!
//! This module re-exports types from the internal crates with one flat
//! public interface.

// ============================================================================
// Graph model
// ============================================================================

pub use kgraph_core::{Edge, EdgeId, EdgeKey, KnowledgeGraph, LabelSet, Node, NodeId};
pub use kgraph_core::{Properties, PropertyValue};

// Errors and invariant reporting
pub use kgraph_core::{EntityRef, KgError, KgResult, ValidationResult, Violation};

// ============================================================================
// Store surface
// ============================================================================

pub use kgraph_engine::{GraphStore, StoreConfig};

// Operation arguments and results
pub use kgraph_engine::{
    Direction, GraphStats, MatchMode, NewEdge, NewNode, Page, Pagination, RelatedOptions,
    SearchField, SearchOptions,
};

// Load diagnostics and duplicate handling
pub use kgraph_storage::{DuplicatePolicy, LoadReport, RecordError};
