//! Core types for kgraph
//!
//! This crate defines the graph model shared by every other crate:
//! - Typed identifiers (`NodeId`, `EdgeId`)
//! - Scalar property values (`PropertyValue`, `Properties`)
//! - Label sets with set semantics (`LabelSet`)
//! - `Node`, `Edge`, and the `KnowledgeGraph` aggregate
//! - Graph-wide invariant validation
//! - The error taxonomy (`KgError`, `KgResult`)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod edge;
pub mod error;
pub mod graph;
pub mod labels;
pub mod node;
pub mod types;
pub mod validation;
pub mod value;

pub use edge::{Edge, EdgeKey};
pub use error::{EntityRef, KgError, KgResult};
pub use graph::KnowledgeGraph;
pub use labels::LabelSet;
pub use node::Node;
pub use types::{EdgeId, NodeId};
pub use validation::{Endpoint, ValidationResult, Violation};
pub use value::{Properties, PropertyValue};
