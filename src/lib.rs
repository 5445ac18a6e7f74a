//! kgraph: an embedded property-graph knowledge store.
//!
//! Labeled nodes and typed, directed edges are kept in a single JSON Lines
//! file. Every operation loads the file, applies one change or query, and
//! (for mutations that changed something) validates the whole graph and
//! atomically replaces the file.
//!
//! ```no_run
//! use kgraph::{Direction, GraphStore, NewEdge, NewNode, RelatedOptions, StoreConfig};
//!
//! # fn main() -> kgraph::KgResult<()> {
//! let store = GraphStore::open(".", StoreConfig::default());
//! let people = store.create_nodes(vec![
//!     NewNode::new(["Person"]).with_property("name", "Alice"),
//!     NewNode::new(["Person"]).with_property("name", "Bob"),
//! ])?;
//! store.create_edges(vec![NewEdge::new(people[0].id, "KNOWS", people[1].id)])?;
//!
//! let friends = store.find_related_nodes(
//!     people[0].id,
//!     &RelatedOptions::default().direction(Direction::Outgoing),
//! )?;
//! assert_eq!(friends.total_count, 1);
//! # Ok(())
//! # }
//! ```
//!
//! The layers are usable on their own:
//! - [`model`]: the graph model and invariant checks
//! - [`storage`]: the JSONL codec, file load/save, and advisory lock
//! - [`engine`]: the `GraphStore` facade and its configuration

#![warn(missing_docs)]

mod types;

pub use types::*;

pub use kgraph_core as model;
pub use kgraph_engine as engine;
pub use kgraph_storage as storage;
