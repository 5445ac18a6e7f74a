//! Graph store engine for kgraph
//!
//! `GraphStore` is the entry point: it resolves the memory file from a
//! workspace root and configuration, then serves node and edge mutations
//! and read-only queries against it.
//!
//! ```no_run
//! use kgraph_engine::{GraphStore, NewNode, SearchOptions, StoreConfig};
//!
//! # fn main() -> kgraph_core::KgResult<()> {
//! let store = GraphStore::open("/tmp/workspace", StoreConfig::default());
//! store.create_nodes(vec![NewNode::new(["Person"]).with_property("name", "Alice")])?;
//! let page = store.find_nodes("alice", SearchOptions::default())?;
//! assert_eq!(page.total_count, 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod graph;

pub use config::{StoreConfig, CONFIG_FILE_NAME};
pub use graph::entity::Entity;
pub use graph::types::{
    Direction, GraphStats, MatchMode, Mutation, NewEdge, NewNode, Page, Pagination,
    RelatedOptions, SearchField, SearchOptions,
};
pub use graph::GraphStore;
