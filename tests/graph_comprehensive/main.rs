//! Graph Store Comprehensive Test Suite
//!
//! End-to-end tests against a real memory file in a scratch directory.
//!
//! ## Test Tiers
//!
//! - **Tier 1**: Persistence (file format, round-trip, atomic save)
//! - **Tier 2**: Mutations (node and edge operations through the store)
//! - **Tier 3**: Queries (search, listing, related nodes)
//! - **Tier 4**: Concurrency (many writers on one file)
//! - **Tier 5**: Scenarios and generated graphs
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test graph_comprehensive
//! ```


// Tier 1: Persistence
mod tier1_persistence;

// Tier 2: Mutations
mod tier2_mutations;


// Tier 4: Concurrency
mod tier4_concurrency;
