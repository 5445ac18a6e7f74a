//! Error types for kgraph
//!
//! `KgError` is the single error type returned by every store operation.
//! Line-level decode failures are not `KgError`s: they are recovered
//! during load and reported through logging (see `kgraph-storage`).
//!
//! | Failure                              | Variant                |
//! |--------------------------------------|------------------------|
//! | id does not exist                    | `NotFound`             |
//! | explicit node id already taken       | `DuplicateId`          |
//! | removing a node's last label         | `LastLabel`            |
//! | malformed argument                   | `InvalidInput`         |
//! | graph invariant broken at save time  | `InvariantViolation`   |
//! | record could not be encoded          | `Serialization`        |
//! | configuration file is malformed      | `Config`               |
//! | filesystem failure                   | `Storage`              |

use std::fmt;
use std::io;
use thiserror::Error;

use crate::types::{EdgeId, NodeId};
use crate::validation::Violation;

/// Result alias used across the workspace.
pub type KgResult<T> = std::result::Result<T, KgError>;

/// Reference to a single graph entity, used in errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    /// A node.
    Node {
        /// Node id
        id: NodeId,
    },
    /// An edge.
    Edge {
        /// Edge id
        id: EdgeId,
    },
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRef::Node { id } => write!(f, "node {}", id),
            EntityRef::Edge { id } => write!(f, "edge {}", id),
        }
    }
}

impl From<NodeId> for EntityRef {
    fn from(id: NodeId) -> Self {
        EntityRef::Node { id }
    }
}

impl From<EdgeId> for EntityRef {
    fn from(id: EdgeId) -> Self {
        EntityRef::Edge { id }
    }
}

/// Errors returned by kgraph operations.
#[derive(Debug, Error)]
pub enum KgError {
    /// The referenced node or edge does not exist.
    #[error("{entity} not found")]
    NotFound {
        /// Missing entity
        entity: EntityRef,
    },

    /// An explicit node id collides with an existing node or another
    /// node in the same batch. The whole batch is rejected.
    #[error("node id {id} already exists")]
    DuplicateId {
        /// Colliding id
        id: NodeId,
    },

    /// Removing the requested labels would leave the node without labels.
    #[error("cannot remove every label from node {id}: a node needs at least one label")]
    LastLabel {
        /// Node that was left unmodified
        id: NodeId,
    },

    /// An argument failed validation.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// What was wrong
        message: String,
    },

    /// The candidate graph breaks one or more invariants. Nothing was written.
    #[error("graph invariant violated: {}", join_violations(.violations))]
    InvariantViolation {
        /// Every violation found, in graph order
        violations: Vec<Violation>,
    },

    /// A record could not be serialized.
    #[error("serialization error: {message}")]
    Serialization {
        /// Underlying encoder message
        message: String,
    },

    /// The configuration file could not be parsed.
    #[error("configuration error: {message}")]
    Config {
        /// Parser message with the file path
        message: String,
    },

    /// Filesystem failure (read, write, rename, lock).
    #[error("storage error: {message}")]
    Storage {
        /// Operation and path
        message: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl KgError {
    /// Missing node.
    pub fn node_not_found(id: NodeId) -> Self {
        KgError::NotFound { entity: id.into() }
    }

    /// Missing edge.
    pub fn edge_not_found(id: EdgeId) -> Self {
        KgError::NotFound { entity: id.into() }
    }

    /// Bad argument.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        KgError::InvalidInput {
            message: message.into(),
        }
    }

    /// Encoder failure.
    pub fn serialization(message: impl Into<String>) -> Self {
        KgError::Serialization {
            message: message.into(),
        }
    }

    /// Configuration failure.
    pub fn config(message: impl Into<String>) -> Self {
        KgError::Config {
            message: message.into(),
        }
    }

    /// I/O failure with context.
    pub fn storage(message: impl Into<String>, source: io::Error) -> Self {
        KgError::Storage {
            message: message.into(),
            source,
        }
    }

    /// Invariant failure carrying every violation.
    pub fn invariant(violations: Vec<Violation>) -> Self {
        KgError::InvariantViolation { violations }
    }

    /// Whether this is a `NotFound` error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, KgError::NotFound { .. })
    }

    /// Whether this is an `InvariantViolation` error.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, KgError::InvariantViolation { .. })
    }
}
