//! Shared find-project-commit path for node and edge updates.
//!
//! Every property and label operation looks the entity up, applies a
//! closure to a copy, and writes the copy back only if the closure
//! succeeded and produced something different. A failing closure leaves the
//! graph untouched.

use kgraph_core::{Edge, EdgeId, KgError, KgResult, KnowledgeGraph, Node, NodeId, Properties};

use super::types::Mutation;

/// A graph element addressable by id and carrying properties.
pub trait Entity: Clone + PartialEq {
    /// Id type.
    type Id: Copy;

    /// Locate the entity in `graph`.
    fn find_mut(graph: &mut KnowledgeGraph, id: Self::Id) -> Option<&mut Self>;

    /// Error for a missing id.
    fn not_found(id: Self::Id) -> KgError;

    /// Property map.
    fn properties_mut(&mut self) -> &mut Properties;
}

impl Entity for Node {
    type Id = NodeId;

    fn find_mut(graph: &mut KnowledgeGraph, id: NodeId) -> Option<&mut Self> {
        graph.node_mut(id)
    }

    fn not_found(id: NodeId) -> KgError {
        KgError::node_not_found(id)
    }

    fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }
}

impl Entity for Edge {
    type Id = EdgeId;

    fn find_mut(graph: &mut KnowledgeGraph, id: EdgeId) -> Option<&mut Self> {
        graph.edge_mut(id)
    }

    fn not_found(id: EdgeId) -> KgError {
        KgError::edge_not_found(id)
    }

    fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }
}

/// Apply `f` to a copy of the entity and commit it if it changed.
pub fn project<E, F>(graph: &mut KnowledgeGraph, id: E::Id, f: F) -> KgResult<Mutation<E>>
where
    E: Entity,
    F: FnOnce(&mut E) -> KgResult<()>,
{
    let current = E::find_mut(graph, id).ok_or_else(|| E::not_found(id))?;
    let mut candidate = current.clone();
    f(&mut candidate)?;

    if candidate == *current {
        return Ok(Mutation::unchanged(candidate));
    }
    *current = candidate.clone();
    Ok(Mutation::changed(candidate))
}

/// Merge `patch` into the entity's properties; patch keys win.
pub fn merge_properties<E: Entity>(
    graph: &mut KnowledgeGraph,
    id: E::Id,
    patch: Properties,
) -> KgResult<Mutation<E>> {
    check_keys(&patch)?;
    project(graph, id, |entity: &mut E| {
        entity.properties_mut().extend(patch);
        Ok(())
    })
}

/// Replace the entity's properties wholesale.
pub fn replace_properties<E: Entity>(
    graph: &mut KnowledgeGraph,
    id: E::Id,
    properties: Properties,
) -> KgResult<Mutation<E>> {
    check_keys(&properties)?;
    project(graph, id, |entity: &mut E| {
        *entity.properties_mut() = properties;
        Ok(())
    })
}

pub(crate) fn check_keys(properties: &Properties) -> KgResult<()> {
    if properties.keys().any(String::is_empty) {
        return Err(KgError::invalid_input("property keys must not be empty"));
    }
    Ok(())
}
