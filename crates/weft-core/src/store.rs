//! Per-node edge storage: one ordered, duplicate-free list per relation

use crate::node::NodeId;
use crate::relation::RelationRegistry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Edge lists for one node, keyed by relation name
///
/// Holds the raw list primitives only; complement synchronization lives on
/// [`Graph`](crate::graph::Graph), which owns both ends of every edge and
/// keeps the mutating primitives crate-internal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EdgeStore {
    lists: HashMap<String, Vec<NodeId>>,
}

impl EdgeStore {
    /// One empty list per declared relation
    pub(crate) fn new(registry: &RelationRegistry) -> Self {
        let lists = registry
            .names()
            .map(|name| (name.to_string(), Vec::new()))
            .collect();
        Self { lists }
    }

    /// Neighbors for a relation, in insertion order; empty for unknown names
    pub fn list(&self, relation: &str) -> &[NodeId] {
        self.lists.get(relation).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Append a target unless already present; true when appended
    pub(crate) fn insert(&mut self, relation: &str, target: NodeId) -> bool {
        match self.lists.get_mut(relation) {
            Some(list) if !list.contains(&target) => {
                list.push(target);
                true
            }
            _ => false,
        }
    }

    /// Remove a target if present; true when removed
    pub(crate) fn remove(&mut self, relation: &str, target: NodeId) -> bool {
        match self.lists.get_mut(relation) {
            Some(list) => match list.iter().position(|id| *id == target) {
                Some(index) => {
                    list.remove(index);
                    true
                }
                None => false,
            },
            None => false,
        }
    }
}
