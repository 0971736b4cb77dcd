//! Node handles and arena entries

use crate::error::{Error, Result};
use crate::kind::NodeKind;
use crate::store::EdgeStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use ulid::Ulid;

/// Stable handle for a node
///
/// Handles are the identity of a node: copyable, hashable, and never
/// reused. Edge lists and search results hold handles, not nodes, so
/// cyclic graphs need no ownership bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Ulid);

impl NodeId {
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    pub fn from_string(s: &str) -> std::result::Result<Self, ulid::DecodeError> {
        Ok(Self(Ulid::from_string(s)?))
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node in the graph arena
///
/// Carries its kind, free-form attributes (used only by search predicates),
/// and one edge list per declared relation. Nodes are created through
/// [`Graph::add_node`](crate::graph::Graph::add_node) and mutated through
/// the graph so complements stay in sync.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    kind: Arc<NodeKind>,
    attrs: HashMap<String, serde_json::Value>,
    pub(crate) edges: EdgeStore,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Node {
    pub(crate) fn new(kind: Arc<NodeKind>) -> Self {
        let now = Utc::now();
        let edges = EdgeStore::new(kind.registry());
        Self {
            id: NodeId::new(),
            kind,
            attrs: HashMap::new(),
            edges,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Get an attribute value
    pub fn attr(&self, name: &str) -> Option<&serde_json::Value> {
        self.attrs.get(name)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    /// All attributes of this node
    pub fn attrs(&self) -> &HashMap<String, serde_json::Value> {
        &self.attrs
    }

    /// Set an attribute; declared relation names are reserved
    pub(crate) fn set_attr(
        &mut self,
        name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Result<()> {
        let name = name.into();
        if self.kind.registry().contains(&name) {
            return Err(Error::ReservedRelation(name));
        }
        self.attrs.insert(name, value.into());
        self.touch();
        Ok(())
    }

    pub(crate) fn remove_attr(&mut self, name: &str) -> Option<serde_json::Value> {
        let removed = self.attrs.remove(name);
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
