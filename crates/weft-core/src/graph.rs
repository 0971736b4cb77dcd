//! The node arena and the complement-synchronizing edge operations

use crate::error::{Error, Result};
use crate::kind::NodeKind;
use crate::node::{Node, NodeId};
use crate::relation::RelationDescriptor;
use crate::view::{RelationView, RelationViewMut};
use std::collections::HashMap;
use std::sync::Arc;

/// Whole-value content for [`Graph::set_relation`]: a single node or an
/// ordered collection of nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationContent {
    One(NodeId),
    Many(Vec<NodeId>),
}

impl RelationContent {
    pub fn into_vec(self) -> Vec<NodeId> {
        match self {
            Self::One(id) => vec![id],
            Self::Many(ids) => ids,
        }
    }
}

impl From<NodeId> for RelationContent {
    fn from(id: NodeId) -> Self {
        Self::One(id)
    }
}

impl From<Vec<NodeId>> for RelationContent {
    fn from(ids: Vec<NodeId>) -> Self {
        Self::Many(ids)
    }
}

impl From<&[NodeId]> for RelationContent {
    fn from(ids: &[NodeId]) -> Self {
        Self::Many(ids.to_vec())
    }
}

impl<const N: usize> From<[NodeId; N]> for RelationContent {
    fn from(ids: [NodeId; N]) -> Self {
        Self::Many(ids.to_vec())
    }
}

/// Arena of nodes addressed by stable [`NodeId`] handles
///
/// All edge mutations go through the graph so that for every relation R
/// with complement C, "B in A's R-list" ⇔ "A in B's C-list" holds when the
/// operation returns. Precondition violations are rejected before any
/// state change.
#[derive(Debug, Default)]
pub struct Graph {
    nodes: HashMap<NodeId, Node>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node of the given kind, with every declared relation empty
    pub fn add_node(&mut self, kind: Arc<NodeKind>) -> NodeId {
        let node = Node::new(kind);
        let id = node.id();
        tracing::trace!("add node {} of kind `{}`", id, node.kind().name());
        self.nodes.insert(id, node);
        id
    }

    /// Borrow a node by handle
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(&id).ok_or(Error::NodeNotFound(id))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes, in no particular order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Attributes
    // ─────────────────────────────────────────────────────────────────────

    /// Get an attribute value
    pub fn attr(&self, id: NodeId, name: &str) -> Result<Option<&serde_json::Value>> {
        Ok(self.node(id)?.attr(name))
    }

    /// Set an attribute; declared relation names are reserved
    pub fn set_attr(
        &mut self,
        id: NodeId,
        name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Result<()> {
        self.node_mut(id)?.set_attr(name, value)
    }

    /// Remove an attribute, returning its previous value
    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> Result<Option<serde_json::Value>> {
        Ok(self.node_mut(id)?.remove_attr(name))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Relations
    // ─────────────────────────────────────────────────────────────────────

    /// Read-only view of (owner, relation)
    pub fn relation<'g>(&'g self, owner: NodeId, name: &str) -> Result<RelationView<'g>> {
        self.descriptor(owner, name)?;
        Ok(RelationView::new(self, owner, name))
    }

    /// Mutable view of (owner, relation)
    pub fn relation_mut<'g>(&'g mut self, owner: NodeId, name: &str) -> Result<RelationViewMut<'g>> {
        self.descriptor(owner, name)?;
        Ok(RelationViewMut::new(self, owner, name))
    }

    /// Append targets to a relation, skipping those already present
    ///
    /// Newly appended targets gain the owner in their complement list, so
    /// mutual appends converge to exactly one edge per direction. Duplicate
    /// targets are silently ignored.
    pub fn append(
        &mut self,
        owner: NodeId,
        relation: &str,
        targets: impl IntoIterator<Item = NodeId>,
    ) -> Result<()> {
        let targets: Vec<NodeId> = targets.into_iter().collect();
        let descriptor = self.descriptor(owner, relation)?.clone();
        self.check_targets(&descriptor, &targets)?;

        let mut appended = 0usize;
        for target in targets {
            if self.node_mut(owner)?.edges.insert(relation, target) {
                appended += 1;
                self.node_mut(owner)?.touch();
                if let Some(complement) = descriptor.complement.as_deref() {
                    let neighbor = self.node_mut(target)?;
                    neighbor.edges.insert(complement, owner);
                    neighbor.touch();
                }
            }
        }
        tracing::trace!("append {} target(s) to {} via `{}`", appended, owner, relation);
        Ok(())
    }

    /// Remove targets from a relation; absent targets are silently ignored
    ///
    /// Removed targets lose the owner from their complement list.
    pub fn remove(
        &mut self,
        owner: NodeId,
        relation: &str,
        targets: impl IntoIterator<Item = NodeId>,
    ) -> Result<()> {
        let descriptor = self.descriptor(owner, relation)?.clone();

        for target in targets {
            if self.node_mut(owner)?.edges.remove(relation, target) {
                self.node_mut(owner)?.touch();
                if let Some(complement) = descriptor.complement.as_deref() {
                    if let Some(neighbor) = self.nodes.get_mut(&target) {
                        neighbor.edges.remove(complement, owner);
                        neighbor.touch();
                    }
                }
            }
        }
        Ok(())
    }

    /// Remove every element of a relation, with complement propagation
    pub fn empty(&mut self, owner: NodeId, relation: &str) -> Result<()> {
        // Snapshot first: removal mutates the list being drained.
        let targets = self.relation(owner, relation)?.as_slice().to_vec();
        self.remove(owner, relation, targets)
    }

    /// Replace a relation's whole content: empty, then append
    ///
    /// This is the only whole-value assignment; an element of the old
    /// content absent from the new one loses its complement link exactly
    /// once. The new content is validated before anything is unlinked.
    pub fn set_relation(
        &mut self,
        owner: NodeId,
        relation: &str,
        content: impl Into<RelationContent>,
    ) -> Result<()> {
        let targets = content.into().into_vec();
        let descriptor = self.descriptor(owner, relation)?.clone();
        self.check_targets(&descriptor, &targets)?;

        tracing::debug!(
            "set relation `{}` of {} to {} target(s)",
            relation,
            owner,
            targets.len()
        );
        self.empty(owner, relation)?;
        self.append(owner, relation, targets)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────

    pub(crate) fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Edge list tolerant of unknown owners and undeclared relations
    pub(crate) fn edge_list(&self, owner: NodeId, relation: &str) -> &[NodeId] {
        self.nodes
            .get(&owner)
            .map(|node| node.edges.list(relation))
            .unwrap_or(&[])
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(&id).ok_or(Error::NodeNotFound(id))
    }

    fn descriptor(&self, owner: NodeId, relation: &str) -> Result<&RelationDescriptor> {
        let node = self.node(owner)?;
        node.kind()
            .registry()
            .lookup(relation)
            .ok_or_else(|| Error::UndeclaredRelation {
                kind: node.kind().name().to_string(),
                relation: relation.to_string(),
            })
    }

    /// Reject the whole batch before any mutation: every target must exist
    /// and, for a complemented relation, be able to carry the back-link.
    fn check_targets(&self, descriptor: &RelationDescriptor, targets: &[NodeId]) -> Result<()> {
        for &target in targets {
            let node = self.node(target)?;
            if let Some(complement) = descriptor.complement.as_deref() {
                if !node.kind().registry().contains(complement) {
                    return Err(Error::IncompatibleKind {
                        kind: node.kind().name().to_string(),
                        relation: descriptor.name.clone(),
                        complement: complement.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_kind() -> Arc<NodeKind> {
        NodeKind::builder("tree")
            .relation("children", "parents")
            .unwrap()
            .build()
            .unwrap()
    }

    fn graph_with(count: usize) -> (Graph, Vec<NodeId>) {
        let kind = tree_kind();
        let mut graph = Graph::new();
        let ids = (0..count).map(|_| graph.add_node(kind.clone())).collect();
        (graph, ids)
    }

    fn list(graph: &Graph, owner: NodeId, relation: &str) -> Vec<NodeId> {
        graph.relation(owner, relation).unwrap().as_slice().to_vec()
    }

    #[test]
    fn test_append_links_both_sides() {
        let (mut graph, ids) = graph_with(2);
        let (a, b) = (ids[0], ids[1]);

        graph.append(a, "children", [b]).unwrap();

        assert_eq!(list(&graph, a, "children"), [b]);
        assert_eq!(list(&graph, b, "parents"), [a]);
    }

    #[test]
    fn test_append_is_idempotent() {
        let (mut graph, ids) = graph_with(2);
        let (a, b) = (ids[0], ids[1]);

        for _ in 0..3 {
            graph.append(a, "children", [b]).unwrap();
        }
        graph.append(b, "parents", [a]).unwrap();

        assert_eq!(list(&graph, a, "children"), [b]);
        assert_eq!(list(&graph, b, "parents"), [a]);
    }

    #[test]
    fn test_append_preserves_argument_order() {
        let (mut graph, ids) = graph_with(4);
        let (a, b, c, d) = (ids[0], ids[1], ids[2], ids[3]);

        graph.append(a, "children", [c, b, d]).unwrap();

        assert_eq!(list(&graph, a, "children"), [c, b, d]);
    }

    #[test]
    fn test_self_append() {
        let (mut graph, ids) = graph_with(1);
        let a = ids[0];

        graph.append(a, "children", [a]).unwrap();

        assert_eq!(list(&graph, a, "children"), [a]);
        assert_eq!(list(&graph, a, "parents"), [a]);
    }

    #[test]
    fn test_mutual_cycle() {
        let (mut graph, ids) = graph_with(2);
        let (a, b) = (ids[0], ids[1]);

        graph.append(a, "children", [b]).unwrap();
        graph.append(b, "children", [a]).unwrap();

        assert_eq!(list(&graph, a, "children"), [b]);
        assert_eq!(list(&graph, a, "parents"), [b]);
        assert_eq!(list(&graph, b, "children"), [a]);
        assert_eq!(list(&graph, b, "parents"), [a]);
    }

    #[test]
    fn test_remove_unlinks_both_sides() {
        let (mut graph, ids) = graph_with(3);
        let (a, b, c) = (ids[0], ids[1], ids[2]);

        graph.append(a, "children", [b, c]).unwrap();
        graph.remove(a, "children", [b]).unwrap();

        assert_eq!(list(&graph, a, "children"), [c]);
        assert!(list(&graph, b, "parents").is_empty());
        assert_eq!(list(&graph, c, "parents"), [a]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let (mut graph, ids) = graph_with(2);
        let (a, b) = (ids[0], ids[1]);

        graph.remove(a, "children", [b]).unwrap();
        graph.append(a, "children", [b]).unwrap();
        graph.remove(a, "children", [b]).unwrap();
        graph.remove(a, "children", [b]).unwrap();

        assert!(list(&graph, a, "children").is_empty());
        assert!(list(&graph, b, "parents").is_empty());
    }

    #[test]
    fn test_empty_clears_complements() {
        let (mut graph, ids) = graph_with(3);
        let (a, b, c) = (ids[0], ids[1], ids[2]);

        graph.append(a, "children", [b, c]).unwrap();
        graph.empty(a, "children").unwrap();

        assert!(list(&graph, a, "children").is_empty());
        assert!(list(&graph, b, "parents").is_empty());
        assert!(list(&graph, c, "parents").is_empty());
    }

    #[test]
    fn test_empty_tolerates_self_link() {
        let (mut graph, ids) = graph_with(1);
        let a = ids[0];

        graph.append(a, "children", [a]).unwrap();
        graph.empty(a, "children").unwrap();

        assert!(list(&graph, a, "children").is_empty());
        assert!(list(&graph, a, "parents").is_empty());
    }

    #[test]
    fn test_set_relation_replace_semantics() {
        let (mut graph, ids) = graph_with(4);
        let (a, b, c, d) = (ids[0], ids[1], ids[2], ids[3]);

        graph.set_relation(a, "children", [b, c]).unwrap();
        graph.set_relation(a, "children", [c, d]).unwrap();

        assert_eq!(list(&graph, a, "children"), [c, d]);
        assert!(list(&graph, b, "parents").is_empty());
        assert_eq!(list(&graph, c, "parents"), [a]);
        assert_eq!(list(&graph, d, "parents"), [a]);
    }

    #[test]
    fn test_set_relation_single_node() {
        let (mut graph, ids) = graph_with(2);
        let (a, b) = (ids[0], ids[1]);

        graph.set_relation(a, "children", b).unwrap();

        assert_eq!(list(&graph, a, "children"), [b]);
        assert_eq!(list(&graph, b, "parents"), [a]);
    }

    #[test]
    fn test_one_way_relation_never_propagates() {
        let kind = NodeKind::builder("watcher")
            .relation("children", "parents")
            .unwrap()
            .one_way("watches")
            .unwrap()
            .build()
            .unwrap();
        let mut graph = Graph::new();
        let a = graph.add_node(kind.clone());
        let b = graph.add_node(kind);

        graph.append(a, "watches", [b]).unwrap();

        assert_eq!(list(&graph, a, "watches"), [b]);
        assert!(list(&graph, b, "watches").is_empty());
        assert!(list(&graph, b, "children").is_empty());
        assert!(list(&graph, b, "parents").is_empty());
    }

    #[test]
    fn test_incompatible_kind_rejected_before_mutation() {
        let plain = NodeKind::builder("plain").build().unwrap();
        let mut graph = Graph::new();
        let a = graph.add_node(tree_kind());
        let good = graph.add_node(tree_kind());
        let bad = graph.add_node(plain);

        let result = graph.append(a, "children", [good, bad]);

        assert!(matches!(result, Err(Error::IncompatibleKind { .. })));
        // Nothing was linked, not even the compatible target.
        assert!(list(&graph, a, "children").is_empty());
        assert!(list(&graph, good, "parents").is_empty());
    }

    #[test]
    fn test_unknown_target_rejected_before_mutation() {
        let (mut graph, ids) = graph_with(2);
        let (a, b) = (ids[0], ids[1]);
        let stranger = NodeId::new();

        let result = graph.append(a, "children", [b, stranger]);

        assert!(matches!(result, Err(Error::NodeNotFound(_))));
        assert!(list(&graph, a, "children").is_empty());
    }

    #[test]
    fn test_undeclared_relation_rejected() {
        let (mut graph, ids) = graph_with(2);
        let (a, b) = (ids[0], ids[1]);

        assert!(matches!(
            graph.append(a, "siblings", [b]),
            Err(Error::UndeclaredRelation { .. })
        ));
        assert!(matches!(
            graph.relation(a, "siblings"),
            Err(Error::UndeclaredRelation { .. })
        ));
    }

    #[test]
    fn test_attr_roundtrip_and_reserved_names() {
        let (mut graph, ids) = graph_with(1);
        let a = ids[0];

        graph.set_attr(a, "name", "joe").unwrap();
        assert_eq!(graph.attr(a, "name").unwrap(), Some(&serde_json::json!("joe")));

        assert!(matches!(
            graph.set_attr(a, "children", "oops"),
            Err(Error::ReservedRelation(_))
        ));

        assert_eq!(
            graph.remove_attr(a, "name").unwrap(),
            Some(serde_json::json!("joe"))
        );
        assert_eq!(graph.attr(a, "name").unwrap(), None);
    }

    #[test]
    fn test_symmetric_relation() {
        let kind = NodeKind::builder("mesh")
            .relation("peers", "peers")
            .unwrap()
            .build()
            .unwrap();
        let mut graph = Graph::new();
        let a = graph.add_node(kind.clone());
        let b = graph.add_node(kind);

        graph.append(a, "peers", [b]).unwrap();

        assert_eq!(list(&graph, a, "peers"), [b]);
        assert_eq!(list(&graph, b, "peers"), [a]);

        graph.remove(b, "peers", [a]).unwrap();

        assert!(list(&graph, a, "peers").is_empty());
        assert!(list(&graph, b, "peers").is_empty());
    }
}
