//! Relation views: ephemeral handles bound to (owner, relation name)

use crate::error::Result;
use crate::graph::{Graph, RelationContent};
use crate::node::NodeId;
use crate::search::{self, FindResult, MatchRules};

/// Read-only view of one relation on one node
///
/// Re-creatable on demand from (graph, owner, name); never stored state.
/// An empty view compares equal to `None` as well as to an empty
/// sequence: "relation unset" and "relation empty" are the same state.
#[derive(Debug, Clone, Copy)]
pub struct RelationView<'g> {
    graph: &'g Graph,
    owner: NodeId,
    name: &'g str,
}

impl<'g> RelationView<'g> {
    pub(crate) fn new(graph: &'g Graph, owner: NodeId, name: &str) -> Self {
        // The view may outlive the caller's name string; resolve to the
        // registry's own copy of the relation name.
        let name: &'g str = graph
            .get(owner)
            .and_then(|node| node.kind().registry().lookup(name))
            .map(|descriptor| descriptor.name.as_str())
            .unwrap_or_default();
        Self { graph, owner, name }
    }

    pub fn owner(&self) -> NodeId {
        self.owner
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Neighbor at an index, in insertion order
    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.as_slice().get(index).copied()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.as_slice().contains(&id)
    }

    /// The underlying edge list
    pub fn as_slice(&self) -> &'g [NodeId] {
        self.graph.edge_list(self.owner, self.name)
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + 'g {
        self.as_slice().iter().copied()
    }

    /// Recursive, cycle-safe search across this relation
    pub fn find(&self, rules: &MatchRules) -> FindResult {
        search::run(self.graph, self.owner, self.name, rules)
    }
}

impl PartialEq for RelationView<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl PartialEq<[NodeId]> for RelationView<'_> {
    fn eq(&self, other: &[NodeId]) -> bool {
        self.as_slice() == other
    }
}

impl PartialEq<&[NodeId]> for RelationView<'_> {
    fn eq(&self, other: &&[NodeId]) -> bool {
        self.as_slice() == *other
    }
}

impl PartialEq<Vec<NodeId>> for RelationView<'_> {
    fn eq(&self, other: &Vec<NodeId>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<const N: usize> PartialEq<[NodeId; N]> for RelationView<'_> {
    fn eq(&self, other: &[NodeId; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

/// `None` means "relation unset": equal exactly when the view is empty.
impl<'g, T> PartialEq<Option<T>> for RelationView<'g>
where
    RelationView<'g>: PartialEq<T>,
{
    fn eq(&self, other: &Option<T>) -> bool {
        match other {
            None => self.is_empty(),
            Some(value) => self.eq(value),
        }
    }
}

/// Mutable view of one relation on one node
///
/// Mutations delegate to the graph, which keeps the complement relation on
/// every affected neighbor in sync. Whole-value assignment goes through
/// [`replace`](RelationViewMut::replace) only.
#[derive(Debug)]
pub struct RelationViewMut<'g> {
    graph: &'g mut Graph,
    owner: NodeId,
    name: String,
}

impl<'g> RelationViewMut<'g> {
    pub(crate) fn new(graph: &'g mut Graph, owner: NodeId, name: &str) -> Self {
        Self {
            graph,
            owner,
            name: name.to_string(),
        }
    }

    pub fn owner(&self) -> NodeId {
        self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reborrow read-only
    pub fn view(&self) -> RelationView<'_> {
        RelationView::new(self.graph, self.owner, &self.name)
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.as_slice().get(index).copied()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.as_slice().contains(&id)
    }

    pub fn as_slice(&self) -> &[NodeId] {
        self.graph.edge_list(self.owner, &self.name)
    }

    /// Append targets, skipping those already present
    pub fn append(&mut self, targets: impl IntoIterator<Item = NodeId>) -> Result<()> {
        self.graph.append(self.owner, &self.name, targets)
    }

    /// Append a single target
    pub fn push(&mut self, target: NodeId) -> Result<()> {
        self.append([target])
    }

    /// Remove targets; absent ones are silently ignored
    pub fn remove(&mut self, targets: impl IntoIterator<Item = NodeId>) -> Result<()> {
        self.graph.remove(self.owner, &self.name, targets)
    }

    /// Remove every element
    pub fn clear(&mut self) -> Result<()> {
        self.graph.empty(self.owner, &self.name)
    }

    /// Replace the whole content: empty, then append
    pub fn replace(&mut self, content: impl Into<RelationContent>) -> Result<()> {
        self.graph.set_relation(self.owner, &self.name, content)
    }

    /// Recursive, cycle-safe search across this relation
    pub fn find(&self, rules: &MatchRules) -> FindResult {
        search::run(self.graph, self.owner, &self.name, rules)
    }
}
