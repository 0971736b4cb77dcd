//! Bulk operations across an ordered result set of nodes

use crate::error::Result;
use std::collections::HashSet;
use weft_core::{Error, FindResult, Graph, MatchRules, NodeId, RelationView};

/// Ordered, duplicate-free set of node handles
///
/// Built from a relation view, a search result, or an explicit list, and
/// used for bulk attribute access and relation stepping. Thin call-sites
/// over the core API: no operation here touches edge lists directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    nodes: Vec<NodeId>,
}

impl Selection {
    /// Collect handles in order, dropping later duplicates
    pub fn new(nodes: impl IntoIterator<Item = NodeId>) -> Self {
        let mut seen: HashSet<NodeId> = HashSet::new();
        let nodes = nodes.into_iter().filter(|id| seen.insert(*id)).collect();
        Self { nodes }
    }

    pub fn from_view(view: &RelationView<'_>) -> Self {
        Self::new(view.iter())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.nodes.get(index).copied()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(&id)
    }

    pub fn as_slice(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    /// One attribute value per node, in selection order
    pub fn attr(&self, graph: &Graph, name: &str) -> Result<Vec<Option<serde_json::Value>>> {
        self.nodes
            .iter()
            .map(|&id| Ok(graph.node(id)?.attr(name).cloned()))
            .collect()
    }

    /// Set one attribute on every node in the selection
    ///
    /// Checked against every node before the first write, so a reserved
    /// relation name or stale handle leaves the whole selection untouched.
    pub fn set_attr(
        &self,
        graph: &mut Graph,
        name: &str,
        value: impl Into<serde_json::Value>,
    ) -> Result<()> {
        for &id in &self.nodes {
            let node = graph.node(id)?;
            if node.kind().registry().contains(name) {
                return Err(Error::ReservedRelation(name.to_string()).into());
            }
        }

        let value = value.into();
        for &id in &self.nodes {
            graph.set_attr(id, name, value.clone())?;
        }
        Ok(())
    }

    /// Gather the named relation across the selection, in order
    pub fn step(&self, graph: &Graph, relation: &str) -> Result<Selection> {
        let mut gathered: Vec<NodeId> = Vec::new();
        for &id in &self.nodes {
            gathered.extend(graph.relation(id, relation)?.iter());
        }
        Ok(Selection::new(gathered))
    }

    /// Search the named relation from every node in the selection
    ///
    /// Per-node matches are concatenated in selection order, then collapsed
    /// through the usual cardinality contract.
    pub fn find(&self, graph: &Graph, relation: &str, rules: &MatchRules) -> Result<FindResult> {
        let mut matches: Vec<NodeId> = Vec::new();
        for &id in &self.nodes {
            matches.extend(graph.relation(id, relation)?.find(rules).into_vec());
        }
        Ok(FindResult::from_nodes(matches))
    }
}

impl From<FindResult> for Selection {
    fn from(result: FindResult) -> Self {
        Self::new(result.into_vec())
    }
}

impl FromIterator<NodeId> for Selection {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{tree_kind, CHILDREN, PARENTS};
    use serde_json::json;

    fn setup(count: usize) -> (Graph, Vec<NodeId>) {
        let kind = tree_kind();
        let mut graph = Graph::new();
        let ids = (0..count).map(|_| graph.add_node(kind.clone())).collect();
        (graph, ids)
    }

    #[test]
    fn test_selection_dedups_preserving_order() {
        let (_, ids) = setup(3);
        let (a, b, c) = (ids[0], ids[1], ids[2]);

        let selection = Selection::new([b, a, b, c, a]);
        assert_eq!(selection.as_slice(), [b, a, c]);
    }

    #[test]
    fn test_bulk_attr_in_selection_order() {
        let (mut graph, ids) = setup(3);
        let (a, b, c) = (ids[0], ids[1], ids[2]);
        graph.set_attr(a, "color", "red").unwrap();
        graph.set_attr(c, "color", "blue").unwrap();

        let selection = Selection::new([c, a, b]);
        let colors = selection.attr(&graph, "color").unwrap();
        assert_eq!(colors, [Some(json!("blue")), Some(json!("red")), None]);
    }

    #[test]
    fn test_bulk_set_attr() {
        let (mut graph, ids) = setup(3);

        let selection = Selection::new(ids.iter().copied());
        selection.set_attr(&mut graph, "color", "green").unwrap();

        for &id in &ids {
            assert_eq!(graph.attr(id, "color").unwrap(), Some(&json!("green")));
        }
    }

    #[test]
    fn test_bulk_set_attr_reserved_name_leaves_all_untouched() {
        let (mut graph, ids) = setup(2);

        let selection = Selection::new(ids.iter().copied());
        let result = selection.set_attr(&mut graph, CHILDREN, "oops");

        assert!(result.is_err());
        for &id in &ids {
            assert!(graph.node(id).unwrap().attrs().is_empty());
        }
    }

    #[test]
    fn test_step_gathers_and_dedups() {
        let (mut graph, ids) = setup(4);
        let (a, b, shared, d) = (ids[0], ids[1], ids[2], ids[3]);
        graph.append(a, CHILDREN, [shared, d]).unwrap();
        graph.append(b, CHILDREN, [shared]).unwrap();

        let parents = Selection::new([a, b]);
        let children = parents.step(&graph, CHILDREN).unwrap();
        assert_eq!(children.as_slice(), [shared, d]);
    }

    #[test]
    fn test_find_across_selection() {
        let (mut graph, ids) = setup(4);
        let (p1, p2, c1, c2) = (ids[0], ids[1], ids[2], ids[3]);
        graph.append(p1, CHILDREN, [c1]).unwrap();
        graph.append(p2, CHILDREN, [c2]).unwrap();
        graph.set_attr(p1, "value", 13).unwrap();
        graph.set_attr(p2, "value", 13).unwrap();

        let children = Selection::new([c1, c2]);
        let rules = MatchRules::new().rule("value", 13).unwrap();
        let result = children.find(&graph, PARENTS, &rules).unwrap();
        assert_eq!(result, FindResult::Many(vec![p1, p2]));
    }

    #[test]
    fn test_selection_from_view_and_result() {
        let (mut graph, ids) = setup(3);
        let (a, b, c) = (ids[0], ids[1], ids[2]);
        graph.append(a, CHILDREN, [b, c]).unwrap();

        let view = graph.relation(a, CHILDREN).unwrap();
        assert_eq!(Selection::from_view(&view).as_slice(), [b, c]);

        let selection: Selection = FindResult::Many(vec![b, c, b]).into();
        assert_eq!(selection.as_slice(), [b, c]);
    }
}
