//! Tree conveniences over the core graph: the canonical tree kind,
//! root-finding, and preorder walking

use crate::error::{Result, TreeError};
use std::collections::HashSet;
use std::sync::Arc;
use weft_core::{Graph, NodeId, NodeKind};

/// Child relation name of the canonical tree kind
pub const CHILDREN: &str = "children";

/// Parent relation name of the canonical tree kind
pub const PARENTS: &str = "parents";

/// The canonical tree kind: `children` complemented by `parents`
pub fn tree_kind() -> Arc<NodeKind> {
    NodeKind::builder("tree")
        .relation(CHILDREN, PARENTS)
        .and_then(|builder| builder.build())
        .expect("static tree relations are valid")
}

/// Find the root above a node by following its first parent upward
///
/// Stops at the first parentless ancestor. A node that is its own
/// ancestor through the parent chain is a [`TreeError::ParentCycle`].
pub fn root(graph: &Graph, node: NodeId) -> Result<NodeId> {
    let mut current = node;
    let mut seen: HashSet<NodeId> = HashSet::new();
    seen.insert(node);

    loop {
        let parents = graph.relation(current, PARENTS)?;
        match parents.get(0) {
            None => return Ok(current),
            Some(parent) => {
                if !seen.insert(parent) {
                    return Err(TreeError::ParentCycle(parent));
                }
                current = parent;
            }
        }
    }
}

/// Walk the subtree under a node in preorder
///
/// Emits the node itself, then each child's subtree in list order. A node
/// reachable through several children is emitted once, so shared and
/// cyclic structures still terminate.
pub fn walk(graph: &Graph, node: NodeId) -> Result<Vec<NodeId>> {
    let mut order: Vec<NodeId> = Vec::new();
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut stack: Vec<NodeId> = vec![node];

    while let Some(current) = stack.pop() {
        if !visited.insert(current) {
            continue;
        }
        order.push(current);

        let children = graph.relation(current, CHILDREN)?;
        for &child in children.as_slice().iter().rev() {
            stack.push(child);
        }
    }

    tracing::debug!("walked {} node(s) from {}", order.len(), node);
    Ok(order)
}
