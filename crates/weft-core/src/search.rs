//! Attribute-rule search across one relation, cycle-safe

use crate::error::Result;
use crate::graph::Graph;
use crate::node::{Node, NodeId};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Expected value for one rule: a textual pattern or a plain value
///
/// Textual expectations match by regex anchored at the start of the
/// attribute value (prefix match); everything else compares by equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expected {
    Pattern(String),
    Value(serde_json::Value),
}

impl From<&str> for Expected {
    fn from(pattern: &str) -> Self {
        Self::Pattern(pattern.to_string())
    }
}

impl From<String> for Expected {
    fn from(pattern: String) -> Self {
        Self::Pattern(pattern)
    }
}

impl From<serde_json::Value> for Expected {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(pattern) => Self::Pattern(pattern),
            other => Self::Value(other),
        }
    }
}

macro_rules! expected_from_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Expected {
                fn from(value: $ty) -> Self {
                    Self::Value(serde_json::Value::from(value))
                }
            }
        )*
    };
}

expected_from_value!(i32, i64, u32, u64, f64, bool);

#[derive(Debug, Clone)]
enum Matcher {
    Pattern(Regex),
    Exact(serde_json::Value),
}

#[derive(Debug, Clone)]
struct Rule {
    attribute: String,
    matcher: Matcher,
}

impl Rule {
    fn matches(&self, node: &Node) -> bool {
        // A missing attribute fails the rule silently, as does a textual
        // rule against a non-textual value.
        let Some(value) = node.attr(&self.attribute) else {
            return false;
        };
        match &self.matcher {
            Matcher::Pattern(regex) => value
                .as_str()
                .map(|text| regex.is_match(text))
                .unwrap_or(false),
            Matcher::Exact(expected) => value == expected,
        }
    }
}

/// Ordered set of rules a node must fully satisfy to match
#[derive(Debug, Clone, Default)]
pub struct MatchRules {
    rules: Vec<Rule>,
}

impl MatchRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule on one attribute
    ///
    /// A textual expected value is compiled as a start-anchored regex;
    /// compilation errors surface here, before any search runs.
    pub fn rule(mut self, attribute: impl Into<String>, expected: impl Into<Expected>) -> Result<Self> {
        let matcher = match expected.into() {
            Expected::Pattern(pattern) => {
                Matcher::Pattern(Regex::new(&format!(r"\A(?:{})", pattern))?)
            }
            Expected::Value(value) => Matcher::Exact(value),
        };
        self.rules.push(Rule {
            attribute: attribute.into(),
            matcher,
        });
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub(crate) fn matches(&self, node: &Node) -> bool {
        self.rules.iter().all(|rule| rule.matches(node))
    }
}

/// Search outcome, collapsing cardinality
///
/// Zero matches are `NotFound`, exactly one is `One`, two or more are
/// `Many` in discovery order. Callers branch on the variant; the single
/// case is never wrapped in a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FindResult {
    NotFound,
    One(NodeId),
    Many(Vec<NodeId>),
}

impl FindResult {
    /// Collapse a discovery-ordered list into the cardinality contract
    pub fn from_nodes(mut nodes: Vec<NodeId>) -> Self {
        match nodes.len() {
            0 => Self::NotFound,
            1 => Self::One(nodes.remove(0)),
            _ => Self::Many(nodes),
        }
    }

    pub fn is_found(&self) -> bool {
        !matches!(self, Self::NotFound)
    }

    /// The node of a single-match result
    pub fn single(&self) -> Option<NodeId> {
        match self {
            Self::One(id) => Some(*id),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::NotFound => 0,
            Self::One(_) => 1,
            Self::Many(ids) => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Matches in discovery order, regardless of cardinality
    pub fn into_vec(self) -> Vec<NodeId> {
        match self {
            Self::NotFound => Vec::new(),
            Self::One(id) => vec![id],
            Self::Many(ids) => ids,
        }
    }
}

/// Depth-first pre-order search over `relation`, rooted at `owner`'s list
///
/// The visited set is seeded with the owner and gates which nodes are
/// expanded as recursion roots, which bounds the walk on cyclic graphs;
/// every list occurrence is still rule-checked, so a node reachable
/// through several lists can appear more than once in discovery order.
/// Descent always follows the same-named relation; a node whose kind does
/// not declare it contributes an empty descent. Implemented with an
/// explicit frame stack so call-stack depth is independent of graph size.
pub(crate) fn run(graph: &Graph, owner: NodeId, relation: &str, rules: &MatchRules) -> FindResult {
    let mut visited: HashSet<NodeId> = HashSet::new();
    visited.insert(owner);

    let mut found: Vec<NodeId> = Vec::new();
    let mut stack: Vec<(Vec<NodeId>, usize)> = vec![(graph.edge_list(owner, relation).to_vec(), 0)];
    let mut checked = 0usize;

    loop {
        let next = {
            let Some((list, index)) = stack.last_mut() else {
                break;
            };
            if *index < list.len() {
                let node = list[*index];
                *index += 1;
                Some(node)
            } else {
                None
            }
        };

        match next {
            None => {
                stack.pop();
            }
            Some(node) => {
                checked += 1;
                if let Some(entry) = graph.get(node) {
                    if rules.matches(entry) {
                        found.push(node);
                    }
                }
                if visited.insert(node) {
                    stack.push((graph.edge_list(node, relation).to_vec(), 0));
                }
            }
        }
    }

    tracing::debug!(
        "find over `{}` checked {} occurrence(s), matched {}",
        relation,
        checked,
        found.len()
    );
    FindResult::from_nodes(found)
}
