//! Node kinds: a name plus the closed relation set declared at build time

use crate::error::Result;
use crate::limits::validate_kind_name;
use crate::relation::RelationRegistry;
use std::sync::Arc;

/// A node kind: named, with an immutable set of declared relations
///
/// Kinds are built once through [`NodeKindBuilder`] and shared between all
/// nodes of that kind; the relation set cannot change afterwards.
#[derive(Debug, Clone)]
pub struct NodeKind {
    name: String,
    registry: RelationRegistry,
}

impl NodeKind {
    /// Start declaring a new kind
    pub fn builder(name: impl Into<String>) -> NodeKindBuilder {
        NodeKindBuilder {
            name: name.into(),
            registry: RelationRegistry::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registry(&self) -> &RelationRegistry {
        &self.registry
    }
}

/// Builder collecting relation declarations for a [`NodeKind`]
#[derive(Debug)]
pub struct NodeKindBuilder {
    name: String,
    registry: RelationRegistry,
}

impl NodeKindBuilder {
    /// Declare a complemented relation pair (e.g. "children"/"parents")
    pub fn relation(mut self, name: &str, complement: &str) -> Result<Self> {
        self.registry.declare(name, Some(complement))?;
        Ok(self)
    }

    /// Declare a one-way relation: mutations never propagate
    pub fn one_way(mut self, name: &str) -> Result<Self> {
        self.registry.declare(name, None)?;
        Ok(self)
    }

    /// Finish the kind, freezing its relation set
    pub fn build(self) -> Result<Arc<NodeKind>> {
        validate_kind_name(&self.name)?;
        Ok(Arc::new(NodeKind {
            name: self.name,
            registry: self.registry,
        }))
    }
}
