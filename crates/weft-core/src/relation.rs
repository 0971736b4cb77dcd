//! Relation declarations and the per-kind registry

use crate::error::{Error, Result};
use crate::limits::validate_relation_name;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A declared relation: its name and the complement auto-synchronized on
/// every mutation of the pair, or `None` for a one-way relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationDescriptor {
    /// Relation name
    pub name: String,

    /// Complement relation name, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
}

impl RelationDescriptor {
    /// Whether mutations of this relation propagate to a complement
    pub fn is_complemented(&self) -> bool {
        self.complement.is_some()
    }
}

/// The closed set of relations a node kind declares
///
/// Declaring a complemented relation registers the inverse entry pointing
/// back, so both directions resolve. The set is fixed once the owning kind
/// is built; name membership is what separates relations from plain
/// attributes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelationRegistry {
    relations: HashMap<String, RelationDescriptor>,
}

impl RelationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a relation and, when complemented, its inverse entry
    pub(crate) fn declare(&mut self, name: &str, complement: Option<&str>) -> Result<()> {
        validate_relation_name(name)?;
        if let Some(complement) = complement {
            validate_relation_name(complement)?;
        }

        if self.relations.contains_key(name) {
            return Err(Error::RelationExists(name.to_string()));
        }
        if let Some(complement) = complement {
            if complement != name && self.relations.contains_key(complement) {
                return Err(Error::RelationExists(complement.to_string()));
            }
        }

        self.relations.insert(
            name.to_string(),
            RelationDescriptor {
                name: name.to_string(),
                complement: complement.map(str::to_string),
            },
        );

        // A self-complementary relation keeps a single entry.
        if let Some(complement) = complement {
            if complement != name {
                self.relations.insert(
                    complement.to_string(),
                    RelationDescriptor {
                        name: complement.to_string(),
                        complement: Some(name.to_string()),
                    },
                );
            }
        }

        Ok(())
    }

    /// Look up a declared relation by name
    pub fn lookup(&self, name: &str) -> Option<&RelationDescriptor> {
        self.relations.get(name)
    }

    /// Whether a name is a declared relation (as opposed to an attribute)
    pub fn contains(&self, name: &str) -> bool {
        self.relations.contains_key(name)
    }

    /// Names of all declared relations, in no particular order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.relations.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}
