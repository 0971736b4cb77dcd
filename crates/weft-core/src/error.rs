//! Error types for Weft Core

use crate::limits::ValidationError;
use crate::node::NodeId;
use thiserror::Error;

/// Result type alias using Weft's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Weft error types
///
/// Every variant is a precondition violation detected before any state
/// change; absent search results and redundant edge mutations are normal
/// outcomes, not errors.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Relation `{relation}` is not declared on kind `{kind}`")]
    UndeclaredRelation { kind: String, relation: String },

    #[error("Relation already declared: {0}")]
    RelationExists(String),

    #[error("Kind `{kind}` cannot carry relation `{relation}`: complement `{complement}` is not declared")]
    IncompatibleKind {
        kind: String,
        relation: String,
        complement: String,
    },

    #[error("`{0}` is a declared relation, not an attribute")]
    ReservedRelation(String),

    #[error("Invalid name: {0}")]
    InvalidName(#[from] ValidationError),

    #[error("Invalid match pattern: {0}")]
    Pattern(#[from] regex::Error),
}
