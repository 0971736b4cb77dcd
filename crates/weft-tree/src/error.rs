//! Error types for Weft Tree

use thiserror::Error;
use weft_core::NodeId;

/// Result type alias using Weft Tree's error
pub type Result<T> = std::result::Result<T, TreeError>;

/// Weft Tree error types
#[derive(Error, Debug)]
pub enum TreeError {
    #[error("Parent cycle at {0}")]
    ParentCycle(NodeId),

    #[error(transparent)]
    Core(#[from] weft_core::Error),
}
