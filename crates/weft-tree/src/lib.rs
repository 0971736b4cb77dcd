//! Weft Tree - Tree and selection utilities built on weft-core
//!
//! Conveniences layered over the core graph engine: the canonical tree
//! kind, root-finding and preorder walking, and bulk attribute access
//! across an ordered selection of nodes. Everything here consumes the
//! core's public interface only.

pub mod error;
pub mod select;
pub mod tree;

pub use error::{Result, TreeError};
pub use select::Selection;
pub use tree::{root, tree_kind, walk, CHILDREN, PARENTS};
