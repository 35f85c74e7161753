//! Action-conditional Context Tree Weighting predictor.
//!
//! The tree mixes, over every pruning of a depth-D suffix tree, the
//! Krichevsky-Trofimov estimate of each context's symbol stream. Nodes live
//! in an arena indexed by `u32` ids; the tree grows lazily along observed
//! context paths and shrinks again on revert.

pub mod arena;
pub mod node;
pub mod tree;


pub use node::{CtwNode, NodeId};
pub use tree::ContextTree;
