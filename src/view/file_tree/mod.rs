// File tree module for a lazily fetched remote directory hierarchy
//
// Nodes are kept in an arena keyed by NodeId. Directories are listed only when
// first expanded or revealed, and the listing is written back by id.

pub mod node;
pub mod tree;

pub use node::{Node, NodeId};
pub use tree::FileTree;
