//! UI rendering
//!
//! - `tree_node` - layout of one entry and what is shown beneath it
//! - `file_browser` - the whole browser frame
//! - `hit_map` - mouse hit testing against the last frame

pub mod file_browser;
pub mod hit_map;
pub mod tree_node;

pub use file_browser::FileBrowserRenderer;
pub use hit_map::{HitMap, HitTarget};
pub use tree_node::{TreeNode, TreeNodeLayout};
