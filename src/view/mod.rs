//! View and UI layer

pub mod file_tree;
pub mod theme;
pub mod ui;
