//! Browser state and input handling

pub mod file_browser;
pub mod input;
mod intent;

pub use file_browser::FileBrowser;
pub use input::{ClickKind, ClickTracker};
pub use intent::{Intent, ViewMode};
