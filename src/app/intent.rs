use crate::view::file_tree::NodeId;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the tree is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Indented rows with disclosure arrows
    #[default]
    Tree,
    /// Flat icon grid of one open folder
    File,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Tree => ViewMode::File,
            ViewMode::File => ViewMode::Tree,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Tree => "Tree",
            ViewMode::File => "File",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Something the user asked the browser to do
///
/// Rendered entries never touch browser state themselves; input handling
/// turns clicks and keys into intents and [`super::FileBrowser::handle_intent`]
/// applies them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Select a node, or clear the selection if it is already selected
    Select(NodeId),
    /// Flip a directory between collapsed and expanded
    ToggleExpand(NodeId),
    /// Double click / Enter on an entry
    Activate(NodeId),
    /// Show the parent of the open folder (file view)
    OpenParent,
    SetViewMode(ViewMode),
    SwitchViewMode,
    /// Move the selection to the next visible entry
    SelectNext,
    /// Move the selection to the previous visible entry
    SelectPrev,
    /// Close the error alert
    DismissAlert,
    Quit,
}
