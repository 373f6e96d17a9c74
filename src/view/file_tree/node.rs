use crate::model::{EntryKind, Snapshot};
use std::fmt;

/// Unique identifier for a tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

/// One file or directory entry in the browsed tree
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Unique identifier
    pub id: NodeId,
    /// Display name as listed by the server
    pub file_name: String,
    /// Path relative to the server root, used to build listing requests
    pub full_path: String,
    pub kind: EntryKind,
    /// Parent node ID (None for root)
    pub parent: Option<NodeId>,
    /// Child node IDs in listing order.
    ///
    /// `None` means the directory has not been fetched yet. Files never
    /// have children.
    children: Option<Vec<NodeId>>,
}

impl Node {
    /// Create a new, unfetched node
    pub fn new(
        id: NodeId,
        file_name: String,
        full_path: String,
        kind: EntryKind,
        parent: Option<NodeId>,
    ) -> Self {
        Self {
            id,
            file_name,
            full_path,
            kind,
            parent,
            children: None,
        }
    }

    pub(crate) fn from_snapshot(id: NodeId, snapshot: &Snapshot, parent: Option<NodeId>) -> Self {
        Self::new(
            id,
            snapshot.file_name.clone(),
            snapshot.full_path.clone(),
            snapshot.kind,
            parent,
        )
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Whether this directory's listing has been fetched
    pub fn is_fetched(&self) -> bool {
        self.children.is_some()
    }

    pub fn children(&self) -> Option<&[NodeId]> {
        self.children.as_deref()
    }

    /// Path sent to the listing endpoint for this node
    pub fn request_path(&self) -> String {
        format!("./{}", self.full_path)
    }

    /// Install fetched children. Ignored for files.
    pub(crate) fn set_children(&mut self, children: Vec<NodeId>) -> Option<Vec<NodeId>> {
        if !self.is_dir() {
            return None;
        }
        self.children.replace(children)
    }
}
