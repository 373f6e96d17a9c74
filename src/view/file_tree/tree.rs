use super::node::{Node, NodeId};
use crate::model::{EntryKind, Snapshot};
use std::collections::{HashMap, HashSet};
use std::io;

/// Lazily fetched directory tree
///
/// All nodes live in a flat table keyed by [`NodeId`]. The root is a
/// synthetic directory standing for the browsed path; its children are the
/// first listing. Directories start unfetched and receive their children
/// through [`FileTree::set_children`] when a listing arrives.
#[derive(Debug, Clone)]
pub struct FileTree {
    /// All nodes indexed by ID
    nodes: HashMap<NodeId, Node>,
    /// Root node ID
    root_id: NodeId,
    /// Next node ID to assign
    next_id: usize,
    /// Identifies this tree among the trees a browser has installed
    generation: u64,
}

impl FileTree {
    /// Create a tree rooted at `root_path` whose root children are `listing`
    pub fn new(root_path: &str, generation: u64, listing: Vec<Snapshot>) -> Self {
        let root_id = NodeId(0);
        let root = Node::new(
            root_id,
            root_path.to_string(),
            root_path.to_string(),
            EntryKind::Directory,
            None,
        );

        let mut nodes = HashMap::new();
        nodes.insert(root_id, root);

        let mut tree = Self {
            nodes,
            root_id,
            next_id: 1,
            generation,
        };
        tree.install_listing(root_id, listing);
        tree
    }

    /// Get the root node ID
    pub fn root_id(&self) -> NodeId {
        self.root_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Get a node by ID
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    fn get_node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Get all nodes
    pub fn all_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get number of nodes currently in memory
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Children of a node in listing order; empty when unfetched or a file
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get_node(id)
            .and_then(|node| node.children())
            .unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get_node(id).and_then(|node| node.parent)
    }

    /// Write a fetched listing onto a directory node
    ///
    /// Any children the node already had are discarded together with their
    /// subtrees, so a late result wins over an earlier one.
    ///
    /// # Errors
    ///
    /// Returns an error if the node does not exist or is a file.
    pub fn set_children(&mut self, id: NodeId, listing: Vec<Snapshot>) -> io::Result<()> {
        let node = self
            .get_node(id)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Node not found"))?;

        if !node.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "Cannot set children of a file node",
            ));
        }

        let previous: Vec<NodeId> = node.children().map(<[NodeId]>::to_vec).unwrap_or_default();
        for child_id in previous {
            self.remove_node_recursive(child_id);
        }

        self.install_listing(id, listing);
        Ok(())
    }

    fn install_listing(&mut self, parent: NodeId, listing: Vec<Snapshot>) {
        let child_ids: Vec<NodeId> = listing
            .into_iter()
            .map(|snapshot| self.add_subtree(snapshot, parent))
            .collect();

        if let Some(node) = self.get_node_mut(parent) {
            node.set_children(child_ids);
        }
    }

    /// Add a node and any pre-fetched descendants it carries
    fn add_subtree(&mut self, snapshot: Snapshot, parent: NodeId) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;

        let node = Node::from_snapshot(id, &snapshot, Some(parent));
        let is_dir = node.is_dir();
        self.nodes.insert(id, node);

        if is_dir {
            if let Some(nested) = snapshot.snapshots {
                self.install_listing(id, nested);
            }
        }

        id
    }

    /// Remove a node and all its descendants
    fn remove_node_recursive(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.remove(&id) {
            for child_id in node.children().unwrap_or(&[]) {
                self.remove_node_recursive(*child_id);
            }
        }
    }

    /// Rows of the tree view in display order, with their indent levels
    ///
    /// The root itself is not listed; its children sit at depth 0. A
    /// directory's children are included only while it is in `expanded`.
    pub fn get_visible_nodes(&self, expanded: &HashSet<NodeId>) -> Vec<(NodeId, usize)> {
        let mut visible = Vec::new();
        for &child_id in self.children(self.root_id) {
            self.collect_visible_recursive(child_id, 0, expanded, &mut visible);
        }
        visible
    }

    fn collect_visible_recursive(
        &self,
        id: NodeId,
        depth: usize,
        expanded: &HashSet<NodeId>,
        visible: &mut Vec<(NodeId, usize)>,
    ) {
        visible.push((id, depth));

        if expanded.contains(&id) {
            for &child_id in self.children(id) {
                self.collect_visible_recursive(child_id, depth + 1, expanded, visible);
            }
        }
    }
}
