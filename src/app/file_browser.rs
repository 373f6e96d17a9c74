use super::input::ClickTracker;
use super::intent::{Intent, ViewMode};
use crate::config::BrowserConfig;
use crate::services::async_bridge::AsyncMessage;
use crate::services::listing::{FetchDispatcher, FetchRequest, ListingCompletion, ListingError};
use crate::view::file_tree::{FileTree, Node, NodeId};
use crate::view::ui::HitMap;
use std::collections::{HashMap, HashSet};

/// Root container of the browser
///
/// Owns the fetched tree, the view mode, the selection and the expansion
/// state of every directory. Rendered entries only emit [`Intent`]s; all
/// mutation happens here, on the UI thread.
pub struct FileBrowser {
    /// Path browsed at the root, as given on the command line
    path: String,
    config: BrowserConfig,
    /// Fetched tree, `None` until the root listing arrives
    tree: Option<FileTree>,
    /// Generation of the most recently installed tree
    generation: u64,
    view_mode: ViewMode,
    selected: Option<NodeId>,
    /// Most recent non-empty selection
    last_selected: Option<NodeId>,
    /// Directories currently shown expanded in the tree view
    expanded: HashSet<NodeId>,
    /// Folder shown by the file view; the root when `None`
    open_dir: Option<NodeId>,
    /// Outstanding requests per path
    in_flight: HashMap<String, usize>,
    /// Paths whose last listing failed; only an explicit expand or open
    /// requests them again
    failed: HashSet<String>,
    /// Last transport failure
    error: Option<ListingError>,
    /// Server-reported failure waiting to be acknowledged
    alert: Option<String>,
    is_loaded: bool,
    dispatcher: Box<dyn FetchDispatcher>,
    should_quit: bool,
    /// First visible row of the content area
    pub(crate) scroll_offset: usize,
    /// Scroll the selection into view on the next render
    reveal_selection: bool,
    /// Clickable regions of the last rendered frame
    hit_map: HitMap,
    pub(crate) clicks: ClickTracker,
}

impl FileBrowser {
    pub fn new(
        path: impl Into<String>,
        config: BrowserConfig,
        dispatcher: Box<dyn FetchDispatcher>,
    ) -> Self {
        let view_mode = config.initial_view;
        let clicks = ClickTracker::new(config.double_click_threshold());
        Self {
            path: path.into(),
            config,
            tree: None,
            generation: 0,
            view_mode,
            selected: None,
            last_selected: None,
            expanded: HashSet::new(),
            open_dir: None,
            in_flight: HashMap::new(),
            failed: HashSet::new(),
            error: None,
            alert: None,
            is_loaded: false,
            dispatcher,
            should_quit: false,
            scroll_offset: 0,
            reveal_selection: false,
            hit_map: HitMap::default(),
            clicks,
        }
    }

    /// Request the root listing
    pub fn mount(&mut self) {
        tracing::info!("Mounting browser at {}", self.path);
        let path = self.path.clone();
        self.fetch_directory(path, None);
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    pub fn tree(&self) -> Option<&FileTree> {
        self.tree.as_ref()
    }

    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.tree.as_ref().and_then(|tree| tree.get_node(id))
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn last_selected(&self) -> Option<NodeId> {
        self.last_selected
    }

    pub fn is_selected(&self, id: NodeId) -> bool {
        self.selected == Some(id)
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.expanded.contains(&id)
    }

    pub fn expanded(&self) -> &HashSet<NodeId> {
        &self.expanded
    }

    /// Whether a listing request for this node is outstanding
    pub fn is_loading(&self, id: NodeId) -> bool {
        self.get_node(id)
            .map(|node| self.in_flight.contains_key(&node.request_path()))
            .unwrap_or(false)
    }

    /// Whether the last listing request for this node failed
    pub fn listing_failed(&self, id: NodeId) -> bool {
        self.get_node(id)
            .map(|node| self.failed.contains(&node.request_path()))
            .unwrap_or(false)
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.values().sum()
    }

    pub fn error(&self) -> Option<&ListingError> {
        self.error.as_ref()
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.is_loaded
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn hit_map(&self) -> &HitMap {
        &self.hit_map
    }

    pub(crate) fn set_hit_map(&mut self, hit_map: HitMap) {
        self.hit_map = hit_map;
    }

    /// Whether the selection moved by keyboard since the last render
    pub(crate) fn take_reveal_selection(&mut self) -> bool {
        std::mem::take(&mut self.reveal_selection)
    }

    /// Scroll the content by `delta` lines
    pub fn scroll_by(&mut self, delta: isize) {
        self.scroll_offset = self.scroll_offset.saturating_add_signed(delta);
    }

    /// Folder shown by the file view
    pub fn open_dir(&self) -> Option<NodeId> {
        let tree = self.tree.as_ref()?;
        Some(
            self.open_dir
                .filter(|&id| tree.contains(id))
                .unwrap_or_else(|| tree.root_id()),
        )
    }

    /// Path shown in the settings bar: the open folder in the file view,
    /// nothing in the tree view
    pub fn display_path(&self) -> String {
        if self.view_mode != ViewMode::File {
            return String::new();
        }
        match (self.open_dir(), self.tree.as_ref()) {
            (Some(id), Some(tree)) if id != tree.root_id() => self
                .get_node(id)
                .map(|node| node.full_path.clone())
                .unwrap_or_default(),
            _ => self.path.clone(),
        }
    }

    /// Entries keyboard navigation moves over, in display order
    pub fn visible_entries(&self) -> Vec<NodeId> {
        let Some(tree) = &self.tree else {
            return Vec::new();
        };
        match self.view_mode {
            ViewMode::Tree => tree
                .get_visible_nodes(&self.expanded)
                .into_iter()
                .map(|(id, _)| id)
                .collect(),
            ViewMode::File => self
                .open_dir()
                .map(|id| tree.children(id).to_vec())
                .unwrap_or_default(),
        }
    }

    /// Apply one user intent
    ///
    /// While an alert is shown only `DismissAlert` and `Quit` are honoured.
    pub fn handle_intent(&mut self, intent: Intent) {
        tracing::trace!("intent: {:?}", intent);

        if self.alert.is_some() && !matches!(intent, Intent::DismissAlert | Intent::Quit) {
            return;
        }

        match intent {
            Intent::Select(id) => self.select_self(id),
            Intent::ToggleExpand(id) => self.toggle_expand(id),
            Intent::Activate(id) => self.activate(id),
            Intent::OpenParent => self.open_parent(),
            Intent::SetViewMode(mode) => self.set_view_mode(mode),
            Intent::SwitchViewMode => self.set_view_mode(self.view_mode.toggled()),
            Intent::SelectNext => self.select_next(),
            Intent::SelectPrev => self.select_prev(),
            Intent::DismissAlert => self.dismiss_alert(),
            Intent::Quit => self.should_quit = true,
        }
    }

    /// Set the selection
    ///
    /// Clearing moves the previous selection, if any, into `last_selected`.
    pub fn set_selected(&mut self, node: Option<NodeId>) {
        match node {
            Some(id) => {
                self.selected = Some(id);
                self.last_selected = Some(id);
            }
            None => {
                if let Some(previous) = self.selected.take() {
                    self.last_selected = Some(previous);
                }
            }
        }
    }

    /// Select a node, or clear the selection when it is already selected
    pub fn select_self(&mut self, id: NodeId) {
        if self.get_node(id).is_none() {
            return;
        }
        if self.selected == Some(id) {
            self.set_selected(None);
        } else {
            self.set_selected(Some(id));
        }
    }

    /// Flip a directory between collapsed and expanded
    ///
    /// Collapsing the selected node clears the selection. Expanding a
    /// directory that was never listed requests its listing.
    pub fn toggle_expand(&mut self, id: NodeId) {
        let Some(node) = self.get_node(id) else {
            return;
        };
        if !node.is_dir() {
            tracing::trace!("Ignoring toggle on file {}", node.file_name);
            return;
        }
        let needs_fetch = !node.is_fetched();
        let request_path = node.request_path();

        if self.expanded.remove(&id) {
            if self.selected == Some(id) {
                self.set_selected(None);
            }
        } else {
            self.expanded.insert(id);
            if needs_fetch {
                self.failed.remove(&request_path);
                self.fetch_directory(request_path, Some(id));
            }
        }
    }

    /// Double click / Enter
    pub fn activate(&mut self, id: NodeId) {
        let Some(node) = self.get_node(id) else {
            return;
        };
        let is_dir = node.is_dir();

        match (self.view_mode, is_dir) {
            (ViewMode::Tree, true) => {
                if !self.is_expanded(id) {
                    self.toggle_expand(id);
                }
            }
            (ViewMode::File, true) => {
                let request_path = node.request_path();
                self.failed.remove(&request_path);
                self.open_folder(id);
            }
            (_, false) => self.open_file(id),
        }
    }

    /// Opening files is not supported; the hook only logs
    fn open_file(&mut self, id: NodeId) {
        if let Some(node) = self.get_node(id) {
            tracing::debug!("Open requested for file {}", node.full_path);
        }
    }

    fn open_folder(&mut self, id: NodeId) {
        self.open_dir = Some(id);
        self.scroll_offset = 0;
    }

    fn open_parent(&mut self) {
        if self.view_mode != ViewMode::File {
            return;
        }
        let parent = self
            .open_dir()
            .and_then(|id| self.tree.as_ref().and_then(|tree| tree.parent(id)));
        if let Some(parent) = parent {
            self.open_folder(parent);
        }
    }

    /// Switch between tree and file rendering
    ///
    /// Entering the file view opens the folder the selection points at: a
    /// selected directory, the parent of a selected file, or the last
    /// selected directory when nothing is selected.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if mode == self.view_mode {
            return;
        }

        if mode == ViewMode::File {
            if let Some(folder) = self.folder_for_file_view() {
                self.open_dir = Some(folder);
            }
        }

        tracing::debug!("View mode {} -> {}", self.view_mode, mode);
        self.view_mode = mode;
        self.scroll_offset = 0;
    }

    fn folder_for_file_view(&self) -> Option<NodeId> {
        match self.selected.and_then(|id| self.get_node(id)) {
            Some(node) if node.is_dir() => Some(node.id),
            Some(node) => node.parent,
            None => self
                .last_selected
                .and_then(|id| self.get_node(id))
                .filter(|node| node.is_dir())
                .map(|node| node.id),
        }
    }

    fn select_next(&mut self) {
        let entries = self.visible_entries();
        if entries.is_empty() {
            return;
        }
        let next = match self
            .selected
            .and_then(|id| entries.iter().position(|&entry| entry == id))
        {
            Some(pos) => entries[(pos + 1).min(entries.len() - 1)],
            None => entries[0],
        };
        self.set_selected(Some(next));
        self.reveal_selection = true;
    }

    fn select_prev(&mut self) {
        let entries = self.visible_entries();
        if entries.is_empty() {
            return;
        }
        let prev = match self
            .selected
            .and_then(|id| entries.iter().position(|&entry| entry == id))
        {
            Some(pos) => entries[pos.saturating_sub(1)],
            None => entries[0],
        };
        self.set_selected(Some(prev));
        self.reveal_selection = true;
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Request the listing of a directory that was never listed
    ///
    /// A directory whose last listing failed is skipped. Returns whether a
    /// request was issued.
    pub fn fetch_node(&mut self, id: NodeId) -> bool {
        let Some(node) = self.get_node(id) else {
            return false;
        };
        if !node.is_dir() || node.is_fetched() {
            return false;
        }
        let path = node.request_path();
        if self.failed.contains(&path) {
            tracing::trace!("Not retrying failed listing {}", path);
            return false;
        }
        self.fetch_directory(path, Some(id))
    }

    /// Issue a listing request for `path`
    ///
    /// With a `target` the listing is written onto that node; without one it
    /// replaces the whole tree. Returns whether a request was issued: with
    /// de-duplication enabled, a path that already has a request in flight
    /// is not requested again.
    pub fn fetch_directory(&mut self, path: String, target: Option<NodeId>) -> bool {
        if self.config.dedupe_requests && self.in_flight.contains_key(&path) {
            tracing::debug!("Listing for {} already in flight, skipping", path);
            return false;
        }

        *self.in_flight.entry(path.clone()).or_insert(0) += 1;

        let request = FetchRequest {
            path,
            target,
            generation: self.generation,
        };
        tracing::debug!(
            "Requesting listing {} (target {:?}, generation {})",
            request.path,
            request.target,
            request.generation
        );
        self.dispatcher.dispatch(request);
        true
    }

    /// Apply a message posted by a background task
    pub fn handle_async_message(&mut self, message: AsyncMessage) {
        match message {
            AsyncMessage::ListingLoaded(completion) => self.apply_listing(completion),
        }
    }

    fn finish_request(&mut self, path: &str) {
        if let Some(count) = self.in_flight.get_mut(path) {
            *count -= 1;
            if *count == 0 {
                self.in_flight.remove(path);
            }
        }
    }

    /// Apply a finished listing request
    ///
    /// A server-reported error raises the alert and changes nothing else. A
    /// transport failure is recorded in `error`. A success replaces the tree
    /// (root request) or the target's children.
    pub fn apply_listing(&mut self, completion: ListingCompletion) {
        let ListingCompletion { request, result } = completion;
        self.finish_request(&request.path);

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Listing {} failed: {}", request.path, e);
                self.failed.insert(request.path);
                self.is_loaded = true;
                self.error = Some(e);
                return;
            }
        };

        let listing = match response.into_result() {
            Ok(listing) => listing,
            Err(message) => {
                tracing::warn!("Server refused listing {}: {}", request.path, message);
                self.alert = Some(format!("Error: {}", message));
                self.failed.insert(request.path);
                return;
            }
        };

        match request.target {
            None => self.install_tree(listing),
            Some(target) => {
                let Some(tree) = self.tree.as_mut() else {
                    tracing::debug!("Dropping listing {}: no tree installed", request.path);
                    return;
                };
                if tree.generation() != request.generation {
                    tracing::debug!(
                        "Dropping stale listing {} (generation {} != {})",
                        request.path,
                        request.generation,
                        tree.generation()
                    );
                    return;
                }
                let replaced = tree.get_node(target).is_some_and(Node::is_fetched);
                if let Err(e) = tree.set_children(target, listing) {
                    tracing::debug!("Dropping listing {} for {}: {}", request.path, target, e);
                    return;
                }
                if replaced {
                    self.prune_stale_ids();
                }
            }
        }

        self.failed.remove(&request.path);
        self.error = None;
        self.is_loaded = true;
    }

    fn install_tree(&mut self, listing: Vec<crate::model::Snapshot>) {
        self.generation += 1;
        tracing::info!(
            "Installing root listing for {} ({} entries)",
            self.path,
            listing.len()
        );
        self.tree = Some(FileTree::new(&self.path, self.generation, listing));
        self.expanded.clear();
        self.failed.clear();
        self.selected = None;
        self.last_selected = None;
        self.open_dir = None;
        self.scroll_offset = 0;
    }

    /// Forget ids whose nodes were discarded by a replacing listing
    fn prune_stale_ids(&mut self) {
        let Some(tree) = &self.tree else {
            return;
        };
        self.expanded.retain(|id| tree.contains(*id));
        self.selected = self.selected.filter(|id| tree.contains(*id));
        self.last_selected = self.last_selected.filter(|id| tree.contains(*id));
        self.open_dir = self.open_dir.filter(|id| tree.contains(*id));
    }
}
