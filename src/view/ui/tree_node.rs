//! Per-entry rendering
//!
//! A [`TreeNode`] lays out one entry and, recursively, whatever is shown
//! beneath it. Layout only reads browser state. Directories that must be
//! listed before they can be shown are reported in
//! [`TreeNodeLayout::needs_fetch`]; the caller issues those requests.

use crate::app::{FileBrowser, ViewMode};
use crate::primitives::display_width::{center_in_width, str_width, truncate_to_width};
use crate::view::file_tree::{Node, NodeId};
use crate::view::theme::Theme;
use ratatui::style::Style;
use ratatui::text::{Line, Span};

pub const ARROW_COLLAPSED: &str = "▶";
pub const ARROW_EXPANDED: &str = "▼";
pub const LOADING_MARKER: &str = "⟳";
pub const DIRECTORY_ICON: &str = "📁";
pub const FILE_ICON: &str = "📄";

/// Columns per nesting level in the tree view
pub const INDENT_WIDTH: usize = 2;
/// Columns taken by the arrow (or its placeholder) and the following space
pub const ARROW_WIDTH: usize = 2;
/// Rows taken by one tile: icon, name, spacer
pub const TILE_HEIGHT: u16 = 3;

/// One line of the tree view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub id: NodeId,
    pub depth: usize,
    pub name: String,
    pub is_dir: bool,
    pub expanded: bool,
    pub selected: bool,
    pub loading: bool,
}

impl TreeRow {
    /// Disclosure arrow; files have none
    pub fn arrow(&self) -> Option<&'static str> {
        match (self.is_dir, self.expanded) {
            (false, _) => None,
            (true, false) => Some(ARROW_COLLAPSED),
            (true, true) => Some(ARROW_EXPANDED),
        }
    }

    /// Column of the arrow relative to the start of the row
    pub fn arrow_column(&self) -> usize {
        self.depth * INDENT_WIDTH
    }

    pub fn to_line(&self, theme: &Theme, width: usize) -> Line<'static> {
        let base = Style::default().bg(theme.background);
        let name_style = theme.entry_style(self.is_dir, self.selected);

        let mut spans = vec![Span::styled(" ".repeat(self.arrow_column()), base)];
        match self.arrow() {
            Some(arrow) => spans.push(Span::styled(
                format!("{} ", arrow),
                base.fg(theme.arrow_fg),
            )),
            None => spans.push(Span::styled(" ".repeat(ARROW_WIDTH), base)),
        }

        let marker_width = if self.loading {
            str_width(LOADING_MARKER) + 1
        } else {
            0
        };
        let name_room = width.saturating_sub(self.arrow_column() + ARROW_WIDTH + marker_width);
        let name = truncate_to_width(&self.name, name_room);
        let used = self.arrow_column() + ARROW_WIDTH + str_width(&name);
        spans.push(Span::styled(name, name_style));

        if self.loading {
            spans.push(Span::styled(
                format!(" {}", LOADING_MARKER),
                base.fg(theme.loading_fg),
            ));
        }

        // Selection highlight spans the whole row
        let fill = width.saturating_sub(used + marker_width);
        if fill > 0 {
            let style = if self.selected { name_style } else { base };
            spans.push(Span::styled(" ".repeat(fill), style));
        }

        Line::from(spans)
    }
}

/// One entry of the file view grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub id: NodeId,
    pub name: String,
    pub is_dir: bool,
    pub selected: bool,
    pub loading: bool,
}

impl Tile {
    pub fn icon(&self) -> &'static str {
        if self.is_dir {
            DIRECTORY_ICON
        } else {
            FILE_ICON
        }
    }

    /// Icon line and name line, each `width` columns wide
    pub fn to_lines(&self, theme: &Theme, width: usize) -> Vec<Line<'static>> {
        let style = theme.entry_style(self.is_dir, self.selected);
        let icon = if self.loading {
            format!("{}{}", self.icon(), LOADING_MARKER)
        } else {
            self.icon().to_string()
        };
        // One column of padding on each side
        let inner = width.saturating_sub(2);
        vec![
            Line::from(Span::styled(
                format!(" {} ", center_in_width(&icon, inner)),
                style,
            )),
            Line::from(Span::styled(
                format!(" {} ", center_in_width(&self.name, inner)),
                style,
            )),
        ]
    }
}

/// Everything a [`TreeNode`] produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeNodeLayout {
    /// Tree view lines in display order
    pub rows: Vec<TreeRow>,
    /// File view tiles in listing order
    pub tiles: Vec<Tile>,
    /// Unlisted directories that became visible
    pub needs_fetch: Vec<NodeId>,
}

impl TreeNodeLayout {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.tiles.is_empty()
    }
}

/// Renders one entry of the browser
///
/// A node rendered as a child shows itself: a row in the tree view, a tile
/// in the file view. A node rendered as the container (`is_child == false`)
/// shows only its children.
pub struct TreeNode<'a> {
    browser: &'a FileBrowser,
    node: &'a Node,
    view_mode: ViewMode,
    is_child: bool,
    depth: usize,
}

impl<'a> TreeNode<'a> {
    pub fn new(browser: &'a FileBrowser, node: &'a Node, view_mode: ViewMode, is_child: bool) -> Self {
        Self {
            browser,
            node,
            view_mode,
            is_child,
            depth: 0,
        }
    }

    /// The container for the browser's current view: the tree root in the
    /// tree view, the open folder in the file view
    pub fn container(browser: &'a FileBrowser) -> Option<Self> {
        let tree = browser.tree()?;
        let id = match browser.view_mode() {
            ViewMode::Tree => tree.root_id(),
            ViewMode::File => browser.open_dir()?,
        };
        let node = tree.get_node(id)?;
        Some(Self::new(browser, node, browser.view_mode(), false))
    }

    pub fn layout(&self) -> TreeNodeLayout {
        let mut out = TreeNodeLayout::default();
        match self.view_mode {
            ViewMode::Tree => self.layout_tree(&mut out),
            ViewMode::File => self.layout_file(&mut out),
        }
        out
    }

    fn child(&self, node: &'a Node) -> Self {
        Self {
            browser: self.browser,
            node,
            view_mode: self.view_mode,
            is_child: true,
            depth: if self.is_child { self.depth + 1 } else { 0 },
        }
    }

    fn children(&self) -> impl Iterator<Item = &'a Node> + '_ {
        let browser = self.browser;
        self.node
            .children()
            .unwrap_or(&[])
            .iter()
            .filter_map(move |&id| browser.get_node(id))
    }

    fn layout_tree(&self, out: &mut TreeNodeLayout) {
        let id = self.node.id;
        let expanded = self.browser.is_expanded(id);

        if self.is_child {
            out.rows.push(TreeRow {
                id,
                depth: self.depth,
                name: self.node.file_name.clone(),
                is_dir: self.node.is_dir(),
                expanded: self.node.is_dir() && expanded,
                selected: self.browser.is_selected(id),
                loading: self.node.is_dir() && self.browser.is_loading(id),
            });
        }

        if !self.is_child || expanded {
            for child in self.children() {
                self.child(child).layout_tree(out);
            }
        }
    }

    fn layout_file(&self, out: &mut TreeNodeLayout) {
        let id = self.node.id;
        let unlisted = self.node.is_dir()
            && !self.node.is_fetched()
            && !self.browser.listing_failed(id);
        if unlisted {
            out.needs_fetch.push(id);
        }

        if self.is_child {
            out.tiles.push(Tile {
                id,
                name: self.node.file_name.clone(),
                is_dir: self.node.is_dir(),
                selected: self.browser.is_selected(id),
                loading: self.node.is_dir() && self.browser.is_loading(id),
            });
            return;
        }

        for child in self.children() {
            self.child(child).layout_file(out);
        }
    }
}
