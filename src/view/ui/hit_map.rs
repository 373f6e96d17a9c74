//! Mouse hit testing for the last rendered frame

use crate::app::ViewMode;
use crate::view::file_tree::NodeId;
use ratatui::layout::Rect;

/// What a screen cell belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitTarget {
    /// Disclosure arrow of a directory row (tree view)
    Arrow(NodeId),
    /// Row (tree view) or tile (file view) of an entry
    Entry(NodeId),
    /// View mode button in the settings bar
    ViewButton(ViewMode),
    /// "Up" button of the file view
    OpenParent,
    /// The error alert
    Alert,
}

/// Clickable regions in paint order
///
/// Regions pushed later are painted on top and win lookups.
#[derive(Debug, Clone, Default)]
pub struct HitMap {
    regions: Vec<(Rect, HitTarget)>,
}

impl HitMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, area: Rect, target: HitTarget) {
        if area.width > 0 && area.height > 0 {
            self.regions.push((area, target));
        }
    }

    /// Topmost target under the cell at (`column`, `row`)
    pub fn target_at(&self, column: u16, row: u16) -> Option<HitTarget> {
        self.regions
            .iter()
            .rev()
            .find(|(area, _)| {
                column >= area.x
                    && column < area.x + area.width
                    && row >= area.y
                    && row < area.y + area.height
            })
            .map(|(_, target)| *target)
    }

    /// Area of the first region with this target
    pub fn area_of(&self, target: HitTarget) -> Option<Rect> {
        self.regions
            .iter()
            .find(|(_, t)| *t == target)
            .map(|(area, _)| *area)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
