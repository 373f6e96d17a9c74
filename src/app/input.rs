//! Keyboard and mouse input
//!
//! Events are translated into [`Intent`]s against the last rendered frame;
//! the browser then applies them.

use super::file_browser::FileBrowser;
use super::intent::{Intent, ViewMode};
use crate::view::ui::HitTarget;
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use std::time::{Duration, Instant};

/// Lines moved per mouse wheel step
const SCROLL_STEP: isize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickKind {
    Single,
    /// Second click on the same target within the threshold
    Double,
}

/// Detects double clicks
///
/// A click pairs with the previous one when both hit the same target within
/// the threshold. A paired click is consumed, so a third click starts over.
#[derive(Debug, Clone)]
pub struct ClickTracker {
    threshold: Duration,
    last: Option<(HitTarget, Instant)>,
}

impl ClickTracker {
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            last: None,
        }
    }

    pub fn register(&mut self, target: HitTarget, now: Instant) -> ClickKind {
        if let Some((previous, at)) = self.last.take() {
            if previous == target && now.saturating_duration_since(at) <= self.threshold {
                return ClickKind::Double;
            }
        }
        self.last = Some((target, now));
        ClickKind::Single
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

impl FileBrowser {
    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if let Some(intent) = self.intent_for_key(key.code, key.modifiers) {
            self.handle_intent(intent);
        }
    }

    pub fn intent_for_key(&self, code: KeyCode, modifiers: KeyModifiers) -> Option<Intent> {
        if modifiers.contains(KeyModifiers::CONTROL) {
            return match code {
                KeyCode::Char('c') => Some(Intent::Quit),
                _ => None,
            };
        }

        if self.alert().is_some() {
            return match code {
                KeyCode::Enter | KeyCode::Esc => Some(Intent::DismissAlert),
                KeyCode::Char('q') => Some(Intent::Quit),
                _ => None,
            };
        }

        let selected_dir = self
            .selected()
            .and_then(|id| self.get_node(id))
            .filter(|node| node.is_dir())
            .map(|node| node.id);

        match (code, self.view_mode()) {
            (KeyCode::Char('q'), _) => Some(Intent::Quit),
            (KeyCode::Tab | KeyCode::BackTab, _) => Some(Intent::SwitchViewMode),
            (KeyCode::Char('t'), _) => Some(Intent::SetViewMode(ViewMode::Tree)),
            (KeyCode::Char('f'), _) => Some(Intent::SetViewMode(ViewMode::File)),
            (KeyCode::Down | KeyCode::Char('j'), _) => Some(Intent::SelectNext),
            (KeyCode::Up | KeyCode::Char('k'), _) => Some(Intent::SelectPrev),
            (KeyCode::Enter, _) => self.selected().map(Intent::Activate),
            (KeyCode::Esc, _) => self.selected().map(Intent::Select),

            (KeyCode::Char(' '), ViewMode::Tree) => selected_dir.map(Intent::ToggleExpand),
            (KeyCode::Right, ViewMode::Tree) => selected_dir
                .filter(|&id| !self.is_expanded(id))
                .map(Intent::ToggleExpand),
            (KeyCode::Left, ViewMode::Tree) => selected_dir
                .filter(|&id| self.is_expanded(id))
                .map(Intent::ToggleExpand),

            (KeyCode::Right, ViewMode::File) => Some(Intent::SelectNext),
            (KeyCode::Left, ViewMode::File) => Some(Intent::SelectPrev),
            (KeyCode::Backspace, ViewMode::File) => Some(Intent::OpenParent),

            _ => None,
        }
    }

    /// Handle a mouse event; returns whether anything changed
    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        self.handle_mouse_at(mouse, Instant::now())
    }

    pub fn handle_mouse_at(&mut self, mouse: MouseEvent, now: Instant) -> bool {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(intent) = self.intent_for_click(mouse.column, mouse.row, now) else {
                    return false;
                };
                self.handle_intent(intent);
                true
            }
            MouseEventKind::ScrollDown if self.alert().is_none() => {
                self.scroll_by(SCROLL_STEP);
                true
            }
            MouseEventKind::ScrollUp if self.alert().is_none() => {
                self.scroll_by(-SCROLL_STEP);
                true
            }
            _ => false,
        }
    }

    /// Intent for a left click at (`column`, `row`)
    ///
    /// In the tree view a click on the name of an expanded directory does
    /// nothing; only its arrow collapses it.
    fn intent_for_click(&mut self, column: u16, row: u16, now: Instant) -> Option<Intent> {
        if self.alert().is_some() {
            self.clicks.reset();
            return Some(Intent::DismissAlert);
        }

        let Some(target) = self.hit_map().target_at(column, row) else {
            self.clicks.reset();
            return None;
        };
        let kind = self.clicks.register(target, now);
        tracing::trace!("{:?} click on {:?}", kind, target);

        match target {
            HitTarget::Arrow(id) => Some(Intent::ToggleExpand(id)),
            HitTarget::ViewButton(mode) => Some(Intent::SetViewMode(mode)),
            HitTarget::OpenParent => Some(Intent::OpenParent),
            HitTarget::Alert => Some(Intent::DismissAlert),
            HitTarget::Entry(id) => {
                let expanded_dir = self.view_mode() == ViewMode::Tree
                    && self.get_node(id).is_some_and(|node| node.is_dir())
                    && self.is_expanded(id);
                if expanded_dir {
                    return None;
                }
                match kind {
                    ClickKind::Single => Some(Intent::Select(id)),
                    ClickKind::Double => Some(Intent::Activate(id)),
                }
            }
        }
    }
}
