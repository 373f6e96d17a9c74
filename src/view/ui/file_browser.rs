//! Browser renderer
//!
//! Lays the frame out as:
//! - settings bar (view buttons, "Up" button and open folder path)
//! - bordered content area with tree rows or the tile grid
//! - error line, only while a transport error is recorded
//! - error alert popup on top of everything while one is shown

use super::hit_map::{HitMap, HitTarget};
use super::tree_node::{Tile, TreeNode, TreeRow, ARROW_WIDTH, TILE_HEIGHT};
use crate::app::{FileBrowser, ViewMode};
use crate::primitives::display_width::{str_width, truncate_to_width};
use crate::view::file_tree::NodeId;
use crate::view::theme::Theme;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

const UP_LABEL: &str = "‹ Up";
const ALERT_BUTTON: &str = "[ OK ]";

pub struct FileBrowserRenderer;

impl FileBrowserRenderer {
    /// Draw the browser into `area`
    ///
    /// Records the clickable regions on the browser and requests the
    /// listings of directories the file view revealed.
    pub fn render(frame: &mut Frame, area: Rect, browser: &mut FileBrowser, theme: &Theme) {
        let mut hit_map = HitMap::new();

        frame.render_widget(
            Block::default().style(Style::default().bg(theme.background).fg(theme.foreground)),
            area,
        );

        if area.height < 3 || area.width < 10 {
            browser.set_hit_map(hit_map);
            return;
        }

        let status_height = u16::from(browser.error().is_some());
        let settings_area = Rect::new(area.x, area.y, area.width, 1);
        let content_area = Rect::new(
            area.x,
            area.y + 1,
            area.width,
            area.height - 1 - status_height,
        );

        Self::render_settings_bar(frame, settings_area, browser, theme, &mut hit_map);
        let needs_fetch = Self::render_content(frame, content_area, browser, theme, &mut hit_map);

        if let Some(error) = browser.error() {
            let status_area = Rect::new(area.x, area.y + area.height - 1, area.width, 1);
            let text = truncate_to_width(
                &format!(" Listing failed: {}", error),
                status_area.width as usize,
            );
            frame.render_widget(
                Paragraph::new(text).style(
                    Style::default()
                        .fg(theme.error_fg)
                        .bg(theme.settings_bg)
                        .add_modifier(Modifier::BOLD),
                ),
                status_area,
            );
        }

        if let Some(message) = browser.alert() {
            Self::render_alert(frame, area, message, theme, &mut hit_map);
        }

        browser.set_hit_map(hit_map);

        for id in needs_fetch {
            browser.fetch_node(id);
        }
    }

    fn render_settings_bar(
        frame: &mut Frame,
        area: Rect,
        browser: &FileBrowser,
        theme: &Theme,
        hit_map: &mut HitMap,
    ) {
        let bar_style = Style::default().bg(theme.settings_bg).fg(theme.path_fg);
        let mut spans = vec![Span::styled(" ", bar_style)];
        let mut x = area.x + 1;

        let mut push_button =
            |spans: &mut Vec<Span<'static>>, x: &mut u16, label: String, style: Style, target: HitTarget| {
                let width = str_width(&label) as u16;
                hit_map.push(Rect::new(*x, area.y, width, 1), target);
                spans.push(Span::styled(label, style));
                spans.push(Span::styled(" ", bar_style));
                *x += width + 1;
            };

        for mode in [ViewMode::Tree, ViewMode::File] {
            push_button(
                &mut spans,
                &mut x,
                format!("[{}]", mode.label()),
                theme.button_style(browser.view_mode() == mode),
                HitTarget::ViewButton(mode),
            );
        }

        if browser.view_mode() == ViewMode::File {
            push_button(
                &mut spans,
                &mut x,
                UP_LABEL.to_string(),
                theme.button_style(false),
                HitTarget::OpenParent,
            );
            let room = (area.x + area.width).saturating_sub(x + 1) as usize;
            spans.push(Span::styled(" ", bar_style));
            spans.push(Span::styled(
                truncate_to_width(&browser.display_path(), room),
                bar_style.add_modifier(Modifier::BOLD),
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)).style(bar_style), area);
    }

    /// Returns directories that need their listing
    fn render_content(
        frame: &mut Frame,
        area: Rect,
        browser: &mut FileBrowser,
        theme: &Theme,
        hit_map: &mut HitMap,
    ) -> Vec<NodeId> {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", browser.path()))
            .border_style(Style::default().fg(theme.border_fg))
            .style(Style::default().bg(theme.background));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.height == 0 || inner.width == 0 {
            return Vec::new();
        }

        let Some(layout) = TreeNode::container(browser).map(|node| node.layout()) else {
            if !browser.is_loaded() {
                Self::render_placeholder(frame, inner, "Loading…", theme);
            }
            return Vec::new();
        };

        if layout.is_empty() {
            let container_failed = browser.view_mode() == ViewMode::File
                && browser.open_dir().is_some_and(|id| browser.listing_failed(id));
            let text = if !layout.needs_fetch.is_empty() {
                "Loading…"
            } else if container_failed {
                "Listing failed"
            } else {
                "(empty)"
            };
            Self::render_placeholder(frame, inner, text, theme);
            return layout.needs_fetch;
        }

        match browser.view_mode() {
            ViewMode::Tree => Self::render_rows(frame, inner, browser, &layout.rows, theme, hit_map),
            ViewMode::File => {
                Self::render_tiles(frame, inner, browser, &layout.tiles, theme, hit_map)
            }
        }

        layout.needs_fetch
    }

    fn render_placeholder(frame: &mut Frame, area: Rect, text: &str, theme: &Theme) {
        frame.render_widget(
            Paragraph::new(format!(" {}", text))
                .style(Style::default().fg(theme.arrow_fg).bg(theme.background)),
            Rect::new(area.x, area.y, area.width, 1),
        );
    }

    fn render_rows(
        frame: &mut Frame,
        area: Rect,
        browser: &mut FileBrowser,
        rows: &[TreeRow],
        theme: &Theme,
        hit_map: &mut HitMap,
    ) {
        let height = area.height as usize;
        let selected = rows.iter().position(|row| row.selected);
        let scroll = Self::scroll_for(browser, selected, rows.len(), height);

        for (i, row) in rows.iter().skip(scroll).take(height).enumerate() {
            let y = area.y + i as u16;
            let row_area = Rect::new(area.x, y, area.width, 1);
            frame.render_widget(
                Paragraph::new(row.to_line(theme, area.width as usize)),
                row_area,
            );

            hit_map.push(row_area, HitTarget::Entry(row.id));
            let arrow_x = row.arrow_column() as u16;
            if row.is_dir && arrow_x < area.width {
                let width = (ARROW_WIDTH as u16).min(area.width - arrow_x);
                hit_map.push(
                    Rect::new(area.x + arrow_x, y, width, 1),
                    HitTarget::Arrow(row.id),
                );
            }
        }
    }

    fn render_tiles(
        frame: &mut Frame,
        area: Rect,
        browser: &mut FileBrowser,
        tiles: &[Tile],
        theme: &Theme,
        hit_map: &mut HitMap,
    ) {
        let tile_width = browser.config().tile_width.min(area.width).max(1);
        let columns = (area.width / tile_width).max(1) as usize;
        let grid_rows = tiles.len().div_ceil(columns);
        let visible_rows = ((area.height / TILE_HEIGHT) as usize).max(1);

        let selected_row = tiles.iter().position(|t| t.selected).map(|i| i / columns);
        let scroll = Self::scroll_for(browser, selected_row, grid_rows, visible_rows);

        let shown = tiles
            .iter()
            .skip(scroll * columns)
            .take(visible_rows * columns)
            .enumerate();
        for (i, tile) in shown {
            let column = (i % columns) as u16;
            let row = (i / columns) as u16;
            let tile_area = Rect::new(
                area.x + column * tile_width,
                area.y + row * TILE_HEIGHT,
                tile_width,
                TILE_HEIGHT - 1,
            )
            .intersection(area);
            if tile_area.is_empty() {
                continue;
            }

            frame.render_widget(
                Paragraph::new(tile.to_lines(theme, tile_area.width as usize)),
                tile_area,
            );
            hit_map.push(tile_area, HitTarget::Entry(tile.id));
        }
    }

    /// First visible line, clamped to the content and following keyboard
    /// selection moves
    fn scroll_for(
        browser: &mut FileBrowser,
        selected: Option<usize>,
        len: usize,
        height: usize,
    ) -> usize {
        let max = len.saturating_sub(height);
        let mut offset = browser.scroll_offset.min(max);

        if browser.take_reveal_selection() {
            if let Some(selected) = selected {
                if selected < offset {
                    offset = selected;
                } else if selected >= offset + height {
                    offset = selected + 1 - height;
                }
            }
        }

        browser.scroll_offset = offset;
        offset
    }

    fn render_alert(
        frame: &mut Frame,
        area: Rect,
        message: &str,
        theme: &Theme,
        hit_map: &mut HitMap,
    ) {
        let max_width = area.width.saturating_sub(4).max(1);
        let width = (str_width(message) as u16 + 4).clamp(30.min(max_width), max_width);
        let text_width = width.saturating_sub(2).max(1) as usize;
        let text_lines = str_width(message).div_ceil(text_width).max(1) as u16;
        // Borders, message, blank line, button
        let height = (text_lines + 4).min(area.height);

        let popup = Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        );

        frame.render_widget(Clear, popup);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Error ")
            .border_style(Style::default().fg(theme.popup_border_fg))
            .style(Style::default().bg(theme.popup_bg).fg(theme.popup_text_fg));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let mut lines: Vec<Line> = vec![Line::from(message.to_string()), Line::from("")];
        lines.push(
            Line::from(Span::styled(
                ALERT_BUTTON,
                Style::default()
                    .fg(theme.button_active_fg)
                    .bg(theme.popup_border_fg)
                    .add_modifier(Modifier::BOLD),
            ))
            .centered(),
        );
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);

        hit_map.push(popup, HitTarget::Alert);
    }
}
