//! Drives a real browser against a listing server, rendering into a virtual
//! terminal

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use dirview::app::FileBrowser;
use dirview::config::BrowserConfig;
use dirview::primitives::display_width::char_width;
use dirview::services::async_bridge::AsyncBridge;
use dirview::services::listing::{HttpListingSource, ListingClient};
use dirview::view::file_tree::NodeId;
use dirview::view::theme::Theme;
use dirview::view::ui::FileBrowserRenderer;
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How long `wait_until` polls before giving up
const WAIT_TIMEOUT: Duration = Duration::from_secs(5);

pub struct BrowserTestHarness {
    browser: FileBrowser,
    bridge: AsyncBridge,
    terminal: Terminal<TestBackend>,
    theme: Theme,
    // Kept alive for the tasks the client spawns
    _runtime: tokio::runtime::Runtime,
}

impl BrowserTestHarness {
    pub fn new(path: &str, base_url: &str, width: u16, height: u16) -> Self {
        Self::with_config(path, base_url, width, height, BrowserConfig::default())
    }

    pub fn with_config(
        path: &str,
        base_url: &str,
        width: u16,
        height: u16,
        config: BrowserConfig,
    ) -> Self {
        super::tracing::init_tracing_from_env();

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .expect("Failed to build runtime");
        let bridge = AsyncBridge::new();
        let source = HttpListingSource::new(base_url, Duration::from_secs(2));
        let client = ListingClient::new(runtime.handle().clone(), Arc::new(source), bridge.sender());
        let browser = FileBrowser::new(path, config, Box::new(client));
        let terminal = Terminal::new(TestBackend::new(width, height)).unwrap();

        Self {
            browser,
            bridge,
            terminal,
            theme: Theme::default(),
            _runtime: runtime,
        }
    }

    /// Mount the browser and wait for the root listing
    pub fn mount(&mut self) {
        self.browser.mount();
        self.wait_for_idle();
    }

    pub fn browser(&self) -> &FileBrowser {
        &self.browser
    }

    pub fn browser_mut(&mut self) -> &mut FileBrowser {
        &mut self.browser
    }

    /// Apply completions that have arrived; returns how many
    pub fn process_async(&mut self) -> usize {
        let messages = self.bridge.try_recv_all();
        let count = messages.len();
        for message in messages {
            self.browser.handle_async_message(message);
        }
        count
    }

    pub fn render(&mut self) {
        let browser = &mut self.browser;
        let theme = &self.theme;
        self.terminal
            .draw(|frame| {
                let area = frame.area();
                FileBrowserRenderer::render(frame, area, browser, theme);
            })
            .unwrap();
    }

    /// Process completions and re-render until `condition` holds
    pub fn wait_until<F>(&mut self, mut condition: F) -> bool
    where
        F: FnMut(&FileBrowser) -> bool,
    {
        let deadline = Instant::now() + WAIT_TIMEOUT;
        loop {
            self.process_async();
            self.render();
            if condition(&self.browser) {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    /// Wait until no listing request is outstanding
    pub fn wait_for_idle(&mut self) {
        assert!(
            self.wait_until(|browser| browser.in_flight_count() == 0),
            "listing requests did not finish:\n{}",
            self.screen_to_string()
        );
    }

    /// Screen contents, one line per row, with wide characters shown once
    pub fn screen_to_string(&self) -> String {
        let buffer = self.terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            let mut skip = 0;
            for x in 0..buffer.area.width {
                if skip > 0 {
                    skip -= 1;
                    continue;
                }
                let symbol = buffer[(x, y)].symbol();
                out.push_str(symbol);
                skip = symbol.chars().map(char_width).sum::<usize>().saturating_sub(1);
            }
            out.push('\n');
        }
        out
    }

    /// Cell position where `text` starts on screen
    pub fn find_text(&self, text: &str) -> Option<(u16, u16)> {
        let buffer = self.terminal.backend().buffer();
        let area = buffer.area;
        for y in 0..area.height {
            for x in 0..area.width {
                let mut col = x;
                let matched = text.chars().all(|ch| {
                    if col >= area.width || buffer[(col, y)].symbol() != ch.to_string() {
                        return false;
                    }
                    col += char_width(ch).max(1) as u16;
                    true
                });
                if matched {
                    return Some((x, y));
                }
            }
        }
        None
    }

    pub fn screen_contains(&self, text: &str) -> bool {
        self.find_text(text).is_some()
    }

    /// Left click at a cell, then re-render
    pub fn click_at(&mut self, column: u16, row: u16, now: Instant) {
        let mouse = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };
        self.browser.handle_mouse_at(mouse, now);
        self.render();
    }

    pub fn click_text(&mut self, text: &str) {
        let (x, y) = self.expect_text(text);
        self.click_at(x, y, Instant::now());
    }

    pub fn double_click_text(&mut self, text: &str) {
        let (x, y) = self.expect_text(text);
        let now = Instant::now();
        self.click_at(x, y, now);
        self.click_at(x, y, now + Duration::from_millis(50));
    }

    pub fn send_key(&mut self, code: KeyCode) {
        self.browser.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
        self.render();
    }

    /// Node id of the (unique) entry with this name
    pub fn node_named(&self, name: &str) -> NodeId {
        self.browser
            .tree()
            .and_then(|tree| tree.all_nodes().find(|node| node.file_name == name))
            .map(|node| node.id)
            .unwrap_or_else(|| panic!("no node named {}", name))
    }

    fn expect_text(&self, text: &str) -> (u16, u16) {
        self.find_text(text).unwrap_or_else(|| {
            panic!(
                "'{}' not on screen:\n{}",
                text,
                self.screen_to_string()
            )
        })
    }
}
