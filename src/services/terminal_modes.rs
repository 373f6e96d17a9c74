//! Terminal mode management
//!
//! Tracks which of raw mode, the alternate screen and mouse capture were
//! turned on so exactly those can be turned off again on exit.

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use std::io::{stdout, Write};

#[derive(Debug, Default)]
pub struct TerminalModes {
    raw_mode: bool,
    alternate_screen: bool,
    mouse_capture: bool,
}

impl TerminalModes {
    /// Enter raw mode and the alternate screen and capture the mouse
    ///
    /// Mouse capture failing is not fatal; the browser is then keyboard only.
    /// Any other failure undoes what was already enabled.
    pub fn enable() -> Result<Self> {
        let mut modes = Self::default();

        if let Err(e) = enable_raw_mode() {
            tracing::error!("Failed to enable raw mode: {}", e);
            return Err(e.into());
        }
        modes.raw_mode = true;

        if let Err(e) = stdout().execute(EnterAlternateScreen) {
            tracing::error!("Failed to enter alternate screen: {}", e);
            modes.undo();
            return Err(e.into());
        }
        modes.alternate_screen = true;

        match stdout().execute(EnableMouseCapture) {
            Ok(_) => modes.mouse_capture = true,
            Err(e) => tracing::warn!("Failed to enable mouse capture: {}", e),
        }

        tracing::debug!("Terminal modes enabled: {:?}", modes);
        Ok(modes)
    }

    /// Restore the terminal; safe to call more than once
    pub fn undo(&mut self) {
        if self.mouse_capture {
            let _ = stdout().execute(DisableMouseCapture);
            self.mouse_capture = false;
        }
        if self.raw_mode {
            let _ = disable_raw_mode();
            self.raw_mode = false;
        }
        if self.alternate_screen {
            let _ = stdout().execute(LeaveAlternateScreen);
            self.alternate_screen = false;
        }
        let _ = stdout().flush();
    }

    pub fn mouse_capture_enabled(&self) -> bool {
        self.mouse_capture
    }
}

impl Drop for TerminalModes {
    fn drop(&mut self) {
        self.undo();
    }
}

/// Restore the terminal without knowing what was enabled (panic hook)
pub fn emergency_cleanup() {
    let _ = stdout().execute(DisableMouseCapture);
    let _ = disable_raw_mode();
    let _ = stdout().execute(LeaveAlternateScreen);
    let _ = stdout().flush();
}
