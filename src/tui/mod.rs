//! Terminal UI module
//!
//! This module handles all terminal rendering and UI components using Ratatui.
//! Both the control process and the display client build on the same `Tui`
//! wrapper.

pub mod header;
pub mod header_notifications;
pub mod layout;
pub mod theme;
pub mod views;

pub use header::Header;
pub use header_notifications::HeaderNotificationManager;
pub use layout::ScreenLayout;
pub use theme::{theme, Theme};

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use std::io::{self, stdout};

/// Terminal UI wrapper
///
/// Handles terminal setup, teardown, and provides the rendering surface.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    /// Whether mouse capture is enabled
    mouse_capture_enabled: bool,
}

/// Error handler for terminal cleanup operations
/// Used during both normal exit and panic/drop scenarios
enum ErrorHandler {
    /// Log errors via tracing (normal exit)
    Tracing,
    /// Print errors to stderr (panic/drop, tracing may be unavailable)
    Stderr,
}

impl ErrorHandler {
    fn handle(&self, context: &str, error: impl std::fmt::Display) {
        match self {
            ErrorHandler::Tracing => tracing::warn!("{}: {}", context, error),
            ErrorHandler::Stderr => eprintln!("TUI teardown: {}: {}", context, error),
        }
    }
}

/// Disable mouse capture
fn disable_mouse_capture_internal(handler: &ErrorHandler) {
    if let Err(e) = stdout().execute(DisableMouseCapture) {
        handler.handle("failed to disable mouse capture", e);
    }
}

impl Tui {
    /// Create a new TUI instance
    pub fn new() -> Result<Self> {
        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        Ok(Self {
            terminal,
            mouse_capture_enabled: false,
        })
    }

    /// Enter TUI mode (raw mode + alternate screen)
    pub fn enter(&mut self) -> Result<()> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        // Enable mouse capture for scroll wheel support
        if stdout().execute(EnableMouseCapture).is_ok() {
            self.mouse_capture_enabled = true;
        }

        self.terminal.hide_cursor()?;
        self.terminal.clear()?;
        Ok(())
    }

    /// Exit TUI mode (restore terminal)
    pub fn exit(&mut self) -> Result<()> {
        tracing::debug!("Starting TUI exit sequence");
        let handler = ErrorHandler::Tracing;

        if self.mouse_capture_enabled {
            disable_mouse_capture_internal(&handler);
            self.mouse_capture_enabled = false;
        }

        self.terminal.show_cursor()?;
        stdout().execute(LeaveAlternateScreen)?;
        disable_raw_mode()?;

        tracing::debug!("TUI exit sequence completed");
        Ok(())
    }

    /// Get terminal size
    pub fn size(&self) -> Result<Rect> {
        Ok(self.terminal.size()?)
    }

    /// Draw a frame
    pub fn draw<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal.draw(f)?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        // During drop, tracing may not be available, so errors go to stderr
        let handler = ErrorHandler::Stderr;

        if self.mouse_capture_enabled {
            disable_mouse_capture_internal(&handler);
        }

        if let Err(e) = self.terminal.show_cursor() {
            handler.handle("failed to show cursor", e);
        }
        if let Err(e) = stdout().execute(LeaveAlternateScreen) {
            handler.handle("failed to leave alternate screen", e);
        }
        if let Err(e) = disable_raw_mode() {
            handler.handle("failed to disable raw mode", e);
        }
    }
}
