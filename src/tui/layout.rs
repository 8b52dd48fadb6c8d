//! Screen layout helper
//!
//! Provides a convenient way to create consistent screen layouts with
//! header and footer, returning the content area for view-specific rendering.

use ratatui::prelude::*;

use crate::tui::header::{Header, HEADER_HEIGHT};

/// Default footer height (including top border)
pub const DEFAULT_FOOTER_HEIGHT: u16 = 3;

/// Screen layout builder
///
/// Simplifies creating consistent layouts across views by handling
/// header rendering and calculating content areas automatically.
pub struct ScreenLayout<'a> {
    /// Total area for the screen
    area: Rect,
    /// Header to render
    header: Header<'a>,
    /// Footer height
    footer_height: u16,
}

impl<'a> ScreenLayout<'a> {
    /// Create a new screen layout for the given area and header
    pub fn new(area: Rect, header: Header<'a>) -> Self {
        Self {
            area,
            header,
            footer_height: DEFAULT_FOOTER_HEIGHT,
        }
    }

    /// Set the footer height (default is 3)
    pub fn with_footer_height(mut self, height: u16) -> Self {
        self.footer_height = height;
        self
    }

    /// Render the header and return layout areas
    pub fn render(self, frame: &mut Frame) -> LayoutAreas {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(self.footer_height),
            ])
            .split(self.area);

        self.header.render(frame, chunks[0]);

        LayoutAreas {
            header: chunks[0],
            content: chunks[1],
            footer: chunks[2],
        }
    }
}

/// Areas calculated by ScreenLayout
#[derive(Debug, Clone, Copy)]
pub struct LayoutAreas {
    /// Header area
    pub header: Rect,
    /// Main content area
    pub content: Rect,
    /// Footer area
    pub footer: Rect,
}
