//! View rendering modules
//!
//! Each view in the application has its own module for rendering logic.

mod control;
mod display;
mod logs;

pub use control::{render_control_panel, render_logo_path_dialog, render_quit_confirm_dialog};
pub use display::render_display;
pub use logs::render_log_viewer;

/// Format the start/pause hint for the footer based on the running state.
pub fn format_toggle_hint(is_running: bool) -> &'static str {
    if is_running {
        "Space: pause"
    } else {
        "Space: start"
    }
}

/// Breadcrumb navigation path segments
pub struct Breadcrumb {
    segments: Vec<String>,
}

impl Breadcrumb {
    /// Create a new breadcrumb with the root "Podium" segment
    pub fn new() -> Self {
        Self {
            segments: vec!["Podium".to_string()],
        }
    }

    /// Add a segment to the breadcrumb path
    pub fn push(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Format the breadcrumb as a display string with " > " separators
    pub fn display(&self) -> String {
        self.segments.join(" > ")
    }

    /// Format the breadcrumb with an optional suffix (e.g., status info)
    pub fn display_with_suffix(&self, suffix: &str) -> String {
        if suffix.is_empty() {
            self.display()
        } else {
            format!("{} {}", self.display(), suffix)
        }
    }
}

impl Default for Breadcrumb {
    fn default() -> Self {
        Self::new()
    }
}
