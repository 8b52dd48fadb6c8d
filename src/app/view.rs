//! View enum and navigation helpers
//!
//! Defines the current view being displayed and provides navigation utilities.

/// Current view being displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Timer control panel (main landing page)
    #[default]
    Control,
    /// Log viewer showing application logs
    LogViewer,
}

impl View {
    /// Get the parent view for navigation (Esc key)
    pub fn parent(&self) -> Option<View> {
        match self {
            View::Control => None,
            View::LogViewer => Some(View::Control),
        }
    }
}
