//! Application state management
//!
//! Contains the main AppState struct and the control panel focus helpers.

use std::path::PathBuf;
use std::time::Instant;

use crate::timer::BrandingSlot;
use crate::tui::HeaderNotificationManager;

use super::input_mode::InputMode;
use super::view::View;

/// Which duration field the control panel has focused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerField {
    #[default]
    Hours,
    Minutes,
    Seconds,
}

impl TimerField {
    /// Cycle to the next field (wraps)
    pub fn next(self) -> Self {
        match self {
            TimerField::Hours => TimerField::Minutes,
            TimerField::Minutes => TimerField::Seconds,
            TimerField::Seconds => TimerField::Hours,
        }
    }

    /// Cycle to the previous field (wraps)
    pub fn prev(self) -> Self {
        match self {
            TimerField::Hours => TimerField::Seconds,
            TimerField::Minutes => TimerField::Hours,
            TimerField::Seconds => TimerField::Minutes,
        }
    }

    /// Display label for the field
    pub fn label(self) -> &'static str {
        match self {
            TimerField::Hours => "Hours",
            TimerField::Minutes => "Minutes",
            TimerField::Seconds => "Seconds",
        }
    }
}

/// Application state
#[derive(Default)]
pub struct AppState {
    /// Current view
    pub view: View,
    /// Current input mode
    pub input_mode: InputMode,
    /// Focused duration field in the control panel
    pub focused_field: TimerField,
    /// Digits typed into the focused field while editing
    pub edit_buffer: String,
    /// Buffer for logo path input
    pub logo_path_input: String,
    /// Branding slot targeted by the logo path input
    pub pending_logo_slot: Option<BrandingSlot>,
    /// Path completions for autocomplete
    pub path_completions: Vec<PathBuf>,
    /// Selected index in path completions list
    pub path_completion_index: usize,
    /// Whether to show path completions popup
    pub show_path_completions: bool,
    /// Validation warning shown next to the duration fields
    pub validation_message: Option<String>,
    /// Whether the application should quit
    pub should_quit: bool,
    /// Whether the UI needs to be re-rendered
    pub needs_render: bool,
    /// Timestamp of last resize event (for debouncing)
    pub last_resize: Option<Instant>,
    /// Whether a resize is pending (debounced)
    pub pending_resize: bool,
    /// Scroll offset in log viewer
    pub log_viewer_scroll: usize,
    /// Whether log viewer auto-scrolls to new entries
    pub log_viewer_auto_scroll: bool,
    /// Header notification manager for transient header messages
    pub header_notifications: HeaderNotificationManager,
}

impl AppState {
    /// Move focus to the next duration field
    pub fn focus_next_field(&mut self) {
        self.focused_field = self.focused_field.next();
    }

    /// Move focus to the previous duration field
    pub fn focus_prev_field(&mut self) {
        self.focused_field = self.focused_field.prev();
    }

    /// Enter edit mode on the focused field, optionally seeded with a digit
    pub fn begin_edit(&mut self, seed: Option<char>) {
        self.input_mode = InputMode::EditingTime;
        self.edit_buffer.clear();
        if let Some(c) = seed {
            self.edit_buffer.push(c);
        }
    }

    /// Leave edit mode without committing
    pub fn cancel_edit(&mut self) {
        self.input_mode = InputMode::Normal;
        self.edit_buffer.clear();
    }

    /// Consume the edit buffer, returning the field and its parsed value
    ///
    /// An empty or unparseable buffer yields 0.
    pub fn take_edit(&mut self) -> (TimerField, i64) {
        let value = self.edit_buffer.parse::<i64>().unwrap_or(0);
        self.edit_buffer.clear();
        self.input_mode = InputMode::Normal;
        (self.focused_field, value)
    }

    /// Enter logo path entry mode for the given branding slot
    pub fn begin_logo_entry(&mut self, slot: BrandingSlot) {
        self.input_mode = InputMode::EnteringLogoPath;
        self.pending_logo_slot = Some(slot);
        self.logo_path_input.clear();
        self.path_completions.clear();
        self.path_completion_index = 0;
        self.show_path_completions = false;
    }

    /// Leave logo path entry mode, clearing its buffers
    pub fn cancel_logo_entry(&mut self) {
        self.input_mode = InputMode::Normal;
        self.pending_logo_slot = None;
        self.logo_path_input.clear();
        self.path_completions.clear();
        self.path_completion_index = 0;
        self.show_path_completions = false;
    }

    /// Switch to the log viewer with auto-scroll enabled
    pub fn open_log_viewer(&mut self) {
        self.view = View::LogViewer;
        self.log_viewer_auto_scroll = true;
    }

    /// Navigate to the parent view
    pub fn navigate_back(&mut self) {
        if let Some(parent) = self.view.parent() {
            self.view = parent;
            if self.input_mode != InputMode::Normal {
                self.input_mode = InputMode::Normal;
            }
        }
    }
}
