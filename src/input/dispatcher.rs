//! Main input dispatch logic
//!
//! Routes keyboard events to appropriate handlers based on current mode.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, InputMode};

/// Handle a key event by routing to the appropriate mode handler
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    // Handle Ctrl+C specially: quitting goes through the confirm dialog so
    // the display window gets closed properly
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.state
            .header_notifications
            .push("Ctrl+C disabled. Press 'q' to quit.");
        return Ok(());
    }

    match app.state.input_mode {
        InputMode::Normal => app.handle_normal_mode_key(key),
        InputMode::EditingTime => super::text_input::handle_editing_time_key(app, key),
        InputMode::EnteringLogoPath => super::text_input::handle_logo_path_key(app, key),
        InputMode::ConfirmingQuit => super::dialogs::handle_confirming_quit_key(app, key),
    }
}
