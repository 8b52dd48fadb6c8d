//! Confirmation dialog handlers
//!
//! Handles keyboard input for confirmation dialogs.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::{App, InputMode};

/// Handle key when confirming quit
pub fn handle_confirming_quit_key(app: &mut App, key: KeyEvent) -> Result<()> {
    if key.kind != KeyEventKind::Press {
        return Ok(());
    }
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            // Confirm quit
            app.confirm_quit();
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            // Cancel quit
            app.state.input_mode = InputMode::Normal;
        }
        _ => {}
    }
    Ok(())
}
