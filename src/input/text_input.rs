//! Text input mode handlers
//!
//! Handles the duration field edit buffer and the logo path input.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::App;

/// Most digits a duration field accepts; enough for 0-59 and 0-23
const EDIT_BUFFER_MAX: usize = 2;

/// Handle key while editing the focused duration field
pub fn handle_editing_time_key(app: &mut App, key: KeyEvent) -> Result<()> {
    // Only process key press events (not release/repeat)
    if key.kind != KeyEventKind::Press {
        return Ok(());
    }
    match key.code {
        KeyCode::Esc => {
            // Cancel without changing the field
            app.state.cancel_edit();
        }
        KeyCode::Enter => {
            app.commit_time_edit();
        }
        KeyCode::Tab => {
            // Commit and move on, for rapid H -> M -> S entry
            app.commit_time_edit();
            app.state.focus_next_field();
        }
        KeyCode::BackTab => {
            app.commit_time_edit();
            app.state.focus_prev_field();
        }
        KeyCode::Backspace => {
            app.state.edit_buffer.pop();
        }
        KeyCode::Char(c) if c.is_ascii_digit() => {
            if app.state.edit_buffer.len() < EDIT_BUFFER_MAX {
                app.state.edit_buffer.push(c);
            }
        }
        _ => {}
    }
    Ok(())
}

/// Handle key while entering a logo file path
pub fn handle_logo_path_key(app: &mut App, key: KeyEvent) -> Result<()> {
    // Only process key press events (not release/repeat)
    if key.kind != KeyEventKind::Press {
        return Ok(());
    }
    match key.code {
        KeyCode::Esc => {
            if app.state.show_path_completions {
                // First Esc hides completions
                clear_path_completions(app);
            } else {
                // Second Esc cancels input
                app.state.cancel_logo_entry();
            }
        }
        KeyCode::Tab => {
            if app.state.show_path_completions && !app.state.path_completions.is_empty() {
                // Apply selected completion (standard shell behavior)
                apply_path_completion(app);
            } else {
                // Show completions
                update_path_completions(app);
            }
        }
        KeyCode::BackTab | KeyCode::Up => {
            // Cycle backward through completions
            if app.state.show_path_completions {
                let count = app.state.path_completions.len();
                if count > 0 {
                    app.state.path_completion_index = app
                        .state
                        .path_completion_index
                        .checked_sub(1)
                        .unwrap_or(count - 1);
                }
            }
        }
        KeyCode::Down => {
            // Cycle forward through completions
            if app.state.show_path_completions {
                let count = app.state.path_completions.len();
                if count > 0 {
                    app.state.path_completion_index = (app.state.path_completion_index + 1) % count;
                }
            }
        }
        KeyCode::Enter => {
            let path = std::mem::take(&mut app.state.logo_path_input);
            let slot = app.state.pending_logo_slot;
            app.state.cancel_logo_entry();

            let path = path.trim();
            if let Some(slot) = slot {
                if !path.is_empty() {
                    app.set_logo(slot, path);
                }
            }
        }
        KeyCode::Backspace => {
            app.state.logo_path_input.pop();
            update_path_completions(app);
        }
        KeyCode::Char(c) => {
            app.state.logo_path_input.push(c);
            update_path_completions(app);
        }
        _ => {}
    }
    Ok(())
}

// ========================================================================
// Path Completion Helpers
// ========================================================================

/// Update path completions based on current input
fn update_path_completions(app: &mut App) {
    let completions = crate::path_complete::get_completions(&app.state.logo_path_input);
    app.state.path_completions = completions;
    app.state.path_completion_index = 0;
    app.state.show_path_completions = !app.state.path_completions.is_empty();
}

/// Clear path completion state
fn clear_path_completions(app: &mut App) {
    app.state.path_completions.clear();
    app.state.path_completion_index = 0;
    app.state.show_path_completions = false;
}

/// Apply the selected completion to the input field
fn apply_path_completion(app: &mut App) {
    if let Some(path) = app
        .state
        .path_completions
        .get(app.state.path_completion_index)
    {
        app.state.logo_path_input = crate::path_complete::path_to_input(path);
        // After applying, refresh completions for the new path
        update_path_completions(app);
    }
}
