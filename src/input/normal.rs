//! Normal mode input handlers
//!
//! One handler per view. The control panel handler owns the timer transport
//! keys; the log viewer handler only scrolls.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::App;
use crate::timer::BrandingSlot;

/// Handle key in the control panel (normal mode)
pub fn handle_control_key(app: &mut App, key: KeyEvent) -> Result<()> {
    // Only process key press events (not release/repeat)
    if key.kind != KeyEventKind::Press {
        return Ok(());
    }

    match key.code {
        KeyCode::Char(' ') => {
            app.toggle_timer();
        }
        KeyCode::Tab | KeyCode::Right => {
            app.state.focus_next_field();
        }
        KeyCode::BackTab | KeyCode::Left => {
            app.state.focus_prev_field();
        }
        KeyCode::Enter => {
            // Duration fields are locked while the countdown runs
            if app.store.state().is_running {
                app.state
                    .header_notifications
                    .push("Pause the timer to edit the duration");
            } else {
                app.state.begin_edit(None);
            }
        }
        KeyCode::Char('r') => {
            app.reset_timer();
        }
        KeyCode::Char('o') => {
            app.open_display();
        }
        KeyCode::Char('c') => {
            app.close_display();
        }
        KeyCode::Char('l') => {
            app.state.begin_logo_entry(BrandingSlot::Org);
        }
        KeyCode::Char('e') => {
            app.state.begin_logo_entry(BrandingSlot::Event);
        }
        KeyCode::Char('L') => {
            app.remove_logo(BrandingSlot::Org);
        }
        KeyCode::Char('E') => {
            app.remove_logo(BrandingSlot::Event);
        }
        KeyCode::Char('v') => {
            app.state.open_log_viewer();
            app.state.log_viewer_scroll = app.log_buffer.len().saturating_sub(1);
        }
        KeyCode::Char('q') => {
            app.request_quit();
        }
        KeyCode::Char(c) if c.is_ascii_digit() => {
            // A digit starts editing the focused field, seeded with itself
            if app.store.state().is_running {
                app.state
                    .header_notifications
                    .push("Pause the timer to edit the duration");
            } else {
                app.state.begin_edit(Some(c));
            }
        }
        _ => {}
    }
    Ok(())
}

/// Handle key in log viewer (normal mode)
pub fn handle_log_viewer_key(app: &mut App, key: KeyEvent) -> Result<()> {
    // Only process key press events (not release/repeat)
    if key.kind != KeyEventKind::Press {
        return Ok(());
    }

    let entry_count = app.log_buffer.len();

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            app.state.navigate_back();
        }
        KeyCode::Down | KeyCode::Char('j') => {
            // Scroll down (disable auto-scroll)
            app.state.log_viewer_auto_scroll = false;
            if app.state.log_viewer_scroll < entry_count.saturating_sub(1) {
                app.state.log_viewer_scroll += 1;
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            // Scroll up (disable auto-scroll)
            app.state.log_viewer_auto_scroll = false;
            app.state.log_viewer_scroll = app.state.log_viewer_scroll.saturating_sub(1);
        }
        KeyCode::Home | KeyCode::Char('g') => {
            // Jump to top (disable auto-scroll)
            app.state.log_viewer_auto_scroll = false;
            app.state.log_viewer_scroll = 0;
        }
        KeyCode::End | KeyCode::Char('G') => {
            // Jump to bottom and enable auto-scroll
            app.state.log_viewer_auto_scroll = true;
            app.state.log_viewer_scroll = entry_count.saturating_sub(1);
        }
        KeyCode::PageDown => {
            // Page down (disable auto-scroll)
            app.state.log_viewer_auto_scroll = false;
            app.state.log_viewer_scroll =
                (app.state.log_viewer_scroll + 20).min(entry_count.saturating_sub(1));
        }
        KeyCode::PageUp => {
            // Page up (disable auto-scroll)
            app.state.log_viewer_auto_scroll = false;
            app.state.log_viewer_scroll = app.state.log_viewer_scroll.saturating_sub(20);
        }
        _ => {}
    }
    Ok(())
}
