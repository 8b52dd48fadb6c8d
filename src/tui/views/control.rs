//! Timer control panel view
//!
//! The main landing page: duration fields, transport controls, branding
//! slots, and a live preview of what the display window shows.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::{AppState, InputMode, TimerField};
use crate::presentation::{compose, format_precise};
use crate::surface::SurfaceStyle;
use crate::timer::{BrandingSlot, TimerState};
use crate::tui::header::Header;
use crate::tui::layout::ScreenLayout;
use crate::tui::theme::theme;
use crate::tui::views::{format_toggle_hint, render_display, Breadcrumb};

/// Render the control panel
pub fn render_control_panel(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    timer: &TimerState,
    display_open: bool,
    style: &SurfaceStyle,
) {
    let t = theme();

    // Header with display status and running readout
    let breadcrumb = Breadcrumb::new();
    let suffix = if display_open { "(display open)" } else { "" };
    let header = Header::new(breadcrumb)
        .with_suffix(suffix)
        .with_timer(Some(timer))
        .with_notifications(Some(&state.header_notifications));

    let areas = ScreenLayout::new(area, header).render(frame);

    // Content: status, optional warning, duration fields, branding, preview
    let has_warning = state.validation_message.is_some();
    let mut constraints = vec![Constraint::Length(1)];
    if has_warning {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Length(5));
    constraints.push(Constraint::Length(4));
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(areas.content);

    let mut chunk_idx = 0;

    // Status line
    let status_word = if timer.is_running {
        "Running"
    } else if timer.time.is_zero() {
        "Idle"
    } else {
        "Paused"
    };
    let status_color = t.timer_state_color(timer.is_running, timer.time.is_zero());
    let status = Paragraph::new(Line::from(vec![
        Span::styled("\u{25CF} ", Style::default().fg(status_color)),
        Span::styled(
            format!("{} {}", status_word, format_precise(&timer.time)),
            Style::default().fg(t.text),
        ),
    ]));
    frame.render_widget(status, chunks[chunk_idx]);
    chunk_idx += 1;

    // Validation warning banner
    if let Some(message) = &state.validation_message {
        let warning = Paragraph::new(format!("\u{26A0} {}", message)).style(t.warning_banner_style());
        frame.render_widget(warning, chunks[chunk_idx]);
        chunk_idx += 1;
    }

    // Duration fields
    render_time_fields(frame, chunks[chunk_idx], state, timer);
    chunk_idx += 1;

    // Branding slots
    render_branding_section(frame, chunks[chunk_idx], timer);
    chunk_idx += 1;

    // Live preview, rendered by the same code path as the display window.
    // While the window is open the frames go there instead.
    let preview_block = Block::default().borders(Borders::ALL).title("Preview");
    let preview_inner = preview_block.inner(chunks[chunk_idx]);
    frame.render_widget(preview_block, chunks[chunk_idx]);
    if display_open {
        let top = preview_inner.y + preview_inner.height.saturating_sub(1) / 2;
        let line = Rect::new(
            preview_inner.x,
            top,
            preview_inner.width,
            preview_inner.height.min(1),
        );
        let placeholder = Paragraph::new("Projected to display window")
            .alignment(Alignment::Center)
            .style(t.muted_style());
        frame.render_widget(placeholder, line);
    } else {
        let preview_frame = compose(timer);
        render_display(frame, preview_inner, Some(&preview_frame), style);
    }

    // Footer with key hints
    let footer_text = match state.input_mode {
        InputMode::EditingTime => "0-9: type | Enter: apply | Esc: cancel".to_string(),
        InputMode::EnteringLogoPath => {
            "Tab: autocomplete | Enter: confirm | Esc: cancel".to_string()
        }
        InputMode::ConfirmingQuit => "y/Enter: quit | n/Esc: cancel".to_string(),
        InputMode::Normal => format!(
            "{} | Tab: field | Enter: edit | r: reset | o/c: display | l/e: logos | v: logs | q: quit",
            format_toggle_hint(timer.is_running)
        ),
    };
    let footer = Paragraph::new(footer_text)
        .style(t.muted_style())
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, areas.footer);

    // Overlays
    if state.input_mode == InputMode::EnteringLogoPath {
        if let Some(slot) = state.pending_logo_slot {
            render_logo_path_dialog(
                frame,
                area,
                slot,
                &state.logo_path_input,
                &state.path_completions,
                state.path_completion_index,
                state.show_path_completions,
            );
        }
    }
    if state.input_mode == InputMode::ConfirmingQuit {
        render_quit_confirm_dialog(frame, area, display_open);
    }
}

/// Render the three duration field boxes
fn render_time_fields(frame: &mut Frame, area: Rect, state: &AppState, timer: &TimerState) {
    let t = theme();
    let disabled = timer.is_running;

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(13),
            Constraint::Length(13),
            Constraint::Length(13),
            Constraint::Min(0),
        ])
        .split(area);

    let fields = [
        (TimerField::Hours, timer.time.hours),
        (TimerField::Minutes, timer.time.minutes),
        (TimerField::Seconds, timer.time.seconds),
    ];

    for (i, (field, value)) in fields.into_iter().enumerate() {
        let focused = state.focused_field == field;
        let editing = focused && state.input_mode == InputMode::EditingTime;

        let border_style = if disabled {
            t.muted_style()
        } else if editing {
            t.input_style()
        } else if focused {
            Style::default().fg(t.border_focused)
        } else {
            Style::default().fg(t.border)
        };

        let content = if editing {
            Line::from(Span::styled(
                format!("{}_", state.edit_buffer),
                t.input_style(),
            ))
        } else {
            let value_style = if disabled {
                t.muted_style()
            } else {
                Style::default().fg(t.text)
            };
            Line::from(Span::styled(format!("{:02}", value), value_style))
        };

        let mut title = field.label().to_string();
        if disabled {
            title.push_str(" (locked)");
        }

        let widget = Paragraph::new(content)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title(title),
            );
        frame.render_widget(widget, columns[i]);
    }
}

/// Render the branding slot summary
fn render_branding_section(frame: &mut Frame, area: Rect, timer: &TimerState) {
    let t = theme();

    let slot_line = |label: &str, asset: Option<&crate::timer::BrandingAsset>| match asset {
        Some(asset) => Line::from(vec![
            Span::styled(format!("{}: ", label), Style::default().fg(t.text)),
            Span::styled(asset.name.clone(), Style::default().fg(t.accent)),
        ]),
        None => Line::from(vec![
            Span::styled(format!("{}: ", label), Style::default().fg(t.text)),
            Span::styled("(none)", t.muted_style()),
        ]),
    };

    let lines = vec![
        slot_line(BrandingSlot::Org.display_name(), timer.org_logo.as_ref()),
        slot_line(BrandingSlot::Event.display_name(), timer.event_logo.as_ref()),
    ];

    let widget =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Branding"));
    frame.render_widget(widget, area);
}

/// Render the logo path input dialog
pub fn render_logo_path_dialog(
    frame: &mut Frame,
    area: Rect,
    slot: BrandingSlot,
    input: &str,
    completions: &[std::path::PathBuf],
    completion_index: usize,
    show_completions: bool,
) {
    let t = theme();

    let base_height = 9_u16;
    let completion_height = if show_completions && !completions.is_empty() {
        (completions.len().min(5) + 1) as u16
    } else {
        0
    };

    let dialog_width = 60_u16.min(area.width.saturating_sub(4));
    let dialog_height = (base_height + completion_height).min(area.height.saturating_sub(2));

    let dialog_x = area.x + (area.width.saturating_sub(dialog_width)) / 2;
    let dialog_y = area.y + (area.height.saturating_sub(dialog_height)) / 2;

    let dialog_area = Rect::new(dialog_x, dialog_y, dialog_width, dialog_height);

    // Clear the background
    frame.render_widget(Clear, dialog_area);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("Enter the path to the {} image:", slot.display_name().to_lowercase()),
            Style::default().fg(t.text),
        )),
        Line::from(Span::styled(
            "(The file is copied into the asset store)",
            Style::default().fg(t.text_muted),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(format!("{}_", input), Style::default().fg(t.accent)),
        ]),
    ];

    // Add completions if showing
    if show_completions && !completions.is_empty() {
        lines.push(Line::from(""));
        for (i, path) in completions.iter().take(5).enumerate() {
            let is_selected = i == completion_index;
            let prefix = if is_selected { "\u{25B6} " } else { "  " };

            // Shorten path for display
            let display: String = crate::path_complete::path_to_display(path)
                .chars()
                .take(dialog_width.saturating_sub(6) as usize)
                .collect();

            lines.push(Line::from(vec![
                Span::raw(prefix),
                Span::styled(
                    display,
                    Style::default().fg(if is_selected { t.accent } else { t.text_muted }),
                ),
            ]));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[Tab] Complete  [Enter] Confirm  [Esc] Cancel",
        Style::default().fg(t.text_muted),
    )));

    let paragraph = Paragraph::new(lines).alignment(Alignment::Left).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(t.accent))
            .title(format!(" Set {} ", slot.display_name())),
    );

    frame.render_widget(paragraph, dialog_area);
}

/// Render the quit confirmation dialog as an overlay
pub fn render_quit_confirm_dialog(frame: &mut Frame, area: Rect, display_open: bool) {
    let t = theme();

    let dialog_width = 50_u16.min(area.width.saturating_sub(4));
    let dialog_height = if display_open { 9 } else { 7 };
    let dialog_height = dialog_height.min(area.height.saturating_sub(2));

    let dialog_x = area.x + (area.width.saturating_sub(dialog_width)) / 2;
    let dialog_y = area.y + (area.height.saturating_sub(dialog_height)) / 2;

    let dialog_area = Rect::new(dialog_x, dialog_y, dialog_width, dialog_height);

    frame.render_widget(Clear, dialog_area);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Quit Podium?",
            Style::default().fg(t.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    if display_open {
        lines.push(Line::from(Span::styled(
            "The display window will close.",
            Style::default().fg(t.text_muted),
        )));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(vec![
        Span::styled("Press ", Style::default().fg(t.text)),
        Span::styled(
            "y",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" to confirm, ", Style::default().fg(t.text)),
        Span::styled(
            "n",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" or ", Style::default().fg(t.text)),
        Span::styled(
            "Esc",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" to cancel", Style::default().fg(t.text)),
    ]));

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(t.border_warning))
            .title(" Quit "),
    );

    frame.render_widget(paragraph, dialog_area);
}
