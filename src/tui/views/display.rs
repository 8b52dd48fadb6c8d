//! Projected timer display
//!
//! Renders a composed DisplayFrame full-screen against the surface palette.
//! The control panel preview and the display client both call this renderer,
//! so the inline preview and the projected window cannot drift apart.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph};

use crate::presentation::DisplayFrame;
use crate::surface::SurfaceStyle;

fn rgb(c: (u8, u8, u8)) -> Color {
    Color::Rgb(c.0, c.1, c.2)
}

/// Render the timer display into the given area
///
/// `data` is the latest composed frame; `None` means the timer has not
/// published anything yet and a waiting placeholder is shown instead.
pub fn render_display(
    frame: &mut Frame,
    area: Rect,
    data: Option<&DisplayFrame>,
    style: &SurfaceStyle,
) {
    let background = Block::default().style(Style::default().bg(rgb(style.background)));
    frame.render_widget(background, area);

    let lines = match data {
        Some(data) => frame_lines(data, style),
        None => vec![Line::from(Span::styled(
            "Waiting for timer...",
            Style::default().fg(rgb(style.precise)),
        ))],
    };

    // Vertically center the stack
    let content_height = (lines.len() as u16).min(area.height);
    let top = area.y + (area.height.saturating_sub(content_height)) / 2;
    let content_area = Rect::new(area.x, top, area.width, content_height);

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().bg(rgb(style.background)));
    frame.render_widget(paragraph, content_area);
}

/// Build the display stack: event logo in the header above the countdown,
/// organization logo in the footer below it. Logos only appear when the
/// frame carries them.
fn frame_lines<'a>(data: &'a DisplayFrame, style: &SurfaceStyle) -> Vec<Line<'a>> {
    let logo_style = Style::default().fg(rgb(style.logo));
    let mut lines = Vec::new();

    if let Some(event) = &data.event_logo {
        lines.push(Line::from(Span::styled(event.name.as_str(), logo_style)));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        data.headline.as_str(),
        Style::default()
            .fg(rgb(style.headline))
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        data.precise.as_str(),
        Style::default().fg(rgb(style.precise)),
    )));

    if let Some(org) = &data.org_logo {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(org.name.as_str(), logo_style)));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::FrameLogo;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn draw(data: Option<&DisplayFrame>) -> ratatui::buffer::Buffer {
        let backend = TestBackend::new(40, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.size();
                render_display(frame, area, data, &SurfaceStyle::default());
            })
            .unwrap();
        terminal.backend().buffer().clone()
    }

    fn row_of(buffer: &ratatui::buffer::Buffer, needle: &str) -> u16 {
        (0..buffer.area.height)
            .find(|&y| {
                let row: String = (0..buffer.area.width)
                    .map(|x| buffer.get(x, y).symbol())
                    .collect();
                row.contains(needle)
            })
            .unwrap_or_else(|| panic!("{needle:?} not rendered"))
    }

    fn logo(name: &str) -> Option<FrameLogo> {
        Some(FrameLogo {
            name: name.to_string(),
            uri: format!("file:///tmp/{name}"),
        })
    }

    #[test]
    fn test_event_logo_heads_the_stack_org_logo_closes_it() {
        let data = DisplayFrame {
            headline: "5 seconds remaining".to_string(),
            precise: "00:00:05".to_string(),
            org_logo: logo("org.png"),
            event_logo: logo("event.png"),
        };
        let buffer = draw(Some(&data));

        let event = row_of(&buffer, "event.png");
        let headline = row_of(&buffer, "5 seconds remaining");
        let precise = row_of(&buffer, "00:00:05");
        let org = row_of(&buffer, "org.png");

        assert!(event < headline, "event logo belongs in the header");
        assert!(headline < precise);
        assert!(precise < org, "organization logo belongs in the footer");
    }

    #[test]
    fn test_missing_logos_leave_no_gap_rows() {
        let data = DisplayFrame {
            headline: "1 minute remaining".to_string(),
            precise: "00:01:00".to_string(),
            org_logo: None,
            event_logo: None,
        };
        let buffer = draw(Some(&data));

        let headline = row_of(&buffer, "1 minute remaining");
        let precise = row_of(&buffer, "00:01:00");
        assert_eq!(precise, headline + 1);
    }

    #[test]
    fn test_waiting_placeholder_before_first_frame() {
        let buffer = draw(None);
        row_of(&buffer, "Waiting for timer...");
    }
}
