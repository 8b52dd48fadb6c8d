//! Unified header component
//!
//! Provides a consistent header across all views with:
//! - Breadcrumb navigation
//! - Optional suffix (e.g., display window status)
//! - Header notifications (shown after breadcrumb)
//! - Running countdown readout (right-aligned)

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::presentation::format_precise;
use crate::timer::TimerState;
use crate::tui::header_notifications::HeaderNotificationManager;
use crate::tui::theme::theme;
use crate::tui::views::Breadcrumb;

/// Unified header component for all views
pub struct Header<'a> {
    /// Breadcrumb navigation path
    breadcrumb: Breadcrumb,
    /// Optional suffix text (e.g., "(display open)")
    suffix: Option<String>,
    /// Timer state for the right-aligned countdown readout
    timer: Option<&'a TimerState>,
    /// Header notifications manager
    notifications: Option<&'a HeaderNotificationManager>,
}

impl<'a> Header<'a> {
    /// Create a new header with the given breadcrumb
    pub fn new(breadcrumb: Breadcrumb) -> Self {
        Self {
            breadcrumb,
            suffix: None,
            timer: None,
            notifications: None,
        }
    }

    /// Add a suffix to the header (e.g., display status)
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        let s = suffix.into();
        if !s.is_empty() {
            self.suffix = Some(s);
        }
        self
    }

    /// Add the countdown readout (shown only while the timer is running)
    pub fn with_timer(mut self, timer: Option<&'a TimerState>) -> Self {
        self.timer = timer;
        self
    }

    /// Add header notifications
    pub fn with_notifications(
        mut self,
        notifications: Option<&'a HeaderNotificationManager>,
    ) -> Self {
        self.notifications = notifications;
        self
    }

    /// Render the header to the given area
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let t = theme();

        // Build the left side content
        let mut left_parts = Vec::new();

        // Breadcrumb
        let breadcrumb_text = if let Some(suffix) = &self.suffix {
            self.breadcrumb.display_with_suffix(suffix)
        } else {
            self.breadcrumb.display()
        };
        left_parts.push(breadcrumb_text);

        // Notification message (if any)
        let notification_msg = self.notifications.and_then(|n| n.current_message());
        if let Some(msg) = notification_msg {
            left_parts.push(format!("| {}", msg));
        }

        let left_text = left_parts.join(" ");

        // Build the right side content
        let mut right_spans: Vec<Span> = Vec::new();

        // Countdown readout while running
        if let Some(state) = self.timer {
            if state.is_running {
                right_spans.push(Span::styled(
                    format!("\u{23F1} {}", format_precise(&state.time)),
                    Style::default().fg(t.timer_running),
                ));
            }
        }

        // Calculate layout
        let width = area.width.saturating_sub(2) as usize; // Account for borders
        let left_len = left_text.chars().count();
        let right_text: String = right_spans.iter().map(|s| s.content.as_ref()).collect();
        let right_len = right_text.chars().count();

        // Build the final line with padding
        let padding = width.saturating_sub(left_len + right_len);

        let mut line_spans = vec![Span::raw(left_text)];
        if padding > 0 {
            line_spans.push(Span::raw(" ".repeat(padding)));
        }
        line_spans.extend(right_spans);

        let paragraph = Paragraph::new(Line::from(line_spans))
            .style(t.header_style())
            .block(Block::default().borders(Borders::BOTTOM));

        frame.render_widget(paragraph, area);
    }
}

/// Height constant for the header (including bottom border)
pub const HEADER_HEIGHT: u16 = 3;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerValue;

    #[test]
    fn test_header_creation() {
        let breadcrumb = Breadcrumb::new().push("Podium");
        let header = Header::new(breadcrumb);
        assert!(header.suffix.is_none());
        assert!(header.timer.is_none());
    }

    #[test]
    fn test_header_with_suffix() {
        let breadcrumb = Breadcrumb::new().push("Podium");
        let header = Header::new(breadcrumb).with_suffix("(display open)");
        assert_eq!(header.suffix, Some("(display open)".to_string()));
    }

    #[test]
    fn test_header_with_timer() {
        let breadcrumb = Breadcrumb::new().push("Podium");
        let state = TimerState {
            time: TimerValue::new(0, 5, 0),
            is_running: true,
            org_logo: None,
            event_logo: None,
        };
        let header = Header::new(breadcrumb).with_timer(Some(&state));
        assert!(header.timer.is_some());
    }

    #[test]
    fn test_empty_suffix_ignored() {
        let breadcrumb = Breadcrumb::new().push("Podium");
        let header = Header::new(breadcrumb).with_suffix("");
        assert!(header.suffix.is_none());
    }
}
