//! Theme module for centralized color and style definitions
//!
//! This module provides semantic color constants and styles used throughout
//! the control panel UI. Centralizing colors here makes it easy to maintain
//! visual consistency and implement theme switching in the future. The
//! projected display window has its own palette, carried in `SurfaceStyle`.

use ratatui::style::{Color, Modifier, Style};

/// Application theme with all color definitions
#[derive(Debug, Clone)]
pub struct Theme {
    // === Timer States ===
    /// Countdown is running
    pub timer_running: Color,
    /// Countdown is paused with time remaining
    pub timer_paused: Color,
    /// Timer is idle at zero
    pub timer_idle: Color,

    // === UI Elements ===
    /// Primary accent color (headers, titles)
    pub accent: Color,
    /// Text color for normal content
    pub text: Color,
    /// Text color for muted/secondary content
    pub text_muted: Color,

    // === Input Modes ===
    /// Color for input mode prompts
    pub input_prompt: Color,

    // === Banners ===
    /// Warning banner background
    pub warning_bg: Color,
    /// Warning banner foreground
    pub warning_fg: Color,

    // === Borders ===
    /// Normal border color
    pub border: Color,
    /// Focused/active border color
    pub border_focused: Color,
    /// Warning border color
    pub border_warning: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            // Timer states
            timer_running: Color::Green,
            timer_paused: Color::Yellow,
            timer_idle: Color::DarkGray,

            // UI elements
            accent: Color::Cyan,
            text: Color::White,
            text_muted: Color::DarkGray,

            // Input modes - Magenta so prompts stand out from timer states
            input_prompt: Color::Magenta,

            // Banners
            warning_bg: Color::Yellow,
            warning_fg: Color::Black,

            // Borders
            border: Color::White,
            border_focused: Color::Cyan,
            border_warning: Color::Yellow,
        }
    }

    /// Get the color for the current timer state
    pub fn timer_state_color(&self, is_running: bool, is_zero: bool) -> Color {
        if is_running {
            self.timer_running
        } else if is_zero {
            self.timer_idle
        } else {
            self.timer_paused
        }
    }

    // === Style Builders ===

    /// Style for headers/titles
    pub fn header_style(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    /// Style for muted text
    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    /// Style for input prompts
    pub fn input_style(&self) -> Style {
        Style::default().fg(self.input_prompt)
    }

    /// Style for warning banners
    pub fn warning_banner_style(&self) -> Style {
        Style::default().fg(self.warning_fg).bg(self.warning_bg)
    }
}

/// Global theme instance
/// In the future, this could be made configurable
static THEME: std::sync::OnceLock<Theme> = std::sync::OnceLock::new();

/// Get the current theme
pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_default() {
        let theme = Theme::default();
        assert_eq!(theme.accent, Color::Cyan);
        assert_eq!(theme.timer_running, Color::Green);
    }

    #[test]
    fn test_theme_dark() {
        let theme = Theme::dark();
        assert_eq!(theme.input_prompt, Color::Magenta);
    }

    #[test]
    fn test_timer_state_color() {
        let theme = Theme::dark();

        assert_eq!(theme.timer_state_color(true, false), Color::Green);
        assert_eq!(theme.timer_state_color(false, false), Color::Yellow);
        assert_eq!(theme.timer_state_color(false, true), Color::DarkGray);
    }

    #[test]
    fn test_global_theme() {
        let t = theme();
        assert_eq!(t.accent, Color::Cyan);
    }
}
