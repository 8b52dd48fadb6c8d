//! Input mode enum
//!
//! Defines how keyboard input is handled based on the current mode.

/// Input mode determines how keyboard input is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Normal mode - keys are handled as commands
    #[default]
    Normal,
    /// Editing the focused duration field - digits go into the edit buffer
    EditingTime,
    /// Entering a logo file path for a branding slot
    EnteringLogoPath,
    /// Confirming application quit
    ConfirmingQuit,
}
