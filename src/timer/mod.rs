//! Countdown timer core
//!
//! This module provides:
//! - `TimerValue`: bounded hours/minutes/seconds remaining-time value
//! - `TimerState`: the canonical state snapshot owned by `TimerStore`
//! - Branding slot/asset types shared by the store and the display
//! - The validation error raised by guarded commands

pub mod engine;
pub mod store;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound for the hours field.
pub const MAX_HOURS: u8 = 23;
/// Upper bound for the minutes and seconds fields.
pub const MAX_MIN_SEC: u8 = 59;

/// Remaining time as hours/minutes/seconds
///
/// This is a pure countdown quantity: no wall-clock anchoring, never
/// negative. Fields are kept within their bounds by construction; raw user
/// input is coerced before it reaches this type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerValue {
    /// Hours remaining, 0-23
    pub hours: u8,
    /// Minutes remaining, 0-59
    pub minutes: u8,
    /// Seconds remaining, 0-59
    pub seconds: u8,
}

impl TimerValue {
    /// Create a value from already-bounded components
    pub fn new(hours: u8, minutes: u8, seconds: u8) -> Self {
        Self {
            hours: hours.min(MAX_HOURS),
            minutes: minutes.min(MAX_MIN_SEC),
            seconds: seconds.min(MAX_MIN_SEC),
        }
    }

    /// True when no time remains
    pub fn is_zero(&self) -> bool {
        self.hours == 0 && self.minutes == 0 && self.seconds == 0
    }

    /// Total remaining time in seconds
    pub fn total_seconds(&self) -> u32 {
        u32::from(self.hours) * 3600 + u32::from(self.minutes) * 60 + u32::from(self.seconds)
    }

    /// Take one second off, borrowing from the next larger unit on underflow
    ///
    /// Decrementing zero yields zero; the value never goes negative.
    pub fn decrement(self) -> Self {
        if self.seconds > 0 {
            Self {
                seconds: self.seconds - 1,
                ..self
            }
        } else if self.minutes > 0 {
            Self {
                hours: self.hours,
                minutes: self.minutes - 1,
                seconds: MAX_MIN_SEC,
            }
        } else if self.hours > 0 {
            Self {
                hours: self.hours - 1,
                minutes: MAX_MIN_SEC,
                seconds: MAX_MIN_SEC,
            }
        } else {
            Self::default()
        }
    }
}

/// Coerce a raw numeric input into a unit field
///
/// Values outside `[0, max]` become 0. This is the store-side half of the
/// input rule; the form layer already turned non-numeric text into 0.
pub fn coerce_unit(raw: i64, max: u8) -> u8 {
    if (0..=i64::from(max)).contains(&raw) {
        raw as u8
    } else {
        0
    }
}

/// Partial update for `set_time`
///
/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimerPatch {
    pub hours: Option<i64>,
    pub minutes: Option<i64>,
    pub seconds: Option<i64>,
}

impl TimerPatch {
    /// Patch touching only the hours field
    pub fn hours(value: i64) -> Self {
        Self {
            hours: Some(value),
            ..Default::default()
        }
    }

    /// Patch touching only the minutes field
    pub fn minutes(value: i64) -> Self {
        Self {
            minutes: Some(value),
            ..Default::default()
        }
    }

    /// Patch touching only the seconds field
    pub fn seconds(value: i64) -> Self {
        Self {
            seconds: Some(value),
            ..Default::default()
        }
    }
}

/// Which branding slot an asset occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrandingSlot {
    /// Organization logo, shown below the precise readout
    Org,
    /// Event logo, shown above the headline
    Event,
}

impl BrandingSlot {
    /// Short slot name, used in log lines
    pub fn label(&self) -> &'static str {
        match self {
            BrandingSlot::Org => "org",
            BrandingSlot::Event => "event",
        }
    }

    /// Full slot name, used in the control panel
    pub fn display_name(&self) -> &'static str {
        match self {
            BrandingSlot::Org => "Organization logo",
            BrandingSlot::Event => "Event logo",
        }
    }
}

/// A staged branding image
///
/// The URI points at a managed copy of the selected file; whoever replaces
/// or removes the asset is responsible for revoking that copy through the
/// asset store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandingAsset {
    /// `file://` URI of the staged copy
    pub uri: String,
    /// Original file name, for display in the control panel
    pub name: String,
}

/// Canonical timer state
///
/// Owned exclusively by `TimerStore`; everything else sees snapshots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimerState {
    /// Remaining time
    pub time: TimerValue,
    /// Whether the countdown is active
    pub is_running: bool,
    /// Organization logo slot
    pub org_logo: Option<BrandingAsset>,
    /// Event logo slot
    pub event_logo: Option<BrandingAsset>,
}

impl TimerState {
    /// Get the asset in a slot
    pub fn branding(&self, slot: BrandingSlot) -> Option<&BrandingAsset> {
        match slot {
            BrandingSlot::Org => self.org_logo.as_ref(),
            BrandingSlot::Event => self.event_logo.as_ref(),
        }
    }
}

/// Errors raised by guarded store commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// `start()` was called while the configured duration is zero
    #[error("time must be set before starting the timer")]
    EmptyDuration,
}
