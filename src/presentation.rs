//! Presentation content
//!
//! Everything the audience sees is derived here, as a pure function of
//! `TimerState`. The control panel's inline preview and the projected
//! display window both consume the same composed `DisplayFrame`, so the two
//! render paths cannot drift apart.

use serde::{Deserialize, Serialize};

use crate::branding;
use crate::timer::{TimerState, TimerValue};

/// Human headline for the remaining time
///
/// Shows the largest nonzero unit, pluralized. Zero is a defined rendering
/// ("0 seconds remaining"), not an error.
pub fn format_headline(time: &TimerValue) -> String {
    if time.hours > 0 {
        format!(
            "{} hour{} remaining",
            time.hours,
            if time.hours == 1 { "" } else { "s" }
        )
    } else if time.minutes > 0 {
        format!(
            "{} minute{} remaining",
            time.minutes,
            if time.minutes == 1 { "" } else { "s" }
        )
    } else {
        format!(
            "{} second{} remaining",
            time.seconds,
            if time.seconds == 1 { "" } else { "s" }
        )
    }
}

/// Zero-padded `HH:MM:SS` readout
pub fn format_precise(time: &TimerValue) -> String {
    format!("{:02}:{:02}:{:02}", time.hours, time.minutes, time.seconds)
}

/// One rendered logo slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameLogo {
    /// Display name shown on the badge
    pub name: String,
    /// Validated `file://` URI of the staged image
    pub uri: String,
}

/// Everything needed to draw the audience display
///
/// Branding slots are already validated: a slot is present only when its
/// asset URI was well-formed and dereferenceable at compose time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayFrame {
    pub headline: String,
    pub precise: String,
    pub org_logo: Option<FrameLogo>,
    pub event_logo: Option<FrameLogo>,
}

/// Compose a frame from the current state
pub fn compose(state: &TimerState) -> DisplayFrame {
    DisplayFrame {
        headline: format_headline(&state.time),
        precise: format_precise(&state.time),
        org_logo: validated_logo(state.org_logo.as_ref()),
        event_logo: validated_logo(state.event_logo.as_ref()),
    }
}

fn validated_logo(asset: Option<&crate::timer::BrandingAsset>) -> Option<FrameLogo> {
    let asset = asset?;
    if branding::is_dereferenceable(&asset.uri) {
        Some(FrameLogo {
            name: asset.name.clone(),
            uri: asset.uri.clone(),
        })
    } else {
        tracing::debug!("Branding asset not renderable: {}", asset.uri);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branding::path_to_file_uri;
    use crate::timer::BrandingAsset;
    use tempfile::TempDir;

    #[test]
    fn test_headline_hours_take_precedence() {
        assert_eq!(
            format_headline(&TimerValue::new(2, 30, 15)),
            "2 hours remaining"
        );
        assert_eq!(
            format_headline(&TimerValue::new(1, 0, 0)),
            "1 hour remaining"
        );
    }

    #[test]
    fn test_headline_minutes_when_no_hours() {
        assert_eq!(
            format_headline(&TimerValue::new(0, 5, 59)),
            "5 minutes remaining"
        );
        assert_eq!(
            format_headline(&TimerValue::new(0, 1, 30)),
            "1 minute remaining"
        );
    }

    #[test]
    fn test_headline_seconds_when_nothing_larger() {
        assert_eq!(
            format_headline(&TimerValue::new(0, 0, 59)),
            "59 seconds remaining"
        );
        assert_eq!(
            format_headline(&TimerValue::new(0, 0, 1)),
            "1 second remaining"
        );
    }

    #[test]
    fn test_headline_zero_is_defined() {
        assert_eq!(format_headline(&TimerValue::default()), "0 seconds remaining");
    }

    #[test]
    fn test_precise_zero_padding() {
        assert_eq!(format_precise(&TimerValue::default()), "00:00:00");
        assert_eq!(format_precise(&TimerValue::new(0, 0, 5)), "00:00:05");
        assert_eq!(format_precise(&TimerValue::new(1, 2, 3)), "01:02:03");
        assert_eq!(format_precise(&TimerValue::new(23, 59, 59)), "23:59:59");
    }

    #[test]
    fn test_precise_survives_a_minute_borrow() {
        let after = TimerValue::new(0, 1, 0).decrement();
        assert_eq!(format_precise(&after), "00:00:59");
        assert_eq!(format_headline(&after), "59 seconds remaining");
    }

    fn real_asset(temp: &TempDir, name: &str) -> BrandingAsset {
        let path = temp.path().join(name);
        std::fs::write(&path, b"img").unwrap();
        BrandingAsset {
            uri: path_to_file_uri(&path),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_compose_includes_valid_branding() {
        let temp = TempDir::new().unwrap();
        let state = TimerState {
            org_logo: Some(real_asset(&temp, "org.png")),
            event_logo: Some(real_asset(&temp, "event.png")),
            ..Default::default()
        };

        let frame = compose(&state);
        assert_eq!(frame.org_logo.as_ref().unwrap().name, "org.png");
        assert_eq!(frame.event_logo.as_ref().unwrap().name, "event.png");
    }

    #[test]
    fn test_compose_drops_invalid_branding_silently() {
        let state = TimerState {
            org_logo: Some(BrandingAsset {
                uri: "file:///vanished/org.png".to_string(),
                name: "org.png".to_string(),
            }),
            event_logo: Some(BrandingAsset {
                uri: "not-a-uri".to_string(),
                name: "event.png".to_string(),
            }),
            ..Default::default()
        };

        let frame = compose(&state);
        assert_eq!(frame.org_logo, None);
        assert_eq!(frame.event_logo, None);
    }

    #[test]
    fn test_compose_validates_slots_independently() {
        let temp = TempDir::new().unwrap();
        let state = TimerState {
            org_logo: Some(BrandingAsset {
                uri: "file:///vanished/org.png".to_string(),
                name: "org.png".to_string(),
            }),
            event_logo: Some(real_asset(&temp, "event.png")),
            ..Default::default()
        };

        let frame = compose(&state);
        assert_eq!(frame.org_logo, None);
        assert!(frame.event_logo.is_some());
    }

    #[test]
    fn test_compose_matches_end_of_run_scenario() {
        let mut state = TimerState {
            time: TimerValue::new(0, 0, 5),
            is_running: true,
            ..Default::default()
        };
        for _ in 0..5 {
            state.time = state.time.decrement();
        }
        state.is_running = false;

        let frame = compose(&state);
        assert_eq!(frame.headline, "0 seconds remaining");
        assert_eq!(frame.precise, "00:00:00");
    }
}
