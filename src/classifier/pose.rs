//! The closed set of poses the remote understands.
//!
//! Classifier labels are parsed into [`Pose`] once, at the boundary, so the
//! debounce gate and the router never look at strings.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Largest `N` accepted in `skipback_N` / `skipfwd_N`.
pub const MAX_SKIP_MAGNITUDE: u8 = 5;

// ---------------------------------------------------------------------------
// PoseParseError
// ---------------------------------------------------------------------------

/// A classifier label that does not name a known pose.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoseParseError {
    #[error("unknown pose label {0:?}")]
    UnknownLabel(String),

    #[error("skip magnitude out of range in {0:?} (expected 1..={MAX_SKIP_MAGNITUDE})")]
    SkipMagnitude(String),
}

// ---------------------------------------------------------------------------
// SkipDirection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipDirection {
    Back,
    Forward,
}

impl SkipDirection {
    /// `-1` for [`Back`](Self::Back), `+1` for [`Forward`](Self::Forward).
    pub fn sign(self) -> i64 {
        match self {
            SkipDirection::Back => -1,
            SkipDirection::Forward => 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Pose
// ---------------------------------------------------------------------------

/// A hand pose the classifier can report.
///
/// ```
/// use gesture_remote::classifier::{Pose, SkipDirection};
///
/// let pose: Pose = "skipfwd_3".parse().unwrap();
/// assert_eq!(pose, Pose::Skip { direction: SkipDirection::Forward, magnitude: 3 });
/// assert_eq!(pose.to_string(), "skipfwd_3");
/// assert!("wave".parse::<Pose>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pose {
    PauseOrPlay,
    ConnectCycle,
    NextTrack,
    PreviousTrack,
    /// Continuous volume control driven by the index finger height.
    VolumeSlider,
    VolumeUp,
    VolumeDown,
    /// Relative seek of `(3 * magnitude + 0.3)` seconds.
    Skip {
        direction: SkipDirection,
        magnitude: u8,
    },
    Like,
    MarkPos,
}

impl FromStr for Pose {
    type Err = PoseParseError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let pose = match label {
            "pause_or_play" => Pose::PauseOrPlay,
            "connect_cycle" => Pose::ConnectCycle,
            "next_track" => Pose::NextTrack,
            "previous_track" => Pose::PreviousTrack,
            "volume_slider" => Pose::VolumeSlider,
            "volume_up" => Pose::VolumeUp,
            "volume_down" => Pose::VolumeDown,
            "like" => Pose::Like,
            "mark_pos" => Pose::MarkPos,
            _ => return parse_skip(label),
        };
        Ok(pose)
    }
}

fn parse_skip(label: &str) -> Result<Pose, PoseParseError> {
    let (direction, digits) = if let Some(rest) = label.strip_prefix("skipback_") {
        (SkipDirection::Back, rest)
    } else if let Some(rest) = label.strip_prefix("skipfwd_") {
        (SkipDirection::Forward, rest)
    } else {
        return Err(PoseParseError::UnknownLabel(label.to_string()));
    };

    match digits.parse::<u8>() {
        Ok(magnitude) if (1..=MAX_SKIP_MAGNITUDE).contains(&magnitude) => Ok(Pose::Skip {
            direction,
            magnitude,
        }),
        _ => Err(PoseParseError::SkipMagnitude(label.to_string())),
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pose::PauseOrPlay => f.write_str("pause_or_play"),
            Pose::ConnectCycle => f.write_str("connect_cycle"),
            Pose::NextTrack => f.write_str("next_track"),
            Pose::PreviousTrack => f.write_str("previous_track"),
            Pose::VolumeSlider => f.write_str("volume_slider"),
            Pose::VolumeUp => f.write_str("volume_up"),
            Pose::VolumeDown => f.write_str("volume_down"),
            Pose::Skip {
                direction: SkipDirection::Back,
                magnitude,
            } => write!(f, "skipback_{magnitude}"),
            Pose::Skip {
                direction: SkipDirection::Forward,
                magnitude,
            } => write!(f, "skipfwd_{magnitude}"),
            Pose::Like => f.write_str("like"),
            Pose::MarkPos => f.write_str("mark_pos"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_fixed_label() {
        let cases = [
            ("pause_or_play", Pose::PauseOrPlay),
            ("connect_cycle", Pose::ConnectCycle),
            ("next_track", Pose::NextTrack),
            ("previous_track", Pose::PreviousTrack),
            ("volume_slider", Pose::VolumeSlider),
            ("volume_up", Pose::VolumeUp),
            ("volume_down", Pose::VolumeDown),
            ("like", Pose::Like),
            ("mark_pos", Pose::MarkPos),
        ];
        for (label, expected) in cases {
            assert_eq!(label.parse::<Pose>(), Ok(expected), "label {label}");
            assert_eq!(expected.to_string(), label);
        }
    }

    #[test]
    fn parses_skip_labels() {
        assert_eq!(
            "skipback_2".parse::<Pose>(),
            Ok(Pose::Skip {
                direction: SkipDirection::Back,
                magnitude: 2
            })
        );
        assert_eq!(
            "skipfwd_5".parse::<Pose>(),
            Ok(Pose::Skip {
                direction: SkipDirection::Forward,
                magnitude: 5
            })
        );
    }

    #[test]
    fn rejects_out_of_range_skip() {
        assert!(matches!(
            "skipfwd_0".parse::<Pose>(),
            Err(PoseParseError::SkipMagnitude(_))
        ));
        assert!(matches!(
            "skipback_6".parse::<Pose>(),
            Err(PoseParseError::SkipMagnitude(_))
        ));
        assert!(matches!(
            "skipback_".parse::<Pose>(),
            Err(PoseParseError::SkipMagnitude(_))
        ));
    }

    #[test]
    fn rejects_unknown_label() {
        assert_eq!(
            "mouse".parse::<Pose>(),
            Err(PoseParseError::UnknownLabel("mouse".into()))
        );
        assert!("".parse::<Pose>().is_err());
    }

    #[test]
    fn skip_sign() {
        assert_eq!(SkipDirection::Back.sign(), -1);
        assert_eq!(SkipDirection::Forward.sign(), 1);
    }
}
