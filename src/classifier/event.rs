//! Per-frame classifier output.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::pose::Pose;

/// Number of hand landmarks reported per detection.
pub const LANDMARK_COUNT: usize = 21;

/// Landmark index of the index-finger tip (drives the volume slider).
pub const INDEX_FINGER_TIP: usize = 8;

// ---------------------------------------------------------------------------
// Landmark
// ---------------------------------------------------------------------------

/// One normalised 3D hand landmark.  `y` grows downwards in image space.
///
/// Serialised as a bare `[x, y, z]` array.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<[f32; 3]> for Landmark {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Landmark> for [f32; 3] {
    fn from(lm: Landmark) -> Self {
        [lm.x, lm.y, lm.z]
    }
}

/// The fixed-length, ordered landmark vector of one hand.
pub type Landmarks = [Landmark; LANDMARK_COUNT];

// ---------------------------------------------------------------------------
// Handedness
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

// ---------------------------------------------------------------------------
// PoseEvent
// ---------------------------------------------------------------------------

/// A single frame's classification: one hand, one pose guess.
///
/// Immutable once built; the debounce gate keeps only its confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseEvent {
    pub pose: Pose,
    /// Classifier confidence in `[0, 1]`.
    pub confidence: f32,
    pub landmarks: Landmarks,
    pub handedness: Option<Handedness>,
    pub timestamp: Instant,
}

impl PoseEvent {
    /// Build an event with no handedness information.
    pub fn new(pose: Pose, confidence: f32, landmarks: Landmarks, timestamp: Instant) -> Self {
        Self {
            pose,
            confidence,
            landmarks,
            handedness: None,
            timestamp,
        }
    }
}

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// What the classifier produced for one video frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// A hand was detected and classified.
    Hand(PoseEvent),
    /// No usable hand this frame.  Not an error; the gate treats it as idle.
    Gap { timestamp: Instant },
}

impl Frame {
    pub fn timestamp(&self) -> Instant {
        match self {
            Frame::Hand(event) => event.timestamp,
            Frame::Gap { timestamp } => *timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landmark_deserialises_from_array() {
        let lm: Landmark = serde_json::from_str("[0.1, 0.2, -0.3]").unwrap();
        assert_eq!(
            lm,
            Landmark {
                x: 0.1,
                y: 0.2,
                z: -0.3
            }
        );
        assert_eq!(serde_json::to_string(&lm).unwrap(), "[0.1,0.2,-0.3]");
    }
}
