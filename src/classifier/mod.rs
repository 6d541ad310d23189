//! Boundary with the external hand-pose classifier.
//!
//! The classifier itself (camera, hand detector, pose model) runs outside
//! this crate.  This module defines what it hands over each frame and parses
//! its labels into the closed [`Pose`] set:
//!
//! * [`Pose`] / [`SkipDirection`] — the poses the remote understands.
//! * [`PoseEvent`] / [`Frame`] — one frame's output (hand or gap).
//! * [`PoseDecoder`] / [`read_frames`] — JSON-lines adapter for an
//!   out-of-process classifier.

pub mod event;
pub mod pose;
pub mod stream;

pub use event::{
    Frame, Handedness, Landmark, Landmarks, PoseEvent, INDEX_FINGER_TIP, LANDMARK_COUNT,
};
pub use pose::{Pose, PoseParseError, SkipDirection, MAX_SKIP_MAGNITUDE};
pub use stream::{read_frames, Classification, ClassifierError, PoseDecoder};
