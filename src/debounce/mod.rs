//! Debounce gate — turns a noisy per-frame pose stream into confirmed poses.
//!
//! * [`DebounceGate`] — moving-average confirmation plus an explicit,
//!   caller-driven cooldown lock.
//! * [`ConfidenceWindow`] — bounded per-pose confidence history.
//!
//! # Quick start
//!
//! ```rust
//! use std::time::Instant;
//! use gesture_remote::classifier::{Landmark, Pose, PoseEvent, LANDMARK_COUNT};
//! use gesture_remote::config::DebounceConfig;
//! use gesture_remote::debounce::{DebounceGate, Rearm};
//!
//! let mut gate = DebounceGate::new(DebounceConfig {
//!     frames_out: 3,
//!     ..DebounceConfig::default()
//! });
//! let event = PoseEvent::new(
//!     Pose::NextTrack,
//!     0.95,
//!     [Landmark::default(); LANDMARK_COUNT],
//!     Instant::now(),
//! );
//!
//! assert!(gate.feed(&event).is_none());
//! assert!(gate.feed(&event).is_none());
//! let confirmed = gate.feed(&event).expect("third frame confirms");
//! assert_eq!(confirmed.pose, Pose::NextTrack);
//!
//! gate.lock(10, Rearm::InAction);
//! assert!(gate.is_locked());
//! ```

pub mod gate;
pub mod window;

pub use gate::{ConfirmedPose, DebounceGate, GateMode, Rearm};
pub use window::ConfidenceWindow;
