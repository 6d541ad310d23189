//! Loop status shared with whatever displays it.
//!
//! [`LoopStatus`] is the single source of truth for an overlay or status
//! line: what the gate is doing, the last pose seen, and the last command
//! message.  [`SharedState`] is `Arc<Mutex<LoopStatus>>`; the frame loop is
//! the only writer.

use std::sync::{Arc, Mutex};

use crate::classifier::Pose;

// ---------------------------------------------------------------------------
// LoopState
// ---------------------------------------------------------------------------

/// Coarse state of the frame loop.
///
/// ```text
/// Idle ──hand seen──▶ Tracking ──pose confirmed──▶ Locked
///   ▲                    │                            │
///   └──────no hand───────┘◀──────cooldown over────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    /// No hand in the last frame.
    #[default]
    Idle,
    /// A hand is in view and the gate is listening.
    Tracking,
    /// A command just ran; input is ignored until the cooldown ends.
    Locked,
}

impl LoopState {
    /// Short label for a status line.
    ///
    /// ```
    /// use gesture_remote::pipeline::LoopState;
    ///
    /// assert_eq!(LoopState::Idle.label(), "Idle");
    /// assert_eq!(LoopState::Tracking.label(), "Tracking");
    /// assert_eq!(LoopState::Locked.label(), "Cooldown");
    /// ```
    pub fn label(&self) -> &'static str {
        match self {
            LoopState::Idle => "Idle",
            LoopState::Tracking => "Tracking",
            LoopState::Locked => "Cooldown",
        }
    }
}

// ---------------------------------------------------------------------------
// LoopStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct LoopStatus {
    pub state: LoopState,

    /// Pose of the most recent hand frame, confirmed or not.
    pub last_pose: Option<Pose>,
    pub last_confidence: Option<f32>,

    /// Message from the most recent dispatched command.
    pub message: Option<String>,
    /// `true` when that command failed.
    pub message_is_error: bool,

    /// Mirrors the gate lock so an overlay can grey out.
    pub locked: bool,

    /// Frames processed since start.
    pub frames: u64,
    /// Commands dispatched since start.
    pub commands: u64,
}

impl LoopStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// One-line summary: the tracked pose and its confidence, or
    /// "Position locked" during a cooldown, followed by the last command
    /// message.
    ///
    /// ```
    /// use gesture_remote::classifier::Pose;
    /// use gesture_remote::pipeline::{LoopState, LoopStatus};
    ///
    /// let mut status = LoopStatus::new();
    /// status.state = LoopState::Tracking;
    /// status.last_pose = Some(Pose::NextTrack);
    /// status.last_confidence = Some(0.934);
    /// assert_eq!(status.status_line(), "next_track 93%");
    /// ```
    pub fn status_line(&self) -> String {
        let mut line = match (self.state, self.last_pose, self.last_confidence) {
            (LoopState::Locked, ..) => "Position locked".to_string(),
            (LoopState::Tracking, Some(pose), Some(confidence)) => {
                format!("{pose} {:.0}%", confidence * 100.0)
            }
            (state, ..) => state.label().to_string(),
        };

        if let Some(message) = &self.message {
            line.push_str(if self.message_is_error {
                " | error: "
            } else {
                " | "
            });
            line.push_str(message);
        }
        line
    }
}

// ---------------------------------------------------------------------------
// SharedState
// ---------------------------------------------------------------------------

/// Thread-safe handle to [`LoopStatus`].
///
/// Lock for a short critical section; never hold the guard across `.await`.
pub type SharedState = Arc<Mutex<LoopStatus>>;

pub fn new_shared_state() -> SharedState {
    Arc::new(Mutex::new(LoopStatus::new()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_status_is_idle_and_empty() {
        let status = LoopStatus::default();
        assert_eq!(status.state, LoopState::Idle);
        assert!(status.last_pose.is_none());
        assert!(status.message.is_none());
        assert!(!status.locked);
        assert_eq!(status.frames, 0);
    }

    #[test]
    fn status_line_shows_lock_and_failure() {
        let mut status = LoopStatus::new();
        assert_eq!(status.status_line(), "Idle");

        status.state = LoopState::Locked;
        status.locked = true;
        status.message = Some("pause_or_play: no playback device".into());
        status.message_is_error = true;
        assert_eq!(
            status.status_line(),
            "Position locked | error: pause_or_play: no playback device"
        );
    }

    #[test]
    fn shared_state_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SharedState>();
    }

    #[test]
    fn shared_state_can_be_cloned_and_mutated() {
        let state = new_shared_state();
        let state2 = Arc::clone(&state);

        state.lock().unwrap().state = LoopState::Locked;
        assert_eq!(state2.lock().unwrap().state, LoopState::Locked);
    }
}
