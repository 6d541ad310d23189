//! The debounce gate: raw per-frame poses in, at most one confirmed pose per
//! cooldown out.
//!
//! # State machine
//!
//! ```text
//! Listening ──window full & avg > threshold──▶ (confirm, stay Listening)
//! Listening ──lock(C, rearm), C > 0─────────▶ Locked { remaining: C }
//! Locked    ──any frame─────────────────────▶ Locked { remaining - 1 }
//! Locked    ──remaining hits 0──────────────▶ Listening (same frame is fed)
//! ```
//!
//! The gate never locks itself.  The router calls [`DebounceGate::lock`]
//! after each dispatch because the cooldown length depends on the command.

use std::time::Instant;

use crate::classifier::{Landmarks, Pose, PoseEvent, INDEX_FINGER_TIP};
use crate::config::DebounceConfig;

use super::window::ConfidenceWindow;

// ---------------------------------------------------------------------------
// GateMode / Rearm
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateMode {
    Listening,
    Locked { remaining: u32 },
}

/// Window size to use once a cooldown expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rearm {
    /// Short `frames_in_action` window: the user is actively gesturing.
    InAction,
    /// Long `frames_out` window used when arming from idle.
    Idle,
}

// ---------------------------------------------------------------------------
// ConfirmedPose
// ---------------------------------------------------------------------------

/// A pose the gate has accepted as intentional.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmedPose {
    pub pose: Pose,
    /// Window average at the moment of confirmation.
    pub confidence: f32,
    /// Landmarks of the confirming frame.
    pub landmarks: Landmarks,
    pub timestamp: Instant,
}

impl ConfirmedPose {
    /// Vertical position of the index-finger tip, which drives the volume
    /// slider.
    pub fn index_finger_y(&self) -> f32 {
        self.landmarks[INDEX_FINGER_TIP].y
    }
}

// ---------------------------------------------------------------------------
// DebounceGate
// ---------------------------------------------------------------------------

pub struct DebounceGate {
    config: DebounceConfig,
    mode: GateMode,
    window: ConfidenceWindow,
    /// Consecutive hand-less frames while listening.
    idle_frames: u32,
}

impl DebounceGate {
    /// A listening gate armed with the idle (`frames_out`) window.
    pub fn new(config: DebounceConfig) -> Self {
        let window = ConfidenceWindow::new(config.frames_out);
        Self {
            config,
            mode: GateMode::Listening,
            window,
            idle_frames: 0,
        }
    }

    /// Feed one classified frame.
    ///
    /// Returns the confirmed pose when this frame completes a window whose
    /// average confidence exceeds the threshold; the window is then cleared.
    pub fn feed(&mut self, event: &PoseEvent) -> Option<ConfirmedPose> {
        if self.count_down() {
            return None;
        }

        self.idle_frames = 0;
        self.window.push(event.pose, event.confidence);

        if !self.window.is_full() {
            return None;
        }

        let average = self.window.average();
        log::trace!(
            "gate: {} window avg {average:.3} over {} frames",
            event.pose,
            self.window.len()
        );
        if average <= self.config.confirm_threshold {
            return None;
        }

        self.window.clear();
        log::debug!("gate: confirmed {} (avg {average:.2})", event.pose);
        Some(ConfirmedPose {
            pose: event.pose,
            confidence: average,
            landmarks: event.landmarks,
            timestamp: event.timestamp,
        })
    }

    /// Feed a frame in which no hand was detected.
    ///
    /// Advances the lock countdown like [`feed`](Self::feed).  While
    /// listening, `idle_reset_frames` consecutive gaps restore the idle
    /// window and drop any partial history.
    pub fn feed_gap(&mut self) {
        if self.count_down() {
            return;
        }

        self.idle_frames = self.idle_frames.saturating_add(1);
        if self.idle_frames == self.config.idle_reset_frames {
            log::debug!("gate: idle for {} frames, re-arming", self.idle_frames);
            self.window.clear();
            self.window.set_capacity(self.config.frames_out);
        }
    }

    /// Ignore the next `cooldown_frames` frames, then listen with the window
    /// selected by `rearm`.
    ///
    /// Calling it while already locked restarts the countdown.  A zero
    /// cooldown leaves the gate listening.
    pub fn lock(&mut self, cooldown_frames: u32, rearm: Rearm) {
        self.window.clear();
        self.window.set_capacity(match rearm {
            Rearm::InAction => self.config.frames_in_action,
            Rearm::Idle => self.config.frames_out,
        });
        self.idle_frames = 0;
        self.mode = if cooldown_frames == 0 {
            GateMode::Listening
        } else {
            GateMode::Locked {
                remaining: cooldown_frames,
            }
        };
        log::debug!("gate: locked for {cooldown_frames} frames ({rearm:?})");
    }

    /// `true` while input is being ignored.
    pub fn is_locked(&self) -> bool {
        matches!(self.mode, GateMode::Locked { .. })
    }

    pub fn mode(&self) -> GateMode {
        self.mode
    }

    /// Frames left in the current cooldown, `0` when listening.
    pub fn ignore_frames_remaining(&self) -> u32 {
        match self.mode {
            GateMode::Locked { remaining } => remaining,
            GateMode::Listening => 0,
        }
    }

    /// Capacity of the confirmation window currently in force.
    pub fn window_capacity(&self) -> usize {
        self.window.capacity()
    }

    /// Advance the cooldown by one frame.
    ///
    /// Returns `true` when this frame must be ignored.  The frame on which
    /// the countdown reaches zero is not ignored.
    fn count_down(&mut self) -> bool {
        match self.mode {
            GateMode::Listening => false,
            GateMode::Locked { remaining } if remaining <= 1 => {
                self.mode = GateMode::Listening;
                log::debug!("gate: unlocked");
                false
            }
            GateMode::Locked { remaining } => {
                self.mode = GateMode::Locked {
                    remaining: remaining - 1,
                };
                true
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{Landmark, LANDMARK_COUNT};
    use std::time::Duration;

    fn config(frames_in_action: usize, frames_out: usize) -> DebounceConfig {
        DebounceConfig {
            confirm_threshold: 0.85,
            frames_in_action,
            frames_out,
            idle_reset_frames: 5,
        }
    }

    fn event(pose: Pose, confidence: f32) -> PoseEvent {
        PoseEvent::new(
            pose,
            confidence,
            [Landmark::default(); LANDMARK_COUNT],
            Instant::now(),
        )
    }

    #[test]
    fn confirms_when_window_fills_above_threshold() {
        let mut gate = DebounceGate::new(config(2, 3));
        assert!(gate.feed(&event(Pose::Like, 0.95)).is_none());
        assert!(gate.feed(&event(Pose::Like, 0.95)).is_none());
        let confirmed = gate.feed(&event(Pose::Like, 0.95)).expect("confirmed");
        assert_eq!(confirmed.pose, Pose::Like);
        assert!((confirmed.confidence - 0.95).abs() < 1e-6);
    }

    #[test]
    fn low_average_does_not_confirm() {
        let mut gate = DebounceGate::new(config(2, 3));
        for _ in 0..10 {
            assert!(gate.feed(&event(Pose::Like, 0.6)).is_none());
        }
    }

    #[test]
    fn average_exactly_at_threshold_does_not_confirm() {
        let mut gate = DebounceGate::new(DebounceConfig {
            confirm_threshold: 0.5,
            ..config(1, 1)
        });
        assert!(gate.feed(&event(Pose::Like, 0.5)).is_none());
        assert!(gate.feed(&event(Pose::Like, 0.75)).is_some());
    }

    #[test]
    fn window_is_cleared_after_confirmation() {
        let mut gate = DebounceGate::new(config(2, 2));
        gate.feed(&event(Pose::Like, 0.9));
        assert!(gate.feed(&event(Pose::Like, 0.9)).is_some());
        // Without a lock, a fresh full window is needed again.
        assert!(gate.feed(&event(Pose::Like, 0.9)).is_none());
        assert!(gate.feed(&event(Pose::Like, 0.9)).is_some());
    }

    #[test]
    fn flickering_pose_never_confirms() {
        let mut gate = DebounceGate::new(config(2, 2));
        for i in 0..10 {
            let pose = if i % 2 == 0 { Pose::Like } else { Pose::MarkPos };
            assert!(gate.feed(&event(pose, 0.99)).is_none());
        }
    }

    #[test]
    fn cooldown_blocks_exactly_c_minus_one_frames() {
        for cooldown in 1..=25u32 {
            let mut gate = DebounceGate::new(config(1, 1));
            gate.lock(cooldown, Rearm::InAction);

            for frame in 1..cooldown {
                assert!(
                    gate.feed(&event(Pose::NextTrack, 1.0)).is_none(),
                    "cooldown {cooldown}: frame {frame} must be ignored"
                );
                assert!(gate.is_locked());
            }
            assert!(
                gate.feed(&event(Pose::NextTrack, 1.0)).is_some(),
                "cooldown {cooldown}: frame {cooldown} must confirm"
            );
            assert!(!gate.is_locked());
        }
    }

    #[test]
    fn countdown_decreases_by_one_per_frame() {
        let mut gate = DebounceGate::new(config(1, 1));
        gate.lock(4, Rearm::InAction);
        assert_eq!(gate.ignore_frames_remaining(), 4);
        gate.feed(&event(Pose::Like, 1.0));
        assert_eq!(gate.ignore_frames_remaining(), 3);
        gate.feed_gap();
        assert_eq!(gate.ignore_frames_remaining(), 2);
        gate.feed_gap();
        assert_eq!(gate.ignore_frames_remaining(), 1);
        gate.feed_gap();
        assert_eq!(gate.mode(), GateMode::Listening);
    }

    #[test]
    fn relock_restarts_countdown() {
        let mut gate = DebounceGate::new(config(1, 1));
        gate.lock(10, Rearm::InAction);
        gate.feed_gap();
        gate.feed_gap();
        gate.lock(3, Rearm::InAction);
        assert_eq!(gate.mode(), GateMode::Locked { remaining: 3 });
    }

    #[test]
    fn zero_cooldown_keeps_listening() {
        let mut gate = DebounceGate::new(config(1, 1));
        gate.lock(0, Rearm::InAction);
        assert!(!gate.is_locked());
        assert!(gate.feed(&event(Pose::Like, 1.0)).is_some());
    }

    #[test]
    fn lock_discards_partial_window() {
        let mut gate = DebounceGate::new(config(2, 2));
        gate.feed(&event(Pose::Like, 1.0));
        gate.lock(1, Rearm::InAction);
        // Unlock frame is the first sample of a fresh window.
        assert!(gate.feed(&event(Pose::Like, 1.0)).is_none());
        assert!(gate.feed(&event(Pose::Like, 1.0)).is_some());
    }

    #[test]
    fn rearm_selects_window_size() {
        let mut gate = DebounceGate::new(config(20, 40));
        assert_eq!(gate.window_capacity(), 40);
        gate.lock(5, Rearm::InAction);
        assert_eq!(gate.window_capacity(), 20);
        gate.lock(5, Rearm::Idle);
        assert_eq!(gate.window_capacity(), 40);
    }

    #[test]
    fn idle_cycle_restores_full_window() {
        let mut gate = DebounceGate::new(config(2, 4));
        gate.lock(1, Rearm::InAction);
        gate.feed_gap(); // unlock frame
        assert_eq!(gate.window_capacity(), 2);

        for _ in 0..4 {
            gate.feed_gap();
        }
        assert_eq!(gate.window_capacity(), 4);
    }

    #[test]
    fn hand_frame_resets_idle_counter() {
        let mut gate = DebounceGate::new(config(2, 4));
        gate.lock(1, Rearm::InAction);
        gate.feed_gap();
        for _ in 0..3 {
            gate.feed_gap();
        }
        gate.feed(&event(Pose::Like, 0.1));
        for _ in 0..3 {
            gate.feed_gap();
        }
        assert_eq!(gate.window_capacity(), 2);
    }

    #[test]
    fn confirmation_carries_frame_data() {
        let mut gate = DebounceGate::new(config(1, 1));
        let t = Instant::now() + Duration::from_millis(250);
        let mut landmarks = [Landmark::default(); LANDMARK_COUNT];
        landmarks[INDEX_FINGER_TIP].y = 0.3;
        let ev = PoseEvent::new(Pose::VolumeSlider, 0.9, landmarks, t);

        let confirmed = gate.feed(&ev).expect("confirmed");
        assert_eq!(confirmed.timestamp, t);
        assert_eq!(confirmed.index_finger_y(), 0.3);
    }
}
