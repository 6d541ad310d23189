//! Pure arithmetic behind the playback commands.
//!
//! Kept free of I/O so the numbers can be checked without a service.

use crate::classifier::SkipDirection;

/// Below this progress, "previous" goes to the previous track instead of
/// restarting the current one.
pub const RESTART_THRESHOLD_MS: u64 = 6_000;

/// What the previous-track gesture should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviousAction {
    SeekToMark(u64),
    PreviousTrack,
    Restart,
}

/// Decide the previous-track behaviour.
///
/// `mark` must already be filtered to the current track.
pub fn plan_previous(mark: Option<u64>, progress_ms: u64) -> PreviousAction {
    match mark {
        Some(position) if position < progress_ms => PreviousAction::SeekToMark(position),
        _ if progress_ms < RESTART_THRESHOLD_MS => PreviousAction::PreviousTrack,
        _ => PreviousAction::Restart,
    }
}

/// Seek target for a skip of `(3 * magnitude + 0.3)` seconds, floored at 0.
///
/// ```
/// use gesture_remote::classifier::SkipDirection;
/// use gesture_remote::router::skip_target;
///
/// assert_eq!(skip_target(10_000, SkipDirection::Forward, 3), 19_300);
/// assert_eq!(skip_target(5_000, SkipDirection::Back, 2), 0);
/// ```
pub fn skip_target(progress_ms: u64, direction: SkipDirection, magnitude: u8) -> u64 {
    let offset_ms = direction.sign() * (3_000 * i64::from(magnitude) + 300);
    let target = i64::try_from(progress_ms)
        .unwrap_or(i64::MAX)
        .saturating_add(offset_ms);
    target.max(0) as u64
}

/// New volume for a slider movement from `anchor_y` to `finger_y`.
///
/// Moving the finger up (smaller `y`) raises the volume.
pub fn slider_volume(current: u8, anchor_y: f32, finger_y: f32, gain: f32) -> u8 {
    let delta = ((anchor_y - finger_y) * gain).round() as i32;
    clamp_volume(i32::from(current) + delta)
}

/// `current ± step`, clamped to `0..=100`.
pub fn step_volume(current: u8, step: u8, up: bool) -> u8 {
    let step = i32::from(step);
    clamp_volume(i32::from(current) + if up { step } else { -step })
}

fn clamp_volume(volume: i32) -> u8 {
    volume.clamp(0, 100) as u8
}

/// Index of the device before `current` in a list of `len`, wrapping.
pub fn previous_index(current: usize, len: usize) -> usize {
    debug_assert!(len > 0);
    (current + len - 1) % len
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
