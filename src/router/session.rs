//! Session state the router carries between confirmed poses.
//!
//! [`CommandSession`] is owned by exactly one
//! [`CommandRouter`](crate::router::CommandRouter) and is not touched by the
//! debounce gate's cooldown.  The mark keeps its position and track URI in a
//! single `Option`, so one can never be set without the other.

use std::time::{Duration, Instant};

/// A remembered position inside a specific track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mark {
    pub position_ms: u64,
    pub track_uri: String,
}

/// Reference point for the continuous volume gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeAnchor {
    pub finger_y: f32,
    pub timestamp: Instant,
}

impl VolumeAnchor {
    /// `true` while less than `max_age` has passed between the anchor and
    /// `now`.
    pub fn is_fresh(&self, now: Instant, max_age: Duration) -> bool {
        now.saturating_duration_since(self.timestamp) < max_age
    }
}

/// Result of toggling the mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkChange {
    Set,
    Cleared,
}

#[derive(Debug, Clone, Default)]
pub struct CommandSession {
    mark: Option<Mark>,
    volume_anchor: Option<VolumeAnchor>,
}

impl CommandSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&self) -> Option<&Mark> {
        self.mark.as_ref()
    }

    pub fn marked_position(&self) -> Option<u64> {
        self.mark.as_ref().map(|m| m.position_ms)
    }

    pub fn marked_track_uri(&self) -> Option<&str> {
        self.mark.as_ref().map(|m| m.track_uri.as_str())
    }

    /// The marked position, but only if it belongs to `track_uri`.
    pub fn mark_for(&self, track_uri: Option<&str>) -> Option<u64> {
        match (&self.mark, track_uri) {
            (Some(mark), Some(uri)) if mark.track_uri == uri => Some(mark.position_ms),
            _ => None,
        }
    }

    /// Set a mark at `position_ms` on `track_uri`, or clear the existing one
    /// if it already sits on that track.
    pub fn toggle_mark(&mut self, track_uri: &str, position_ms: u64) -> MarkChange {
        match &self.mark {
            Some(mark) if mark.track_uri == track_uri => {
                self.mark = None;
                MarkChange::Cleared
            }
            _ => {
                self.mark = Some(Mark {
                    position_ms,
                    track_uri: track_uri.to_string(),
                });
                MarkChange::Set
            }
        }
    }

    pub fn volume_anchor(&self) -> Option<VolumeAnchor> {
        self.volume_anchor
    }

    /// The anchor if it is younger than `max_age` at `now`.
    pub fn fresh_anchor(&self, now: Instant, max_age: Duration) -> Option<VolumeAnchor> {
        self.volume_anchor.filter(|a| a.is_fresh(now, max_age))
    }

    pub fn set_anchor(&mut self, finger_y: f32, timestamp: Instant) {
        self.volume_anchor = Some(VolumeAnchor {
            finger_y,
            timestamp,
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const A: &str = "spotify:track:a";
    const B: &str = "spotify:track:b";

    #[test]
    fn new_session_is_empty() {
        let s = CommandSession::new();
        assert!(s.mark().is_none());
        assert!(s.marked_position().is_none());
        assert!(s.marked_track_uri().is_none());
        assert!(s.volume_anchor().is_none());
    }

    #[test]
    fn toggle_sets_then_clears_on_same_track() {
        let mut s = CommandSession::new();
        assert_eq!(s.toggle_mark(A, 1_000), MarkChange::Set);
        assert_eq!(s.marked_position(), Some(1_000));
        assert_eq!(s.marked_track_uri(), Some(A));

        assert_eq!(s.toggle_mark(A, 9_000), MarkChange::Cleared);
        assert!(s.mark().is_none());
    }

    #[test]
    fn toggle_on_other_track_overwrites() {
        let mut s = CommandSession::new();
        s.toggle_mark(A, 1_000);
        assert_eq!(s.toggle_mark(B, 2_000), MarkChange::Set);
        assert_eq!(
            s.mark(),
            Some(&Mark {
                position_ms: 2_000,
                track_uri: B.into()
            })
        );
    }

    #[test]
    fn mark_for_requires_matching_uri() {
        let mut s = CommandSession::new();
        s.toggle_mark(A, 5_000);
        assert_eq!(s.mark_for(Some(A)), Some(5_000));
        assert_eq!(s.mark_for(Some(B)), None);
        assert_eq!(s.mark_for(None), None);
    }

    #[test]
    fn anchor_freshness_boundary() {
        let t0 = Instant::now();
        let max_age = Duration::from_millis(2_500);
        let mut s = CommandSession::new();
        s.set_anchor(0.5, t0);

        assert!(s.fresh_anchor(t0 + Duration::from_millis(2_499), max_age).is_some());
        assert!(s.fresh_anchor(t0 + Duration::from_millis(2_500), max_age).is_none());
    }

    #[test]
    fn anchor_from_the_future_counts_as_fresh() {
        let t0 = Instant::now();
        let anchor = VolumeAnchor {
            finger_y: 0.5,
            timestamp: t0 + Duration::from_secs(1),
        };
        assert!(anchor.is_fresh(t0, Duration::from_millis(2_500)));
    }
}
