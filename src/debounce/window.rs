//! Bounded moving-average window of per-frame pose confidences.
//!
//! The window belongs to a single pose at a time: a sample for a different
//! pose discards the history first, so confidences of two poses are never
//! averaged together.
//!
//! ```rust
//! use gesture_remote::classifier::Pose;
//! use gesture_remote::debounce::ConfidenceWindow;
//!
//! let mut window = ConfidenceWindow::new(3);
//! window.push(Pose::Like, 0.8);
//! window.push(Pose::Like, 0.9);
//! window.push(Pose::Like, 1.0);
//! window.push(Pose::Like, 1.0); // oldest (0.8) evicted
//! assert!(window.is_full());
//! assert!((window.average() - 0.9667).abs() < 1e-3);
//!
//! window.push(Pose::NextTrack, 0.5); // different pose → history dropped
//! assert_eq!(window.len(), 1);
//! ```

use std::collections::VecDeque;

use crate::classifier::Pose;

pub struct ConfidenceWindow {
    samples: VecDeque<f32>,
    capacity: usize,
    /// Pose the current samples belong to.
    pose: Option<Pose>,
}

impl ConfidenceWindow {
    /// Create a window holding at most `capacity` samples.
    ///
    /// A zero capacity is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            pose: None,
        }
    }

    /// Append one sample, evicting the oldest once over capacity.
    pub fn push(&mut self, pose: Pose, confidence: f32) {
        if self.pose != Some(pose) {
            self.samples.clear();
            self.pose = Some(pose);
        }

        self.samples.push_back(confidence);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Change the capacity, dropping the oldest samples if it shrinks.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Mean of the stored samples, `0.0` when empty.
    pub fn average(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f32>() / self.samples.len() as f32
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.pose = None;
    }

    pub fn pose(&self) -> Option<Pose> {
        self.pose
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` once `capacity` samples of the same pose are stored.
    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_then_evicts_oldest() {
        let mut w = ConfidenceWindow::new(2);
        w.push(Pose::Like, 0.2);
        assert!(!w.is_full());
        w.push(Pose::Like, 0.4);
        assert!(w.is_full());
        w.push(Pose::Like, 1.0);
        assert_eq!(w.len(), 2);
        assert!((w.average() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn pose_change_resets_history() {
        let mut w = ConfidenceWindow::new(4);
        w.push(Pose::Like, 0.9);
        w.push(Pose::Like, 0.9);
        w.push(Pose::MarkPos, 0.3);
        assert_eq!(w.len(), 1);
        assert_eq!(w.pose(), Some(Pose::MarkPos));
        assert!((w.average() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn shrinking_capacity_keeps_newest() {
        let mut w = ConfidenceWindow::new(4);
        for c in [0.1, 0.2, 0.3, 0.4] {
            w.push(Pose::NextTrack, c);
        }
        w.set_capacity(2);
        assert!(w.is_full());
        assert!((w.average() - 0.35).abs() < 1e-6);
    }

    #[test]
    fn empty_average_is_zero() {
        let w = ConfidenceWindow::new(3);
        assert_eq!(w.average(), 0.0);
        assert!(w.is_empty());
    }

    #[test]
    fn clear_forgets_pose() {
        let mut w = ConfidenceWindow::new(3);
        w.push(Pose::Like, 0.9);
        w.clear();
        assert!(w.is_empty());
        assert_eq!(w.pose(), None);
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let mut w = ConfidenceWindow::new(0);
        assert_eq!(w.capacity(), 1);
        w.push(Pose::Like, 0.5);
        assert!(w.is_full());
    }
}
