//! Frame loop — drives classifier frames through the gate and router.
//!
//! [`FrameLoop`] owns the [`DebounceGate`] and the [`CommandRouter`] and
//! receives [`Frame`]s over a `tokio::sync::mpsc` channel.
//!
//! # Frame flow
//!
//! ```text
//! Frame::Gap
//!   └─▶ gate.feed_gap()                       [Idle / Locked]
//!
//! Frame::Hand(event)
//!   └─▶ gate.feed(event)                      [Tracking / Locked]
//!         └─▶ confirmed → router.dispatch()   (awaited inline)
//!               └─▶ gate locked for cooldown  [Locked]
//! ```
//!
//! One frame is finished, including every playback round trip, before the
//! next one is taken from the channel.

use std::sync::{Arc, MutexGuard, PoisonError};

use tokio::sync::mpsc;

use crate::classifier::Frame;
use crate::config::AppConfig;
use crate::debounce::DebounceGate;
use crate::playback::PlaybackService;
use crate::router::{CommandRouter, DispatchReport, Outcome};

use super::state::{LoopState, LoopStatus, SharedState};

// ---------------------------------------------------------------------------
// FrameLoop
// ---------------------------------------------------------------------------

/// Sequential per-frame driver.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use gesture_remote::config::AppConfig;
/// use gesture_remote::pipeline::{new_shared_state, FrameLoop};
/// use gesture_remote::playback::SpotifyClient;
///
/// # async fn example() {
/// let config = AppConfig::default();
/// let playback = Arc::new(SpotifyClient::from_config(&config.playback));
///
/// let (frame_tx, frame_rx) = tokio::sync::mpsc::channel(64);
/// let frame_loop = FrameLoop::from_config(&config, playback, new_shared_state());
/// frame_loop.run(frame_rx).await;
/// # drop(frame_tx);
/// # }
/// ```
pub struct FrameLoop {
    gate: DebounceGate,
    router: CommandRouter,
    state: SharedState,
}

impl FrameLoop {
    pub fn new(gate: DebounceGate, router: CommandRouter, state: SharedState) -> Self {
        Self {
            gate,
            router,
            state,
        }
    }

    pub fn from_config(
        config: &AppConfig,
        playback: Arc<dyn PlaybackService>,
        state: SharedState,
    ) -> Self {
        Self::new(
            DebounceGate::new(config.debounce.clone()),
            CommandRouter::from_config(playback, config),
            state,
        )
    }

    pub fn gate(&self) -> &DebounceGate {
        &self.gate
    }

    pub fn router(&self) -> &CommandRouter {
        &self.router
    }

    // -----------------------------------------------------------------------
    // Main async loop
    // -----------------------------------------------------------------------

    /// Run until `frame_rx` is closed.
    pub async fn run(mut self, mut frame_rx: mpsc::Receiver<Frame>) {
        while let Some(frame) = frame_rx.recv().await {
            self.process_frame(frame).await;
        }

        let st = self.status();
        log::info!(
            "frame loop: input closed after {} frames, {} commands; shutting down",
            st.frames,
            st.commands
        );
    }

    /// Process one frame to completion.
    ///
    /// Returns the dispatch report when the frame confirmed a pose.
    pub async fn process_frame(&mut self, frame: Frame) -> Option<DispatchReport> {
        let event = match frame {
            Frame::Gap { .. } => {
                self.gate.feed_gap();
                let locked = self.gate.is_locked();
                self.publish(|st| {
                    st.frames += 1;
                    st.state = if locked {
                        LoopState::Locked
                    } else {
                        LoopState::Idle
                    };
                });
                return None;
            }
            Frame::Hand(event) => event,
        };

        let confirmed = self.gate.feed(&event);
        let locked = self.gate.is_locked();
        self.publish(|st| {
            st.frames += 1;
            st.last_pose = Some(event.pose);
            st.last_confidence = Some(event.confidence);
            st.state = if locked {
                LoopState::Locked
            } else {
                LoopState::Tracking
            };
        });

        let confirmed = confirmed?;
        log::info!(
            "frame loop: {} confirmed (avg {:.2})",
            confirmed.pose,
            confirmed.confidence
        );

        let report = self.router.dispatch(&confirmed, &mut self.gate).await;
        let locked = self.gate.is_locked();
        self.publish(|st| {
            st.commands += 1;
            st.message = Some(format!("{}: {}", report.pose, report.outcome.message()));
            st.message_is_error = matches!(report.outcome, Outcome::Failed(_));
            if locked {
                st.state = LoopState::Locked;
            }
        });
        Some(report)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Apply `update` to the shared status, keep `locked` in step with the
    /// gate, and emit the status line.  Lock changes are logged at info so
    /// "Position locked" shows up without debug output.
    fn publish(&self, update: impl FnOnce(&mut LoopStatus)) {
        let locked = self.gate.is_locked();
        let mut st = self.status();
        let was_locked = st.locked;
        update(&mut st);
        st.locked = locked;

        if locked != was_locked {
            log::info!("status: {}", st.status_line());
        } else {
            log::debug!("status: {}", st.status_line());
        }
    }

    /// A panic elsewhere must not stop the remote, so a poisoned lock is
    /// taken over as is.
    fn status(&self) -> MutexGuard<'_, LoopStatus> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
