//! Command router — maps confirmed poses to playback-service calls.
//!
//! This module provides:
//! * [`CommandRouter`] — executes one confirmed pose and locks the gate.
//! * [`CommandSession`] — position mark and volume anchor carried between
//!   commands.
//! * Pure helpers ([`skip_target`], [`slider_volume`], [`plan_previous`], …)
//!   holding the arithmetic behind each command.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use gesture_remote::config::AppConfig;
//! use gesture_remote::debounce::DebounceGate;
//! use gesture_remote::playback::{PlaybackService, SpotifyClient};
//! use gesture_remote::router::CommandRouter;
//!
//! # async fn example(confirmed: gesture_remote::debounce::ConfirmedPose) {
//! let config = AppConfig::default();
//! let playback: Arc<dyn PlaybackService> =
//!     Arc::new(SpotifyClient::from_config(&config.playback));
//! let mut gate = DebounceGate::new(config.debounce.clone());
//! let mut router = CommandRouter::from_config(playback, &config);
//!
//! let report = router.dispatch(&confirmed, &mut gate).await;
//! println!("{}: {}", report.pose, report.outcome.message());
//! # }
//! ```

pub mod commands;
pub mod dispatch;
pub mod session;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use commands::{
    plan_previous, previous_index, skip_target, slider_volume, step_volume, PreviousAction,
    RESTART_THRESHOLD_MS,
};
pub use dispatch::{CommandRouter, DispatchReport, Outcome};
pub use session::{CommandSession, Mark, MarkChange, VolumeAnchor};
