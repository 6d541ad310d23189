//! Remote playback-service boundary.
//!
//! This module provides:
//! * [`PlaybackService`] — async trait the router drives.
//! * [`SpotifyClient`] — Spotify Web API implementation over `reqwest`.
//! * [`ServiceError`] — why a call failed; the router matches on it.
//! * [`Playback`], [`Device`], [`Track`] — the data the router reads.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use gesture_remote::config::AppConfig;
//! use gesture_remote::playback::{PlaybackService, SpotifyClient};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let client = SpotifyClient::from_config(&config.playback);
//!
//!     match client.current_playback().await {
//!         Ok(Some(pb)) => println!("playing: {}", pb.is_playing),
//!         Ok(None) => println!("nothing active"),
//!         Err(e) => eprintln!("{e}"),
//!     }
//! }
//! ```

pub mod service;
pub mod spotify;

#[cfg(test)]
pub mod mock;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use service::{Device, Playback, PlaybackDevice, PlaybackService, ServiceError, Track};
pub use spotify::{classify_error, SpotifyClient};
