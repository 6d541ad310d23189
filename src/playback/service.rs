//! Core `PlaybackService` trait, its data types and `ServiceError`.

use async_trait::async_trait;
use thiserror::Error;

// ---------------------------------------------------------------------------
// ServiceError
// ---------------------------------------------------------------------------

/// Why a playback-service call failed.
///
/// The router matches on the variant to decide whether a fallback applies;
/// everything else is logged and dropped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    /// The account has no device currently able to play.
    #[error("no active playback device")]
    NoActiveDevice,

    /// Too many requests.
    #[error("rate limited (retry after {retry_after_secs:?} s)")]
    RateLimited { retry_after_secs: Option<u64> },

    /// The addressed resource (track, device, player) does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Missing or expired access token (HTTP 401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// HTTP transport or connection error.
    #[error("request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The response body could not be parsed.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Any other non-success status.
    #[error("service returned {status}: {message}")]
    Api { status: u16, message: String },
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ServiceError::Timeout
        } else if e.is_decode() {
            ServiceError::Parse(e.to_string())
        } else {
            ServiceError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// Snapshot of what is playing and where.
#[derive(Debug, Clone, PartialEq)]
pub struct Playback {
    pub is_playing: bool,
    pub progress_ms: u64,
    pub device: PlaybackDevice,
    /// `None` while nothing addressable is loaded (e.g. an ad).
    pub item: Option<Track>,
}

/// The device a [`Playback`] is running on.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaybackDevice {
    pub id: Option<String>,
    /// Not every device exposes volume control.
    pub volume_percent: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: String,
    pub uri: String,
}

/// An entry of the account's device list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub id: String,
    pub name: String,
    pub is_active: bool,
}

// ---------------------------------------------------------------------------
// PlaybackService trait
// ---------------------------------------------------------------------------

/// Remote media-playback control surface.
///
/// Implementors must be `Send + Sync` so they can be held behind an
/// `Arc<dyn PlaybackService>`.  Every call either succeeds or yields a
/// [`ServiceError`]; none of them retry.
#[async_trait]
pub trait PlaybackService: Send + Sync {
    /// Current playback state, `None` when nothing is active.
    async fn current_playback(&self) -> Result<Option<Playback>, ServiceError>;

    async fn start_playback(&self) -> Result<(), ServiceError>;

    async fn pause_playback(&self) -> Result<(), ServiceError>;

    async fn next_track(&self) -> Result<(), ServiceError>;

    async fn previous_track(&self) -> Result<(), ServiceError>;

    /// Seek within the current track.
    async fn seek(&self, position_ms: u64) -> Result<(), ServiceError>;

    /// Set the active device's volume, `percent` in `0..=100`.
    async fn set_volume(&self, percent: u8) -> Result<(), ServiceError>;

    async fn list_devices(&self) -> Result<Vec<Device>, ServiceError>;

    /// Move playback to `device_id`.
    async fn transfer_playback(&self, device_id: &str) -> Result<(), ServiceError>;

    /// Add `track_id` to the user's library.
    async fn save_track(&self, track_id: &str) -> Result<(), ServiceError>;
}

// Compile-time assertion: Box<dyn PlaybackService> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn PlaybackService>) {}
};
