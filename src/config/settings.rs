//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and handed to each
//! subsystem by value.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

/// Environment variable that overrides [`PlaybackConfig::access_token`].
pub const ACCESS_TOKEN_ENV: &str = "SPOTIFY_ACCESS_TOKEN";

// ---------------------------------------------------------------------------
// ClassifierConfig
// ---------------------------------------------------------------------------

/// Settings applied at the classifier boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Minimum hand-detection confidence (0.0 – 1.0).  Frames reporting a
    /// lower `detection_confidence` are treated as "no hand".
    pub detect_threshold: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            detect_threshold: 0.90,
        }
    }
}

// ---------------------------------------------------------------------------
// DebounceConfig
// ---------------------------------------------------------------------------

/// Moving-average confirmation settings for the debounce gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebounceConfig {
    /// Average window confidence that must be exceeded to confirm a pose.
    pub confirm_threshold: f32,
    /// Window length (frames) right after a command has fired.
    pub frames_in_action: usize,
    /// Window length (frames) when the gate is armed from idle.
    pub frames_out: usize,
    /// Consecutive hand-less frames after which the gate falls back to the
    /// `frames_out` window.
    pub idle_reset_frames: u32,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            confirm_threshold: 0.85,
            frames_in_action: 20,
            frames_out: 40,
            idle_reset_frames: 40,
        }
    }
}

// ---------------------------------------------------------------------------
// CooldownConfig
// ---------------------------------------------------------------------------

/// Number of frames the gate ignores after each class of command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CooldownConfig {
    /// Continuous and seek gestures (volume slider, skips, volume steps).
    pub default_frames: u32,
    /// Track navigation (next / previous).
    pub track_frames: u32,
    /// Play/pause, device cycling, like and mark. Re-triggering these
    /// would undo them.
    pub long_frames: u32,
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self {
            default_frames: 5,
            track_frames: 10,
            long_frames: 20,
        }
    }
}

// ---------------------------------------------------------------------------
// VolumeConfig
// ---------------------------------------------------------------------------

/// Volume gesture tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeConfig {
    /// Volume points per unit of normalised finger travel.
    pub gain: f32,
    /// Age in milliseconds after which a slider anchor is stale.
    pub anchor_timeout_ms: u64,
    /// Step applied by the discrete volume-up / volume-down poses.
    pub step_percent: u8,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            gain: 200.0,
            anchor_timeout_ms: 2_500,
            step_percent: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// PlaybackConfig
// ---------------------------------------------------------------------------

/// Connection settings for the remote playback service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Base URL of the Web API (no trailing slash).
    pub base_url: String,
    /// OAuth bearer token.  Acquiring it is left to an external tool; the
    /// `SPOTIFY_ACCESS_TOKEN` environment variable takes precedence.
    pub access_token: Option<String>,
    /// Maximum seconds to wait for any single API call.
    pub timeout_secs: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.spotify.com".into(),
            access_token: None,
            timeout_secs: 10,
        }
    }
}

impl PlaybackConfig {
    /// The token to send, preferring the environment over the file.
    ///
    /// Empty strings count as "not set".
    pub fn resolve_token(&self) -> Option<String> {
        std::env::var(ACCESS_TOKEN_ENV)
            .ok()
            .filter(|t| !t.is_empty())
            .or_else(|| self.access_token.clone().filter(|t| !t.is_empty()))
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use gesture_remote::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Classifier boundary settings.
    pub classifier: ClassifierConfig,
    /// Debounce gate settings.
    pub debounce: DebounceConfig,
    /// Per-command cooldowns.
    pub cooldown: CooldownConfig,
    /// Volume gesture settings.
    pub volume: VolumeConfig,
    /// Playback service connection.
    pub playback: PlaybackConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
