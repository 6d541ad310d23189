//! [`CommandRouter`] — confirmed pose in, playback call(s) out.
//!
//! # Dispatch table
//!
//! | Pose | Behaviour | Cooldown |
//! |------|-----------|----------|
//! | `PauseOrPlay` | pause if playing, else play; wake first device when none is active | long |
//! | `ConnectCycle` | move playback to the previous device (wraps) | long |
//! | `NextTrack` | next track | track |
//! | `PreviousTrack` | seek to mark / previous track / restart | track |
//! | `VolumeSlider` | volume follows index-finger height | default |
//! | `VolumeUp` / `VolumeDown` | fixed volume step | default |
//! | `Skip` | relative seek | default |
//! | `Like` | save current track | long |
//! | `MarkPos` | set or clear the position mark | long |
//!
//! Service errors never leave [`CommandRouter::dispatch`]: they are logged
//! with the attempted action and reported as [`Outcome::Failed`].  The gate
//! is locked either way, since the gesture did happen.

use std::sync::Arc;
use std::time::Duration;

use crate::classifier::{Pose, SkipDirection};
use crate::config::{AppConfig, CooldownConfig, VolumeConfig};
use crate::debounce::{ConfirmedPose, DebounceGate, Rearm};
use crate::playback::{PlaybackService, ServiceError};

use super::commands::{
    plan_previous, previous_index, skip_target, slider_volume, step_volume, PreviousAction,
};
use super::session::{CommandSession, MarkChange};

// ---------------------------------------------------------------------------
// Outcome / DispatchReport
// ---------------------------------------------------------------------------

/// How a dispatched command ended, with a short user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done(String),
    /// Nothing to do in the current playback state.
    Skipped(String),
    Failed(String),
}

impl Outcome {
    pub fn message(&self) -> &str {
        match self {
            Outcome::Done(m) | Outcome::Skipped(m) | Outcome::Failed(m) => m,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub pose: Pose,
    /// Cooldown applied to the gate after this command.
    pub cooldown_frames: u32,
    pub outcome: Outcome,
}

// ---------------------------------------------------------------------------
// CommandRouter
// ---------------------------------------------------------------------------

pub struct CommandRouter {
    playback: Arc<dyn PlaybackService>,
    session: CommandSession,
    cooldown: CooldownConfig,
    volume: VolumeConfig,
}

impl CommandRouter {
    pub fn new(
        playback: Arc<dyn PlaybackService>,
        cooldown: CooldownConfig,
        volume: VolumeConfig,
    ) -> Self {
        Self {
            playback,
            session: CommandSession::new(),
            cooldown,
            volume,
        }
    }

    pub fn from_config(playback: Arc<dyn PlaybackService>, config: &AppConfig) -> Self {
        Self::new(playback, config.cooldown.clone(), config.volume.clone())
    }

    pub fn session(&self) -> &CommandSession {
        &self.session
    }

    /// Frames the gate ignores after `pose` has been dispatched.
    pub fn cooldown_for(&self, pose: Pose) -> u32 {
        match pose {
            Pose::PauseOrPlay | Pose::ConnectCycle | Pose::Like | Pose::MarkPos => {
                self.cooldown.long_frames
            }
            Pose::NextTrack | Pose::PreviousTrack => self.cooldown.track_frames,
            Pose::VolumeSlider | Pose::VolumeUp | Pose::VolumeDown | Pose::Skip { .. } => {
                self.cooldown.default_frames
            }
        }
    }

    /// Execute `confirmed` against the playback service, then lock `gate`
    /// for the command's cooldown.
    pub async fn dispatch(
        &mut self,
        confirmed: &ConfirmedPose,
        gate: &mut DebounceGate,
    ) -> DispatchReport {
        let pose = confirmed.pose;

        let outcome = match self.execute(confirmed).await {
            Ok(outcome) => outcome,
            Err(e) => {
                log::warn!("router: tried to {}: {e}", action(pose));
                Outcome::Failed(format!("could not {}: {e}", action(pose)))
            }
        };

        let cooldown_frames = self.cooldown_for(pose);
        gate.lock(cooldown_frames, Rearm::InAction);

        match &outcome {
            Outcome::Done(m) => log::info!("router: {pose} → {m}"),
            Outcome::Skipped(m) => log::info!("router: {pose} skipped: {m}"),
            Outcome::Failed(_) => {}
        }

        DispatchReport {
            pose,
            cooldown_frames,
            outcome,
        }
    }

    async fn execute(&mut self, confirmed: &ConfirmedPose) -> Result<Outcome, ServiceError> {
        match confirmed.pose {
            Pose::PauseOrPlay => self.pause_or_play().await,
            Pose::ConnectCycle => self.connect_cycle().await,
            Pose::NextTrack => {
                self.playback.next_track().await?;
                Ok(Outcome::Done("next track".into()))
            }
            Pose::PreviousTrack => self.previous_track().await,
            Pose::VolumeSlider => self.volume_slider(confirmed).await,
            Pose::VolumeUp => self.volume_step(true).await,
            Pose::VolumeDown => self.volume_step(false).await,
            Pose::Skip {
                direction,
                magnitude,
            } => self.skip(direction, magnitude).await,
            Pose::Like => self.like().await,
            Pose::MarkPos => self.mark_pos().await,
        }
    }

    // -----------------------------------------------------------------------
    // Handlers
    // -----------------------------------------------------------------------

    async fn pause_or_play(&self) -> Result<Outcome, ServiceError> {
        match self.toggle_playback().await {
            Err(ServiceError::NoActiveDevice) => self.wake_first_device().await,
            other => other,
        }
    }

    async fn toggle_playback(&self) -> Result<Outcome, ServiceError> {
        let playing = self
            .playback
            .current_playback()
            .await?
            .is_some_and(|pb| pb.is_playing);

        if playing {
            self.playback.pause_playback().await?;
            Ok(Outcome::Done("paused".into()))
        } else {
            self.playback.start_playback().await?;
            Ok(Outcome::Done("playing".into()))
        }
    }

    /// Recovery for "no active device": hand playback to the first device
    /// the account knows about.
    async fn wake_first_device(&self) -> Result<Outcome, ServiceError> {
        log::info!("router: no active device, looking for one");
        let devices = self.playback.list_devices().await?;

        let Some(device) = devices.first() else {
            log::warn!("router: no playback device available");
            return Ok(Outcome::Failed(
                "no playback device: open a player and sign in".into(),
            ));
        };

        self.playback.transfer_playback(&device.id).await?;
        Ok(Outcome::Done(format!("playback moved to {}", device.name)))
    }

    async fn connect_cycle(&self) -> Result<Outcome, ServiceError> {
        let current_id = self
            .playback
            .current_playback()
            .await?
            .and_then(|pb| pb.device.id);
        let devices = self.playback.list_devices().await?;

        let Some(current) = current_id
            .as_deref()
            .and_then(|id| devices.iter().position(|d| d.id == id))
        else {
            return Ok(Outcome::Skipped("current device is not in the device list".into()));
        };

        let target = &devices[previous_index(current, devices.len())];
        if target.id == devices[current].id {
            return Ok(Outcome::Skipped("no other device to switch to".into()));
        }

        self.playback.transfer_playback(&target.id).await?;
        Ok(Outcome::Done(format!("playback moved to {}", target.name)))
    }

    async fn previous_track(&self) -> Result<Outcome, ServiceError> {
        let Some(pb) = self.playback.current_playback().await? else {
            return Ok(nothing_playing());
        };

        let uri = pb.item.as_ref().map(|t| t.uri.as_str());
        match plan_previous(self.session.mark_for(uri), pb.progress_ms) {
            PreviousAction::SeekToMark(position) => {
                self.playback.seek(position).await?;
                Ok(Outcome::Done(format!("back to mark at {}", fmt_ms(position))))
            }
            PreviousAction::PreviousTrack => {
                self.playback.previous_track().await?;
                Ok(Outcome::Done("previous track".into()))
            }
            PreviousAction::Restart => {
                self.playback.seek(0).await?;
                Ok(Outcome::Done("restarted track".into()))
            }
        }
    }

    async fn volume_slider(&mut self, confirmed: &ConfirmedPose) -> Result<Outcome, ServiceError> {
        let Some(pb) = self.playback.current_playback().await? else {
            return Ok(nothing_playing());
        };

        let finger_y = confirmed.index_finger_y();
        let now = confirmed.timestamp;
        let max_age = Duration::from_millis(self.volume.anchor_timeout_ms);

        let Some(anchor) = self.session.fresh_anchor(now, max_age) else {
            self.session.set_anchor(finger_y, now);
            return Ok(Outcome::Done("volume slider engaged".into()));
        };

        let Some(current) = pb.device.volume_percent else {
            return Ok(Outcome::Skipped("device has no volume control".into()));
        };

        let target = slider_volume(current, anchor.finger_y, finger_y, self.volume.gain);
        self.playback.set_volume(target).await?;
        self.session.set_anchor(finger_y, now);
        Ok(Outcome::Done(format!("volume {target}%")))
    }

    async fn volume_step(&self, up: bool) -> Result<Outcome, ServiceError> {
        let Some(pb) = self.playback.current_playback().await? else {
            return Ok(nothing_playing());
        };
        let Some(current) = pb.device.volume_percent else {
            return Ok(Outcome::Skipped("device has no volume control".into()));
        };

        let target = step_volume(current, self.volume.step_percent, up);
        self.playback.set_volume(target).await?;
        Ok(Outcome::Done(format!("volume {target}%")))
    }

    async fn skip(&self, direction: SkipDirection, magnitude: u8) -> Result<Outcome, ServiceError> {
        let Some(pb) = self.playback.current_playback().await? else {
            return Ok(nothing_playing());
        };

        let target = skip_target(pb.progress_ms, direction, magnitude);
        self.playback.seek(target).await?;
        Ok(Outcome::Done(format!("seek to {}", fmt_ms(target))))
    }

    async fn like(&self) -> Result<Outcome, ServiceError> {
        let track = self
            .playback
            .current_playback()
            .await?
            .filter(|pb| pb.is_playing)
            .and_then(|pb| pb.item);

        let Some(track) = track else {
            return Ok(nothing_playing());
        };

        self.playback.save_track(&track.id).await?;
        Ok(Outcome::Done("saved to library".into()))
    }

    async fn mark_pos(&mut self) -> Result<Outcome, ServiceError> {
        let Some(pb) = self.playback.current_playback().await? else {
            return Ok(nothing_playing());
        };
        let Some(track) = pb.item else {
            return Ok(Outcome::Skipped("current item cannot be marked".into()));
        };

        let outcome = match self.session.toggle_mark(&track.uri, pb.progress_ms) {
            MarkChange::Set => format!("position {} marked", fmt_ms(pb.progress_ms)),
            MarkChange::Cleared => "mark cleared".to_string(),
        };
        Ok(Outcome::Done(outcome))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Verb phrase used in failure logs.
fn action(pose: Pose) -> &'static str {
    match pose {
        Pose::PauseOrPlay => "toggle playback",
        Pose::ConnectCycle => "switch device",
        Pose::NextTrack => "go to next track",
        Pose::PreviousTrack => "go to previous track",
        Pose::VolumeSlider => "set volume",
        Pose::VolumeUp => "turn the volume up",
        Pose::VolumeDown => "turn the volume down",
        Pose::Skip {
            direction: SkipDirection::Back,
            ..
        } => "skip back",
        Pose::Skip {
            direction: SkipDirection::Forward,
            ..
        } => "skip forward",
        Pose::Like => "like the current track",
        Pose::MarkPos => "mark the position",
    }
}

fn nothing_playing() -> Outcome {
    Outcome::Skipped("no active playback; start playing somewhere".into())
}

/// `m:ss.t` for log and status messages.
fn fmt_ms(ms: u64) -> String {
    format!("{}:{:02}.{}", ms / 60_000, (ms / 1_000) % 60, (ms % 1_000) / 100)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
