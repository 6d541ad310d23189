//! In-memory [`PlaybackService`] test double.
//!
//! Records every call, applies the obvious side effects to its stored
//! playback state, and returns injected failures per operation.

use std::sync::Mutex;

use async_trait::async_trait;

use super::service::{Device, Playback, PlaybackDevice, PlaybackService, ServiceError, Track};

/// One recorded call, with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CurrentPlayback,
    Start,
    Pause,
    Next,
    Previous,
    Seek(u64),
    SetVolume(u8),
    ListDevices,
    Transfer(String),
    SaveTrack(String),
}

/// Operation kind, used to target injected failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    CurrentPlayback,
    Start,
    Pause,
    Next,
    Previous,
    Seek,
    SetVolume,
    ListDevices,
    Transfer,
    SaveTrack,
}

impl Call {
    fn op(&self) -> Op {
        match self {
            Call::CurrentPlayback => Op::CurrentPlayback,
            Call::Start => Op::Start,
            Call::Pause => Op::Pause,
            Call::Next => Op::Next,
            Call::Previous => Op::Previous,
            Call::Seek(_) => Op::Seek,
            Call::SetVolume(_) => Op::SetVolume,
            Call::ListDevices => Op::ListDevices,
            Call::Transfer(_) => Op::Transfer,
            Call::SaveTrack(_) => Op::SaveTrack,
        }
    }
}

/// Build a playback snapshot for track `uri` (id = last `:` segment).
pub fn playback(uri: &str, progress_ms: u64, is_playing: bool, volume: u8) -> Playback {
    let id = uri.rsplit(':').next().unwrap_or(uri).to_string();
    Playback {
        is_playing,
        progress_ms,
        device: PlaybackDevice {
            id: Some("device-1".into()),
            volume_percent: Some(volume),
        },
        item: Some(Track {
            id,
            uri: uri.to_string(),
        }),
    }
}

pub fn device(id: &str) -> Device {
    Device {
        id: id.to_string(),
        name: format!("Device {id}"),
        is_active: false,
    }
}

#[derive(Default)]
struct MockState {
    playback: Option<Playback>,
    devices: Vec<Device>,
    calls: Vec<Call>,
    failures: Vec<(Op, ServiceError)>,
}

#[derive(Default)]
pub struct MockPlayback {
    state: Mutex<MockState>,
}

impl MockPlayback {
    /// Nothing playing, no devices.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_playback(playback: Playback) -> Self {
        let mock = Self::new();
        mock.set_playback(Some(playback));
        mock
    }

    pub fn set_playback(&self, playback: Option<Playback>) {
        self.state.lock().unwrap().playback = playback;
    }

    pub fn playback(&self) -> Option<Playback> {
        self.state.lock().unwrap().playback.clone()
    }

    pub fn set_devices(&self, devices: Vec<Device>) {
        self.state.lock().unwrap().devices = devices;
    }

    /// Make every future call of `op` fail with `error`.
    pub fn fail(&self, op: Op, error: ServiceError) {
        self.state.lock().unwrap().failures.push((op, error));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    /// Record `call`; return the injected failure for its op, if any.
    fn record(&self, call: Call) -> Result<(), ServiceError> {
        let mut st = self.state.lock().unwrap();
        let op = call.op();
        st.calls.push(call);
        match st.failures.iter().find(|(o, _)| *o == op) {
            Some((_, err)) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn update(&self, f: impl FnOnce(&mut Playback)) {
        if let Some(pb) = self.state.lock().unwrap().playback.as_mut() {
            f(pb);
        }
    }
}

#[async_trait]
impl PlaybackService for MockPlayback {
    async fn current_playback(&self) -> Result<Option<Playback>, ServiceError> {
        self.record(Call::CurrentPlayback)?;
        Ok(self.playback())
    }

    async fn start_playback(&self) -> Result<(), ServiceError> {
        self.record(Call::Start)?;
        self.update(|pb| pb.is_playing = true);
        Ok(())
    }

    async fn pause_playback(&self) -> Result<(), ServiceError> {
        self.record(Call::Pause)?;
        self.update(|pb| pb.is_playing = false);
        Ok(())
    }

    async fn next_track(&self) -> Result<(), ServiceError> {
        self.record(Call::Next)
    }

    async fn previous_track(&self) -> Result<(), ServiceError> {
        self.record(Call::Previous)
    }

    async fn seek(&self, position_ms: u64) -> Result<(), ServiceError> {
        self.record(Call::Seek(position_ms))?;
        self.update(|pb| pb.progress_ms = position_ms);
        Ok(())
    }

    async fn set_volume(&self, percent: u8) -> Result<(), ServiceError> {
        self.record(Call::SetVolume(percent))?;
        self.update(|pb| pb.device.volume_percent = Some(percent));
        Ok(())
    }

    async fn list_devices(&self) -> Result<Vec<Device>, ServiceError> {
        self.record(Call::ListDevices)?;
        Ok(self.state.lock().unwrap().devices.clone())
    }

    async fn transfer_playback(&self, device_id: &str) -> Result<(), ServiceError> {
        self.record(Call::Transfer(device_id.to_string()))?;
        let id = device_id.to_string();
        self.update(|pb| pb.device.id = Some(id));
        Ok(())
    }

    async fn save_track(&self, track_id: &str) -> Result<(), ServiceError> {
        self.record(Call::SaveTrack(track_id.to_string()))
    }
}
