//! [`PlaybackService`] over the Spotify Web API.
//!
//! All connection details (`base_url`, token, timeout) come from
//! [`PlaybackConfig`].  Obtaining the OAuth token is someone else's job: the
//! client only attaches it as a bearer header.

use async_trait::async_trait;
use reqwest::header::{CONTENT_LENGTH, RETRY_AFTER};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;

use crate::config::PlaybackConfig;

use super::service::{
    Device, Playback, PlaybackDevice, PlaybackService, ServiceError, Track,
};

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct WirePlayback {
    #[serde(default)]
    is_playing: bool,
    #[serde(default)]
    progress_ms: Option<u64>,
    #[serde(default)]
    device: Option<WireDevice>,
    #[serde(default)]
    item: Option<WireItem>,
}

#[derive(Debug, Deserialize)]
struct WireDevice {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    is_active: bool,
    #[serde(default)]
    volume_percent: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct WireItem {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireDevices {
    #[serde(default)]
    devices: Vec<WireDevice>,
}

#[derive(Debug, Deserialize)]
struct WireErrorBody {
    error: WireErrorDetail,
}

#[derive(Debug, Deserialize)]
struct WireErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    reason: Option<String>,
}

impl From<WirePlayback> for Playback {
    fn from(wire: WirePlayback) -> Self {
        let device = wire
            .device
            .map(|d| PlaybackDevice {
                id: d.id,
                volume_percent: d.volume_percent,
            })
            .unwrap_or_default();

        let item = wire.item.and_then(|item| match (item.id, item.uri) {
            (Some(id), Some(uri)) => Some(Track { id, uri }),
            _ => None,
        });

        Playback {
            is_playing: wire.is_playing,
            progress_ms: wire.progress_ms.unwrap_or(0),
            device,
            item,
        }
    }
}

/// Devices without an id cannot be targeted and are dropped.
fn devices_from_wire(wire: WireDevices) -> Vec<Device> {
    wire.devices
        .into_iter()
        .filter_map(|d| {
            Some(Device {
                id: d.id?,
                name: d.name.unwrap_or_default(),
                is_active: d.is_active,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

/// Map a non-success HTTP response to a [`ServiceError`].
///
/// ```
/// use gesture_remote::playback::{classify_error, ServiceError};
///
/// let body = r#"{"error":{"status":404,"message":"Player command failed: No active device found","reason":"NO_ACTIVE_DEVICE"}}"#;
/// assert_eq!(classify_error(404, None, body), ServiceError::NoActiveDevice);
/// assert_eq!(
///     classify_error(429, Some(3), ""),
///     ServiceError::RateLimited { retry_after_secs: Some(3) }
/// );
/// ```
pub fn classify_error(status: u16, retry_after_secs: Option<u64>, body: &str) -> ServiceError {
    let (message, reason) = match serde_json::from_str::<WireErrorBody>(body) {
        Ok(parsed) => (parsed.error.message, parsed.error.reason),
        Err(_) => (body.trim().to_string(), None),
    };

    if reason.as_deref() == Some("NO_ACTIVE_DEVICE") {
        return ServiceError::NoActiveDevice;
    }

    match status {
        401 => ServiceError::Unauthorized(message),
        404 => ServiceError::NotFound(message),
        429 => ServiceError::RateLimited { retry_after_secs },
        _ => ServiceError::Api { status, message },
    }
}

async fn error_from_response(response: Response) -> ServiceError {
    let status = response.status().as_u16();
    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok());
    let body = response.text().await.unwrap_or_default();
    classify_error(status, retry_after, &body)
}

// ---------------------------------------------------------------------------
// SpotifyClient
// ---------------------------------------------------------------------------

/// Calls the Spotify Web API player and library endpoints.
pub struct SpotifyClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl SpotifyClient {
    /// Build a client from config.
    ///
    /// The token is resolved once here (environment first, then file).  A
    /// default client is used if the builder fails.
    pub fn from_config(config: &PlaybackConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let token = config.resolve_token();
        if token.is_none() {
            log::warn!("playback: no access token configured; every call will be rejected");
        }

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// `true` when a bearer token will be attached to requests.
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/v1{}", self.base_url, path);
        let req = self.client.request(method, url);
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Player commands carry no body but the API insists on a length.
    fn command(&self, method: Method, path: &str) -> RequestBuilder {
        self.request(method, path).header(CONTENT_LENGTH, 0)
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, ServiceError> {
        let response = req.send().await?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(error_from_response(response).await)
        }
    }

    async fn execute(&self, req: RequestBuilder) -> Result<(), ServiceError> {
        self.send(req).await.map(|_| ())
    }
}

#[async_trait]
impl PlaybackService for SpotifyClient {
    async fn current_playback(&self) -> Result<Option<Playback>, ServiceError> {
        let response = self.send(self.request(Method::GET, "/me/player")).await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        let wire: WirePlayback =
            serde_json::from_str(&body).map_err(|e| ServiceError::Parse(e.to_string()))?;
        Ok(Some(wire.into()))
    }

    async fn start_playback(&self) -> Result<(), ServiceError> {
        self.execute(self.command(Method::PUT, "/me/player/play"))
            .await
    }

    async fn pause_playback(&self) -> Result<(), ServiceError> {
        self.execute(self.command(Method::PUT, "/me/player/pause"))
            .await
    }

    async fn next_track(&self) -> Result<(), ServiceError> {
        self.execute(self.command(Method::POST, "/me/player/next"))
            .await
    }

    async fn previous_track(&self) -> Result<(), ServiceError> {
        self.execute(self.command(Method::POST, "/me/player/previous"))
            .await
    }

    async fn seek(&self, position_ms: u64) -> Result<(), ServiceError> {
        let req = self
            .command(Method::PUT, "/me/player/seek")
            .query(&[("position_ms", position_ms)]);
        self.execute(req).await
    }

    async fn set_volume(&self, percent: u8) -> Result<(), ServiceError> {
        let req = self
            .command(Method::PUT, "/me/player/volume")
            .query(&[("volume_percent", percent.min(100))]);
        self.execute(req).await
    }

    async fn list_devices(&self) -> Result<Vec<Device>, ServiceError> {
        let response = self
            .send(self.request(Method::GET, "/me/player/devices"))
            .await?;
        let wire: WireDevices = response.json().await?;
        Ok(devices_from_wire(wire))
    }

    async fn transfer_playback(&self, device_id: &str) -> Result<(), ServiceError> {
        let body = serde_json::json!({ "device_ids": [device_id] });
        self.execute(self.request(Method::PUT, "/me/player").json(&body))
            .await
    }

    async fn save_track(&self, track_id: &str) -> Result<(), ServiceError> {
        let req = self
            .command(Method::PUT, "/me/tracks")
            .query(&[("ids", track_id)]);
        self.execute(req).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
