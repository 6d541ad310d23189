//! JSON-lines adapter for an external pose classifier.
//!
//! The hand detector and pose model run out of process and write one JSON
//! value per video frame:
//!
//! ```text
//! {"label":"next_track","confidence":0.97,"landmarks":[[0.5,0.6,0.0], …21 entries],
//!  "handedness":"Right","detection_confidence":0.98,"timestamp_ms":1234}
//! null                      ← no hand this frame
//! ```
//!
//! [`PoseDecoder`] turns each line into a [`Frame`]; [`read_frames`] pumps a
//! whole stream into the frame loop's channel.  Bad lines never stop the
//! stream: they are logged and delivered as gaps so the lock countdown keeps
//! advancing.

use std::time::{Duration, Instant};

use serde::Deserialize;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use super::event::{Frame, Handedness, Landmarks, PoseEvent};
use super::pose::{Pose, PoseParseError};

// ---------------------------------------------------------------------------
// ClassifierError
// ---------------------------------------------------------------------------

/// Errors decoding classifier output.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("malformed classifier line: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Pose(#[from] PoseParseError),

    #[error("confidence {0} outside [0, 1]")]
    Confidence(f32),
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Wire shape of one classified hand.
#[derive(Debug, Clone, Deserialize)]
pub struct Classification {
    pub label: String,
    pub confidence: f32,
    pub landmarks: Landmarks,
    #[serde(default)]
    pub handedness: Option<Handedness>,
    /// Hand-detector confidence, when the producer reports it.
    #[serde(default)]
    pub detection_confidence: Option<f32>,
    /// Milliseconds since the producer started.  Arrival time is used when
    /// absent.
    #[serde(default)]
    pub timestamp_ms: Option<u64>,
}

// ---------------------------------------------------------------------------
// PoseDecoder
// ---------------------------------------------------------------------------

/// Stateless line decoder bound to a detection threshold and a clock origin.
#[derive(Debug, Clone)]
pub struct PoseDecoder {
    detect_threshold: f32,
    origin: Instant,
}

impl PoseDecoder {
    /// `origin` anchors producer-relative `timestamp_ms` values.
    pub fn new(detect_threshold: f32, origin: Instant) -> Self {
        Self {
            detect_threshold,
            origin,
        }
    }

    /// Decode one line received at `arrived`.
    ///
    /// `null`, `{}` and blank lines are gaps.  So is a hand whose detection
    /// confidence is below the threshold.
    pub fn decode(&self, line: &str, arrived: Instant) -> Result<Frame, ClassifierError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Frame::Gap { timestamp: arrived });
        }

        let value: serde_json::Value = serde_json::from_str(line)?;
        let is_empty = match &value {
            serde_json::Value::Null => true,
            serde_json::Value::Object(map) => map.is_empty(),
            _ => false,
        };
        if is_empty {
            return Ok(Frame::Gap { timestamp: arrived });
        }

        let classification: Classification = serde_json::from_value(value)?;
        let timestamp = classification
            .timestamp_ms
            .map(|ms| self.origin + Duration::from_millis(ms))
            .unwrap_or(arrived);

        if classification
            .detection_confidence
            .is_some_and(|c| c < self.detect_threshold)
        {
            return Ok(Frame::Gap { timestamp });
        }

        if !(0.0..=1.0).contains(&classification.confidence) {
            return Err(ClassifierError::Confidence(classification.confidence));
        }

        let pose: Pose = classification.label.parse()?;
        Ok(Frame::Hand(PoseEvent {
            pose,
            confidence: classification.confidence,
            landmarks: classification.landmarks,
            handedness: classification.handedness,
            timestamp,
        }))
    }
}

// ---------------------------------------------------------------------------
// read_frames
// ---------------------------------------------------------------------------

/// Read `reader` line by line and forward every decoded frame to `tx`.
///
/// Returns when the reader hits EOF, a read fails, or the receiver is gone.
pub async fn read_frames<R>(reader: R, decoder: PoseDecoder, tx: mpsc::Sender<Frame>)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                log::error!("classifier: read failed: {e}");
                break;
            }
        };

        let arrived = Instant::now();
        let frame = decoder.decode(&line, arrived).unwrap_or_else(|e| {
            log::debug!("classifier: {e}; treating frame as gap");
            Frame::Gap { timestamp: arrived }
        });

        if tx.send(frame).await.is_err() {
            break;
        }
    }

    log::info!("classifier: input stream closed");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
