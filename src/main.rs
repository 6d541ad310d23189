//! Application entry point — gesture remote.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (defaults on first run).
//! 3. Create a current-thread [`tokio`] runtime.
//! 4. Build the playback client from config.
//! 5. Spawn the stdin classifier reader feeding the frame channel.
//! 6. Run the [`FrameLoop`] until input closes or Ctrl-C.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use tokio::sync::mpsc;

use gesture_remote::{
    classifier::{read_frames, Frame, PoseDecoder},
    config::{AppConfig, AppPaths},
    pipeline::{new_shared_state, FrameLoop},
    playback::{PlaybackService, SpotifyClient},
};

/// Frames buffered between the reader and the loop while a command's round
/// trip is in flight.
const FRAME_CHANNEL_CAPACITY: usize = 256;

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("gesture remote starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    log::debug!("settings file: {}", AppPaths::new().settings_file.display());

    // 3. Runtime
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    rt.block_on(run(config));
    Ok(())
}

async fn run(config: AppConfig) {
    // 4. Playback client
    let client = SpotifyClient::from_config(&config.playback);
    if client.has_token() {
        log::info!("playback: using {}", config.playback.base_url);
    }
    let playback: Arc<dyn PlaybackService> = Arc::new(client);

    // 5. Classifier input
    let (frame_tx, frame_rx) = mpsc::channel::<Frame>(FRAME_CHANNEL_CAPACITY);
    let decoder = PoseDecoder::new(config.classifier.detect_threshold, Instant::now());
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    tokio::spawn(read_frames(stdin, decoder, frame_tx));

    // 6. Frame loop
    let state = new_shared_state();
    let frame_loop = FrameLoop::from_config(&config, playback, state);

    let frames = frame_loop.run(frame_rx);
    tokio::pin!(frames);

    tokio::select! {
        _ = &mut frames => {}
        result = tokio::signal::ctrl_c() => match result {
            Ok(()) => log::info!("interrupted, shutting down"),
            Err(e) => {
                log::error!("failed to listen for Ctrl-C ({e}); running until input closes");
                frames.await;
            }
        },
    }
}
