//! Hand-pose gesture remote for a media-playback service.
//!
//! Per-frame classifier output flows through the [`debounce`] gate, confirmed
//! poses are routed to playback commands by the [`router`], and the
//! [`pipeline`] drives the whole thing one frame at a time.

pub mod classifier;
pub mod config;
pub mod debounce;
pub mod pipeline;
pub mod playback;
pub mod router;
