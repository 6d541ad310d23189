//! Frame loop for the gesture remote.
//!
//! This module wires classifier frames → debounce gate → command router and
//! exposes the shared status an overlay can read.
//!
//! # Architecture
//!
//! ```text
//! stdin (JSON lines)
//!        │  read_frames()        ← tokio task
//!        ▼
//! Frame (mpsc)
//!        │
//!        ▼
//! FrameLoop::run()
//!        ├─ DebounceGate::feed / feed_gap
//!        └─ CommandRouter::dispatch  → PlaybackService (awaited inline)
//!
//! SharedState (Arc<Mutex<LoopStatus>>) ←─── read by any status display
//! ```

pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::FrameLoop;
pub use state::{new_shared_state, LoopState, LoopStatus, SharedState};
