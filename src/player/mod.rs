//! Playback-control core for KioskPlayer
//!
//! This module owns the real concurrency of the application: the player
//! handle with its ready-guarded control surface, the prepare handshake
//! between the controller thread and the notification context, the typed
//! notification router, and the controller worker thread the UI shell talks
//! to.

mod controller;
mod handle;
mod prepare;
mod router;


pub use controller::{NativePlayerFactory, PlaybackController};
pub use handle::{PlayerHandle, NOT_READY_DURATION_MS, PREPARE_TIMEOUT};
pub use prepare::{PrepareOutcome, PrepareSynchronizer};
pub use router::{compute_geometry, SCREEN_SIDE};
