//! Native player seam for KioskPlayer
//!
//! This module defines the interface to the vendor hardware-accelerated
//! media player. The capability itself is opaque: decode, composition, and
//! audio routing all happen behind it. Everything above this seam talks to
//! the trait, never to a concrete backend.

mod sim;

pub use sim::{SimPlayer, SimPlayerConfig, SimProbe};

use crate::utils::error::Result;
use std::sync::Arc;

/// Callback invoked for every asynchronous player notification.
///
/// Delivered on a backend-internal context that may differ from both the UI
/// thread and the controller thread. Handlers must be fast and must not
/// block. Handlers may re-enter the control surface (the decoded-size
/// handler sets the display rectangle), so backends never invoke the sink
/// while holding internal locks, and raise such events only from their own
/// threads, never from inside a control call.
pub type NotifySink = Arc<dyn Fn(NotificationEvent) + Send + Sync>;

/// NativePlayer trait defining the vendor player control surface
pub trait NativePlayer: Send {
    /// Register the notification sink
    ///
    /// Called exactly once, before any prepare request is issued. Events
    /// raised before registration are dropped.
    fn set_notify(&mut self, sink: NotifySink);

    /// Reset the player, aborting any current session
    fn reset(&mut self) -> Result<()>;

    /// Set the media source url for the next prepare
    fn set_data_source(&mut self, url: &str) -> Result<()>;

    /// Request asynchronous preparation of the current source
    ///
    /// Completion is reported through the notification sink as
    /// [`NotificationEvent::Prepared`]; failure as a media error event.
    fn prepare_async(&mut self) -> Result<()>;

    /// Start or resume playback
    fn start(&mut self) -> Result<()>;

    /// Pause playback
    fn pause(&mut self) -> Result<()>;

    /// Seek to a position in milliseconds
    fn seek_to(&mut self, position_ms: u32) -> Result<()>;

    /// Current playback position in milliseconds
    fn position(&mut self) -> Result<u32>;

    /// Total duration of the prepared source in milliseconds
    fn duration(&mut self) -> Result<u32>;

    /// Whether the player is currently playing
    fn is_playing(&mut self) -> bool;

    /// Current volume in the vendor range 0..=40
    fn volume(&mut self) -> i32;

    /// Set volume in the vendor range 0..=40
    fn set_volume(&mut self, volume: i32) -> Result<()>;

    /// Enable or disable looping of the current source
    fn set_looping(&mut self, looping: bool) -> Result<()>;

    /// Rotate the composited picture
    fn set_rotation(&mut self, rotation: RotationAngle) -> Result<()>;

    /// Set the trick-play speed
    fn set_speed(&mut self, speed: PlaybackSpeed) -> Result<()>;

    /// Set the display rectangle decoded frames are composited into
    fn set_display_rect(&mut self, rect: DisplayGeometry) -> Result<()>;

    /// Keep (or drop) the last picture after reset
    fn set_hold_last_picture(&mut self, hold: bool) -> Result<()>;
}

/// Asynchronous player notification
///
/// A closed tagged union over the vendor message stream. Produced on the
/// backend's callback context; consumed synchronously by the notification
/// router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationEvent {
    /// The source finished preparing and the control surface is usable
    Prepared,

    /// Playback reached the end of the source
    PlaybackComplete,

    /// A previously requested seek finished
    SeekComplete,

    /// An asynchronous media error
    Error(MediaErrorKind),

    /// The current source does not support seeking
    NotSeekable,

    /// Network/source buffering began
    BufferStart,

    /// Network/source buffering ended
    BufferEnd,

    /// A video frame was decoded
    VideoFrame,

    /// An audio frame was decoded
    AudioFrame,

    /// A subtitle frame was decoded
    SubtitleFrame,

    /// Actual pixel dimensions of the source, known after prepare
    DecodedSize { width: u32, height: u32 },
}

/// Classification of asynchronous media errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaErrorKind {
    Unknown,
    Unsupported,
    Io,
}

/// Where decoded frames are composited on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl DisplayGeometry {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Trick-play speed, mirroring the vendor speed table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackSpeed {
    FastForward16,
    FastForward8,
    FastForward4,
    FastForward2,
    Normal,
    FastBackward2,
    FastBackward4,
    FastBackward8,
    FastBackward16,
}

impl PlaybackSpeed {
    /// Map the integer index used by the shell bindings (0..=8)
    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(Self::FastForward16),
            1 => Some(Self::FastForward8),
            2 => Some(Self::FastForward4),
            3 => Some(Self::FastForward2),
            4 => Some(Self::Normal),
            5 => Some(Self::FastBackward2),
            6 => Some(Self::FastBackward4),
            7 => Some(Self::FastBackward8),
            8 => Some(Self::FastBackward16),
            _ => None,
        }
    }
}

/// Picture rotation, mirroring the vendor rotation table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationAngle {
    Degree0,
    Degree90,
    Degree180,
    Degree270,
}

impl RotationAngle {
    /// Map the integer index used by the shell bindings (0..=3)
    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(Self::Degree0),
            1 => Some(Self::Degree90),
            2 => Some(Self::Degree180),
            3 => Some(Self::Degree270),
            _ => None,
        }
    }
}
