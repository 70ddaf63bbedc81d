//! Notification routing for KioskPlayer
//!
//! Demultiplexes the native player's asynchronous event stream into typed
//! handling. Dispatch runs synchronously on whatever context the backend
//! delivers callbacks on, which may differ from both the UI thread and the
//! controller thread; every handler body is fast and non-blocking.

use crate::native::{DisplayGeometry, MediaErrorKind, NotificationEvent};
use crate::player::handle::HandleInner;
use log::{debug, info, trace, warn};
use std::sync::atomic::Ordering;
use std::sync::Weak;

/// Side length of the square kiosk viewport, in pixels
pub const SCREEN_SIDE: u32 = 480;

/// Routes notifications into handle state.
///
/// Holds a Weak reference to the handle: an event arriving after the handle
/// was destroyed upgrades to nothing and is dropped, so the notification
/// context can never touch a dead player.
pub(crate) struct NotificationRouter {
    inner: Weak<HandleInner>,
}

impl NotificationRouter {
    pub(crate) fn new(inner: Weak<HandleInner>) -> Self {
        Self { inner }
    }

    pub(crate) fn dispatch(&self, event: NotificationEvent) {
        let Some(inner) = self.inner.upgrade() else {
            debug!("dropping notification after destroy: {:?}", event);
            return;
        };

        match event {
            NotificationEvent::Prepared => {
                // Signal first: the controller thread is (or is about to be)
                // blocked on the prepare wait
                inner.prepare.signal();
                inner.ready.store(true, Ordering::SeqCst);
                info!("source prepared");
            }

            NotificationEvent::PlaybackComplete => {
                info!("playback complete");
            }

            NotificationEvent::SeekComplete => {
                debug!("seek complete");
            }

            NotificationEvent::Error(kind) => {
                // Log-only by design of the product: asynchronous media
                // errors are not propagated into controller state
                match kind {
                    MediaErrorKind::Unknown => warn!("media error: unknown"),
                    MediaErrorKind::Unsupported => warn!("media error: unsupported format"),
                    MediaErrorKind::Io => warn!("media error: io"),
                }
                warn!("opening media source failed");
            }

            NotificationEvent::NotSeekable => {
                warn!("current source is not seekable");
            }

            NotificationEvent::BufferStart => debug!("buffering started"),
            NotificationEvent::BufferEnd => debug!("buffering ended"),

            NotificationEvent::VideoFrame
            | NotificationEvent::AudioFrame
            | NotificationEvent::SubtitleFrame => {
                trace!("frame notification: {:?}", event);
            }

            NotificationEvent::DecodedSize { width, height } => {
                let full_screen = inner.full_screen.load(Ordering::SeqCst);
                let rect = compute_geometry(width, height, full_screen);
                info!(
                    "decoded size {}x{}, display rect {:?} (full screen: {})",
                    width, height, rect, full_screen
                );
                if inner.destroyed.load(Ordering::SeqCst) {
                    return;
                }
                if let Err(e) = inner.native.lock().set_display_rect(rect) {
                    warn!("set_display_rect failed: {}", e);
                }
            }
        }
    }
}

/// Where to composite a decoded frame of the given dimensions.
///
/// Full screen claims the whole square viewport. Otherwise the frame is
/// centered vertically, downscaled by a uniform integer divisor only when
/// its width exceeds the viewport.
pub fn compute_geometry(width: u32, height: u32, full_screen: bool) -> DisplayGeometry {
    if full_screen {
        return DisplayGeometry::new(0, 0, SCREEN_SIDE, SCREEN_SIDE);
    }

    let divisor = (width / SCREEN_SIDE).max(1);
    let scaled_width = width / divisor;
    let scaled_height = height / divisor;
    let y = (SCREEN_SIDE as i32 - scaled_height as i32) / 2;

    DisplayGeometry::new(0, y, scaled_width, scaled_height)
}
