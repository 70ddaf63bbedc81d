//! Player handle for KioskPlayer
//!
//! Owns one native player instance and gates its control surface behind the
//! ready flag established by the prepare handshake. The native control
//! surface is undefined before that handshake completes, so every entry
//! point short-circuits to a documented default instead of touching the
//! player; guarding each call is cheaper and safer than tracking a full
//! state machine.

use crate::native::{DisplayGeometry, NativePlayer, PlaybackSpeed, RotationAngle};
use crate::player::prepare::{PrepareOutcome, PrepareSynchronizer};
use crate::player::router::NotificationRouter;
use crate::utils::error::{KioskPlayerError, Result};
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Fixed bound on the prepare handshake
pub const PREPARE_TIMEOUT: Duration = Duration::from_millis(3000);

/// Duration reported while no source is prepared.
///
/// Non-zero so downstream progress math never divides by zero.
pub const NOT_READY_DURATION_MS: u32 = 3000;

/// Shared handle state, reachable from the controller thread, UI-thread
/// callbacks, and the notification context (through a Weak reference).
pub(crate) struct HandleInner {
    pub(crate) native: Mutex<Box<dyn NativePlayer>>,
    pub(crate) ready: AtomicBool,
    pub(crate) full_screen: AtomicBool,
    pub(crate) looping: AtomicBool,
    pub(crate) destroyed: AtomicBool,
    pub(crate) source_url: Mutex<Option<String>>,
    pub(crate) prepare: PrepareSynchronizer,
    prepare_timeout: Duration,
}

impl Drop for HandleInner {
    fn drop(&mut self) {
        // Release always follows a reset, even if destroy() was never called
        if !self.destroyed.load(Ordering::SeqCst) {
            let _ = self.native.get_mut().reset();
        }
    }
}

/// Handle to one native player instance.
///
/// Cheap to clone; all clones share the same underlying player. Created once
/// per controller worker-thread lifetime and destroyed exactly once.
#[derive(Clone)]
pub struct PlayerHandle {
    inner: Arc<HandleInner>,
}

impl PlayerHandle {
    /// Wrap an allocated native player, wiring its notification stream into
    /// the router.
    pub fn create(native: Box<dyn NativePlayer>) -> Self {
        Self::with_prepare_timeout(native, PREPARE_TIMEOUT)
    }

    /// As [`create`](Self::create) with a custom prepare timeout, for
    /// bring-up and tests. Production callers use the fixed 3000 ms bound.
    pub fn with_prepare_timeout(native: Box<dyn NativePlayer>, timeout: Duration) -> Self {
        let inner = Arc::new(HandleInner {
            native: Mutex::new(native),
            ready: AtomicBool::new(false),
            full_screen: AtomicBool::new(false),
            looping: AtomicBool::new(true),
            destroyed: AtomicBool::new(false),
            source_url: Mutex::new(None),
            prepare: PrepareSynchronizer::new(),
            prepare_timeout: timeout,
        });

        // The router holds a Weak reference: notifications delivered after
        // destruction upgrade to nothing and are dropped.
        let router = NotificationRouter::new(Arc::downgrade(&inner));
        inner
            .native
            .lock()
            .set_notify(Arc::new(move |event| router.dispatch(event)));

        Self { inner }
    }

    /// Whether the prepare handshake has completed for the current source
    pub fn is_ready(&self) -> bool {
        self.inner.ready.load(Ordering::SeqCst) && !self.inner.destroyed.load(Ordering::SeqCst)
    }

    /// Load a new source and block until it is playable.
    ///
    /// Resets any prior session, sets the data source, requests asynchronous
    /// preparation, then waits for the prepare signal with the configured
    /// timeout. On success the last picture is dropped, the loop flag is
    /// re-asserted, and the handle becomes ready. On any failure the handle
    /// stays not-ready; the caller may retry with another call later.
    pub fn load_source(&self, url: &str) -> Result<()> {
        let inner = &self.inner;
        if inner.destroyed.load(Ordering::SeqCst) {
            return Err(KioskPlayerError::Internal(
                "load_source on destroyed player".to_string(),
            ));
        }

        inner.ready.store(false, Ordering::SeqCst);
        *inner.source_url.lock() = Some(url.to_string());

        {
            let mut native = inner.native.lock();
            native.reset()?;
            native.set_data_source(url)?;
            // Arm before the prepare request so a signal racing ahead of the
            // wait is retained
            inner.prepare.arm();
            native.prepare_async()?;
        }
        debug!("preparing {}", url);

        // The single blocking point in the core; the native lock is not held
        // while waiting, so guarded reads keep returning their defaults
        match inner.prepare.wait(inner.prepare_timeout) {
            PrepareOutcome::TimedOut => {
                warn!("prepare failed, url={}", url);
                Err(KioskPlayerError::PrepareTimeout(
                    inner.prepare_timeout.as_millis() as u64,
                ))
            }
            PrepareOutcome::Signaled => {
                let mut native = inner.native.lock();
                native.set_hold_last_picture(false)?;
                native.set_looping(inner.looping.load(Ordering::SeqCst))?;
                drop(native);
                inner.ready.store(true, Ordering::SeqCst);
                info!("prepared successfully, url={}", url);
                Ok(())
            }
        }
    }

    /// Start or resume playback
    pub fn start(&self) {
        if !self.is_ready() {
            debug!("start ignored: player not ready");
            return;
        }
        if let Err(e) = self.inner.native.lock().start() {
            warn!("start failed: {}", e);
        }
    }

    /// Pause playback
    pub fn pause(&self) {
        if !self.is_ready() {
            debug!("pause ignored: player not ready");
            return;
        }
        if let Err(e) = self.inner.native.lock().pause() {
            warn!("pause failed: {}", e);
        }
    }

    /// Seek to a position in milliseconds
    pub fn set_position(&self, position_ms: u32) {
        if !self.is_ready() {
            debug!("seek ignored: player not ready");
            return;
        }
        if let Err(e) = self.inner.native.lock().seek_to(position_ms) {
            warn!("seek failed: {}", e);
        }
    }

    /// Current position in milliseconds, 0 while not ready
    pub fn position(&self) -> u32 {
        if !self.is_ready() {
            return 0;
        }
        self.inner.native.lock().position().unwrap_or(0)
    }

    /// Source duration in milliseconds, [`NOT_READY_DURATION_MS`] while not
    /// ready
    pub fn duration(&self) -> u32 {
        if !self.is_ready() {
            return NOT_READY_DURATION_MS;
        }
        self.inner
            .native
            .lock()
            .duration()
            .unwrap_or(NOT_READY_DURATION_MS)
    }

    /// Current volume in the vendor range, 0 while not ready
    pub fn volume(&self) -> i32 {
        if !self.is_ready() {
            return 0;
        }
        self.inner.native.lock().volume()
    }

    /// Set volume in the vendor range
    pub fn set_volume(&self, volume: i32) {
        if !self.is_ready() {
            debug!("set_volume ignored: player not ready");
            return;
        }
        if let Err(e) = self.inner.native.lock().set_volume(volume) {
            warn!("set_volume failed: {}", e);
        }
    }

    /// Whether the player is currently playing, false while not ready
    pub fn is_playing(&self) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.inner.native.lock().is_playing()
    }

    /// Set the trick-play speed
    pub fn set_speed(&self, speed: PlaybackSpeed) {
        if !self.is_ready() {
            debug!("set_speed ignored: player not ready");
            return;
        }
        if let Err(e) = self.inner.native.lock().set_speed(speed) {
            warn!("set_speed failed: {}", e);
        }
    }

    /// Rotate the composited picture
    pub fn set_rotation(&self, rotation: RotationAngle) {
        if !self.is_ready() {
            debug!("set_rotation ignored: player not ready");
            return;
        }
        if let Err(e) = self.inner.native.lock().set_rotation(rotation) {
            warn!("set_rotation failed: {}", e);
        }
    }

    /// Enable or disable looping.
    ///
    /// Callable at any time: the flag is instance state, re-asserted on the
    /// player after every successful prepare.
    pub fn set_loop(&self, looping: bool) {
        self.inner.looping.store(looping, Ordering::SeqCst);
        if self.inner.destroyed.load(Ordering::SeqCst) {
            return;
        }
        if let Err(e) = self.inner.native.lock().set_looping(looping) {
            warn!("set_looping failed: {}", e);
        }
    }

    /// Switch between full-screen and centered composition.
    ///
    /// Pure instance state, callable at any time; read by the
    /// decoded-size geometry handler on the next recompute.
    pub fn set_full_screen(&self, full_screen: bool) {
        self.inner.full_screen.store(full_screen, Ordering::SeqCst);
        debug!("full screen: {}", full_screen);
    }

    /// Current full-screen flag
    pub fn full_screen(&self) -> bool {
        self.inner.full_screen.load(Ordering::SeqCst)
    }

    /// Set the display rectangle directly.
    ///
    /// Callable at any time; takes effect on the next prepare when issued
    /// early.
    pub fn set_display_area(&self, rect: DisplayGeometry) {
        if self.inner.destroyed.load(Ordering::SeqCst) {
            return;
        }
        if let Err(e) = self.inner.native.lock().set_display_rect(rect) {
            warn!("set_display_rect failed: {}", e);
        }
    }

    /// Url of the current source, if one was loaded
    pub fn source_url(&self) -> Option<String> {
        self.inner.source_url.lock().clone()
    }

    /// Tear the player down: reset, then release.
    ///
    /// Idempotent; only the first call issues the reset. After destruction
    /// every operation is a no-op and late notifications are dropped.
    pub fn destroy(&self) {
        if self.inner.destroyed.swap(true, Ordering::SeqCst) {
            debug!("destroy ignored: already destroyed");
            return;
        }
        self.inner.ready.store(false, Ordering::SeqCst);
        info!("player reset");
        if let Err(e) = self.inner.native.lock().reset() {
            warn!("reset during destroy failed: {}", e);
        }
        info!("player released");
    }
}
