//! Playback controller for KioskPlayer
//!
//! Runs a dedicated worker thread that owns the player handle for its whole
//! lifetime: the worker allocates the native player, forces the configured
//! screen mode, loads the bootstrap source, starts playback, then idles on a
//! low-frequency exit poll. UI-thread callbacks reach the same handle
//! through a shared slot and are safe to run concurrently with the worker.

use crate::library::MediaLibrary;
use crate::native::{NativePlayer, PlaybackSpeed, RotationAngle};
use crate::player::handle::{PlayerHandle, NOT_READY_DURATION_MS};
use crate::utils::config::PlaybackConfig;
use crate::utils::error::Result;
use log::{debug, error, info, warn};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Worker exit-poll period
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Factory allocating the native player on the worker thread.
///
/// Allocation failure is fatal to the controller's handle slot: the slot
/// stays empty and every operation keeps returning its default.
pub type NativePlayerFactory = Box<dyn FnOnce() -> Result<Box<dyn NativePlayer>> + Send>;

struct ControllerShared {
    handle: Mutex<Option<PlayerHandle>>,
    library: MediaLibrary,
    exit: AtomicBool,
}

/// Thread-safe playback control surface consumed by the UI shell
pub struct PlaybackController {
    shared: Arc<ControllerShared>,
    worker: Option<thread::JoinHandle<()>>,
}

impl PlaybackController {
    /// Spawn the worker thread and begin the startup sequence
    pub fn new<F>(config: PlaybackConfig, library: MediaLibrary, factory: F) -> Self
    where
        F: FnOnce() -> Result<Box<dyn NativePlayer>> + Send + 'static,
    {
        let shared = Arc::new(ControllerShared {
            handle: Mutex::new(None),
            library,
            exit: AtomicBool::new(false),
        });

        let worker_shared = Arc::clone(&shared);
        let factory: NativePlayerFactory = Box::new(factory);
        let worker = thread::Builder::new()
            .name("playback-worker".to_string())
            .spawn(move || Self::worker_main(worker_shared, config, factory))
            .expect("failed to spawn playback worker thread");

        Self {
            shared,
            worker: Some(worker),
        }
    }

    fn worker_main(
        shared: Arc<ControllerShared>,
        config: PlaybackConfig,
        factory: NativePlayerFactory,
    ) {
        match factory() {
            Ok(native) => {
                let handle = PlayerHandle::create(native);
                handle.set_loop(config.loop_playback);
                handle.set_full_screen(config.full_screen);

                // Publish before the blocking load so UI callbacks observe
                // not-ready defaults instead of an empty slot
                *shared.handle.lock() = Some(handle.clone());

                match Self::resolve_source(&shared.library, &config.bootstrap_source) {
                    Some(url) => match handle.load_source(&url) {
                        Ok(()) => {
                            handle.start();
                            handle.set_volume(config.volume);
                            info!("bootstrap playback started: {}", url);
                        }
                        Err(e) => warn!("bootstrap load failed: {}", e),
                    },
                    None => warn!(
                        "bootstrap source not found in library: {}",
                        config.bootstrap_source
                    ),
                }

                // The worker performs no periodic work; state refresh is
                // driven by the shell's own timer
                while !shared.exit.load(Ordering::SeqCst) {
                    thread::sleep(EXIT_POLL_INTERVAL);
                }

                // The handle dies with this thread: take it back, then
                // reset + release
                shared.handle.lock().take();
                handle.destroy();
            }
            Err(e) => {
                error!("cannot create native player: {}", e);
                // Permanently unusable; keep the thread alive so teardown
                // ordering stays uniform
                while !shared.exit.load(Ordering::SeqCst) {
                    thread::sleep(EXIT_POLL_INTERVAL);
                }
            }
        }
    }

    /// Name-or-path resolution: absolute paths are used as-is, bare names
    /// go through the library lookup
    fn resolve_source(library: &MediaLibrary, source: &str) -> Option<String> {
        let path = Path::new(source);
        if path.is_absolute() {
            return Some(source.to_string());
        }
        library
            .resolve(source)
            .map(|p| p.to_string_lossy().into_owned())
    }

    /// Run an operation against the current handle, or return the default
    /// when no handle exists (creation failed or worker not started yet)
    fn with_handle<R>(&self, default: R, op: impl FnOnce(&PlayerHandle) -> R) -> R {
        let handle = self.shared.handle.lock().clone();
        match handle {
            Some(handle) => op(&handle),
            None => default,
        }
    }

    /// Whether a video is currently playing
    pub fn play_state(&self) -> bool {
        self.with_handle(false, |h| h.is_playing())
    }

    /// Pause the current video
    pub fn pause(&self) {
        self.with_handle((), |h| h.pause());
    }

    /// Play a named video, or resume the current one when `name` is `None`
    pub fn play(&self, name: Option<&str>) {
        match name {
            None => self.with_handle((), |h| h.start()),
            Some(name) => self.play_by_name(name),
        }
    }

    /// Resolve `name` against the library and start it.
    ///
    /// A name found in neither directory is a silent no-op toward the
    /// caller (logged here); flagged for product review, preserved as-is.
    pub fn play_by_name(&self, name: &str) {
        let Some(url) = self.shared.library.resolve(name) else {
            debug!("video not found in library: {}", name);
            return;
        };
        let url = url.to_string_lossy().into_owned();
        self.with_handle((), |h| {
            if let Err(e) = h.load_source(&url) {
                warn!("load failed for {}: {}", url, e);
            }
            // Guarded: a failed load leaves this a no-op
            h.start();
        });
    }

    /// Seek to a position given in seconds (converted to milliseconds)
    pub fn set_position(&self, seconds: u32) {
        self.with_handle((), |h| h.set_position(seconds * 1000));
    }

    /// Current position in milliseconds
    pub fn position(&self) -> u32 {
        self.with_handle(0, |h| h.position())
    }

    /// Duration in milliseconds; the not-ready sentinel keeps progress bars
    /// away from zero-length math
    pub fn duration(&self) -> u32 {
        self.with_handle(NOT_READY_DURATION_MS, |h| h.duration())
    }

    /// Current volume (vendor range 0..=40)
    pub fn volume(&self) -> i32 {
        self.with_handle(0, |h| h.volume())
    }

    /// Set volume (vendor range 0..=40)
    pub fn set_volume(&self, volume: i32) {
        self.with_handle((), |h| h.set_volume(volume));
    }

    /// Set trick-play speed from its shell index (0..=8)
    pub fn set_speed(&self, index: i32) {
        match PlaybackSpeed::from_index(index) {
            Some(speed) => self.with_handle((), |h| h.set_speed(speed)),
            None => warn!("ignoring unknown speed index {}", index),
        }
    }

    /// Set picture rotation from its shell index (0..=3)
    pub fn set_rotation(&self, index: i32) {
        match RotationAngle::from_index(index) {
            Some(rotation) => self.with_handle((), |h| h.set_rotation(rotation)),
            None => warn!("ignoring unknown rotation index {}", index),
        }
    }

    /// Switch between full-screen and centered composition
    pub fn set_full_screen(&self, full_screen: bool) {
        self.with_handle((), |h| h.set_full_screen(full_screen));
    }

    /// Ask the worker to wind down; `Drop` joins it
    pub fn request_exit(&self) {
        self.shared.exit.store(true, Ordering::SeqCst);
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        // Exit flag, then join, then the worker's own destroy: the handle
        // is never torn down under a live worker
        self.request_exit();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("playback worker panicked during shutdown");
            }
        }
    }
}
