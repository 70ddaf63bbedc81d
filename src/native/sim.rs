//! Simulated native player backend
//!
//! A software stand-in for the vendor hardware player, used for desktop
//! bring-up and integration testing. It honors the same asynchronous
//! contract as the real capability: `prepare_async` returns immediately and
//! completion is reported through the notification sink from an internal
//! thread, after a configurable latency. Prepare succeeds only when the
//! source file exists; a missing source raises an IO media error and never
//! signals `Prepared`, which is exactly how a bad source presents on the
//! device.
//!
//! Locking invariant: the notification sink is never invoked while the
//! internal state lock is held. Handlers may re-enter the player (the
//! geometry handler calls `set_display_rect`), so state is copied out and
//! the guard dropped before any emit.

use crate::native::{
    DisplayGeometry, NativePlayer, NotificationEvent, NotifySink, PlaybackSpeed, RotationAngle,
};
use crate::utils::config::MAX_VOLUME;
use crate::utils::error::{KioskPlayerError, Result};
use log::{debug, trace};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Tuning knobs for the simulated backend
#[derive(Debug, Clone)]
pub struct SimPlayerConfig {
    /// Delay between `prepare_async` and the `Prepared` notification
    pub prepare_latency: Duration,

    /// Reported duration of every prepared source, in milliseconds
    pub duration_ms: u32,

    /// Decoded dimensions announced after a successful prepare, if any
    pub decoded_size: Option<(u32, u32)>,
}

impl Default for SimPlayerConfig {
    fn default() -> Self {
        Self {
            prepare_latency: Duration::from_millis(150),
            duration_ms: 30_000,
            decoded_size: Some((960, 480)),
        }
    }
}

/// Mutable simulator state, always accessed under the lock
struct SimState {
    source: Option<String>,
    prepared: bool,
    playing: bool,
    base_ms: u32,
    started_at: Option<Instant>,
    volume: i32,
    looping: bool,
    rotation: RotationAngle,
    speed: PlaybackSpeed,
    display_rect: Option<DisplayGeometry>,
    hold_last_picture: bool,
    // Bumped on every reset so in-flight prepare threads discard themselves
    generation: u64,
}

impl SimState {
    fn new() -> Self {
        Self {
            source: None,
            prepared: false,
            playing: false,
            base_ms: 0,
            started_at: None,
            volume: 0,
            looping: false,
            rotation: RotationAngle::Degree0,
            speed: PlaybackSpeed::Normal,
            display_rect: None,
            hold_last_picture: true,
            generation: 0,
        }
    }

    /// Position under the lock, accounting for wall-clock progress
    fn position_ms(&self, duration_ms: u32) -> u32 {
        let elapsed = match (self.playing, self.started_at) {
            (true, Some(at)) => at.elapsed().as_millis() as u32,
            _ => 0,
        };
        let raw = self.base_ms.saturating_add(elapsed);
        if duration_ms == 0 {
            return 0;
        }
        if self.looping {
            raw % duration_ms
        } else {
            raw.min(duration_ms)
        }
    }
}

struct SimShared {
    state: Mutex<SimState>,
    notify: Mutex<Option<NotifySink>>,
    config: SimPlayerConfig,
    stop: AtomicBool,
}

impl SimShared {
    /// Deliver an event outside the state lock
    fn emit(&self, event: NotificationEvent) {
        let sink = self.notify.lock().clone();
        if let Some(sink) = sink {
            sink(event);
        } else {
            trace!("[sim] dropping {:?}: no notify sink registered", event);
        }
    }
}

/// Simulated native player
pub struct SimPlayer {
    shared: Arc<SimShared>,
    ticker: Option<thread::JoinHandle<()>>,
}

impl SimPlayer {
    /// Create a simulator with the given configuration
    pub fn new(config: SimPlayerConfig) -> Self {
        let shared = Arc::new(SimShared {
            state: Mutex::new(SimState::new()),
            notify: Mutex::new(None),
            config,
            stop: AtomicBool::new(false),
        });

        // End-of-stream watcher. Real hardware raises playback-complete from
        // its decode loop; here a low-frequency poll stands in for it.
        let ticker_shared = Arc::clone(&shared);
        let ticker = thread::Builder::new()
            .name("sim-ticker".to_string())
            .spawn(move || Self::ticker_loop(ticker_shared))
            .expect("failed to spawn sim ticker thread");

        Self {
            shared,
            ticker: Some(ticker),
        }
    }

    /// Create a simulator plus a probe for observing it from tests
    pub fn with_probe(config: SimPlayerConfig) -> (Self, SimProbe) {
        let player = Self::new(config);
        let probe = SimProbe {
            shared: Arc::clone(&player.shared),
        };
        (player, probe)
    }

    /// Boxed constructor, convenient as a controller factory
    pub fn boxed(config: SimPlayerConfig) -> Box<dyn NativePlayer> {
        Box::new(Self::new(config))
    }

    fn ticker_loop(shared: Arc<SimShared>) {
        while !shared.stop.load(Ordering::SeqCst) {
            thread::sleep(Duration::from_millis(25));

            let mut completed = false;
            {
                let mut state = shared.state.lock();
                if state.playing {
                    let pos = state.position_ms(shared.config.duration_ms);
                    if state.looping {
                        // Fold wall-clock progress back into the base so the
                        // position keeps wrapping without overflow
                        if state.base_ms != pos {
                            state.base_ms = pos;
                            state.started_at = Some(Instant::now());
                        }
                    } else if pos >= shared.config.duration_ms {
                        state.playing = false;
                        state.base_ms = shared.config.duration_ms;
                        state.started_at = None;
                        completed = true;
                    }
                }
            }
            if completed {
                shared.emit(NotificationEvent::PlaybackComplete);
            }
        }
    }

    fn prepare_worker(shared: Arc<SimShared>, generation: u64) {
        thread::sleep(shared.config.prepare_latency);

        let outcome = {
            let mut state = shared.state.lock();
            if state.generation != generation {
                // A reset raced ahead of us; this prepare belongs to a dead
                // session
                None
            } else {
                match &state.source {
                    Some(url) if Path::new(url).exists() => {
                        state.prepared = true;
                        state.base_ms = 0;
                        state.started_at = None;
                        Some(true)
                    }
                    _ => Some(false),
                }
            }
        };

        match outcome {
            Some(true) => {
                shared.emit(NotificationEvent::Prepared);
                if let Some((width, height)) = shared.config.decoded_size {
                    shared.emit(NotificationEvent::DecodedSize { width, height });
                }
            }
            Some(false) => {
                shared.emit(NotificationEvent::Error(
                    crate::native::MediaErrorKind::Io,
                ));
            }
            None => trace!("[sim] discarding prepare result for stale session"),
        }
    }
}

impl NativePlayer for SimPlayer {
    fn set_notify(&mut self, sink: NotifySink) {
        *self.shared.notify.lock() = Some(sink);
    }

    fn reset(&mut self) -> Result<()> {
        let mut state = self.shared.state.lock();
        state.generation += 1;
        state.source = None;
        state.prepared = false;
        state.playing = false;
        state.base_ms = 0;
        state.started_at = None;
        debug!("[sim] reset, generation {}", state.generation);
        Ok(())
    }

    fn set_data_source(&mut self, url: &str) -> Result<()> {
        if url.is_empty() {
            return Err(KioskPlayerError::SetSource("empty source url".to_string()));
        }
        self.shared.state.lock().source = Some(url.to_string());
        debug!("[sim] data source set: {}", url);
        Ok(())
    }

    fn prepare_async(&mut self) -> Result<()> {
        let generation = {
            let state = self.shared.state.lock();
            if state.source.is_none() {
                return Err(KioskPlayerError::Prepare("no data source set".to_string()));
            }
            state.generation
        };

        let shared = Arc::clone(&self.shared);
        thread::Builder::new()
            .name("sim-prepare".to_string())
            .spawn(move || Self::prepare_worker(shared, generation))
            .map_err(|e| KioskPlayerError::Prepare(format!("spawn prepare thread: {}", e)))?;
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        let mut state = self.shared.state.lock();
        if !state.prepared {
            return Err(KioskPlayerError::Internal(
                "start issued before prepare completed".to_string(),
            ));
        }
        if !state.playing {
            // Restarting at the end rewinds, matching hardware behavior
            if !state.looping && state.base_ms >= self.shared.config.duration_ms {
                state.base_ms = 0;
            }
            state.playing = true;
            state.started_at = Some(Instant::now());
        }
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        let mut state = self.shared.state.lock();
        if state.playing {
            state.base_ms = state.position_ms(self.shared.config.duration_ms);
            state.playing = false;
            state.started_at = None;
        }
        Ok(())
    }

    fn seek_to(&mut self, position_ms: u32) -> Result<()> {
        {
            let mut state = self.shared.state.lock();
            if !state.prepared {
                return Err(KioskPlayerError::Internal(
                    "seek issued before prepare completed".to_string(),
                ));
            }
            state.base_ms = position_ms.min(self.shared.config.duration_ms);
            if state.playing {
                state.started_at = Some(Instant::now());
            }
        }
        self.shared.emit(NotificationEvent::SeekComplete);
        Ok(())
    }

    fn position(&mut self) -> Result<u32> {
        let state = self.shared.state.lock();
        Ok(state.position_ms(self.shared.config.duration_ms))
    }

    fn duration(&mut self) -> Result<u32> {
        Ok(self.shared.config.duration_ms)
    }

    fn is_playing(&mut self) -> bool {
        self.shared.state.lock().playing
    }

    fn volume(&mut self) -> i32 {
        self.shared.state.lock().volume
    }

    fn set_volume(&mut self, volume: i32) -> Result<()> {
        self.shared.state.lock().volume = volume.clamp(0, MAX_VOLUME);
        Ok(())
    }

    fn set_looping(&mut self, looping: bool) -> Result<()> {
        self.shared.state.lock().looping = looping;
        Ok(())
    }

    fn set_rotation(&mut self, rotation: RotationAngle) -> Result<()> {
        self.shared.state.lock().rotation = rotation;
        Ok(())
    }

    fn set_speed(&mut self, speed: PlaybackSpeed) -> Result<()> {
        self.shared.state.lock().speed = speed;
        Ok(())
    }

    fn set_display_rect(&mut self, rect: DisplayGeometry) -> Result<()> {
        self.shared.state.lock().display_rect = Some(rect);
        debug!("[sim] display rect: {:?}", rect);
        Ok(())
    }

    fn set_hold_last_picture(&mut self, hold: bool) -> Result<()> {
        self.shared.state.lock().hold_last_picture = hold;
        Ok(())
    }
}

impl Drop for SimPlayer {
    fn drop(&mut self) {
        self.shared.stop.store(true, Ordering::SeqCst);
        if let Some(ticker) = self.ticker.take() {
            let _ = ticker.join();
        }
    }
}

/// Read-only view into a simulator, for assertions in tests
pub struct SimProbe {
    shared: Arc<SimShared>,
}

impl SimProbe {
    pub fn last_display_rect(&self) -> Option<DisplayGeometry> {
        self.shared.state.lock().display_rect
    }

    pub fn is_playing(&self) -> bool {
        self.shared.state.lock().playing
    }

    pub fn is_prepared(&self) -> bool {
        self.shared.state.lock().prepared
    }

    pub fn volume(&self) -> i32 {
        self.shared.state.lock().volume
    }

    pub fn looping(&self) -> bool {
        self.shared.state.lock().looping
    }

    pub fn hold_last_picture(&self) -> bool {
        self.shared.state.lock().hold_last_picture
    }

    pub fn source(&self) -> Option<String> {
        self.shared.state.lock().source.clone()
    }

    pub fn rotation(&self) -> RotationAngle {
        self.shared.state.lock().rotation
    }

    pub fn speed(&self) -> PlaybackSpeed {
        self.shared.state.lock().speed
    }
}
