//! Integration test utilities for KioskPlayer
//!
//! Provides a fixture that stands up the two-directory video library on
//! temporary storage and fast simulated-backend factories, so tests can run
//! the whole controller stack end to end without vendor hardware.

use anyhow::Result;
use kioskplayer::library::MediaLibrary;
use kioskplayer::native::{NativePlayer, SimPlayer, SimPlayerConfig, SimProbe};
use kioskplayer::player::NativePlayerFactory;
use kioskplayer::utils::config::PlaybackConfig;
use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};
use tempfile::TempDir;

static LOGGER: Lazy<()> = Lazy::new(|| {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("debug"),
    )
    .is_test(true)
    .try_init();
});

/// Test fixture: temporary internal and external video directories
pub struct TestFixture {
    pub internal_dir: TempDir,
    pub external_dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Result<Self> {
        Lazy::force(&LOGGER);
        Ok(Self {
            internal_dir: TempDir::new()?,
            external_dir: TempDir::new()?,
        })
    }

    /// Library over the fixture's directories, internal first
    pub fn library(&self) -> MediaLibrary {
        MediaLibrary::new(
            self.internal_dir.path().to_path_buf(),
            self.external_dir.path().to_path_buf(),
        )
    }

    /// Place a video file in internal storage
    pub fn add_internal_video(&self, name: &str) -> Result<PathBuf> {
        Self::write_video(self.internal_dir.path(), name)
    }

    /// Place a video file on the external card
    pub fn add_external_video(&self, name: &str) -> Result<PathBuf> {
        Self::write_video(self.external_dir.path(), name)
    }

    fn write_video(dir: &Path, name: &str) -> Result<PathBuf> {
        // Placeholder bytes; the simulated backend only checks existence
        let path = dir.join(name);
        std::fs::write(&path, b"fake_video_data")?;
        Ok(path)
    }

    /// Playback configuration pointing at the given bootstrap source
    pub fn playback_config(&self, bootstrap: &str) -> PlaybackConfig {
        PlaybackConfig {
            bootstrap_source: bootstrap.to_string(),
            ..PlaybackConfig::default()
        }
    }
}

/// Simulator tuning fast enough for tests
pub fn fast_sim_config() -> SimPlayerConfig {
    SimPlayerConfig {
        prepare_latency: Duration::from_millis(20),
        duration_ms: 60_000,
        decoded_size: Some((960, 480)),
    }
}

/// Controller factory over a fast simulator, exporting its probe through
/// the channel so the test can observe backend state
pub fn probed_sim_factory(
    config: SimPlayerConfig,
) -> (NativePlayerFactory, mpsc::Receiver<SimProbe>) {
    let (tx, rx) = mpsc::channel();
    let factory: NativePlayerFactory = Box::new(move || {
        let (player, probe) = SimPlayer::with_probe(config);
        let _ = tx.send(probe);
        Ok(Box::new(player) as Box<dyn NativePlayer>)
    });
    (factory, rx)
}

/// Poll until the condition holds or the deadline passes
pub fn wait_until(deadline: Duration, mut done: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < deadline {
        if done() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    false
}
