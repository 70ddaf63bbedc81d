//! Configuration management for KioskPlayer
//!
//! This module handles loading and managing application configuration
//! from various sources including config files and environment variables.

use crate::utils::error::{KioskPlayerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Vendor volume range upper bound (0..=40)
pub const MAX_VOLUME: i32 = 40;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Media library configuration
    pub library: LibraryConfig,

    /// Playback configuration
    pub playback: PlaybackConfig,

    /// General application settings
    pub general: GeneralConfig,
}

/// Media library configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Internal-storage video directory (scanned first)
    pub video_dir: PathBuf,

    /// External-storage video directory (scanned second)
    pub external_video_dir: PathBuf,
}

/// Playback configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Source played at startup: a bare file name resolved through the
    /// library, or an absolute path used as-is
    pub bootstrap_source: String,

    /// Initial volume (0 to 40, vendor range)
    pub volume: i32,

    /// Loop playback
    pub loop_playback: bool,

    /// Start in full-screen mode
    pub full_screen: bool,
}

/// General application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            video_dir: PathBuf::from("/mnt/UDISK/video"),
            external_video_dir: PathBuf::from("/mnt/exUDISK/video"),
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            bootstrap_source: "wallpaper4.mp4".to_string(),
            volume: 20,
            loop_playback: true,
            full_screen: true,
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from various sources
    ///
    /// Configuration is loaded in the following order (later sources override earlier):
    /// 1. Default values
    /// 2. System config file (/etc/kioskplayer/config.toml on Linux)
    /// 3. User config file (~/.config/kioskplayer/config.toml on Linux)
    /// 4. Environment variables (KIOSKPLAYER_* prefix)
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Try to load system config
        if let Some(system_path) = Self::system_config_path() {
            if system_path.exists() {
                config.merge_from_file(&system_path)?;
            }
        }

        // Try to load user config
        if let Some(user_path) = Self::user_config_path() {
            if user_path.exists() {
                config.merge_from_file(&user_path)?;
            }
        }

        // Apply environment variable overrides
        config.apply_env_overrides()?;

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from an explicit file path, then apply
    /// environment overrides and validate
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::default();
        config.merge_from_file(path)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Merge configuration from a TOML file
    fn merge_from_file(&mut self, path: &Path) -> Result<()> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| KioskPlayerError::Config(format!("Failed to read config file: {}", e)))?;

        let file_config: Config = toml::from_str(&contents)
            .map_err(|e| KioskPlayerError::Config(format!("Failed to parse config file: {}", e)))?;

        *self = file_config;

        Ok(())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        // Example: KIOSKPLAYER_VIDEO_DIR=/media/video
        if let Ok(dir) = std::env::var("KIOSKPLAYER_VIDEO_DIR") {
            self.library.video_dir = PathBuf::from(dir);
        }

        if let Ok(dir) = std::env::var("KIOSKPLAYER_EXTERNAL_VIDEO_DIR") {
            self.library.external_video_dir = PathBuf::from(dir);
        }

        if let Ok(source) = std::env::var("KIOSKPLAYER_BOOTSTRAP_SOURCE") {
            self.playback.bootstrap_source = source;
        }

        if let Ok(volume) = std::env::var("KIOSKPLAYER_VOLUME") {
            self.playback.volume = volume
                .parse()
                .map_err(|_| KioskPlayerError::Config("Invalid KIOSKPLAYER_VOLUME".to_string()))?;
        }

        if let Ok(log_level) = std::env::var("KIOSKPLAYER_LOG_LEVEL") {
            self.general.log_level = log_level;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Validate volume range
        if !(0..=MAX_VOLUME).contains(&self.playback.volume) {
            return Err(KioskPlayerError::Config(format!(
                "Volume must be between 0 and {}",
                MAX_VOLUME
            )));
        }

        // Validate bootstrap source
        if self.playback.bootstrap_source.is_empty() {
            return Err(KioskPlayerError::Config(
                "Bootstrap source must not be empty".to_string(),
            ));
        }

        // Validate log level
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.general.log_level.as_str()) {
            return Err(KioskPlayerError::Config(format!(
                "Invalid log level '{}', must be one of: {:?}",
                self.general.log_level, valid_log_levels
            )));
        }

        Ok(())
    }

    /// Get system config file path
    fn system_config_path() -> Option<PathBuf> {
        #[cfg(target_os = "linux")]
        return Some(PathBuf::from("/etc/kioskplayer/config.toml"));

        #[allow(unreachable_code)]
        None
    }

    /// Get user config file path
    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("kioskplayer").join("config.toml"))
    }
}
