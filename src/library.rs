//! Media library lookup for KioskPlayer
//!
//! The kiosk plays files from two fixed directories: internal storage and an
//! optional external (SD) card. Names coming from the shell are resolved by
//! an exact filename match, scanning the internal directory first; the first
//! match wins.

use log::debug;
use std::path::{Path, PathBuf};

/// Video container formats the vendor player accepts
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "avi", "mkv", "flv", "ts", "mp4", "webm", "asf", "mpg", "mpeg", "mov", "vob", "3gp", "wmv",
    "pmp",
];

/// Fixed two-directory video library
pub struct MediaLibrary {
    // Internal storage first; resolution order is the priority order
    dirs: Vec<PathBuf>,
}

impl MediaLibrary {
    /// Build a library over the internal and external video directories
    pub fn new(internal: PathBuf, external: PathBuf) -> Self {
        Self {
            dirs: vec![internal, external],
        }
    }

    pub fn from_config(config: &crate::utils::config::LibraryConfig) -> Self {
        Self::new(
            config.video_dir.clone(),
            config.external_video_dir.clone(),
        )
    }

    /// Resolve a bare filename to its absolute path.
    ///
    /// Scans each directory linearly for a regular file with exactly this
    /// name; internal storage takes priority. Returns `None` when the name
    /// is found nowhere — the caller decides what a miss means.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        for dir in &self.dirs {
            let entries = match std::fs::read_dir(dir) {
                Ok(entries) => entries,
                Err(e) => {
                    debug!("skipping unreadable video dir {:?}: {}", dir, e);
                    continue;
                }
            };
            for entry in entries.flatten() {
                let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
                if is_file && entry.file_name().to_string_lossy() == name {
                    return Some(dir.join(name));
                }
            }
        }
        None
    }

    /// Enumerate playable files, internal storage first.
    ///
    /// Duplicated names keep their first (internal) occurrence, matching the
    /// resolution order.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for dir in &self.dirs {
            let Ok(entries) = std::fs::read_dir(dir) else {
                continue;
            };
            for entry in entries.flatten() {
                let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
                if !is_file {
                    continue;
                }
                let name = entry.file_name().to_string_lossy().into_owned();
                if Self::is_supported(&name) && !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Whether a filename carries one of the playable extensions
    pub fn is_supported(name: &str) -> bool {
        Path::new(name)
            .extension()
            .map(|ext| {
                let ext = ext.to_string_lossy().to_lowercase();
                SUPPORTED_EXTENSIONS.contains(&ext.as_str())
            })
            .unwrap_or(false)
    }
}
