//! UI shell bindings for KioskPlayer
//!
//! The GUI front-end drives playback exclusively through a fixed set of
//! named operations bound once at construction. This module builds that
//! capability object from a controller and carries the body of the shell's
//! 1000 ms refresh tick.
//!
//! Unit note, preserved from the device UI contract: `set_position` takes
//! SECONDS while `position` and `duration` report MILLISECONDS.

use crate::player::PlaybackController;
use crate::utils::format_position;
use log::info;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The fixed operation set the UI shell binds at construction
pub struct Operations {
    /// Request application exit
    pub exit: Box<dyn Fn() + Send + Sync>,

    /// Whether a video is playing
    pub play_state: Box<dyn Fn() -> bool + Send + Sync>,

    /// Pause the current video
    pub pause: Box<dyn Fn() + Send + Sync>,

    /// Play a named video, or resume when no name is given
    pub play: Box<dyn Fn(Option<&str>) + Send + Sync>,

    /// Seek to a position in seconds
    pub set_position: Box<dyn Fn(u32) + Send + Sync>,

    /// Current position in milliseconds
    pub position: Box<dyn Fn() -> u32 + Send + Sync>,

    /// Duration in milliseconds
    pub duration: Box<dyn Fn() -> u32 + Send + Sync>,

    /// Current volume (0..=40)
    pub volume: Box<dyn Fn() -> i32 + Send + Sync>,

    /// Set volume (0..=40)
    pub set_volume: Box<dyn Fn(i32) + Send + Sync>,

    /// Set trick-play speed by index (0..=8)
    pub set_speed: Box<dyn Fn(i32) + Send + Sync>,

    /// Set picture rotation by index (0..=3)
    pub set_rotation: Box<dyn Fn(i32) + Send + Sync>,

    /// Toggle full-screen composition
    pub set_full_screen: Box<dyn Fn(bool) + Send + Sync>,
}

impl Operations {
    /// Bind the operation set to a controller.
    ///
    /// `shutdown` is the application-level exit flag the bootstrap polls;
    /// the controller's own worker is wound down separately when the
    /// controller is dropped.
    pub fn bind(controller: Arc<PlaybackController>, shutdown: Arc<AtomicBool>) -> Self {
        let c = controller;
        Self {
            exit: {
                let shutdown = Arc::clone(&shutdown);
                Box::new(move || shutdown.store(true, Ordering::SeqCst))
            },
            play_state: {
                let c = Arc::clone(&c);
                Box::new(move || c.play_state())
            },
            pause: {
                let c = Arc::clone(&c);
                Box::new(move || c.pause())
            },
            play: {
                let c = Arc::clone(&c);
                Box::new(move |name| c.play(name))
            },
            set_position: {
                let c = Arc::clone(&c);
                Box::new(move |seconds| c.set_position(seconds))
            },
            position: {
                let c = Arc::clone(&c);
                Box::new(move || c.position())
            },
            duration: {
                let c = Arc::clone(&c);
                Box::new(move || c.duration())
            },
            volume: {
                let c = Arc::clone(&c);
                Box::new(move || c.volume())
            },
            set_volume: {
                let c = Arc::clone(&c);
                Box::new(move |volume| c.set_volume(volume))
            },
            set_speed: {
                let c = Arc::clone(&c);
                Box::new(move |index| c.set_speed(index))
            },
            set_rotation: {
                let c = Arc::clone(&c);
                Box::new(move |index| c.set_rotation(index))
            },
            set_full_screen: {
                let c = Arc::clone(&c);
                Box::new(move |on| c.set_full_screen(on))
            },
        }
    }

    /// Body of the shell's periodic refresh: poll the displayed state.
    ///
    /// The controller pushes nothing; everything the UI shows comes from
    /// this poll.
    pub fn refresh(&self) {
        let playing = (self.play_state)();
        let position = (self.position)();
        let duration = (self.duration)();
        info!(
            "{} {} / {} (volume {})",
            if playing { "playing" } else { "paused " },
            format_position(position),
            format_position(duration),
            (self.volume)(),
        );
    }
}
