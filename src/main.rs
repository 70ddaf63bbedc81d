use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::{debug, info};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use kioskplayer::library::MediaLibrary;
use kioskplayer::native::{SimPlayer, SimPlayerConfig};
use kioskplayer::player::PlaybackController;
use kioskplayer::shell::Operations;
use kioskplayer::utils::Config;

/// KioskPlayer - playback control for an embedded kiosk video player
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Video to play at startup: a name in the library or an absolute path
    #[arg(value_name = "SOURCE")]
    source: Option<String>,

    /// Set initial volume (0-40)
    #[arg(short, long, value_name = "VOLUME")]
    volume: Option<i32>,

    /// Start with centered composition instead of full screen
    #[arg(long)]
    windowed: bool,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration, then apply CLI overrides
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(source) = &args.source {
        config.playback.bootstrap_source = source.clone();
    }
    if let Some(volume) = args.volume {
        config.playback.volume = volume;
    }
    if args.windowed {
        config.playback.full_screen = false;
    }
    config.validate()?;

    // Initialize logging
    let log_level = if args.debug {
        "debug"
    } else {
        config.general.log_level.as_str()
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    info!("Starting KioskPlayer v{}", env!("CARGO_PKG_VERSION"));

    let library = MediaLibrary::from_config(&config.library);
    for name in library.list() {
        debug!("library: {}", name);
    }

    // The simulated backend stands in for the vendor player off-device
    let controller = Arc::new(PlaybackController::new(
        config.playback.clone(),
        library,
        || Ok(SimPlayer::boxed(SimPlayerConfig::default())),
    ));

    // Bind the shell operation set once, then drive the refresh tick the UI
    // timer would normally own
    let shutdown = Arc::new(AtomicBool::new(false));
    let operations = Operations::bind(Arc::clone(&controller), Arc::clone(&shutdown));

    let mut refresh = tokio::time::interval(tokio::time::Duration::from_millis(1000));
    loop {
        tokio::select! {
            _ = refresh.tick() => {
                operations.refresh();
                if shutdown.load(Ordering::SeqCst) {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown requested");
                (operations.exit)();
            }
        }
    }

    // Teardown order: drop the bindings, then the controller (exit flag,
    // join, handle destroy); the refresh timer dies with this scope
    drop(operations);
    drop(controller);
    info!("KioskPlayer stopped");

    Ok(())
}
