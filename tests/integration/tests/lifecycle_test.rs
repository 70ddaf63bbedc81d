//! Lifecycle and failure-path tests for the KioskPlayer controller
//!
//! Covers the prepare timeout, recovery by retrying the load, and teardown
//! ordering. A few of these wait out the real 3 second prepare bound.

use anyhow::Result;
use kioskplayer::player::{PlaybackController, NOT_READY_DURATION_MS};
use kioskplayer_integration_tests::{
    fast_sim_config, probed_sim_factory, wait_until, TestFixture,
};
use std::time::{Duration, Instant};

#[test]
fn test_missing_bootstrap_times_out_and_stays_not_ready() -> Result<()> {
    let fixture = TestFixture::new()?;
    // No file is created: the simulator never signals Prepared

    let (factory, probe_rx) = probed_sim_factory(fast_sim_config());
    let config = kioskplayer::utils::config::PlaybackConfig {
        bootstrap_source: fixture
            .internal_dir
            .path()
            .join("missing.mp4")
            .to_string_lossy()
            .into_owned(),
        ..Default::default()
    };
    let start = Instant::now();
    let controller = PlaybackController::new(config, fixture.library(), factory);
    let probe = probe_rx.recv_timeout(Duration::from_secs(2))?;

    // The load fails after the 3 s prepare bound, not indefinitely
    assert!(wait_until(Duration::from_secs(5), || !probe.is_prepared()
        && probe.source().is_some()));
    std::thread::sleep(Duration::from_secs(4).saturating_sub(start.elapsed()));

    assert!(!probe.is_prepared());
    assert!(!controller.play_state());
    assert_eq!(controller.position(), 0);
    assert_eq!(controller.duration(), NOT_READY_DURATION_MS);

    // Guarded operations stay no-ops against the unprepared backend
    controller.set_position(5);
    controller.set_volume(10);
    assert!(!probe.is_playing());
    assert_eq!(probe.volume(), 0);

    Ok(())
}

#[test]
fn test_failed_load_recovers_on_next_request() -> Result<()> {
    let fixture = TestFixture::new()?;
    fixture.add_internal_video("real.mp4")?;

    // Bootstrap misses, then a later play-by-name resolves and plays
    let (factory, _probe_rx) = probed_sim_factory(fast_sim_config());
    let controller = PlaybackController::new(
        fixture.playback_config("not-there.mp4"),
        fixture.library(),
        factory,
    );

    std::thread::sleep(Duration::from_millis(200));
    assert!(!controller.play_state());

    controller.play(Some("real.mp4"));
    assert!(wait_until(Duration::from_secs(2), || controller.play_state()));

    Ok(())
}

#[test]
fn test_teardown_while_worker_waits_on_prepare() -> Result<()> {
    let fixture = TestFixture::new()?;
    // Missing bootstrap: the worker blocks the full prepare timeout

    let (factory, probe_rx) = probed_sim_factory(fast_sim_config());
    let config = kioskplayer::utils::config::PlaybackConfig {
        bootstrap_source: fixture
            .internal_dir
            .path()
            .join("missing.mp4")
            .to_string_lossy()
            .into_owned(),
        ..Default::default()
    };
    let controller = PlaybackController::new(config, fixture.library(), factory);
    let probe = probe_rx.recv_timeout(Duration::from_secs(2))?;

    // Drop mid-wait: termination is bounded by timeout + join slack
    assert!(wait_until(Duration::from_secs(2), || probe.source().is_some()));
    let start = Instant::now();
    drop(controller);
    assert!(
        start.elapsed() < Duration::from_secs(5),
        "teardown took {:?}",
        start.elapsed()
    );

    Ok(())
}

#[test]
fn test_repeated_construction_and_teardown() -> Result<()> {
    let fixture = TestFixture::new()?;
    fixture.add_internal_video("boot.mp4")?;

    for _ in 0..3 {
        let (factory, _probe_rx) = probed_sim_factory(fast_sim_config());
        let controller = PlaybackController::new(
            fixture.playback_config("boot.mp4"),
            fixture.library(),
            factory,
        );
        assert!(wait_until(Duration::from_secs(2), || controller.play_state()));
        drop(controller);
    }

    Ok(())
}
