//! Integration tests for the KioskPlayer playback controller
//!
//! These run the whole stack — controller worker, player handle, prepare
//! handshake, notification routing — against the simulated native backend.

use anyhow::Result;
use kioskplayer::native::DisplayGeometry;
use kioskplayer::player::PlaybackController;
use kioskplayer_integration_tests::{
    fast_sim_config, probed_sim_factory, wait_until, TestFixture,
};
use std::time::Duration;

#[test]
fn test_bootstrap_source_plays_on_startup() -> Result<()> {
    let fixture = TestFixture::new()?;
    let bootstrap = fixture.add_internal_video("wallpaper4.mp4")?;

    let (factory, probe_rx) = probed_sim_factory(fast_sim_config());
    let controller = PlaybackController::new(
        fixture.playback_config("wallpaper4.mp4"),
        fixture.library(),
        factory,
    );

    let probe = probe_rx.recv_timeout(Duration::from_secs(2))?;
    assert!(wait_until(Duration::from_secs(2), || controller.play_state()));
    assert!(probe.is_prepared());
    assert!(probe.is_playing());
    assert_eq!(probe.source().as_deref(), bootstrap.to_str());
    // Looping is the kiosk default, re-asserted after prepare
    assert!(probe.looping());
    assert!(!probe.hold_last_picture());

    Ok(())
}

#[test]
fn test_full_screen_claims_whole_viewport() -> Result<()> {
    let fixture = TestFixture::new()?;
    fixture.add_internal_video("wallpaper4.mp4")?;

    let (factory, probe_rx) = probed_sim_factory(fast_sim_config());
    let controller = PlaybackController::new(
        fixture.playback_config("wallpaper4.mp4"),
        fixture.library(),
        factory,
    );

    let probe = probe_rx.recv_timeout(Duration::from_secs(2))?;
    assert!(wait_until(Duration::from_secs(2), || {
        probe.last_display_rect().is_some()
    }));
    assert_eq!(
        probe.last_display_rect(),
        Some(DisplayGeometry::new(0, 0, 480, 480))
    );

    drop(controller);
    Ok(())
}

#[test]
fn test_centered_geometry_for_oversized_source() -> Result<()> {
    let fixture = TestFixture::new()?;
    fixture.add_internal_video("wallpaper4.mp4")?;

    let mut config = fixture.playback_config("wallpaper4.mp4");
    config.full_screen = false;

    // The simulator announces a 960x480 decoded size after prepare
    let (factory, probe_rx) = probed_sim_factory(fast_sim_config());
    let controller = PlaybackController::new(config, fixture.library(), factory);

    let probe = probe_rx.recv_timeout(Duration::from_secs(2))?;
    assert!(wait_until(Duration::from_secs(2), || {
        probe.last_display_rect().is_some()
    }));
    assert_eq!(
        probe.last_display_rect(),
        Some(DisplayGeometry::new(0, 120, 480, 240))
    );

    drop(controller);
    Ok(())
}

#[test]
fn test_play_by_name_prefers_internal_storage() -> Result<()> {
    let fixture = TestFixture::new()?;
    fixture.add_internal_video("boot.mp4")?;
    let internal_promo = fixture.add_internal_video("promo.mp4")?;
    fixture.add_external_video("promo.mp4")?;

    let (factory, probe_rx) = probed_sim_factory(fast_sim_config());
    let controller = PlaybackController::new(
        fixture.playback_config("boot.mp4"),
        fixture.library(),
        factory,
    );
    let probe = probe_rx.recv_timeout(Duration::from_secs(2))?;
    assert!(wait_until(Duration::from_secs(2), || controller.play_state()));

    controller.play(Some("promo.mp4"));

    assert!(wait_until(Duration::from_secs(2), || {
        probe.source().as_deref() == internal_promo.to_str()
    }));
    assert!(wait_until(Duration::from_secs(2), || controller.play_state()));

    Ok(())
}

#[test]
fn test_play_by_name_from_external_storage() -> Result<()> {
    let fixture = TestFixture::new()?;
    fixture.add_internal_video("boot.mp4")?;
    let sd_clip = fixture.add_external_video("sd-clip.mp4")?;

    let (factory, probe_rx) = probed_sim_factory(fast_sim_config());
    let controller = PlaybackController::new(
        fixture.playback_config("boot.mp4"),
        fixture.library(),
        factory,
    );
    let probe = probe_rx.recv_timeout(Duration::from_secs(2))?;
    assert!(wait_until(Duration::from_secs(2), || controller.play_state()));

    controller.play(Some("sd-clip.mp4"));

    assert!(wait_until(Duration::from_secs(2), || {
        probe.source().as_deref() == sd_clip.to_str()
    }));

    Ok(())
}

#[test]
fn test_play_by_name_miss_keeps_current_video() -> Result<()> {
    let fixture = TestFixture::new()?;
    let bootstrap = fixture.add_internal_video("boot.mp4")?;

    let (factory, probe_rx) = probed_sim_factory(fast_sim_config());
    let controller = PlaybackController::new(
        fixture.playback_config("boot.mp4"),
        fixture.library(),
        factory,
    );
    let probe = probe_rx.recv_timeout(Duration::from_secs(2))?;
    assert!(wait_until(Duration::from_secs(2), || controller.play_state()));

    // Found in neither directory: silently ignored, playback undisturbed
    controller.play(Some("missing.mp4"));
    std::thread::sleep(Duration::from_millis(100));

    assert!(controller.play_state());
    assert_eq!(probe.source().as_deref(), bootstrap.to_str());

    Ok(())
}

#[test]
fn test_pause_resume_and_seek() -> Result<()> {
    let fixture = TestFixture::new()?;
    fixture.add_internal_video("boot.mp4")?;

    let (factory, _probe_rx) = probed_sim_factory(fast_sim_config());
    let controller = PlaybackController::new(
        fixture.playback_config("boot.mp4"),
        fixture.library(),
        factory,
    );
    assert!(wait_until(Duration::from_secs(2), || controller.play_state()));

    controller.pause();
    assert!(!controller.play_state());
    let paused_at = controller.position();
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(controller.position(), paused_at);

    controller.play(None);
    assert!(controller.play_state());

    // Seconds in, milliseconds out
    controller.set_position(5);
    let position = controller.position();
    assert!((5000..6000).contains(&position), "position was {}", position);
    assert_eq!(controller.duration(), 60_000);

    Ok(())
}

#[test]
fn test_volume_clamps_to_vendor_range() -> Result<()> {
    let fixture = TestFixture::new()?;
    fixture.add_internal_video("boot.mp4")?;

    let (factory, probe_rx) = probed_sim_factory(fast_sim_config());
    let controller = PlaybackController::new(
        fixture.playback_config("boot.mp4"),
        fixture.library(),
        factory,
    );
    let probe = probe_rx.recv_timeout(Duration::from_secs(2))?;
    assert!(wait_until(Duration::from_secs(2), || controller.play_state()));

    controller.set_volume(55);
    assert_eq!(probe.volume(), 40);
    assert_eq!(controller.volume(), 40);

    controller.set_volume(-5);
    assert_eq!(controller.volume(), 0);

    Ok(())
}

#[test]
fn test_speed_and_rotation_indices() -> Result<()> {
    use kioskplayer::native::{PlaybackSpeed, RotationAngle};

    let fixture = TestFixture::new()?;
    fixture.add_internal_video("boot.mp4")?;

    let (factory, probe_rx) = probed_sim_factory(fast_sim_config());
    let controller = PlaybackController::new(
        fixture.playback_config("boot.mp4"),
        fixture.library(),
        factory,
    );
    let probe = probe_rx.recv_timeout(Duration::from_secs(2))?;
    assert!(wait_until(Duration::from_secs(2), || controller.play_state()));

    controller.set_speed(3);
    assert_eq!(probe.speed(), PlaybackSpeed::FastForward2);

    controller.set_rotation(2);
    assert_eq!(probe.rotation(), RotationAngle::Degree180);

    // Out-of-table indices are ignored
    controller.set_speed(42);
    assert_eq!(probe.speed(), PlaybackSpeed::FastForward2);

    Ok(())
}

#[test]
fn test_short_video_without_loop_completes() -> Result<()> {
    let fixture = TestFixture::new()?;
    fixture.add_internal_video("boot.mp4")?;

    let mut sim = fast_sim_config();
    sim.duration_ms = 80;
    let mut config = fixture.playback_config("boot.mp4");
    config.loop_playback = false;

    let (factory, _probe_rx) = probed_sim_factory(sim);
    let controller = PlaybackController::new(config, fixture.library(), factory);

    assert!(wait_until(Duration::from_secs(2), || controller.play_state()));
    // The source runs out and playback stops on its own
    assert!(wait_until(Duration::from_secs(2), || !controller.play_state()));
    assert_eq!(controller.position(), 80);

    Ok(())
}
