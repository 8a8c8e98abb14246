use super::*;

fn with_source() -> Layer {
    let mut l = Layer::new(1);
    l.set_source("clip.mp4").unwrap();
    l
}

#[test]
fn centered_layer_bounds() {
    let mut l = Layer::new(1);
    l.set_size(400.0, 300.0).unwrap();
    l.set_position(0.0, 0.0).unwrap();
    assert_eq!(l.bounds(800.0, 600.0), Rect::new(200.0, 150.0, 600.0, 450.0));

    l.set_position(-50.0, 25.0).unwrap();
    assert_eq!(l.bounds(800.0, 600.0), Rect::new(150.0, 175.0, 550.0, 475.0));
}

#[test]
fn rotation_and_scale_pivot_on_center() {
    let mut l = Layer::new(1);
    l.set_size(100.0, 50.0).unwrap();
    l.set_scale(2.0).unwrap();
    let b = l.bounds(200.0, 200.0);
    assert!((b.x0 - 0.0).abs() < 1e-9 && (b.x1 - 200.0).abs() < 1e-9);
    assert!((b.y0 - 50.0).abs() < 1e-9 && (b.y1 - 150.0).abs() < 1e-9);

    l.set_scale(1.0).unwrap();
    l.set_rotation(90.0).unwrap();
    let b = l.bounds(200.0, 200.0);
    assert!((b.width() - 50.0).abs() < 1e-9);
    assert!((b.height() - 100.0).abs() < 1e-9);
    assert!((b.center().x - 100.0).abs() < 1e-9);
}

#[test]
fn setters_clamp() {
    let mut l = Layer::new(1);
    l.set_volume(1.7).unwrap();
    assert_eq!(l.volume(), 1.0);
    l.set_volume(-0.2).unwrap();
    assert_eq!(l.volume(), 0.0);
    l.set_opacity(0.25).unwrap();
    assert_eq!(l.opacity(), 0.25);
    assert!(l.set_opacity(f64::NAN).is_err());
    assert_eq!(l.opacity(), 0.25);

    l.set_scale(0.0).unwrap();
    assert_eq!(l.scale(), MIN_SCALE);
    l.set_scale(-3.0).unwrap();
    assert_eq!(l.scale(), MIN_SCALE);

    l.set_size(-5.0, 10.0).unwrap();
    assert_eq!(l.size(), Size::new(0.0, 10.0));
}

#[test]
fn play_requires_source() {
    let mut l = Layer::new(3);
    assert!(l.play().is_err());
    assert_eq!(l.state(), PlaybackState::Stopped);
}

#[test]
fn playback_transitions() {
    let mut l = with_source();
    assert!(l.pause().is_err());
    l.play().unwrap();
    assert_eq!(l.state(), PlaybackState::Playing);
    l.seek(1500.0).unwrap();
    l.pause().unwrap();
    assert_eq!(l.state(), PlaybackState::Paused);
    assert_eq!(l.position_ms(), 1500);
    l.play().unwrap();
    l.stop();
    assert_eq!(l.state(), PlaybackState::Stopped);
    assert_eq!(l.position_ms(), 0);
}

#[test]
fn new_source_rewinds_but_keeps_playing() {
    let mut l = with_source();
    l.play().unwrap();
    l.report_duration(10_000);
    l.seek(4000.0).unwrap();
    l.set_source("next.mp4").unwrap();
    assert_eq!(l.state(), PlaybackState::Playing);
    assert_eq!(l.position_ms(), 0);
    assert_eq!(l.duration_ms(), None);
    assert!(l.set_source("").is_err());
}

#[test]
fn seek_clamps_to_known_duration() {
    let mut l = with_source();
    assert_eq!(l.seek(-10.0).unwrap(), 0);
    assert_eq!(l.seek(99_999.0).unwrap(), 99_999);
    l.report_duration(5000);
    assert_eq!(l.position_ms(), 5000);
    assert_eq!(l.seek(6000.0).unwrap(), 5000);
}

#[test]
fn end_of_media_follows_transport() {
    let mut l = with_source();
    l.report_duration(3000);
    l.play().unwrap();

    l.set_transport(TransportMode::Loop);
    l.seek(3000.0).unwrap();
    assert!(l.end_of_media());
    assert_eq!(l.position_ms(), 0);
    assert_eq!(l.state(), PlaybackState::Playing);

    l.set_transport(TransportMode::Pause);
    assert!(!l.end_of_media());
    assert_eq!(l.state(), PlaybackState::Paused);
    assert_eq!(l.position_ms(), 3000);

    l.play().unwrap();
    l.set_transport(TransportMode::Stop);
    assert!(!l.end_of_media());
    assert_eq!(l.state(), PlaybackState::Stopped);
    assert_eq!(l.position_ms(), 0);
}
