use std::sync::{Arc, Mutex};

use super::*;
use crate::control::message::{ControlMessage, ControlValue};

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<MediaRequest>>>);

impl Recorder {
    fn take(&self) -> Vec<MediaRequest> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

impl MediaBackend for Recorder {
    fn request(&mut self, request: MediaRequest) {
        self.0.lock().unwrap().push(request);
    }
}

fn recorded_scene() -> (Scene, Recorder) {
    let rec = Recorder::default();
    let mut scene = Scene::new();
    scene.set_media_backend(Box::new(rec.clone()));
    (scene, rec)
}

fn decode(address: &str, args: Vec<ControlValue>) -> Command {
    Command::decode(&ControlMessage::new(address, args)).unwrap()
}

#[test]
fn defaults() {
    let s = Scene::new();
    assert_eq!(s.size(), (800, 600));
    assert_eq!(s.layers().len(), 2);
    assert_eq!(s.layer(1).unwrap().id(), 1);
    assert!(s.layer(0).is_none());
    assert!(s.layer(3).is_none());
    assert_eq!(s.opacity(), 1.0);
    assert!(!s.testcard());
}

#[test]
fn resize_clamps_and_follows_text_and_card() {
    let mut s = Scene::new();
    s.set_size(0, -5);
    assert_eq!(s.size(), (1, 1));

    s.set_size(1280, 720);
    assert_eq!(s.rect(), Rect::new(0.0, 0.0, 1280.0, 720.0));
    assert_eq!(s.text().bounds(), s.rect());
    assert_eq!(s.test_card().label(), "Composition 1280 x 720");

    s.set_size(1_000_000, 720);
    assert_eq!(s.width(), MAX_SIZE);
}

#[test]
fn layer_geometry_through_clip_calls() {
    let mut s = Scene::new();
    assert!(s.clip_size(1, 400.0, 300.0));
    assert!(s.clip_position(1, 0.0, 0.0));
    assert_eq!(
        s.layer(1).unwrap().bounds(800.0, 600.0),
        Rect::new(200.0, 150.0, 600.0, 450.0)
    );
    assert!(!s.clip_size(9, 1.0, 1.0));
    assert!(!s.clip_rotate(1, f64::NAN));
}

#[test]
fn unknown_layer_is_rejected_without_side_effects() {
    let (mut s, rec) = recorded_scene();
    let err = s
        .apply(decode("/clip/99/play", Vec::new()))
        .unwrap_err();
    assert!(matches!(err, GrailError::InvalidLayer(99)));
    assert!(rec.take().is_empty());
    assert!(s.take_events().is_empty());
    assert!(s.layers().iter().all(|l| l.state() == PlaybackState::Stopped));
}

#[test]
fn text_commands() {
    let mut s = Scene::new();
    s.apply(decode("/clip/text", vec!["Hello".into()])).unwrap();
    s.apply(decode("/clip/text/transform", vec!["upper".into()]))
        .unwrap();
    assert_eq!(s.text().text(), "Hello");
    assert_eq!(s.text().display_text(), "HELLO");

    s.apply(decode(
        "/clip/text/padding",
        vec![10.into(), 20.into(), 30.into(), 40.into()],
    ))
    .unwrap();
    assert_eq!(
        s.text().content_box(),
        Rect::new(10.0, 20.0, 770.0, 560.0)
    );

    let err = s
        .apply(decode(
            "/clip/text/font",
            vec![0.into(), "Serif".into(), "bold".into()],
        ))
        .unwrap_err();
    assert!(matches!(err, GrailError::Validation(_)));
    assert_eq!(s.text().font().size_pt, 12.0);
}

#[test]
fn globals_clamp() {
    let mut s = Scene::new();
    s.apply(Command::CompOpacity(1.5)).unwrap();
    assert_eq!(s.opacity(), 1.0);
    s.apply(Command::CompVolume(-1.0)).unwrap();
    assert_eq!(s.volume(), 0.0);
    s.apply(Command::CompTransition(60.0)).unwrap();
    assert_eq!(s.transition(), MAX_TRANSITION);
    assert!(s.apply(Command::CompOpacity(f64::NAN)).is_err());
    assert_eq!(s.opacity(), 1.0);
    s.apply(Command::CompTestcard(true)).unwrap();
    assert!(s.testcard());
}

#[test]
fn source_and_transport_reach_the_backend() {
    let (mut s, rec) = recorded_scene();
    s.apply(Command::CompVolume(0.5)).unwrap();
    rec.take();

    assert!(!s.clip_play(1));
    assert!(s.clip_source(1, "intro.mp4"));
    assert!(s.clip_volume(1, 0.5));
    assert!(s.clip_play(1));
    assert_eq!(
        rec.take(),
        vec![
            MediaRequest::Load {
                layer: 1,
                path: PathBuf::from("intro.mp4")
            },
            MediaRequest::Volume {
                layer: 1,
                volume: 0.5
            },
            MediaRequest::Volume {
                layer: 1,
                volume: 0.25
            },
            MediaRequest::Play { layer: 1 },
        ]
    );
    assert_eq!(
        s.take_events(),
        vec![SceneEvent::State {
            layer: 1,
            state: PlaybackState::Playing
        }]
    );

    assert!(s.clip_position_ms(1, 1500.0));
    assert_eq!(s.layer(1).unwrap().position_ms(), 1500);
    assert_eq!(
        rec.take(),
        vec![MediaRequest::Seek {
            layer: 1,
            position_ms: 1500
        }]
    );
}

#[test]
fn swapping_source_while_playing_keeps_playing() {
    let (mut s, rec) = recorded_scene();
    s.clip_source(1, "a.mp4");
    s.clip_play(1);
    rec.take();
    s.clip_source(1, "b.mp4");
    let sent = rec.take();
    assert_eq!(sent.last(), Some(&MediaRequest::Play { layer: 1 }));
    assert_eq!(s.layer(1).unwrap().state(), PlaybackState::Playing);
}

#[test]
fn blackout_clears_text_and_stops_layers() {
    let mut s = Scene::new();
    s.set_text("Verse 1");
    s.clip_source(1, "a.mp4");
    s.clip_play(1);
    s.take_events();

    s.apply(Command::Blackout).unwrap();
    assert_eq!(s.text().text(), "");
    assert_eq!(s.layer(1).unwrap().state(), PlaybackState::Stopped);
    assert_eq!(
        s.take_events(),
        vec![SceneEvent::State {
            layer: 1,
            state: PlaybackState::Stopped
        }]
    );
}

#[test]
fn reports_update_layers_and_queue_events() {
    let (mut s, rec) = recorded_scene();
    s.clip_source(1, "a.mp4");
    s.clip_transport(1, TransportMode::Loop);
    s.clip_play(1);
    s.take_events();
    rec.take();

    s.report(MediaReport::Duration {
        layer: 1,
        duration_ms: 4000,
    });
    s.report(MediaReport::Position {
        layer: 1,
        position_ms: 9000,
    });
    assert_eq!(s.layer(1).unwrap().position_ms(), 4000);
    assert_eq!(
        s.take_events(),
        vec![
            SceneEvent::Duration {
                layer: 1,
                duration_ms: 4000
            },
            SceneEvent::Position {
                layer: 1,
                position_ms: 4000
            },
        ]
    );

    s.report(MediaReport::EndOfMedia { layer: 1 });
    assert_eq!(
        rec.take(),
        vec![
            MediaRequest::Seek {
                layer: 1,
                position_ms: 0
            },
            MediaRequest::Play { layer: 1 },
        ]
    );
    assert_eq!(s.layer(1).unwrap().state(), PlaybackState::Playing);
    assert!(s.take_events().is_empty());

    s.report(MediaReport::Error {
        layer: 1,
        message: "decoder gave up".into(),
    });
    assert_eq!(s.layer(1).unwrap().state(), PlaybackState::Stopped);
    assert_eq!(
        s.take_events(),
        vec![SceneEvent::State {
            layer: 1,
            state: PlaybackState::Stopped
        }]
    );

    // unknown layers are ignored
    s.report(MediaReport::EndOfMedia { layer: 7 });
    assert!(s.take_events().is_empty());
}

#[test]
fn end_of_media_without_loop_stops() {
    let mut s = Scene::new();
    s.clip_source(2, "b.mp4");
    s.clip_play(2);
    s.take_events();
    s.report(MediaReport::EndOfMedia { layer: 2 });
    assert_eq!(s.layer(2).unwrap().state(), PlaybackState::Stopped);
    assert_eq!(s.take_events().len(), 1);
}
