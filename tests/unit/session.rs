use super::*;
use std::path::PathBuf;

use crate::control::message::ControlValue;
use crate::foundation::core::Point;
use crate::scene::display::MAX_SIZE;

fn two_outputs() -> Outputs {
    let mut outputs = Outputs::new();
    outputs.add();
    outputs.add();
    let second = outputs.get_mut(1).unwrap();
    second.set_points([
        Point::new(10.0, 0.0),
        Point::new(790.0, 20.0),
        Point::new(800.0, 600.0),
        Point::new(0.0, 580.0),
    ]);
    second.set_disabled(true);
    outputs
}

#[test]
fn parses_the_documented_layout() {
    let json = r#"{
        "recall": { "/comp/size": [1920, 1080], "/clip/text": ["Amazing grace"] },
        "outputs": [ { "name": "Stage", "x": 1920, "y": 0, "width": 1920, "height": 1080,
                       "frameless": true, "disabled": false,
                       "points": [0, 0, 1920, 0, 1920, 1080, 0, 1080] } ]
    }"#;
    let session = Session::from_json(json).unwrap();
    assert_eq!(session.recall.len(), 2);
    assert_eq!(
        session.recall.get("/comp/size"),
        Some(&[ControlValue::Int(1920), ControlValue::Int(1080)][..])
    );
    let outputs = session.outputs().unwrap();
    let stage = outputs.get(0).unwrap();
    assert_eq!(stage.name(), "Stage");
    assert!(stage.frameless());
    assert_eq!(stage.quad().points()[2], Point::new(1920.0, 1080.0));
}

#[test]
fn missing_sections_default() {
    let session = Session::from_json("{}").unwrap();
    assert!(session.recall.is_empty());
    assert!(session.outputs.is_empty());
    assert!(Session::from_json("[").is_err());
}

#[test]
fn capture_and_restore() {
    let mut controller = Controller::default();
    controller
        .handle(&ControlMessage::new(
            "/comp/size",
            vec![ControlValue::Int(640), ControlValue::Int(480)],
        ))
        .unwrap();
    controller
        .handle(&ControlMessage::new("/clip/text", vec!["Verse 1".into()]))
        .unwrap();
    let outputs = two_outputs();

    let session = Session::capture(&controller, &outputs);
    let json = session.to_json().unwrap();
    let back = Session::from_json(&json).unwrap();
    assert_eq!(back, session);
    assert_eq!(back.outputs().unwrap(), outputs);

    let mut fresh = Controller::default();
    let stats = back.restore(&mut fresh);
    assert_eq!(stats.rejected, 0);
    assert_eq!(fresh.scene().size(), (640, 480));
    assert_eq!(fresh.scene().text().text(), "Verse 1");
}

#[test]
fn bad_points_are_rejected() {
    let mut session = Session::capture(&Controller::default(), &two_outputs());
    session.outputs[0].points[3] = f64::NAN;
    assert!(session.outputs().is_err());
}

#[test]
fn save_and_load_files() {
    let dir = PathBuf::from("target").join("session_unit");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("session.json");

    let session = Session::capture(&Controller::default(), &two_outputs());
    session.save(&path).unwrap();
    assert_eq!(Session::load(&path).unwrap(), session);
    assert!(Session::load(&dir.join("missing.json")).is_err());
}

#[test]
fn scripts_are_message_arrays() {
    let dir = PathBuf::from("target").join("session_unit");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("script.json");
    std::fs::write(
        &path,
        r#"[{"address": "/comp/testcard", "args": [true]}, {"address": "/clip/1/play"}]"#,
    )
    .unwrap();
    let script = load_script(&path).unwrap();
    assert_eq!(script.len(), 2);
    assert_eq!(script[1], ControlMessage::bare("/clip/1/play"));
}

#[test]
fn rejects_output_sizes_that_cannot_be_rendered() {
    let record = |w: u32, h: u32| {
        format!(
            r#"{{ "outputs": [ {{ "name": "Wall", "x": 0, "y": 0, "width": {w}, "height": {h},
                 "frameless": false, "disabled": false,
                 "points": [0, 0, 1, 0, 1, 1, 0, 1] }} ] }}"#
        )
    };
    for (w, h) in [(4_294_967_295, 4_294_967_295), (0, 600), (800, 0), (MAX_SIZE + 1, 600)] {
        let session = Session::from_json(&record(w, h)).unwrap();
        assert!(session.outputs().is_err(), "{w}x{h} accepted");
    }
    let session = Session::from_json(&record(MAX_SIZE, 1)).unwrap();
    assert!(session.outputs().is_ok());
}
