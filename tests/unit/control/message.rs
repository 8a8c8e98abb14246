use super::*;

fn msg(address: &str, args: Vec<ControlValue>) -> ControlMessage {
    ControlMessage::new(address, args)
}

#[test]
fn composition_messages() {
    assert_eq!(
        Command::decode(&msg("/comp/size", vec![1280.into(), 720.into()])).unwrap(),
        Command::CompSize {
            width: 1280,
            height: 720
        }
    );
    // floats truncate for integer slots
    assert_eq!(
        Command::decode(&msg("/comp/size", vec![1280.9.into(), "720".into()])).unwrap(),
        Command::CompSize {
            width: 1280,
            height: 720
        }
    );
    assert_eq!(
        Command::decode(&msg("/comp/opacity", vec![1.into()])).unwrap(),
        Command::CompOpacity(1.0)
    );
    assert_eq!(
        Command::decode(&msg("/comp/testcard", vec!["true".into()])).unwrap(),
        Command::CompTestcard(true)
    );
    assert_eq!(
        Command::decode(&msg("/comp/testcard", vec![0.into()])).unwrap(),
        Command::CompTestcard(false)
    );
    assert_eq!(
        Command::decode(&ControlMessage::bare("!comp/blackout")).unwrap(),
        Command::Blackout
    );
}

#[test]
fn text_messages() {
    assert_eq!(
        Command::decode(&msg("/clip/text", vec!["Hello".into()])).unwrap(),
        Command::Text("Hello".to_string())
    );
    assert_eq!(
        Command::decode(&msg(
            "/clip/text/font",
            vec![48.into(), "Serif".into(), "bold".into()]
        ))
        .unwrap(),
        Command::TextFont {
            size_pt: 48.0,
            family: "Serif".to_string(),
            style: "bold".to_string()
        }
    );
    assert_eq!(
        Command::decode(&msg("/clip/text/color", vec!["#80ff0000".into()])).unwrap(),
        Command::TextColor(Color::rgba(255, 0, 0, 128))
    );
    assert_eq!(
        Command::decode(&msg("/clip/text/align", vec!["left".into(), "bottom".into()])).unwrap(),
        Command::TextAlign(HAlign::Left, VAlign::Bottom)
    );
    assert_eq!(
        Command::decode(&msg(
            "/clip/text/shadow",
            vec![0.into(), 5.into(), 0.into(), "#000000".into()]
        ))
        .unwrap(),
        Command::TextShadow {
            x: 0.0,
            y: 5.0,
            blur: 0.0,
            color: Color::BLACK
        }
    );
    assert_eq!(
        Command::decode(&msg("/clip/text/transform", vec!["upper".into()])).unwrap(),
        Command::TextTransform(CaseTransform::Upper)
    );
}

#[test]
fn clip_messages() {
    assert_eq!(
        Command::decode(&msg("/clip/1/size", vec![400.into(), 300.into()])).unwrap(),
        Command::ClipSize {
            layer: 1,
            width: 400.0,
            height: 300.0
        }
    );
    assert_eq!(
        Command::decode(&msg("/clip/2/pos", vec![(-10).into(), 5.5.into()])).unwrap(),
        Command::ClipPosition {
            layer: 2,
            x: -10.0,
            y: 5.5
        }
    );
    assert_eq!(
        Command::decode(&ControlMessage::bare("/clip/99/play")).unwrap(),
        Command::ClipPlay { layer: 99 }
    );
    assert_eq!(
        Command::decode(&ControlMessage::bare("/clip/1/playback/stop")).unwrap(),
        Command::ClipStop { layer: 1 }
    );
    assert_eq!(
        Command::decode(&msg("/clip/1/playback/transport", vec!["loop".into()])).unwrap(),
        Command::ClipTransport {
            layer: 1,
            mode: TransportMode::Loop
        }
    );
    assert_eq!(
        Command::decode(&msg("/clip/1/playback/position", vec![2500.into()]))
            .unwrap()
            .layer(),
        Some(1)
    );
}

#[test]
fn malformed_messages_are_message_errors() {
    let cases = [
        msg("/comp/size", vec![1280.into()]),
        msg("/comp/opacity", vec!["loud".into()]),
        msg("/clip/text", vec![3.into()]),
        msg("/clip/text/color", vec!["#12".into()]),
        msg("/clip/text/align", vec!["middle".into(), "middle".into()]),
        msg("/clip/text/transform", vec!["shout".into()]),
        msg("/clip/x/size", vec![1.into(), 2.into()]),
        msg("/clip/1/explode", vec![]),
        msg("/nope", vec![]),
    ];
    for m in cases {
        let err = Command::decode(&m).unwrap_err();
        assert!(matches!(err, GrailError::Message(_)), "{m:?} -> {err:?}");
    }
}

#[test]
fn momentary_commands_are_not_recallable() {
    assert!(Command::Text("x".into()).is_recallable());
    assert!(Command::ClipOpacity { layer: 1, value: 0.5 }.is_recallable());
    assert!(!Command::ClipPlay { layer: 1 }.is_recallable());
    assert!(!Command::Blackout.is_recallable());
}

#[test]
fn json_shape_is_scalar_args() {
    let m: ControlMessage =
        serde_json::from_str(r#"{"address":"/comp/size","args":[1280, 720.5, "x", true]}"#).unwrap();
    assert_eq!(
        m.args,
        vec![
            ControlValue::Int(1280),
            ControlValue::Float(720.5),
            ControlValue::Str("x".into()),
            ControlValue::Bool(true)
        ]
    );
    let bare: ControlMessage = serde_json::from_str(r#"{"address":"/comp/blackout"}"#).unwrap();
    assert!(bare.args.is_empty());
}

#[test]
fn scene_events_become_messages() {
    let m = ControlMessage::from(&SceneEvent::State {
        layer: 1,
        state: crate::scene::media::PlaybackState::Playing,
    });
    assert_eq!(m.address, "!clip/1/playback/state");
    assert_eq!(m.args, vec![ControlValue::Str("playing".into())]);
}
