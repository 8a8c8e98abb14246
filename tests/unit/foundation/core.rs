use super::*;

#[test]
fn parses_short_long_and_alpha_first_hex() {
    assert_eq!(Color::parse("#fff").unwrap(), Color::WHITE);
    assert_eq!(Color::parse("#ff0000").unwrap(), Color::rgb(255, 0, 0));
    assert_eq!(
        Color::parse("#800000ff").unwrap(),
        Color::rgba(0, 0, 255, 128)
    );
    assert_eq!(Color::parse(" black ").unwrap(), Color::BLACK);
}

#[test]
fn rejects_malformed_colors() {
    assert!(Color::parse("ffffff").is_err());
    assert!(Color::parse("#ggg").is_err());
    assert!(Color::parse("#12345").is_err());
}

#[test]
fn sign_characters_are_not_hex_digits() {
    assert!(Color::parse("#+f+f+f").is_err());
    assert!(Color::parse("#ff+fff").is_err());
    assert!(Color::parse("#-1-1-1-1").is_err());
}

#[test]
fn hex_roundtrips_through_serde() {
    let c = Color::rgba(10, 20, 30, 40);
    let json = serde_json::to_string(&c).unwrap();
    assert_eq!(json, "\"#280a141e\"");
    let back: Color = serde_json::from_str(&json).unwrap();
    assert_eq!(back, c);
}

#[test]
fn premul_scales_channels_by_alpha() {
    assert_eq!(Color::rgba(255, 255, 255, 0).to_premul(), [0, 0, 0, 0]);
    assert_eq!(Color::rgba(255, 0, 0, 128).to_premul(), [128, 0, 0, 128]);
}

#[test]
fn inset_never_inverts_rect() {
    let r = Rect::new(0.0, 0.0, 100.0, 50.0);
    assert_eq!(
        Edges::new(10.0, 5.0, 20.0, 5.0).inset(r),
        Rect::new(10.0, 5.0, 80.0, 45.0)
    );
    let collapsed = Edges::new(80.0, 0.0, 80.0, 0.0).inset(r);
    assert_eq!(collapsed.width(), 0.0);
}
