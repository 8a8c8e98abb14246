use super::*;

#[test]
fn fit_centers_at_ninety_percent() {
    let view = PreviewView::new(200, 200);
    let vp = view.fit(400, 200);
    assert!((vp.scale - 0.45).abs() < 1e-12);
    assert!((vp.x - 10.0).abs() < 1e-9);
    assert!((vp.y - 55.0).abs() < 1e-9);

    let p = view.map_to_scene(400, 200, Point::new(100.0, 100.0));
    assert!((p.x - 200.0).abs() < 1e-9 && (p.y - 100.0).abs() < 1e-9);
}

#[test]
fn render_letterboxes_on_the_backdrop() {
    let view = PreviewView::new(20, 20).with_background(Color::BLACK);
    let scene = Frame::filled(10, 10, Color::WHITE);
    let out = view.render(&scene).unwrap();
    assert_eq!((out.width, out.height), (20, 20));
    assert_eq!(out.pixel(10, 10), Some([255, 255, 255, 255]));
    assert_eq!(out.pixel(0, 0), Some([0, 0, 0, 255]));
}

#[test]
fn empty_frames_are_rejected() {
    let view = PreviewView::new(20, 20);
    assert!(view.render(&Frame::new(0, 0)).is_err());
}
