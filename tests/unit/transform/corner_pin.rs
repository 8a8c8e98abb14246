use std::sync::{Arc, Mutex};

use super::*;

fn editor_1to1(w: f64, h: f64) -> CornerPinEditor {
    // viewport stays at identity so widget and source coordinates coincide
    CornerPinEditor::new(w, h)
}

#[test]
fn set_rect_fills_with_corners_in_order() {
    let mut e = editor_1to1(10.0, 10.0);
    e.set_rect(Rect::new(0.0, 0.0, 1920.0, 1080.0));
    assert_eq!(
        e.points(),
        [
            Point::new(0.0, 0.0),
            Point::new(1920.0, 0.0),
            Point::new(1920.0, 1080.0),
            Point::new(0.0, 1080.0),
        ]
    );
    assert_eq!(e.transformation(), Homography::IDENTITY);
}

#[test]
fn halves_and_fill_roundtrip() {
    let mut e = editor_1to1(800.0, 600.0);
    e.left();
    assert_eq!(e.bounding_rect(), Rect::new(0.0, 0.0, 400.0, 600.0));
    e.right();
    assert_eq!(e.bounding_rect(), Rect::new(400.0, 0.0, 800.0, 600.0));
    e.top();
    assert_eq!(e.bounding_rect(), Rect::new(0.0, 0.0, 800.0, 300.0));
    e.bottom();
    assert_eq!(e.bounding_rect(), Rect::new(0.0, 300.0, 800.0, 600.0));
    e.fill();
    assert_eq!(e.raw_points(), [0.0, 0.0, 800.0, 0.0, 800.0, 600.0, 0.0, 600.0]);
}

#[test]
fn center_keeps_shape() {
    let mut e = editor_1to1(800.0, 600.0);
    e.set_points([
        Point::new(0.0, 0.0),
        Point::new(200.0, 10.0),
        Point::new(200.0, 110.0),
        Point::new(0.0, 100.0),
    ]);
    e.center();
    let b = e.bounding_rect();
    assert_eq!(b, Rect::new(300.0, 245.0, 500.0, 355.0));
    assert_eq!(e.points()[1] - e.points()[0], Vec2::new(200.0, 10.0));
}

#[test]
fn viewport_fit_is_centered_at_ninety_percent() {
    let mut e = CornerPinEditor::new(800.0, 600.0);
    e.set_viewport(400.0, 400.0);
    let vp = e.viewport();
    assert!((vp.scale - 0.45).abs() < 1e-12);
    assert!((vp.x - 20.0).abs() < 1e-9);
    assert!((vp.y - 65.0).abs() < 1e-9);
    let p = Point::new(123.0, 456.0);
    let back = e.map_to_source(e.map_to_widget(p));
    assert!((back - p).hypot() < 1e-9);
}

#[test]
fn new_rect_is_refit_to_the_widget() {
    let mut e = CornerPinEditor::new(100.0, 100.0);
    e.set_viewport(200.0, 200.0);
    assert!((e.viewport().scale - 1.8).abs() < 1e-12);

    let rect = Rect::new(0.0, 0.0, 400.0, 200.0);
    e.set_rect(rect);
    let vp = e.viewport();
    assert_eq!(vp, Viewport::fit(rect, 200.0, 200.0));
    assert!((vp.scale - 0.45).abs() < 1e-12);
    assert!((vp.x - 10.0).abs() < 1e-9);
    assert!((vp.y - 55.0).abs() < 1e-9);
}

#[test]
fn dragging_a_corner_moves_only_that_point() {
    let mut e = editor_1to1(800.0, 600.0);
    assert_eq!(e.pointer_press(Point::new(798.0, 2.0)), Some(Handle::TopRight));
    assert!(e.pointer_move(Point::new(748.0, 52.0)));
    assert_eq!(e.points()[1], Point::new(750.0, 50.0));
    assert_eq!(e.points()[0], Point::new(0.0, 0.0));
    assert_eq!(e.status_text(), "(750, 50)");
    e.pointer_release();
    assert_eq!(e.active_handle(), None);
    assert_eq!(e.last_handle(), Some(Handle::TopRight));
    assert!(!e.pointer_move(Point::new(0.0, 0.0)));
    assert_eq!(e.status_text(), "");
}

#[test]
fn press_outside_radius_grabs_nothing() {
    let mut e = editor_1to1(800.0, 600.0);
    assert_eq!(e.pointer_press(Point::new(6.0, 0.0)), None);
    assert_eq!(e.active_handle(), None);
}

#[test]
fn last_handle_within_radius_wins() {
    // tiny quad: the top edge midpoint sits within reach of both top corners
    let mut e = editor_1to1(4.0, 100.0);
    assert_eq!(e.pointer_press(Point::new(2.0, 0.0)), Some(Handle::Top));
}

#[test]
fn corners_are_locked_without_affine() {
    let mut e = editor_1to1(800.0, 600.0);
    e.set_allow_affine(false);
    e.pointer_press(Point::new(0.0, 0.0));
    assert!(!e.pointer_move(Point::new(50.0, 50.0)));
    assert_eq!(e.points()[0], Point::new(0.0, 0.0));
}

#[test]
fn edge_drag_moves_both_endpoints() {
    let mut e = editor_1to1(800.0, 600.0);
    assert_eq!(e.pointer_press(Point::new(800.0, 300.0)), Some(Handle::Right));
    assert!(e.pointer_move(Point::new(700.0, 320.0)));
    assert_eq!(e.points()[1], Point::new(700.0, 20.0));
    assert_eq!(e.points()[2], Point::new(700.0, 620.0));
    assert_eq!(e.status_text(), "Right side");
}

#[test]
fn edge_drag_is_axis_locked_without_affine() {
    let mut e = editor_1to1(800.0, 600.0);
    e.set_allow_affine(false);
    assert_eq!(e.pointer_press(Point::new(400.0, 0.0)), Some(Handle::Top));
    assert!(e.pointer_move(Point::new(450.0, 40.0)));
    assert_eq!(e.points()[0], Point::new(0.0, 40.0));
    assert_eq!(e.points()[1], Point::new(800.0, 40.0));
    assert_eq!(e.status_text(), "Top side");
}

#[test]
fn nudge_uses_widget_pixels() {
    let mut e = CornerPinEditor::new(800.0, 600.0);
    e.set_viewport(400.0, 400.0);
    let bl = e.map_to_widget(Point::new(0.0, 600.0));
    assert_eq!(e.pointer_press(bl), Some(Handle::BottomLeft));
    e.pointer_release();
    assert!(e.nudge(ArrowKey::Right));
    assert!(e.nudge(ArrowKey::Up));
    let p = e.points()[3];
    assert!((p.x - 1.0 / 0.45).abs() < 1e-9);
    assert!((p.y - (600.0 - 1.0 / 0.45)).abs() < 1e-9);
}

#[test]
fn nudge_without_corner_is_ignored() {
    let mut e = editor_1to1(800.0, 600.0);
    assert!(!e.nudge(ArrowKey::Left));
    e.pointer_press(Point::new(0.0, 300.0));
    assert_eq!(e.last_handle(), Some(Handle::Left));
    assert!(!e.nudge(ArrowKey::Left));
}

#[test]
fn every_edit_bumps_revision_and_notifies() {
    let seen = Arc::new(Mutex::new(0usize));
    let sink = Arc::clone(&seen);
    let mut e = editor_1to1(800.0, 600.0);
    e.set_on_updated(move |_| *sink.lock().unwrap() += 1);
    let start = e.revision();
    e.left();
    e.center();
    let tl = e.points()[0];
    assert_eq!(e.pointer_press(tl), Some(Handle::TopLeft));
    assert!(e.pointer_move(tl + Vec2::new(10.0, 10.0)));
    assert_eq!(e.revision(), start + 3);
    assert_eq!(*seen.lock().unwrap(), 3);
}

#[test]
fn from_transform_copies_points() {
    let q = QuadTransform::from_raw(
        Rect::new(0.0, 0.0, 100.0, 100.0),
        &[1.0, 2.0, 90.0, 0.0, 100.0, 100.0, 0.0, 95.0],
    )
    .unwrap();
    let e = CornerPinEditor::from_transform(&q);
    assert_eq!(e.quad(), q);
}
