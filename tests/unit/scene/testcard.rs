use super::*;

#[test]
fn label_tracks_size() {
    assert_eq!(TestCard::new(1280, 720).label(), "Composition 1280 x 720");
    assert_eq!(
        TestCard::new(800, 600).label_box(),
        Rect::new(10.0, 10.0, 790.0, 590.0)
    );
}

#[test]
fn grid_is_symmetric_around_center() {
    let card = TestCard::new(800, 600);
    let offsets = card.grid_offsets();
    assert_eq!(offsets.len(), 32);
    assert_eq!(offsets.first(), Some(&-800.0));
    assert_eq!(offsets.last(), Some(&750.0));
    let (ys, xs) = card.grid_lines();
    assert!(ys.contains(&300.0));
    assert!(xs.contains(&400.0));
    assert!(xs.contains(&450.0));
}

#[test]
fn circles_span_the_width() {
    let card = TestCard::new(800, 600);
    assert_eq!(card.circle_radius(), 300.0);
    let centers = card.circle_centers();
    // int((800 / 300) / 2) + 1 == 2, so indices -2..=2
    assert_eq!(centers.len(), 5);
    assert_eq!(centers[2], Point::new(400.0, 300.0));
    assert_eq!(centers[3], Point::new(775.0, 300.0));
}
