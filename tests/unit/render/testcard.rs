use super::*;

#[test]
fn card_pattern_without_fonts() {
    let card = TestCard::new(200, 100);
    let frame = render_test_card(&card, &mut FontBook::new()).unwrap();
    assert_eq!((frame.width, frame.height), (200, 100));
    assert!(frame.premultiplied);
    // open background between grid lines and circles
    assert_eq!(frame.pixel(25, 25), Some([0x5a, 0x5a, 0x5a, 255]));
    // center cross
    assert_eq!(frame.pixel(100, 50), Some([0x20, 0x20, 0x20, 255]));
}

#[test]
fn card_draws_white_grid() {
    let card = TestCard::new(200, 100);
    let frame = render_test_card(&card, &mut FontBook::new()).unwrap();
    // somewhere on the row crossing y = 0 there is white coverage
    let row0_has_white = (0..200).any(|x| {
        frame
            .pixel(x, 0)
            .is_some_and(|px| px[0] > 0x5a && px[0] == px[1] && px[1] == px[2])
    });
    assert!(row0_has_white);
}

#[test]
fn oversized_cards_are_rejected() {
    let card = TestCard::new(70_000, 10);
    assert!(render_test_card(&card, &mut FontBook::new()).is_err());
}
