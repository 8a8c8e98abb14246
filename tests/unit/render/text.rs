use super::*;

fn request(text: &str) -> TextRequest<'_> {
    TextRequest {
        text,
        family: "decorative",
        size_px: 16.0,
        color: Color::WHITE,
        max_width: 200.0,
        align: HAlign::Center,
    }
}

#[test]
fn empty_book_lays_out_nothing() {
    let mut book = FontBook::new();
    assert!(book.is_empty());
    assert_eq!(book.resolve("decorative"), None);
    assert!(book.layout(&request("Hello")).unwrap().is_none());
}

#[test]
fn invalid_sizes_are_rejected() {
    let mut book = FontBook::new();
    let mut req = request("Hello");
    req.size_px = 0.0;
    assert!(book.layout(&req).is_err());
    req.size_px = f32::NAN;
    assert!(book.layout(&req).is_err());
}

#[test]
fn garbage_font_bytes_fail() {
    let mut book = FontBook::new();
    assert!(book.add_font(b"not a font".to_vec()).is_err());
    assert!(book.is_empty());
}

#[test]
fn directories_without_fonts() {
    let dir = std::env::temp_dir().join("grail-fontbook-empty");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("readme.txt"), "no fonts here").unwrap();

    let mut book = FontBook::new();
    assert_eq!(book.load_dir(&dir).unwrap(), 0);
    assert!(book.load_dir(&dir.join("missing")).is_err());

    let book = FontBook::discover(Some(&dir.join("missing")));
    assert!(book.is_empty());
}
