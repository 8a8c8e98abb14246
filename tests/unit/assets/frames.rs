use super::*;
use crate::foundation::core::Color;

#[test]
fn layers_without_source_have_no_frame() {
    let mut p = StillImageProvider::new();
    assert!(p.frame(&Layer::new(1)).is_none());
    assert!(NoFrames.frame(&Layer::new(1)).is_none());
}

#[test]
fn inserted_frames_are_served() {
    let mut p = StillImageProvider::new();
    p.insert("slide.png", Frame::filled(4, 2, Color::WHITE));
    let mut layer = Layer::new(1);
    layer.set_source("slide.png").unwrap();
    let frame = p.frame(&layer).unwrap();
    assert_eq!((frame.width, frame.height), (4, 2));
}

#[test]
fn missing_files_are_remembered() {
    let dir = std::env::temp_dir().join("grail-frames-missing");
    let mut p = StillImageProvider::with_root(&dir);
    let mut layer = Layer::new(2);
    layer.set_source("nope.png").unwrap();
    assert!(p.frame(&layer).is_none());
    assert!(p.cache.contains_key(Path::new("nope.png")));
    assert!(p.frame(&layer).is_none());
}

#[test]
fn files_decode_from_disk() {
    let dir = std::env::temp_dir().join("grail-frames-disk");
    std::fs::create_dir_all(&dir).unwrap();
    let img = image::RgbaImage::from_pixel(3, 5, image::Rgba([1, 2, 3, 255]));
    img.save(dir.join("still.png")).unwrap();

    let mut p = StillImageProvider::with_root(&dir);
    let mut layer = Layer::new(1);
    layer.set_source("still.png").unwrap();
    let frame = p.frame(&layer).unwrap();
    assert_eq!((frame.width, frame.height), (3, 5));
    assert_eq!(frame.pixel(0, 0), Some([1, 2, 3, 255]));
}
