use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn from_premul_validates_buffer_length() {
    assert!(Sprite::from_premul_rgba8(2, 2, vec![0; 15]).is_err());
    assert!(Sprite::from_premul_rgba8(0, 2, vec![]).is_err());
    let s = Sprite::from_premul_rgba8(2, 2, vec![0; 16]).unwrap();
    assert_eq!((s.width(), s.height()), (2, 2));
}

#[test]
fn id_is_a_content_hash() {
    let a = Sprite::from_premul_rgba8(1, 1, vec![1, 2, 3, 255]).unwrap();
    let b = Sprite::from_premul_rgba8(1, 1, vec![1, 2, 3, 255]).unwrap();
    let c = Sprite::from_premul_rgba8(1, 1, vec![3, 2, 1, 255]).unwrap();
    assert_eq!(a.id(), b.id());
    assert_ne!(a.id(), c.id());
}

#[test]
fn clones_share_pixels() {
    let a = Sprite::from_premul_rgba8(1, 1, vec![1, 2, 3, 255]).unwrap();
    let b = a.clone();
    assert!(std::ptr::eq(a.pixels().as_ptr(), b.pixels().as_ptr()));
}

#[test]
fn parse_splits_urls_from_paths() {
    assert_eq!(
        SpriteSource::parse("https://example.com/leaf.png"),
        SpriteSource::Url("https://example.com/leaf.png".to_owned())
    );
    assert_eq!(
        SpriteSource::parse("assets/leaf.png"),
        SpriteSource::Path(PathBuf::from("assets/leaf.png"))
    );
}

#[test]
fn load_reads_png_from_disk() {
    let dir = PathBuf::from("target").join("unit_sprite_load");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("leaf.png");
    std::fs::write(&path, png_bytes(3, 2, [255, 0, 0, 255])).unwrap();

    let sprite = SpriteSource::Path(path).load().unwrap();
    assert_eq!((sprite.width(), sprite.height()), (3, 2));
    assert_eq!(&sprite.pixels()[..4], &[255, 0, 0, 255]);
}

#[test]
fn load_reports_missing_file_as_asset_error() {
    let err = SpriteSource::Path(PathBuf::from("target/no/such/leaf.png"))
        .load()
        .unwrap_err();
    assert!(matches!(err, LeafFallError::Asset(_)));
}

#[test]
fn svg_is_detected_by_content() {
    assert!(sniff_svg(br#"<?xml version="1.0"?><svg></svg>"#));
    assert!(sniff_svg(b"  <svg xmlns='x'/>"));
    assert!(!sniff_svg(&png_bytes(1, 1, [0, 0, 0, 0])));
}

#[cfg(not(feature = "remote"))]
#[test]
fn url_without_remote_feature_is_an_asset_error() {
    let err = SpriteSource::Url("https://example.com/leaf.png".to_owned())
        .load()
        .unwrap_err();
    assert!(err.to_string().contains("remote"));
}
