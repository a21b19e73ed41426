use super::*;
use crate::foundation::core::Vec2;
use crate::render::backend::{BackendKind, create_surface};

fn red_sprite() -> Sprite {
    Sprite::from_premul_rgba8(2, 2, [255, 0, 0, 255].repeat(4)).unwrap()
}

fn viewport(w: f64, h: f64, dpr: f64) -> Viewport {
    Viewport::new(w, h, dpr).unwrap()
}

#[test]
fn raster_is_floor_of_logical_times_dpr() {
    let mut s = CpuSurface::new(viewport(10.5, 7.0, 1.5)).unwrap();
    let frame = s.read_frame().unwrap();
    assert_eq!((frame.width, frame.height), (15, 10));
    assert!(frame.premultiplied);
    assert!(frame.data.iter().all(|&b| b == 0));
}

#[test]
fn draw_image_covers_destination_rect() {
    let mut s = CpuSurface::new(viewport(16.0, 16.0, 1.0)).unwrap();
    s.draw_image(&red_sprite(), Rect::new(4.0, 4.0, 12.0, 12.0))
        .unwrap();
    let frame = s.read_frame().unwrap();
    assert_eq!(frame.pixel(8, 8), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(1, 1), Some([0, 0, 0, 0]));
    assert_eq!(frame.pixel(14, 14), Some([0, 0, 0, 0]));
}

#[test]
fn global_alpha_scales_coverage() {
    let mut s = CpuSurface::new(viewport(8.0, 8.0, 1.0)).unwrap();
    s.set_global_alpha(0.5);
    s.draw_image(&red_sprite(), Rect::new(0.0, 0.0, 8.0, 8.0))
        .unwrap();
    let px = s.read_frame().unwrap().pixel(4, 4).unwrap();
    assert!((120..=136).contains(&px[3]), "alpha {px:?}");
    assert!((120..=136).contains(&px[0]), "red {px:?}");
}

#[test]
fn transform_moves_the_draw() {
    let mut s = CpuSurface::new(viewport(16.0, 16.0, 1.0)).unwrap();
    s.translate(Vec2::new(8.0, 8.0));
    s.draw_image(&red_sprite(), Rect::new(0.0, 0.0, 8.0, 8.0))
        .unwrap();
    let frame = s.read_frame().unwrap();
    assert_eq!(frame.pixel(12, 12), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(4, 4), Some([0, 0, 0, 0]));
}

#[test]
fn full_clear_discards_pending_draws() {
    let mut s = CpuSurface::new(viewport(8.0, 8.0, 1.0)).unwrap();
    s.draw_image(&red_sprite(), Rect::new(0.0, 0.0, 8.0, 8.0))
        .unwrap();
    s.clear_rect(Rect::new(0.0, 0.0, 8.0, 8.0));
    let frame = s.read_frame().unwrap();
    assert!(frame.data.iter().all(|&b| b == 0));
}

#[test]
fn partial_clear_keeps_pixels_outside_the_box() {
    let mut s = CpuSurface::new(viewport(8.0, 8.0, 1.0)).unwrap();
    s.draw_image(&red_sprite(), Rect::new(0.0, 0.0, 8.0, 8.0))
        .unwrap();
    s.clear_rect(Rect::new(0.0, 0.0, 4.0, 8.0));
    let frame = s.read_frame().unwrap();
    assert_eq!(frame.pixel(1, 4), Some([0, 0, 0, 0]));
    assert_eq!(frame.pixel(6, 4), Some([255, 0, 0, 255]));
}

#[test]
fn dpr_scales_logical_draws() {
    let vp = viewport(8.0, 8.0, 2.0);
    let mut s = create_surface(BackendKind::Cpu, vp).unwrap();
    s.set_transform(vp.base_transform());
    s.draw_image(&red_sprite(), Rect::new(0.0, 0.0, 4.0, 4.0))
        .unwrap();
    let frame = s.read_frame().unwrap();
    assert_eq!((frame.width, frame.height), (16, 16));
    assert_eq!(frame.pixel(6, 6), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(10, 10), Some([0, 0, 0, 0]));
}

#[test]
fn sprite_paint_is_cached_by_id() {
    let mut s = CpuSurface::new(viewport(4.0, 4.0, 1.0)).unwrap();
    let sprite = red_sprite();
    s.draw_image(&sprite, Rect::new(0.0, 0.0, 2.0, 2.0)).unwrap();
    s.draw_image(&sprite.clone(), Rect::new(2.0, 2.0, 4.0, 4.0))
        .unwrap();
    assert_eq!(s.paints.len(), 1);
}

#[test]
fn pixmap_builder_rejects_short_buffers() {
    assert!(pixmap_from_premul_bytes(&[0; 12], 2, 2).is_err());
}
