use anyhow::Context;

use crate::assets::sprite::Sprite;
use crate::foundation::error::{LeafFallError, LeafFallResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// Longest side, in pixels, that SVG sprites are rasterized to.
pub(crate) const SVG_RASTER_LONG_SIDE: f32 = 256.0;

/// Decode encoded image bytes (PNG, JPEG, GIF, WebP, ...) into a premultiplied sprite.
pub fn decode_image(bytes: &[u8]) -> LeafFallResult<Sprite> {
    let dyn_img = image::load_from_memory(bytes).context("decode sprite image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Sprite::from_premul_rgba8(width, height, rgba8_premul)
}

/// Parse SVG bytes and rasterize them so the longest side is [`SVG_RASTER_LONG_SIDE`].
pub fn decode_svg(bytes: &[u8]) -> LeafFallResult<Sprite> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse sprite svg tree")?;

    let size = tree.size();
    let (w, h) = (size.width(), size.height());
    if !w.is_finite() || !h.is_finite() || w <= 0.0 || h <= 0.0 {
        return Err(LeafFallError::asset("svg sprite has invalid width/height"));
    }
    let scale = SVG_RASTER_LONG_SIDE / w.max(h);
    let px_w = ((w * scale).ceil() as u32).max(1);
    let px_h = ((h * scale).ceil() as u32).max(1);

    let mut pixmap = resvg::tiny_skia::Pixmap::new(px_w, px_h)
        .ok_or_else(|| LeafFallError::asset("failed to allocate svg sprite pixmap"))?;
    let xform = resvg::tiny_skia::Transform::from_scale(scale, scale);
    resvg::render(&tree, xform, &mut pixmap.as_mut());

    // tiny-skia pixmaps are already premultiplied RGBA8.
    Sprite::from_premul_rgba8(px_w, px_h, pixmap.data().to_vec())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
