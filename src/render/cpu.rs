use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::sprite::Sprite;
use crate::foundation::core::{Affine, Rect, Viewport};
use crate::foundation::error::{LeafFallError, LeafFallResult};
use crate::foundation::math::premul_over_in_place;
use crate::render::backend::{FrameRGBA, RasterSurface};
use crate::render::surface::{DrawSurface, StateStack};

/// Raster surface powered by `vello_cpu`.
///
/// Draw calls accumulate in a `RenderContext` and are composited onto `target` whenever the
/// frame is read back or a clear needs the pixels below pending work.
pub struct CpuSurface {
    ctx: vello_cpu::RenderContext,
    target: vello_cpu::Pixmap,
    scratch: vello_cpu::Pixmap,
    width: u16,
    height: u16,
    state: StateStack,
    pending: bool,
    paints: HashMap<u64, vello_cpu::Image>,
}

impl CpuSurface {
    /// Surface sized to the viewport's raster (`floor(logical * dpr)`), transparent.
    pub fn new(viewport: Viewport) -> LeafFallResult<Self> {
        let (width, height) = raster_dims(viewport)?;
        Ok(Self {
            ctx: vello_cpu::RenderContext::new(width, height),
            target: vello_cpu::Pixmap::new(width, height),
            scratch: vello_cpu::Pixmap::new(width, height),
            width,
            height,
            state: StateStack::default(),
            pending: false,
            paints: HashMap::new(),
        })
    }

    fn flush_pending(&mut self) -> LeafFallResult<()> {
        if !self.pending {
            return Ok(());
        }
        self.ctx.flush();
        clear_pixmap_to_transparent(&mut self.scratch);
        self.ctx.render_to_pixmap(&mut self.scratch);
        premul_over_in_place(
            self.target.data_as_u8_slice_mut(),
            self.scratch.data_as_u8_slice(),
        )?;
        self.ctx.reset();
        self.pending = false;
        Ok(())
    }

    fn paint_for(&mut self, sprite: &Sprite) -> LeafFallResult<vello_cpu::Image> {
        if let Some(p) = self.paints.get(&sprite.id()) {
            return Ok(p.clone());
        }
        let pixmap = pixmap_from_premul_bytes(sprite.pixels(), sprite.width(), sprite.height())?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.paints.insert(sprite.id(), paint.clone());
        Ok(paint)
    }

    /// Zero the device-space bounding box of `rect` under `transform`.
    fn zero_device_box(&mut self, rect: Rect, transform: Affine) {
        let bbox = transform.transform_rect_bbox(rect);
        let x0 = bbox.x0.floor().clamp(0.0, f64::from(self.width)) as usize;
        let y0 = bbox.y0.floor().clamp(0.0, f64::from(self.height)) as usize;
        let x1 = bbox.x1.ceil().clamp(0.0, f64::from(self.width)) as usize;
        let y1 = bbox.y1.ceil().clamp(0.0, f64::from(self.height)) as usize;
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        let stride = usize::from(self.width) * 4;
        let data = self.target.data_as_u8_slice_mut();
        for y in y0..y1 {
            data[y * stride + x0 * 4..y * stride + x1 * 4].fill(0);
        }
    }

    fn covers_everything(&self, rect: Rect, transform: Affine) -> bool {
        let c = transform.as_coeffs();
        let axis_aligned = c[1] == 0.0 && c[2] == 0.0;
        let bbox = transform.transform_rect_bbox(rect);
        axis_aligned
            && bbox.x0 <= 0.0
            && bbox.y0 <= 0.0
            && bbox.x1 >= f64::from(self.width)
            && bbox.y1 >= f64::from(self.height)
    }
}

impl DrawSurface for CpuSurface {
    fn save(&mut self) {
        self.state.save();
    }

    fn restore(&mut self) {
        self.state.restore();
    }

    fn set_transform(&mut self, transform: Affine) {
        self.state.set_transform(transform);
    }

    fn current_transform(&self) -> Affine {
        self.state.current().transform
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.state.set_alpha(alpha);
    }

    fn clear_rect(&mut self, rect: Rect) {
        let transform = self.state.current().transform;
        if self.covers_everything(rect, transform) {
            // Everything pending would be wiped anyway.
            self.ctx.reset();
            self.pending = false;
            clear_pixmap_to_transparent(&mut self.target);
            return;
        }
        if let Err(err) = self.flush_pending() {
            tracing::warn!(%err, "dropping pending draws before partial clear");
            self.ctx.reset();
            self.pending = false;
        }
        self.zero_device_box(rect, transform);
    }

    fn draw_image(&mut self, sprite: &Sprite, dst: Rect) -> LeafFallResult<()> {
        let st = self.state.current();
        if st.alpha <= 0.0 || dst.width() == 0.0 || dst.height() == 0.0 {
            return Ok(());
        }
        let paint = self.paint_for(sprite)?;
        let (sw, sh) = (f64::from(sprite.width()), f64::from(sprite.height()));

        // Paint space is sprite pixels; map them onto `dst`.
        let tr = st.transform
            * Affine::translate(dst.origin().to_vec2())
            * Affine::scale_non_uniform(dst.width() / sw, dst.height() / sh);

        let ctx = &mut self.ctx;
        ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(affine_to_cpu(tr));
        ctx.set_paint(paint);
        let opacity = st.alpha as f32;
        if opacity < 1.0 {
            ctx.push_opacity_layer(opacity);
        }
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, sw, sh));
        if opacity < 1.0 {
            ctx.pop_layer();
        }
        self.pending = true;
        Ok(())
    }
}

impl RasterSurface for CpuSurface {
    fn begin_frame(&mut self) {
        self.state.reset();
    }

    fn read_frame(&mut self) -> LeafFallResult<FrameRGBA> {
        self.flush_pending()?;
        Ok(FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: self.target.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn raster_dims(viewport: Viewport) -> LeafFallResult<(u16, u16)> {
    let w: u16 = viewport
        .pixel_width()
        .try_into()
        .map_err(|_| LeafFallError::render("surface width exceeds u16"))?;
    let h: u16 = viewport
        .pixel_height()
        .try_into()
        .map_err(|_| LeafFallError::render("surface height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(LeafFallError::render("surface must be at least 1x1 pixels"));
    }
    Ok((w, h))
}

fn clear_pixmap_to_transparent(pixmap: &mut vello_cpu::Pixmap) {
    pixmap.data_as_u8_slice_mut().fill(0);
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> LeafFallResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| LeafFallError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| LeafFallError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(LeafFallError::render("pixmap byte len mismatch"));
    }
    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in bytes.chunks_exact(4) {
        may_have_opacities |= px[3] != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        });
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
