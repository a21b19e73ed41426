use crate::foundation::core::Viewport;
use crate::foundation::error::LeafFallResult;
use crate::render::surface::DrawSurface;

/// One rendered frame, row-major RGBA8.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data.get(i..i + 4).map(|p| [p[0], p[1], p[2], p[3]])
    }
}

/// A [`DrawSurface`] backed by pixels that can be read back.
pub trait RasterSurface: DrawSurface {
    /// Drop any saved state left from the previous frame.
    fn begin_frame(&mut self);

    /// Composite pending work and copy the current pixels out.
    fn read_frame(&mut self) -> LeafFallResult<FrameRGBA>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendKind {
    #[default]
    Cpu,
}

pub fn create_surface(kind: BackendKind, viewport: Viewport) -> LeafFallResult<Box<dyn RasterSurface>> {
    match kind {
        BackendKind::Cpu => Ok(Box::new(crate::render::cpu::CpuSurface::new(viewport)?)),
    }
}
