use crate::foundation::error::{LeafFallError, LeafFallResult};

pub use kurbo::{Affine, Point, Rect, Size, Vec2};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> LeafFallResult<Self> {
        if den == 0 {
            return Err(LeafFallError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(LeafFallError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    pub fn frame_duration_ms(self) -> f64 {
        1000.0 * f64::from(self.den) / f64::from(self.num)
    }

    pub fn frames_to_ms(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_ms()
    }
}

/// Logical drawing area plus the device pixel ratio used to size the raster behind it.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub dpr: f64, // clamped to >= 1
}

impl Viewport {
    pub fn new(width: f64, height: f64, dpr: f64) -> LeafFallResult<Self> {
        if !width.is_finite() || !height.is_finite() || width < 1.0 || height < 1.0 {
            return Err(LeafFallError::validation(format!(
                "viewport must be at least 1x1 logical pixels, got {width}x{height}"
            )));
        }
        let dpr = if dpr.is_finite() { dpr.max(1.0) } else { 1.0 };
        let vp = Self { width, height, dpr };
        if vp.pixel_width() > u32::from(u16::MAX) || vp.pixel_height() > u32::from(u16::MAX) {
            return Err(LeafFallError::validation(format!(
                "viewport raster {}x{} exceeds {}x{}",
                vp.pixel_width(),
                vp.pixel_height(),
                u16::MAX,
                u16::MAX
            )));
        }
        Ok(vp)
    }

    pub fn pixel_width(self) -> u32 {
        (self.width * self.dpr).floor() as u32
    }

    pub fn pixel_height(self) -> u32 {
        (self.height * self.dpr).floor() as u32
    }

    /// Size in logical units as seen by the simulation: raster size divided by `dpr`.
    pub fn logical_size(self) -> Size {
        Size::new(
            f64::from(self.pixel_width()) / self.dpr,
            f64::from(self.pixel_height()) / self.dpr,
        )
    }

    pub fn logical_rect(self) -> Rect {
        self.logical_size().to_rect()
    }

    pub fn center(self) -> Point {
        self.logical_rect().center()
    }

    /// Maps logical units to raster pixels.
    pub fn base_transform(self) -> Affine {
        Affine::scale(self.dpr)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
