use std::f64::consts::TAU;

use crate::assets::sprite::Sprite;
use crate::foundation::core::{Affine, Point, Rect, Size, Vec2};
use crate::foundation::error::LeafFallResult;
use crate::foundation::rng::RandomSource;
use crate::render::surface::{DrawSurface, StateGuard};

/// Milliseconds in one nominal 60 Hz frame; `update` scales all motion by `dt / FRAME_MS`.
pub const FRAME_MS: f64 = 16.6667;

const WIND_EASE: f64 = 0.002;
const SWAY_COUPLING: f64 = 0.001;
const DRIFT_SCALE: f64 = 0.12;
const FALL_SCALE: f64 = 0.06;
const BOTTOM_MARGIN: f64 = 40.0;
const SIDE_MARGIN: f64 = 100.0;
const SPAWN_TOP: f64 = -10.0;

/// Sampling interval for `rand(start, end)`. `start > end` is allowed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Span {
    pub start: f64,
    pub end: f64,
}

impl Span {
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn sample(self, rng: &mut dyn RandomSource) -> f64 {
        rng.range(self.start, self.end)
    }

    pub fn contains(self, v: f64) -> bool {
        let (lo, hi) = if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        };
        (lo..=hi).contains(&v)
    }

    pub fn midpoint(self) -> f64 {
        self.start + 0.5 * (self.end - self.start)
    }
}

pub const DRIFT_SPAN: Span = Span::new(-0.2, 0.2);
pub const FALL_SPAN: Span = Span::new(0.6, 2.2);
pub const SIZE_SPAN: Span = Span::new(40.0, 100.0);
pub const ROTATION_SPAN: Span = Span::new(0.0, TAU);
pub const ANGULAR_SPEED_SPAN: Span = Span::new(-0.02, 0.02);
pub const SWAY_PHASE_SPAN: Span = Span::new(0.0, TAU);
pub const SWAY_SPEED_SPAN: Span = Span::new(0.005, 0.015);
pub const SWAY_AMPLITUDE_SPAN: Span = Span::new(6.0, 28.0);
pub const OPACITY_SPAN: Span = Span::new(0.6, 1.0);
/// Vertical band recycled leaves re-enter through, above the viewport.
pub const REENTRY_SPAN: Span = Span::new(-200.0, -10.0);

/// One falling leaf sprite.
///
/// `size` doubles as visual scale, drift/fall speed multiplier and depth band key.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Leaf {
    /// Logical pixels, unbounded until the leaf is recycled.
    pub position: Point,
    /// `x` eases toward the wind; `y` is the fall speed.
    pub velocity: Vec2,
    pub size: f64,
    pub rotation: f64,
    pub angular_speed: f64,
    pub sway_phase: f64,
    pub sway_speed: f64,
    pub sway_amplitude: f64,
    pub opacity: f64,
}

impl Leaf {
    /// Fresh leaf with every attribute sampled for a viewport of `bounds`.
    pub fn spawn(bounds: Size, rng: &mut dyn RandomSource) -> Self {
        let mut leaf = Self {
            position: Point::ZERO,
            velocity: Vec2::ZERO,
            size: SIZE_SPAN.start,
            rotation: 0.0,
            angular_speed: 0.0,
            sway_phase: 0.0,
            sway_speed: 0.0,
            sway_amplitude: 0.0,
            opacity: 1.0,
        };
        leaf.reset(bounds, rng);
        leaf
    }

    /// Resample all attributes. `y` lands between the viewport height and just above the top.
    pub fn reset(&mut self, bounds: Size, rng: &mut dyn RandomSource) {
        let x = Span::new(0.0, bounds.width).sample(rng);
        let y = Span::new(bounds.height, SPAWN_TOP).sample(rng);
        self.position = Point::new(x, y);
        let vx = DRIFT_SPAN.sample(rng);
        let vy = FALL_SPAN.sample(rng);
        self.velocity = Vec2::new(vx, vy);
        self.size = SIZE_SPAN.sample(rng);
        self.rotation = ROTATION_SPAN.sample(rng);
        self.angular_speed = ANGULAR_SPEED_SPAN.sample(rng);
        self.sway_phase = SWAY_PHASE_SPAN.sample(rng);
        self.sway_speed = SWAY_SPEED_SPAN.sample(rng);
        self.sway_amplitude = SWAY_AMPLITUDE_SPAN.sample(rng);
        self.opacity = OPACITY_SPAN.sample(rng);
    }

    /// Advance by `dt_ms` against `wind`. Returns `true` when the leaf left the viewport and was
    /// recycled to re-enter from above.
    pub fn update(
        &mut self,
        dt_ms: f64,
        bounds: Size,
        wind: f64,
        rng: &mut dyn RandomSource,
    ) -> bool {
        let s = dt_ms / FRAME_MS;

        self.sway_phase += self.sway_speed * s;
        let sway = self.sway_phase.sin() * self.sway_amplitude;

        self.velocity.x += (wind - self.velocity.x) * WIND_EASE * s;
        self.position.x += (self.velocity.x + sway * SWAY_COUPLING) * self.size * DRIFT_SCALE * s;
        self.position.y += self.velocity.y * self.size * FALL_SCALE * s;
        self.rotation += self.angular_speed * s;

        if self.is_out_of_bounds(bounds) {
            self.reset(bounds, rng);
            self.position.y = REENTRY_SPAN.sample(rng);
            return true;
        }
        false
    }

    /// Fully below the viewport (with margin) or drifted past either side margin.
    pub fn is_out_of_bounds(&self, bounds: Size) -> bool {
        self.position.y - self.size > bounds.height + BOTTOM_MARGIN
            || self.position.x < -SIDE_MARGIN
            || self.position.x > bounds.width + SIDE_MARGIN
    }

    /// Leaf-local to logical space: translate to the position, then spin.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.position.to_vec2()) * Affine::rotate(self.rotation)
    }

    /// Square the sprite is stretched into, centered on the leaf origin.
    pub fn sprite_rect(&self) -> Rect {
        let half = self.size / 2.0;
        Rect::new(-half, -half, half, half)
    }

    /// Draw inside a saved surface state; the previous transform and alpha come back even when
    /// the blit fails.
    pub fn draw(&self, surface: &mut dyn DrawSurface, sprite: &Sprite) -> LeafFallResult<()> {
        let mut s = StateGuard::new(surface);
        s.set_global_alpha(self.opacity);
        s.translate(self.position.to_vec2());
        s.rotate(self.rotation);
        s.draw_image(sprite, self.sprite_rect())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sim/leaf.rs"]
mod tests;
