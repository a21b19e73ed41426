use std::ops::{Deref, DerefMut};

use crate::assets::sprite::Sprite;
use crate::foundation::core::{Affine, Rect, Vec2};
use crate::foundation::error::LeafFallResult;

/// 2D drawing target with canvas-style state: a current transform and a global alpha, saved
/// and restored as a stack.
///
/// Coordinates passed to drawing calls are in the current user space; implementations apply
/// the current transform to reach device pixels.
pub trait DrawSurface {
    /// Push the current transform and alpha.
    fn save(&mut self);

    /// Pop to the last saved state. Restoring with nothing saved is a no-op.
    fn restore(&mut self);

    /// Replace the current transform.
    fn set_transform(&mut self, transform: Affine);

    /// Current transform.
    fn current_transform(&self) -> Affine;

    /// Post-multiply the current transform (the new operation applies first, in local space).
    fn transform(&mut self, transform: Affine) {
        let t = self.current_transform() * transform;
        self.set_transform(t);
    }

    fn translate(&mut self, offset: Vec2) {
        self.transform(Affine::translate(offset));
    }

    fn rotate(&mut self, radians: f64) {
        self.transform(Affine::rotate(radians));
    }

    /// Alpha multiplied into every subsequent draw, clamped to `[0, 1]`.
    fn set_global_alpha(&mut self, alpha: f64);

    /// Reset `rect` (in current user space) to transparent.
    fn clear_rect(&mut self, rect: Rect);

    /// Stretch `sprite` into `dst` (in current user space).
    fn draw_image(&mut self, sprite: &Sprite, dst: Rect) -> LeafFallResult<()>;
}

/// Saves on construction and restores on drop, so a failing draw cannot leak state.
pub struct StateGuard<'a, S: DrawSurface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: DrawSurface + ?Sized> StateGuard<'a, S> {
    pub fn new(surface: &'a mut S) -> Self {
        surface.save();
        Self { surface }
    }
}

impl<S: DrawSurface + ?Sized> Deref for StateGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: DrawSurface + ?Sized> DerefMut for StateGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: DrawSurface + ?Sized> Drop for StateGuard<'_, S> {
    fn drop(&mut self) {
        self.surface.restore();
    }
}

/// Transform + alpha pair tracked by every surface implementation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct SurfaceState {
    pub(crate) transform: Affine,
    pub(crate) alpha: f64,
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            alpha: 1.0,
        }
    }
}

/// Current state plus the saved stack behind it.
#[derive(Clone, Debug, Default)]
pub(crate) struct StateStack {
    current: SurfaceState,
    saved: Vec<SurfaceState>,
}

impl StateStack {
    pub(crate) fn current(&self) -> SurfaceState {
        self.current
    }

    pub(crate) fn depth(&self) -> usize {
        self.saved.len()
    }

    pub(crate) fn save(&mut self) {
        self.saved.push(self.current);
    }

    pub(crate) fn restore(&mut self) {
        if let Some(prev) = self.saved.pop() {
            self.current = prev;
        }
    }

    pub(crate) fn set_transform(&mut self, transform: Affine) {
        self.current.transform = transform;
    }

    pub(crate) fn set_alpha(&mut self, alpha: f64) {
        self.current.alpha = if alpha.is_finite() {
            alpha.clamp(0.0, 1.0)
        } else {
            self.current.alpha
        };
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
