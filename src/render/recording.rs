use crate::assets::sprite::Sprite;
use crate::foundation::core::{Affine, Rect};
use crate::foundation::error::LeafFallResult;
use crate::render::surface::{DrawSurface, StateStack};

/// One call that reached a [`RecordingSurface`], with the state in effect at the time.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// `clear_rect` with the transform it was issued under.
    Clear { rect: Rect, transform: Affine },
    /// `draw_image` with the full user-to-device transform and effective alpha.
    Image {
        sprite: u64,
        dst: Rect,
        transform: Affine,
        alpha: f64,
    },
}

/// Surface that records commands instead of rasterizing. Useful for tests and for inspecting
/// the draw order of a frame.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    state: StateStack,
    commands: Vec<DrawCommand>,
    max_depth: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Recorded images in issue order.
    pub fn images(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Image { .. }))
    }

    /// Number of unmatched `save` calls.
    pub fn save_depth(&self) -> usize {
        self.state.depth()
    }

    /// Deepest save nesting seen since the last [`RecordingSurface::take_commands`].
    pub fn max_save_depth(&self) -> usize {
        self.max_depth
    }

    /// Drain the command log, keeping the current state.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        self.max_depth = self.state.depth();
        std::mem::take(&mut self.commands)
    }
}

impl DrawSurface for RecordingSurface {
    fn save(&mut self) {
        self.state.save();
        self.max_depth = self.max_depth.max(self.state.depth());
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
        self.commands.push(DrawCommand::Clear {
            rect,
            transform: self.state.current().transform,
        });
    }

    fn draw_image(&mut self, sprite: &Sprite, dst: Rect) -> LeafFallResult<()> {
        let st = self.state.current();
        self.commands.push(DrawCommand::Image {
            sprite: sprite.id(),
            dst,
            transform: st.transform,
            alpha: st.alpha,
        });
        Ok(())
    }
}
