use crate::assets::sprite::Sprite;
use crate::foundation::core::Size;
use crate::foundation::error::LeafFallResult;
use crate::foundation::rng::RandomSource;
use crate::render::surface::DrawSurface;
use crate::sim::leaf::Leaf;

/// Default number of leaves in a swarm.
pub const DEFAULT_LEAF_COUNT: usize = 15;
/// Sparser preset used by the lighter page variant.
pub const SPARSE_LEAF_COUNT: usize = 10;

/// Draw pass a leaf belongs to. Small leaves read as far away and go first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DepthBand {
    Background,
    Foreground,
}

impl DepthBand {
    /// `size <= max_size / 2` is background, anything larger is foreground.
    pub fn classify(size: f64, max_size: f64) -> Self {
        if size <= max_size / 2.0 {
            Self::Background
        } else {
            Self::Foreground
        }
    }
}

/// How many leaves each pass drew.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct BandCounts {
    pub background: usize,
    pub foreground: usize,
}

impl BandCounts {
    pub fn total(self) -> usize {
        self.background + self.foreground
    }
}

/// Fixed-size ordered collection of leaves.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LeafSwarm {
    leaves: Vec<Leaf>,
}

impl LeafSwarm {
    /// `count` fresh leaves spawned in order.
    pub fn generate(count: usize, bounds: Size, rng: &mut dyn RandomSource) -> Self {
        let mut swarm = Self::default();
        swarm.regen(count, bounds, rng);
        swarm
    }

    /// Throw away every leaf and spawn `count` new ones for `bounds`.
    pub fn regen(&mut self, count: usize, bounds: Size, rng: &mut dyn RandomSource) {
        self.leaves.clear();
        self.leaves.reserve(count);
        for _ in 0..count {
            self.leaves.push(Leaf::spawn(bounds, rng));
        }
        tracing::debug!(count, width = bounds.width, height = bounds.height, "regenerated leaf swarm");
    }

    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }

    pub fn leaves_mut(&mut self) -> &mut [Leaf] {
        &mut self.leaves
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Largest leaf size, `None` for an empty swarm.
    pub fn max_size(&self) -> Option<f64> {
        self.leaves.iter().map(|l| l.size).reduce(f64::max)
    }

    /// Update every leaf in order; returns how many were recycled.
    pub fn update(
        &mut self,
        dt_ms: f64,
        bounds: Size,
        wind: f64,
        rng: &mut dyn RandomSource,
    ) -> usize {
        let mut recycled = 0;
        for leaf in &mut self.leaves {
            if leaf.update(dt_ms, bounds, wind, rng) {
                recycled += 1;
            }
        }
        recycled
    }

    /// Leaves in draw order for `max_size`: the background band in swarm order, then the
    /// foreground band in swarm order.
    pub fn draw_order(&self, max_size: f64) -> impl Iterator<Item = (DepthBand, &Leaf)> {
        let band = move |l: &Leaf| DepthBand::classify(l.size, max_size);
        let back = self
            .leaves
            .iter()
            .filter(move |l| band(l) == DepthBand::Background)
            .map(|l| (DepthBand::Background, l));
        let front = self
            .leaves
            .iter()
            .filter(move |l| band(l) == DepthBand::Foreground)
            .map(|l| (DepthBand::Foreground, l));
        back.chain(front)
    }

    /// Draw both bands. `max_size` is taken before the frame's updates so band membership
    /// follows the sizes the frame started with.
    pub fn draw(
        &self,
        surface: &mut dyn DrawSurface,
        sprite: &Sprite,
        max_size: f64,
    ) -> LeafFallResult<BandCounts> {
        let mut counts = BandCounts::default();
        for (band, leaf) in self.draw_order(max_size) {
            leaf.draw(surface, sprite)?;
            match band {
                DepthBand::Background => counts.background += 1,
                DepthBand::Foreground => counts.foreground += 1,
            }
        }
        Ok(counts)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sim/swarm.rs"]
mod tests;
