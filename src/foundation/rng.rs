use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// Uniform random source behind every sampled attribute in the scene.
///
/// The scene never reaches for an ambient generator: tests swap in a fixed source, and
/// [`SeededRandom`] makes whole runs replayable from a single `u64`.
pub trait RandomSource {
    /// Uniform sample in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// `a + u * (b - a)` for a fresh `u`. `a > b` is allowed and samples `(b, a]`.
    fn range(&mut self, a: f64, b: f64) -> f64 {
        a + self.next_unit() * (b - a)
    }
}

/// PCG-backed [`RandomSource`].
#[derive(Clone, Debug)]
pub struct SeededRandom {
    seed: u64,
    rng: Pcg64Mcg,
}

impl SeededRandom {
    /// Deterministic source for `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// Source seeded from the wall clock. The seed is logged so a run can be replayed.
    pub fn from_clock() -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x5eed);
        tracing::info!(seed, "seeded leaf rng from clock");
        Self::new(seed)
    }

    /// Seed this source was built from.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/rng.rs"]
mod tests;
