use crate::foundation::rng::RandomSource;

/// Bound on the wind magnitude.
pub const WIND_LIMIT: f64 = 1.2;
/// Largest per-frame change of the wind value.
pub const WIND_JITTER: f64 = 0.02;

/// Slowly wandering global wind, shared by every leaf in a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WindField {
    value: f64,
}

impl WindField {
    /// Calm wind (value 0).
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from `value`, clamped into `[-WIND_LIMIT, WIND_LIMIT]`. Non-finite input is calm.
    pub fn with_value(value: f64) -> Self {
        let value = if value.is_finite() {
            value.clamp(-WIND_LIMIT, WIND_LIMIT)
        } else {
            0.0
        };
        Self { value }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Random walk step: add `U(-WIND_JITTER, WIND_JITTER)`, then clamp.
    pub fn advance(&mut self, rng: &mut dyn RandomSource) {
        self.value = (self.value + rng.range(-WIND_JITTER, WIND_JITTER)).clamp(-WIND_LIMIT, WIND_LIMIT);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sim/wind.rs"]
mod tests;
