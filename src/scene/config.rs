use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::core::{Fps, Viewport};
use crate::foundation::error::{LeafFallError, LeafFallResult};
use crate::sim::swarm::DEFAULT_LEAF_COUNT;

/// Upper bound on `leaf_count`; the swarm is meant to stay small.
pub const MAX_LEAF_COUNT: usize = 10_000;

/// Scene settings, loaded from JSON.
///
/// Every field is optional in the file; missing fields take the [`Default`] values
/// (1280x720 at dpr 1, 15 leaves, 60 fps, 120 frames, no tilt, opaque black background).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
    pub viewport: ViewportConfig,
    pub leaf_count: usize,
    /// Fixed seed for replayable runs. `None` seeds from the clock.
    pub seed: Option<u64>,
    /// Sprite path or `http(s)://` URL.
    pub sprite: Option<String>,
    pub fps: Fps,
    /// Frames produced by `render`.
    pub frames: u64,
    pub tilt: Option<TiltConfig>,
    /// Straight-alpha RGBA8 the transparent frame is flattened over on export.
    pub background: [u8; 4],
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            viewport: ViewportConfig::default(),
            leaf_count: DEFAULT_LEAF_COUNT,
            seed: None,
            sprite: None,
            fps: Fps { num: 60, den: 1 },
            frames: 120,
            tilt: None,
            background: [0, 0, 0, 255],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewportConfig {
    pub width: f64,
    pub height: f64,
    pub dpr: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            dpr: 1.0,
        }
    }
}

impl ViewportConfig {
    pub fn to_viewport(self) -> LeafFallResult<Viewport> {
        Viewport::new(self.width, self.height, self.dpr)
    }
}

/// Slow whole-scene rotation: `angle = sin(phase) * amplitude_rad`, `phase` advancing by
/// `phase_speed` per nominal 60 Hz frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TiltConfig {
    pub amplitude_rad: f64,
    pub phase_speed: f64,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            amplitude_rad: 0.03,
            phase_speed: 0.003,
        }
    }
}

impl SceneConfig {
    /// Parse a scene config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> LeafFallResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| LeafFallError::serde(format!("parse scene config JSON: {e}")))
    }

    pub fn from_json_str(s: &str) -> LeafFallResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| LeafFallError::serde(format!("parse scene config JSON: {e}")))
    }

    /// Parse a scene config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> LeafFallResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            LeafFallError::validation(format!("open scene config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> LeafFallResult<()> {
        self.viewport.to_viewport()?;
        Fps::new(self.fps.num, self.fps.den)?;
        if self.leaf_count > MAX_LEAF_COUNT {
            return Err(LeafFallError::validation(format!(
                "leaf_count must be <= {MAX_LEAF_COUNT}, got {}",
                self.leaf_count
            )));
        }
        if self.frames == 0 {
            return Err(LeafFallError::validation("frames must be > 0"));
        }
        if let Some(tilt) = &self.tilt {
            tilt.validate()?;
        }
        if let Some(sprite) = &self.sprite
            && sprite.trim().is_empty()
        {
            return Err(LeafFallError::validation("sprite must be non-empty when set"));
        }
        Ok(())
    }
}

impl TiltConfig {
    pub fn validate(&self) -> LeafFallResult<()> {
        if !self.amplitude_rad.is_finite() || !self.phase_speed.is_finite() {
            return Err(LeafFallError::validation("tilt parameters must be finite"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/config.rs"]
mod tests;
