use crate::assets::sprite::{Sprite, SpriteSource};
use crate::foundation::core::{FrameIndex, Viewport};
use crate::foundation::error::{LeafFallError, LeafFallResult};
use crate::foundation::rng::{RandomSource, SeededRandom};
use crate::render::surface::{DrawSurface, StateGuard};
use crate::scene::config::{SceneConfig, TiltConfig};
use crate::sim::leaf::FRAME_MS;
use crate::sim::swarm::{BandCounts, LeafSwarm};
use crate::sim::wind::WindField;

/// Lifecycle of a [`LeafScene`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SceneState {
    /// Waiting for the sprite; frames are refused.
    Uninitialized,
    /// Sprite loaded and swarm populated.
    Running,
    /// Sprite failed to load. Terminal.
    Failed(String),
}

/// What one call to [`LeafScene::frame`] did.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct FrameReport {
    pub frame: FrameIndex,
    pub dt_ms: f64,
    /// Wind the leaves were updated with (the value left by the previous frame).
    pub wind: f64,
    pub bands: BandCounts,
    pub recycled: usize,
    /// Tilt applied to the draw passes, when tilt is enabled.
    pub tilt_angle: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct TiltOscillator {
    cfg: TiltConfig,
    phase: f64,
}

impl TiltOscillator {
    fn advance(&mut self, s: f64) -> f64 {
        self.phase += self.cfg.phase_speed * s;
        self.phase.sin() * self.cfg.amplitude_rad
    }
}

/// Owns everything one falling-leaves animation needs between frames.
pub struct LeafScene {
    viewport: Viewport,
    leaf_count: usize,
    sprite: Option<Sprite>,
    swarm: LeafSwarm,
    wind: WindField,
    last_ms: f64,
    frames_drawn: u64,
    tilt: Option<TiltOscillator>,
    rng: Box<dyn RandomSource>,
    state: SceneState,
}

impl std::fmt::Debug for LeafScene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeafScene")
            .field("viewport", &self.viewport)
            .field("leaf_count", &self.leaf_count)
            .field("leaves", &self.swarm.len())
            .field("wind", &self.wind.value())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl LeafScene {
    /// Scene in the `Uninitialized` state with an injected random source.
    pub fn new(viewport: Viewport, leaf_count: usize, rng: Box<dyn RandomSource>) -> Self {
        Self {
            viewport,
            leaf_count,
            sprite: None,
            swarm: LeafSwarm::default(),
            wind: WindField::new(),
            last_ms: 0.0,
            frames_drawn: 0,
            tilt: None,
            rng,
            state: SceneState::Uninitialized,
        }
    }

    /// Scene built from a validated config. Seeds from `cfg.seed`, or the clock when unset.
    pub fn from_config(cfg: &SceneConfig) -> LeafFallResult<Self> {
        cfg.validate()?;
        let rng: Box<dyn RandomSource> = match cfg.seed {
            Some(seed) => Box::new(SeededRandom::new(seed)),
            None => Box::new(SeededRandom::from_clock()),
        };
        let mut scene = Self::new(cfg.viewport.to_viewport()?, cfg.leaf_count, rng);
        if let Some(tilt) = cfg.tilt {
            scene = scene.with_tilt(tilt);
        }
        Ok(scene)
    }

    pub fn with_tilt(mut self, cfg: TiltConfig) -> Self {
        self.tilt = Some(TiltOscillator { cfg, phase: 0.0 });
        self
    }

    pub fn with_wind(mut self, wind: WindField) -> Self {
        self.wind = wind;
        self
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SceneState::Running
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn swarm(&self) -> &LeafSwarm {
        &self.swarm
    }

    pub fn wind(&self) -> WindField {
        self.wind
    }

    pub fn sprite(&self) -> Option<&Sprite> {
        self.sprite.as_ref()
    }

    /// Frames drawn since the sprite arrived.
    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// Sprite finished loading at `now_ms`: populate the swarm and start running.
    /// Only valid once, from `Uninitialized`.
    pub fn on_sprite_loaded(&mut self, sprite: Sprite, now_ms: f64) -> LeafFallResult<()> {
        match &self.state {
            SceneState::Uninitialized => {}
            SceneState::Running => {
                return Err(LeafFallError::validation("sprite already loaded"));
            }
            SceneState::Failed(reason) => {
                return Err(LeafFallError::validation(format!(
                    "scene already failed: {reason}"
                )));
            }
        }
        self.sprite = Some(sprite);
        self.swarm
            .regen(self.leaf_count, self.viewport.logical_size(), self.rng.as_mut());
        self.last_ms = now_ms;
        self.state = SceneState::Running;
        tracing::info!(leaves = self.swarm.len(), now_ms, "leaf scene running");
        Ok(())
    }

    /// Sprite could not be loaded. The scene stops accepting frames.
    pub fn on_sprite_failed(&mut self, err: &LeafFallError) {
        tracing::warn!(%err, "sprite failed to load; leaf scene disabled");
        if self.state == SceneState::Uninitialized {
            self.state = SceneState::Failed(err.to_string());
        }
    }

    /// Load `source` and feed the outcome into the lifecycle.
    #[tracing::instrument(skip(self))]
    pub fn load_sprite(&mut self, source: &SpriteSource, now_ms: f64) -> LeafFallResult<()> {
        match source.load() {
            Ok(sprite) => self.on_sprite_loaded(sprite, now_ms),
            Err(err) => {
                self.on_sprite_failed(&err);
                Err(err)
            }
        }
    }

    /// New viewport size. A running scene regenerates its swarm immediately.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if self.is_running() {
            self.swarm
                .regen(self.leaf_count, viewport.logical_size(), self.rng.as_mut());
        }
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            dpr = viewport.dpr,
            "leaf scene resized"
        );
    }

    /// Advance to `now_ms` and draw one frame onto `surface`.
    pub fn frame(
        &mut self,
        now_ms: f64,
        surface: &mut dyn DrawSurface,
    ) -> LeafFallResult<FrameReport> {
        let sprite = match (&self.state, self.sprite.as_ref()) {
            (SceneState::Running, Some(sprite)) => sprite,
            (SceneState::Failed(reason), _) => {
                return Err(LeafFallError::asset(format!(
                    "leaf sprite failed to load: {reason}"
                )));
            }
            _ => {
                return Err(LeafFallError::validation(
                    "frame requested before the sprite finished loading",
                ));
            }
        };

        let mut dt_ms = now_ms - self.last_ms;
        if !dt_ms.is_finite() || dt_ms < 0.0 {
            tracing::warn!(now_ms, last_ms = self.last_ms, "non-monotonic frame timestamp");
            dt_ms = 0.0;
        }
        self.last_ms = now_ms;

        surface.set_transform(self.viewport.base_transform());
        surface.set_global_alpha(1.0);
        surface.clear_rect(self.viewport.logical_rect());

        let bounds = self.viewport.logical_size();
        let max_size = self.swarm.max_size().unwrap_or(0.0);
        let wind = self.wind.value();
        let recycled = self.swarm.update(dt_ms, bounds, wind, self.rng.as_mut());

        let tilt_angle = self.tilt.as_mut().map(|t| t.advance(dt_ms / FRAME_MS));
        let bands = match tilt_angle {
            Some(angle) => {
                let center = self.viewport.center().to_vec2();
                let mut g = StateGuard::new(surface);
                g.translate(center);
                g.rotate(angle);
                g.translate(-center);
                self.swarm.draw(&mut *g, sprite, max_size)?
            }
            None => self.swarm.draw(surface, sprite, max_size)?,
        };

        self.wind.advance(self.rng.as_mut());

        let report = FrameReport {
            frame: FrameIndex(self.frames_drawn),
            dt_ms,
            wind,
            bands,
            recycled,
            tilt_angle,
        };
        self.frames_drawn += 1;
        Ok(report)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/runtime.rs"]
mod tests;
