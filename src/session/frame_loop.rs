use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex, Viewport};
use crate::foundation::error::LeafFallResult;
use crate::render::backend::{BackendKind, FrameRGBA, RasterSurface, create_surface};
use crate::scene::runtime::{FrameReport, LeafScene};
use crate::session::clock::{CancelHandle, FrameClock};

/// Counters for one [`FrameLoop::run`].
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct LoopStats {
    /// Frames drawn and handed to the sink.
    pub frames_rendered: u64,
    /// Leaves recycled across all frames.
    pub leaves_recycled: u64,
    /// `true` when the run ended through a [`CancelHandle`] instead of the clock.
    pub cancelled: bool,
    /// Wind value after the last frame.
    pub final_wind: f64,
}

/// Drives a [`LeafScene`] onto a raster surface, one clock tick per frame.
pub struct FrameLoop {
    scene: LeafScene,
    backend: BackendKind,
    surface: Box<dyn RasterSurface>,
    cancel: CancelHandle,
}

impl FrameLoop {
    /// Loop over `scene` with a surface sized to the scene's viewport.
    pub fn new(scene: LeafScene, backend: BackendKind) -> LeafFallResult<Self> {
        let surface = create_surface(backend, scene.viewport())?;
        Ok(Self {
            scene,
            backend,
            surface,
            cancel: CancelHandle::new(),
        })
    }

    pub fn scene(&self) -> &LeafScene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut LeafScene {
        &mut self.scene
    }

    /// Handle that stops [`FrameLoop::run`] before its next frame.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Resize the scene and replace the surface with one of the new raster size.
    pub fn resize(&mut self, viewport: Viewport) -> LeafFallResult<()> {
        self.surface = create_surface(self.backend, viewport)?;
        self.scene.resize(viewport);
        Ok(())
    }

    /// Draw the frame for `now_ms` and read it back.
    pub fn step(&mut self, now_ms: f64) -> LeafFallResult<(FrameReport, FrameRGBA)> {
        self.surface.begin_frame();
        let report = self.scene.frame(now_ms, self.surface.as_mut())?;
        let frame = self.surface.read_frame()?;
        Ok((report, frame))
    }

    /// Pull timestamps from `clock` and push every frame into `sink` until the clock runs out
    /// or the loop is cancelled.
    #[tracing::instrument(skip_all, fields(fps = fps.as_f64()))]
    pub fn run(
        &mut self,
        clock: &mut dyn FrameClock,
        sink: &mut dyn FrameSink,
        fps: Fps,
    ) -> LeafFallResult<LoopStats> {
        let vp = self.scene.viewport();
        sink.begin(SinkConfig {
            width: vp.pixel_width(),
            height: vp.pixel_height(),
            fps,
        })?;
        tracing::info!(width = vp.pixel_width(), height = vp.pixel_height(), "frame loop started");

        let mut stats = LoopStats::default();
        loop {
            if self.cancel.is_cancelled() {
                stats.cancelled = true;
                break;
            }
            let Some(now_ms) = clock.next_timestamp() else {
                break;
            };
            let (report, frame) = self.step(now_ms)?;
            sink.push_frame(FrameIndex(stats.frames_rendered), &frame)?;
            stats.frames_rendered += 1;
            stats.leaves_recycled += report.recycled as u64;
        }
        stats.final_wind = self.scene.wind().value();

        sink.end()?;
        tracing::info!(
            frames = stats.frames_rendered,
            recycled = stats.leaves_recycled,
            cancelled = stats.cancelled,
            "frame loop finished"
        );
        Ok(stats)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/frame_loop.rs"]
mod tests;
