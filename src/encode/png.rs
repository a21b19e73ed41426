use std::path::{Path, PathBuf};

use crate::encode::ffmpeg::ensure_parent_dir;
use crate::encode::sink::{FrameSink, SinkConfig, check_order, flatten_premul_over_bg};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{LeafFallError, LeafFallResult};
use crate::foundation::math::unpremultiply_rgba8_in_place;
use crate::render::backend::FrameRGBA;

/// Writes every frame as `frame_00000.png`, `frame_00001.png`, ... under one directory.
pub struct PngSequenceSink {
    dir: PathBuf,
    background: Option<[u8; 4]>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
    written: Vec<PathBuf>,
    scratch: Vec<u8>,
}

impl PngSequenceSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            background: None,
            cfg: None,
            last_idx: None,
            written: Vec::new(),
            scratch: Vec::new(),
        }
    }

    /// Flatten frames over `bg_rgba` (straight alpha) instead of keeping transparency.
    pub fn with_background(mut self, bg_rgba: [u8; 4]) -> Self {
        self.background = Some(bg_rgba);
        self
    }

    /// Files written so far, in frame order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn frame_path(&self, idx: FrameIndex) -> PathBuf {
        self.dir.join(format!("frame_{:05}.png", idx.0))
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> LeafFallResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(LeafFallError::validation(
                "png sink width/height must be non-zero",
            ));
        }
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            LeafFallError::render(format!(
                "failed to create frame directory '{}': {e}",
                self.dir.display()
            ))
        })?;
        self.scratch = vec![0u8; cfg.width as usize * cfg.height as usize * 4];
        self.cfg = Some(cfg);
        self.last_idx = None;
        self.written.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> LeafFallResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| LeafFallError::render("png sink not started"))?;
        check_order(self.last_idx, idx)?;
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(LeafFallError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        self.last_idx = Some(idx);

        encode_straight_rgba(&mut self.scratch, frame, self.background)?;
        let path = self.frame_path(idx);
        write_png(&path, &self.scratch, frame.width, frame.height)?;
        self.written.push(path);
        Ok(())
    }

    fn end(&mut self) -> LeafFallResult<()> {
        let frames = self.written.len();
        tracing::debug!(frames, dir = %self.dir.display(), "png sequence complete");
        self.cfg = None;
        Ok(())
    }
}

/// Straight-alpha pixels for `frame` in `dst`, flattened over `background` when given.
pub fn encode_straight_rgba(
    dst: &mut Vec<u8>,
    frame: &FrameRGBA,
    background: Option<[u8; 4]>,
) -> LeafFallResult<()> {
    dst.resize(frame.data.len(), 0);
    match (frame.premultiplied, background) {
        (true, Some(bg)) => flatten_premul_over_bg(dst, &frame.data, bg)?,
        (true, None) => {
            dst.copy_from_slice(&frame.data);
            unpremultiply_rgba8_in_place(dst);
        }
        (false, _) => dst.copy_from_slice(&frame.data),
    }
    Ok(())
}

/// Save straight RGBA8 pixels as a PNG, creating the parent directory.
pub fn write_png(path: &Path, rgba: &[u8], width: u32, height: u32) -> LeafFallResult<()> {
    ensure_parent_dir(path)?;
    image::save_buffer_with_format(
        path,
        rgba,
        width,
        height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| LeafFallError::render(format!("write png '{}': {e}", path.display())))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
