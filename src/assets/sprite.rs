use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::assets::decode::{decode_image, decode_svg};
use crate::foundation::error::{LeafFallError, LeafFallResult};
use crate::foundation::math::Fnv1a64;

/// Decoded leaf image shared by every draw call.
///
/// Pixels are premultiplied RGBA8, row-major, tightly packed. Cloning is cheap: the pixel
/// buffer sits behind an `Arc` and is never mutated after decode.
#[derive(Clone, Debug)]
pub struct Sprite {
    id: u64,
    width: u32,
    height: u32,
    rgba8_premul: Arc<Vec<u8>>,
}

impl Sprite {
    /// Wrap already-premultiplied RGBA8 pixels.
    pub fn from_premul_rgba8(width: u32, height: u32, rgba8_premul: Vec<u8>) -> LeafFallResult<Self> {
        if width == 0 || height == 0 {
            return Err(LeafFallError::asset("sprite must be at least 1x1"));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(LeafFallError::asset(format!(
                "sprite {width}x{height} exceeds {}x{}",
                u16::MAX,
                u16::MAX
            )));
        }
        let expected = (width as usize) * (height as usize) * 4;
        if rgba8_premul.len() != expected {
            return Err(LeafFallError::asset(format!(
                "sprite byte len mismatch: got {}, expected {expected}",
                rgba8_premul.len()
            )));
        }

        let mut h = Fnv1a64::new_default();
        h.write_u32(width);
        h.write_u32(height);
        h.write_bytes(&rgba8_premul);

        Ok(Self {
            id: h.finish(),
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Content hash; equal pixels give equal ids.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.rgba8_premul
    }
}

/// Where the leaf sprite comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpriteSource {
    /// Local file; `.svg` is rasterized, anything else goes through `image`.
    Path(PathBuf),
    /// Remote resource fetched with a single GET (feature `remote`).
    Url(String),
}

impl SpriteSource {
    /// Classify a CLI/config string: `http://` and `https://` are URLs, everything else a path.
    pub fn parse(s: &str) -> Self {
        if s.starts_with("http://") || s.starts_with("https://") {
            Self::Url(s.to_owned())
        } else {
            Self::Path(PathBuf::from(s))
        }
    }

    /// Fetch and decode. Failures are returned, never retried.
    #[tracing::instrument]
    pub fn load(&self) -> LeafFallResult<Sprite> {
        let sprite = match self {
            Self::Path(p) => {
                let bytes = std::fs::read(p).map_err(|e| {
                    LeafFallError::asset(format!("failed to read sprite '{}': {e}", p.display()))
                })?;
                decode_sprite_bytes(&bytes, is_svg_path(p))?
            }
            Self::Url(url) => load_remote(url)?,
        };
        tracing::debug!(
            width = sprite.width(),
            height = sprite.height(),
            id = sprite.id(),
            "sprite decoded"
        );
        Ok(sprite)
    }
}

impl std::fmt::Display for SpriteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Path(p) => write!(f, "{}", p.display()),
            Self::Url(u) => f.write_str(u),
        }
    }
}

fn is_svg_path(p: &Path) -> bool {
    p.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"))
}

fn sniff_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let head = String::from_utf8_lossy(head);
    let head = head.trim_start_matches('\u{feff}').trim_start();
    head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg"))
}

pub(crate) fn decode_sprite_bytes(bytes: &[u8], svg_hint: bool) -> LeafFallResult<Sprite> {
    if svg_hint || sniff_svg(bytes) {
        decode_svg(bytes)
    } else {
        decode_image(bytes)
    }
}

#[cfg(feature = "remote")]
fn load_remote(url: &str) -> LeafFallResult<Sprite> {
    let bytes = crate::gallery::fetch::fetch_bytes(url)?;
    let svg_hint = url
        .split(['?', '#'])
        .next()
        .is_some_and(|p| p.to_ascii_lowercase().ends_with(".svg"));
    decode_sprite_bytes(&bytes, svg_hint)
}

#[cfg(not(feature = "remote"))]
fn load_remote(url: &str) -> LeafFallResult<Sprite> {
    Err(LeafFallError::asset(format!(
        "cannot fetch sprite '{url}': built without the `remote` feature"
    )))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/sprite.rs"]
mod tests;
