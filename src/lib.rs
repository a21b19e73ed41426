//! Leaffall renders a decorative scene of falling, swaying leaf sprites pushed by a slowly
//! wandering wind.
//!
//! The public API is scene-oriented:
//!
//! - Build a [`LeafScene`] (from a [`SceneConfig`] or an injected [`RandomSource`])
//! - Hand it a [`Sprite`] once the asset is available
//! - Call [`LeafScene::frame`] with a timestamp and any [`DrawSurface`], or let a [`FrameLoop`]
//!   drive it from a [`FrameClock`] into a [`FrameSink`]
//!
//! The [`Lightbox`] and listing helpers model the image gallery the scene sits behind.
#![forbid(unsafe_code)]

mod assets;
mod foundation;

/// Frame sinks: in-memory, PNG sequence, ffmpeg MP4.
pub mod encode;
/// Gallery listing and lightbox state.
pub mod gallery;
/// Drawing surfaces.
pub mod render;
/// Scene configuration and lifecycle.
pub mod scene;
/// Clocks and the frame loop.
pub mod session;
/// Leaf particles, swarm and wind.
pub mod sim;

pub use crate::foundation::core::{Affine, Fps, FrameIndex, Point, Rect, Size, Vec2, Viewport};
pub use crate::foundation::error::{LeafFallError, LeafFallResult};
pub use crate::foundation::rng::{RandomSource, SeededRandom};

pub use crate::assets::decode::{decode_image, decode_svg};
pub use crate::assets::sprite::{Sprite, SpriteSource};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::png::{PngSequenceSink, encode_straight_rgba, write_png};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
#[cfg(feature = "remote")]
pub use crate::gallery::fetch::{fetch_bytes, fetch_listing};
pub use crate::gallery::lightbox::{Lightbox, LightboxKey, Thumbnail};
pub use crate::gallery::listing::{
    GALLERY_DESC, GalleryItem, ListingEntry, RepoPath, gallery_items, is_image_name,
    parse_listing, title_from_filename,
};
pub use crate::render::backend::{BackendKind, FrameRGBA, RasterSurface, create_surface};
pub use crate::render::cpu::CpuSurface;
pub use crate::render::recording::{DrawCommand, RecordingSurface};
pub use crate::render::surface::{DrawSurface, StateGuard};
pub use crate::scene::config::{SceneConfig, TiltConfig, ViewportConfig};
pub use crate::scene::runtime::{FrameReport, LeafScene, SceneState};
pub use crate::session::clock::{CancelHandle, FixedStepClock, FrameClock, RealtimeClock};
pub use crate::session::frame_loop::{FrameLoop, LoopStats};
pub use crate::sim::leaf::{FRAME_MS, Leaf, Span};
pub use crate::sim::swarm::{
    BandCounts, DEFAULT_LEAF_COUNT, DepthBand, LeafSwarm, SPARSE_LEAF_COUNT,
};
pub use crate::sim::wind::{WIND_JITTER, WIND_LIMIT, WindField};
