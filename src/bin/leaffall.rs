use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use leaffall::FrameClock as _;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "leaffall", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render a PNG sequence into a directory, or an MP4 when `--out` ends in `.mp4`
    /// (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Turn a gallery listing into items and optionally replay lightbox navigation.
    Gallery(GalleryArgs),
}

#[derive(Args, Debug)]
struct SceneArgs {
    /// Scene config JSON. Flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Leaf sprite: image/SVG path, or an http(s) URL (needs the `remote` feature).
    #[arg(long)]
    sprite: Option<String>,

    /// Logical width.
    #[arg(long)]
    width: Option<f64>,

    /// Logical height.
    #[arg(long)]
    height: Option<f64>,

    /// Device pixel ratio.
    #[arg(long)]
    dpr: Option<f64>,

    /// Number of leaves.
    #[arg(long)]
    leaves: Option<usize>,

    /// RNG seed for a replayable run.
    #[arg(long)]
    seed: Option<u64>,

    /// Enable the slow whole-scene tilt with default parameters.
    #[arg(long)]
    tilt: bool,

    /// Frames per second (integer).
    #[arg(long)]
    fps: Option<u32>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Frame index (0-based). Earlier frames are simulated but not written.
    #[arg(long, default_value_t = 0)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Keep transparency instead of flattening over the configured background.
    #[arg(long)]
    transparent: bool,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Output directory for PNG frames, or an `.mp4` file.
    #[arg(long)]
    out: PathBuf,

    /// Number of frames; defaults to the config's `frames`.
    #[arg(long)]
    frames: Option<u64>,

    /// Keep transparency in PNG frames.
    #[arg(long)]
    transparent: bool,

    /// Pace frames to wall-clock time instead of a fixed step.
    #[arg(long)]
    realtime: bool,
}

#[derive(Args, Debug)]
struct GalleryArgs {
    /// Contents listing JSON on disk.
    #[arg(long, conflicts_with = "url")]
    listing: Option<PathBuf>,

    /// Contents API URL to fetch (needs the `remote` feature). Defaults to the portfolio folder.
    #[arg(long)]
    url: Option<String>,

    /// Open the lightbox at this index after loading.
    #[arg(long, allow_hyphen_values = true)]
    open: Option<isize>,

    /// Comma-separated key names replayed against the lightbox, e.g. `ArrowRight,Escape`.
    #[arg(long, value_delimiter = ',')]
    keys: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Gallery(args) => cmd_gallery(args),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn scene_config(args: &SceneArgs) -> anyhow::Result<leaffall::SceneConfig> {
    let mut cfg = match &args.config {
        Some(path) => leaffall::SceneConfig::from_path(path)?,
        None => leaffall::SceneConfig::default(),
    };
    if let Some(s) = &args.sprite {
        cfg.sprite = Some(s.clone());
    }
    if let Some(w) = args.width {
        cfg.viewport.width = w;
    }
    if let Some(h) = args.height {
        cfg.viewport.height = h;
    }
    if let Some(dpr) = args.dpr {
        cfg.viewport.dpr = dpr;
    }
    if let Some(n) = args.leaves {
        cfg.leaf_count = n;
    }
    if let Some(seed) = args.seed {
        cfg.seed = Some(seed);
    }
    if args.tilt && cfg.tilt.is_none() {
        cfg.tilt = Some(leaffall::TiltConfig::default());
    }
    if let Some(fps) = args.fps {
        cfg.fps = leaffall::Fps::new(fps, 1)?;
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Scene with its sprite loaded at t = 0, wrapped in a CPU frame loop.
fn running_loop(cfg: &leaffall::SceneConfig) -> anyhow::Result<leaffall::FrameLoop> {
    let sprite = cfg
        .sprite
        .as_deref()
        .context("no sprite given; pass --sprite or set `sprite` in the config")?;
    let source = leaffall::SpriteSource::parse(sprite);

    let mut scene = leaffall::LeafScene::from_config(cfg)?;
    scene
        .load_sprite(&source, 0.0)
        .with_context(|| format!("load sprite '{source}'"))?;
    Ok(leaffall::FrameLoop::new(scene, leaffall::BackendKind::Cpu)?)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = scene_config(&args.scene)?;
    let mut frame_loop = running_loop(&cfg)?;

    let fixed = leaffall::FixedStepClock::new(cfg.fps);
    let step = fixed.step_ms();
    let mut clock = fixed.starting_at(step).with_limit(args.frame + 1);

    let mut last = None;
    while let Some(now_ms) = clock.next_timestamp() {
        last = Some(frame_loop.step(now_ms)?.1);
    }
    let frame = last.context("no frame rendered")?;

    let background = (!args.transparent).then_some(cfg.background);
    let mut rgba = Vec::new();
    leaffall::encode_straight_rgba(&mut rgba, &frame, background)?;
    leaffall::write_png(&args.out, &rgba, frame.width, frame.height)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = scene_config(&args.scene)?;
    let frames = args.frames.unwrap_or(cfg.frames);
    anyhow::ensure!(frames > 0, "--frames must be > 0");
    let mut frame_loop = running_loop(&cfg)?;

    let mut sink: Box<dyn leaffall::FrameSink> = if is_mp4(&args.out) {
        let mut opts = leaffall::FfmpegSinkOpts::new(&args.out);
        opts.bg_rgba = cfg.background;
        Box::new(leaffall::FfmpegSink::new(opts))
    } else {
        let sink = leaffall::PngSequenceSink::new(&args.out);
        if args.transparent {
            Box::new(sink)
        } else {
            Box::new(sink.with_background(cfg.background))
        }
    };

    let mut clock: Box<dyn leaffall::FrameClock> = if args.realtime {
        Box::new(leaffall::RealtimeClock::new(cfg.fps).with_limit(frames))
    } else {
        let fixed = leaffall::FixedStepClock::new(cfg.fps);
        let step = fixed.step_ms();
        Box::new(fixed.starting_at(step).with_limit(frames))
    };

    let stats = frame_loop
        .run(clock.as_mut(), sink.as_mut(), cfg.fps)
        .with_context(|| format!("render to '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} frames to {} ({} leaves recycled)",
        stats.frames_rendered,
        args.out.display(),
        stats.leaves_recycled
    );
    Ok(())
}

fn is_mp4(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("mp4"))
}

fn cmd_gallery(args: GalleryArgs) -> anyhow::Result<()> {
    let entries = match (&args.listing, &args.url) {
        (Some(path), _) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read listing '{}'", path.display()))?;
            leaffall::parse_listing(&text)?
        }
        (None, url) => fetch_listing(url.as_deref())?,
    };

    let items = leaffall::gallery_items(&entries);
    let mut lightbox = leaffall::Lightbox::new(items);
    if let Some(i) = args.open {
        lightbox.open(i);
    }
    for key in &args.keys {
        lightbox.handle_key(leaffall::LightboxKey::parse(key));
    }

    let out = serde_json::json!({
        "items": lightbox.items(),
        "open": lightbox.is_open(),
        "current_index": lightbox.current_index(),
        "current": lightbox.current(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

#[cfg(feature = "remote")]
fn fetch_listing(url: Option<&str>) -> anyhow::Result<Vec<leaffall::ListingEntry>> {
    let url = url.map_or_else(|| leaffall::RepoPath::default().api_url(), str::to_owned);
    Ok(leaffall::fetch_listing(&url)?)
}

#[cfg(not(feature = "remote"))]
fn fetch_listing(_url: Option<&str>) -> anyhow::Result<Vec<leaffall::ListingEntry>> {
    anyhow::bail!("fetching a listing needs the `remote` feature; pass --listing instead")
}
