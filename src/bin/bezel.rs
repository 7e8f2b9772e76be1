use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "bezel", version)]
struct Cli {
    /// Log at debug level (overridden by `RUST_LOG`).
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one bezel frame as a PNG.
    Render(RenderArgs),
    /// Print the bezel geometry for a viewport as JSON.
    Geometry(GeometryArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Viewport width in logical pixels.
    #[arg(long)]
    width: f64,

    /// Viewport height in logical pixels.
    #[arg(long)]
    height: f64,

    /// Device pixel ratio.
    #[arg(long, default_value_t = 1.0)]
    density: f64,

    /// Grain texture file; overrides the configured texture url.
    #[arg(long)]
    texture: Option<PathBuf>,

    /// Bezel config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Render as if the surface had no blur filter (drops edge lighting).
    #[arg(long)]
    no_blur: bool,

    /// Add the monitor inset overlays to the configured style.
    #[arg(long)]
    monitor: bool,

    /// How long to wait for the texture before writing the frame.
    #[arg(long, default_value_t = 2000)]
    wait_ms: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct GeometryArgs {
    /// Viewport width in logical pixels.
    #[arg(long)]
    width: f64,

    /// Viewport height in logical pixels.
    #[arg(long)]
    height: f64,

    /// Bezel config JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Geometry(args) => cmd_geometry(args),
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_config(path: Option<&Path>) -> anyhow::Result<bezel::BezelConfig> {
    match path {
        Some(p) => Ok(bezel::BezelConfig::from_json_path(p)?),
        None => Ok(bezel::BezelConfig::default()),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut config = read_config(args.config.as_deref())?;
    if args.monitor {
        let preset = bezel::LayerStyle::monitor();
        config.style.screen_insets = preset.screen_insets;
        config.style.frame_insets = preset.frame_insets;
    }

    let fetcher = match &args.texture {
        Some(tex) => {
            let root = tex.parent().unwrap_or_else(|| Path::new("."));
            let name = tex
                .file_name()
                .with_context(|| format!("texture path has no file name: '{}'", tex.display()))?;
            config.texture_url = name.to_string_lossy().into_owned();
            bezel::FsFetcher::new(root)
        }
        None => bezel::FsFetcher::new("."),
    };
    let textures = Arc::new(bezel::TextureCache::new(Arc::new(fetcher)));

    let viewport = bezel::Viewport::new(args.width, args.height, args.density);
    let window = bezel::HostWindow::new(viewport);
    let surface = bezel::Surface::new(bezel::SurfaceCaps {
        blur_filter: !args.no_blur,
    });
    let mut frame = bezel::BezelFrame::mount(&window, textures, surface, &config)?;

    // The texture-ready trigger arrives just after the cache settles, so wait for a grain draw.
    let deadline = Instant::now() + Duration::from_millis(args.wait_ms);
    loop {
        match frame.texture_state() {
            bezel::TextureState::Failed | bezel::TextureState::Unloaded => break,
            bezel::TextureState::Ready(_) if frame.stats().with_grain > 0 => break,
            _ => {}
        }
        let left = deadline.saturating_duration_since(Instant::now());
        if left.is_zero() {
            tracing::warn!(
                wait_ms = args.wait_ms,
                "texture not drawn in time; writing frame without grain"
            );
            break;
        }
        frame.pump_blocking(left);
    }
    frame.pump();

    let rgba = frame
        .frame()
        .context("surface was never drawn (empty viewport?)")?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &rgba.to_straight_rgba8(),
        rgba.width,
        rgba.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    let stats = frame.unmount();
    eprintln!(
        "wrote {} ({}x{}, {} draws)",
        args.out.display(),
        rgba.width,
        rgba.height,
        stats.draws()
    );
    Ok(())
}

#[derive(serde::Serialize)]
struct GeometryReport {
    viewport: bezel::Viewport,
    geometry: bezel::BezelGeometry,
    cutout: [f64; 4],
    radius: f64,
}

fn cmd_geometry(args: GeometryArgs) -> anyhow::Result<()> {
    let config = read_config(args.config.as_deref())?;
    let viewport = bezel::Viewport::logical(args.width, args.height);
    let geometry = bezel::ViewportObserver::from_config(viewport, &config).measure();
    let path = bezel::PathBuilder::default().build(&geometry, viewport.width, viewport.height);
    let c = path.cutout();

    let report = GeometryReport {
        viewport,
        geometry,
        cutout: [c.x0, c.y0, c.x1, c.y1],
        radius: path.radius(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("serialize geometry")?
    );
    Ok(())
}
