use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde::Serialize;

use framescrub::{
    FsFrameFetcher, Input, OverlayState, PinnedScroll, PixmapCanvas, PlayerConfig,
    ScrubController, Viewport, map_progress_to_frame, overlay_at,
};

#[derive(Parser, Debug)]
#[command(name = "framescrub", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the canvas at one scroll progress as a PNG.
    Frame(FrameArgs),
    /// Render evenly spaced scroll progress values as PNGs.
    Sweep(SweepArgs),
    /// Print the progress to frame and overlay mapping as JSON lines.
    Plan(PlanArgs),
}

#[derive(Parser, Debug)]
struct PlayerArgs {
    /// Site root that frame locators resolve against.
    #[arg(long)]
    root: PathBuf,

    /// Player config JSON. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Viewport width in CSS pixels.
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Viewport height in CSS pixels.
    #[arg(long, default_value_t = 720.0)]
    height: f64,

    /// Device pixel ratio.
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,

    /// Seconds to wait for frames before rendering what has loaded.
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    player: PlayerArgs,

    /// Scroll progress in [0, 1].
    #[arg(long)]
    progress: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct SweepArgs {
    #[command(flatten)]
    player: PlayerArgs,

    /// Number of progress steps (at least 2).
    #[arg(long, default_value_t = 11)]
    steps: u32,

    /// Output directory for `step_XXXX.png` files.
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Player config JSON. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of progress steps (at least 2).
    #[arg(long, default_value_t = 21)]
    steps: u32,
}

#[derive(Serialize)]
struct PlanLine {
    progress: f64,
    frame: usize,
    overlay: OverlayState,
}

type Player = ScrubController<FsFrameFetcher, PinnedScroll, PixmapCanvas>;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Sweep(args) => cmd_sweep(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<PlayerConfig> {
    let config = match path {
        Some(p) => PlayerConfig::from_path(p)?,
        None => PlayerConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn boot_player(args: &PlayerArgs) -> anyhow::Result<Player> {
    let config = load_config(args.config.as_deref())?;
    let viewport = Viewport::new(args.width, args.height, args.dpr)?;
    let fetcher = FsFrameFetcher::new(args.root.clone(), config.loader_threads)?;
    let scroll = PinnedScroll::new(0.0, viewport.css_height, config.pin_length_viewports);

    let mut player = ScrubController::new(config, fetcher, scroll, PixmapCanvas::new(), viewport)?;
    player.boot()?;
    player.pump_blocking(Duration::from_secs(args.timeout_secs))?;

    let stats = player.stats();
    tracing::info!(
        ready = stats.ready,
        failed = stats.failed,
        pending = stats.pending(),
        "frames settled"
    );
    if stats.failed > 0 || stats.pending() > 0 {
        eprintln!(
            "warning: {} frame(s) failed, {} still pending",
            stats.failed,
            stats.pending()
        );
    }
    Ok(player)
}

fn scroll_and_render(player: &mut Player, progress: f64) -> anyhow::Result<()> {
    let offset = player.scroll().offset_for(progress);
    if !player.scroll_mut().scroll_to(offset) {
        anyhow::bail!("scroll is locked; the player never became interactive");
    }
    player.handle(Input::ScrollUpdate)?;
    Ok(())
}

fn write_png(player: &Player, out: &Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    let frame = player.surface().snapshot();
    image::save_buffer_with_format(
        out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", out.display()))?;
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut player = boot_player(&args.player)?;
    scroll_and_render(&mut player, args.progress)?;
    write_png(&player, &args.out)?;

    eprintln!(
        "wrote {} (frame {})",
        args.out.display(),
        player.current_frame().0
    );
    Ok(())
}

fn cmd_sweep(args: SweepArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.steps >= 2, "--steps must be at least 2");
    let mut player = boot_player(&args.player)?;

    for step in 0..args.steps {
        let progress = f64::from(step) / f64::from(args.steps - 1);
        scroll_and_render(&mut player, progress)?;
        let out = args.out_dir.join(format!("step_{step:04}.png"));
        write_png(&player, &out)?;
    }

    eprintln!("wrote {} frames to {}", args.steps, args.out_dir.display());
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.steps >= 2, "--steps must be at least 2");
    let config = load_config(args.config.as_deref())?;

    for step in 0..args.steps {
        let progress = f64::from(step) / f64::from(args.steps - 1);
        let line = PlanLine {
            progress,
            frame: map_progress_to_frame(progress, config.frame_count, config.reveal_fraction).0,
            overlay: overlay_at(progress),
        };
        println!("{}", serde_json::to_string(&line)?);
    }
    Ok(())
}
