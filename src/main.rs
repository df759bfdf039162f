use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use motibeam_wall::app::{
    AppError, ManualClock, RunSummary, ScreenController, SystemClock, TimeSource,
};
use motibeam_wall::config::WallConfig;
use motibeam_wall::domain::presentation::{Mode, Theme};
use motibeam_wall::input::ScriptedInput;
use motibeam_wall::ui::{HeadlessSurface, TextRenderer, WallRenderer};

/// Fullscreen realm launcher for a projected wall
#[derive(Debug, Parser)]
#[command(name = "motibeam-wall", version, about)]
struct Args {
    /// TOML settings file
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Target frames per second
    #[arg(long)]
    fps: Option<u32>,

    /// Particle field seed
    #[arg(long)]
    seed: Option<u64>,

    /// TrueType/OpenType font used for all text
    #[arg(long)]
    font: Option<PathBuf>,

    /// Initial mode: normal, study or sleep
    #[arg(long)]
    mode: Option<Mode>,

    /// Initial theme: neon, minimal or night
    #[arg(long)]
    theme: Option<Theme>,

    /// Start in a regular window instead of fullscreen
    #[arg(long, conflicts_with = "fullscreen")]
    windowed: bool,

    #[arg(long)]
    fullscreen: bool,

    /// Render off-screen, driven by --script
    #[arg(long)]
    headless: bool,

    /// Comma-separated input steps for headless runs, e.g. "launch:3,right,trigger,wait:30,quit"
    #[arg(long, default_value = "wait:120,quit")]
    script: String,

    /// Pace headless frames with the system clock instead of simulated time
    #[arg(long)]
    real_time: bool,

    /// Directory for PNG snapshots of headless frames
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    #[arg(long, default_value_t = 60)]
    snapshot_every: u64,

    /// Stop after this many frames
    #[arg(long)]
    max_frames: Option<u64>,
}

impl Args {
    /// Loads the config file (if any) and applies command-line overrides
    fn resolve_config(&self) -> Result<WallConfig, AppError> {
        let mut config = match &self.config {
            Some(path) => WallConfig::load(path)?,
            None => WallConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(fps) = self.fps {
            config.target_fps = fps;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(font) = &self.font {
            config.font_path = Some(font.clone());
        }
        if let Some(mode) = self.mode {
            config.initial_mode = mode;
        }
        if let Some(theme) = self.theme {
            config.initial_theme = theme;
        }
        if self.windowed {
            config.fullscreen = false;
        } else if self.fullscreen {
            config.fullscreen = true;
        }

        Ok(config.sanitized())
    }
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let config = args.resolve_config().context("Failed to load configuration")?;

    tracing::info!(
        width = config.width,
        height = config.height,
        fps = config.target_fps,
        headless = args.headless,
        "Starting MotiBeam wall"
    );

    let text = TextRenderer::load(config.font_path.as_deref());
    let renderer = WallRenderer::new(text, config.pulse_frequency_hz);

    let summary = if args.headless {
        run_headless(&args, config, renderer)?
    } else {
        run_windowed(&args, config, renderer)?
    };

    tracing::info!(
        frames = summary.frames,
        screen = %summary.final_screen.label(),
        mode = summary.mode.label(),
        theme = summary.theme.label(),
        "MotiBeam wall stopped"
    );
    Ok(())
}

fn run_headless(
    args: &Args,
    config: WallConfig,
    renderer: WallRenderer,
) -> anyhow::Result<RunSummary> {
    let mut input = ScriptedInput::parse(&args.script)
        .map_err(AppError::from)
        .context("Failed to parse --script")?;

    let mut surface = HeadlessSurface::new(config.width, config.height);
    if let Some(dir) = &args.snapshot_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        surface = surface.with_snapshots(dir.clone(), args.snapshot_every);
    }

    let clock: Box<dyn TimeSource> = if args.real_time {
        Box::new(SystemClock::new())
    } else {
        Box::new(ManualClock::new())
    };

    let mut controller = ScreenController::new(config, renderer).with_max_frames(args.max_frames);
    let summary = controller.run(&mut surface, &mut input, clock.as_ref());

    if !surface.snapshots_written().is_empty() {
        tracing::info!(count = surface.snapshots_written().len(), "snapshots written");
    }
    if surface.snapshot_failures() > 0 {
        tracing::warn!(count = surface.snapshot_failures(), "snapshots skipped");
    }
    if !input.is_exhausted() {
        tracing::info!("frame limit reached before the script finished");
    }
    Ok(summary)
}

#[cfg(windows)]
fn run_windowed(
    args: &Args,
    config: WallConfig,
    renderer: WallRenderer,
) -> anyhow::Result<RunSummary> {
    use motibeam_wall::platform::{WallWindow, WindowInput};
    use motibeam_wall::ui::SurfaceError;

    let mut window = WallWindow::create(config.width, config.height, config.fullscreen)
        .map_err(|err| AppError::from(SurfaceError::Unavailable(err.to_string())))
        .context("Failed to open the wall window")?;
    let mut input = WindowInput::new();
    let clock = SystemClock::new();

    let mut controller = ScreenController::new(config, renderer).with_max_frames(args.max_frames);
    Ok(controller.run(&mut window, &mut input, &clock))
}

#[cfg(not(windows))]
fn run_windowed(
    _args: &Args,
    _config: WallConfig,
    _renderer: WallRenderer,
) -> anyhow::Result<RunSummary> {
    use motibeam_wall::ui::SurfaceError;

    Err(AppError::from(SurfaceError::Unavailable(
        "no window backend on this platform; use --headless".to_string(),
    )))
    .context("Failed to open the wall window")
}
