use std::{
    fs::File,
    io::{self, BufWriter},
    path::{Path, PathBuf},
    thread,
    time::{Duration, Instant},
};

use clap::{Parser, Subcommand};
use retronova_core::{
    Color, CommandLog, Control, DemoConfig, EventSource, FrameClock, FrameDriver, Framebuffer,
    Recorder, RecordingSettings, Rect, Scene, Surface, SystemClock,
};
use tracing_subscriber::EnvFilter;

fn main() -> retronova_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            frames,
            snapshot_dir,
            snapshot_every,
        } => run_headless(frames, snapshot_dir, snapshot_every),
        Commands::Capture {
            time_ms,
            output,
            commands,
            seed,
        } => run_capture(time_ms, &output, commands.as_deref(), seed),
        Commands::Config => print_config(),
    }
}

fn run_headless(
    frames: Option<u64>,
    snapshot_dir: Option<PathBuf>,
    snapshot_every: u32,
) -> retronova_core::Result<()> {
    let config = DemoConfig::default();
    tracing::info!(
        frames,
        width = config.viewport.width,
        height = config.viewport.height,
        "starting headless run"
    );

    let mut recorder = match snapshot_dir {
        Some(output_dir) => {
            let mut recorder = Recorder::new(RecordingSettings {
                output_dir,
                every: snapshot_every,
            });
            // Failing to set up the output is a start-up failure, before the loop.
            recorder.start()?;
            Some(recorder)
        }
        None => None,
    };

    let mut display = HeadlessDisplay::new(Framebuffer::new(config.viewport), recorder.as_mut());
    let mut events = FrameBudget::new(frames);
    let mut handler = |event: &AppEvent| match event {
        AppEvent::Quit => Control::Exit,
    };

    let mut driver = FrameDriver::new(Scene::new(config), SystemClock::start());
    let started = Instant::now();
    let total = driver.run(&mut events, &mut handler, std::slice::from_mut(&mut display));
    let elapsed = started.elapsed().as_secs_f32();

    tracing::info!(
        frames = total,
        seconds = elapsed,
        fps = total as f32 / elapsed.max(f32::EPSILON),
        "run finished"
    );

    drop(display);
    if let Some(recorder) = recorder.as_mut() {
        recorder.stop()?;
        tracing::info!(snapshots = recorder.written(), "snapshots saved");
    }
    Ok(())
}

fn run_capture(
    time_ms: u64,
    output: &Path,
    commands: Option<&Path>,
    seed: Option<u64>,
) -> retronova_core::Result<()> {
    let config = DemoConfig::default();
    let mut scene = match seed {
        Some(seed) => Scene::with_seed(config.clone(), seed),
        None => Scene::new(config.clone()),
    };
    let time = FrameClock::new(config.timing.clone()).tick(time_ms);
    tracing::info!(time_ms, ?output, "capturing single frame");

    if let Some(path) = commands {
        let mut log = CommandLog::new();
        let mut replay = scene.clone();
        log.clear(Color::BLACK)?;
        replay.draw(&mut log, time.delta, time.now_ms)?;
        log.present()?;
        log.write_json(BufWriter::new(File::create(path)?))?;
        tracing::info!(?path, commands = log.len(), "draw commands written");
    }

    let mut framebuffer = Framebuffer::new(config.viewport);
    framebuffer.clear(Color::BLACK)?;
    scene.draw(&mut framebuffer, time.delta, time.now_ms)?;
    framebuffer.present()?;
    framebuffer.save_png(output)?;
    Ok(())
}

fn print_config() -> retronova_core::Result<()> {
    let stdout = io::stdout();
    serde_json::to_writer_pretty(stdout.lock(), &DemoConfig::default())?;
    println!();
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AppEvent {
    Quit,
}

/// Stands in for a window's event queue: asks to quit on the last frame of the
/// budget, or never when no budget was given.
#[derive(Debug)]
struct FrameBudget {
    quiet_frames: Option<u64>,
    quit_sent: bool,
}

impl FrameBudget {
    fn new(frames: Option<u64>) -> Self {
        Self {
            quiet_frames: frames.map(|frames| frames.saturating_sub(1)),
            quit_sent: false,
        }
    }
}

impl EventSource for FrameBudget {
    type Event = AppEvent;

    fn poll_event(&mut self) -> Option<AppEvent> {
        match self.quiet_frames {
            Some(0) if !self.quit_sent => {
                self.quit_sent = true;
                Some(AppEvent::Quit)
            }
            Some(0) | None => None,
            Some(remaining) => {
                self.quiet_frames = Some(remaining - 1);
                None
            }
        }
    }
}

/// Software display: rasterises into a framebuffer, optionally records it, and
/// waits for the next 60 Hz slot on present the way vsync would.
struct HeadlessDisplay<'a> {
    framebuffer: Framebuffer,
    recorder: Option<&'a mut Recorder>,
    interval: Duration,
    last_present: Option<Instant>,
}

impl<'a> HeadlessDisplay<'a> {
    fn new(framebuffer: Framebuffer, recorder: Option<&'a mut Recorder>) -> Self {
        Self {
            framebuffer,
            recorder,
            interval: Duration::from_micros(16_667),
            last_present: None,
        }
    }
}

impl Surface for HeadlessDisplay<'_> {
    fn clear(&mut self, color: Color) -> retronova_core::Result<()> {
        self.framebuffer.clear(color)
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> retronova_core::Result<()> {
        self.framebuffer.fill_rect(rect, color)
    }

    fn draw_line(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        color: Color,
    ) -> retronova_core::Result<()> {
        self.framebuffer.draw_line(x0, y0, x1, y1, color)
    }

    fn draw_point(&mut self, x: i32, y: i32, color: Color) -> retronova_core::Result<()> {
        self.framebuffer.draw_point(x, y, color)
    }

    fn present(&mut self) -> retronova_core::Result<()> {
        self.framebuffer.present()?;
        if let Some(recorder) = self.recorder.as_deref_mut() {
            recorder.capture(&self.framebuffer)?;
        }

        if let Some(last) = self.last_present {
            if let Some(remaining) = self.interval.checked_sub(last.elapsed()) {
                thread::sleep(remaining);
            }
        }
        self.last_present = Some(Instant::now());
        Ok(())
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Starfield, wireframe cube and sine ribbon demo", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the frame loop against a paced software display.
    Run {
        /// Stop after this many frames; runs until killed when omitted.
        #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
        frames: Option<u64>,
        /// Directory to write PNG snapshots into.
        #[arg(long)]
        snapshot_dir: Option<PathBuf>,
        /// Keep one snapshot out of every N frames.
        #[arg(long, default_value_t = 60)]
        snapshot_every: u32,
    },
    /// Render a single frame at a fixed clock value.
    Capture {
        /// Clock value in milliseconds that drives the cube and the ribbon.
        #[arg(short, long, default_value_t = 0)]
        time_ms: u64,
        /// Output path for the PNG image.
        #[arg(short, long)]
        output: PathBuf,
        /// Optional path for a JSON dump of the draw commands.
        #[arg(long)]
        commands: Option<PathBuf>,
        /// Seed for the starfield; defaults to the wall clock.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the compiled-in configuration as JSON.
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(budget: &mut FrameBudget) -> Vec<AppEvent> {
        std::iter::from_fn(|| budget.poll_event()).collect()
    }

    #[test]
    fn budget_quits_on_last_frame() {
        let mut budget = FrameBudget::new(Some(3));

        assert!(drain(&mut budget).is_empty());
        assert!(drain(&mut budget).is_empty());
        assert_eq!(drain(&mut budget), vec![AppEvent::Quit]);
        assert!(drain(&mut budget).is_empty());
    }

    #[test]
    fn unlimited_budget_never_quits() {
        let mut budget = FrameBudget::new(None);
        for _ in 0..100 {
            assert!(drain(&mut budget).is_empty());
        }
    }

    #[test]
    fn cli_parses_capture() {
        let cli = Cli::try_parse_from([
            "retronova", "capture", "--time-ms", "1500", "--output", "frame.png", "--seed", "7",
        ])
        .unwrap();

        match cli.command {
            Commands::Capture {
                time_ms,
                output,
                seed,
                commands,
            } => {
                assert_eq!(time_ms, 1500);
                assert_eq!(output, PathBuf::from("frame.png"));
                assert_eq!(seed, Some(7));
                assert!(commands.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cli_rejects_zero_frame_budget() {
        let err = Cli::try_parse_from(["retronova", "run", "--frames", "0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);

        let cli = Cli::try_parse_from(["retronova", "run", "--frames", "1"]).unwrap();
        assert!(matches!(cli.command, Commands::Run { frames: Some(1), .. }));
    }

    #[test]
    fn headless_run_with_budget_presents_each_frame() {
        let config = DemoConfig::default();
        let mut display = HeadlessDisplay::new(Framebuffer::new(config.viewport), None);
        display.interval = Duration::ZERO;
        let mut events = FrameBudget::new(Some(5));
        let mut handler = |_: &AppEvent| Control::Exit;
        let mut driver = FrameDriver::new(Scene::with_seed(config, 3), SystemClock::start());

        let frames = driver.run(&mut events, &mut handler, std::slice::from_mut(&mut display));

        assert_eq!(frames, 5);
        assert_eq!(display.framebuffer.presented(), 5);
        assert_eq!(display.framebuffer.pixel(0, 0).map(|pixel| pixel.a), Some(255));
    }
}
