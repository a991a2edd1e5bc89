use std::io;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use clap::{Parser, ValueEnum};
use nemesis_wm::apps::AppId;
use nemesis_wm::config::DesktopConfig;
use nemesis_wm::constants::{DESIGN_TASKBAR_HEIGHT, TERMINAL_TASKBAR_HEIGHT};
use nemesis_wm::desktop::DesktopSession;
use nemesis_wm::geometry::{Point, Viewport, WindowRect};
use nemesis_wm::input::PointerEvent;
use nemesis_wm::ui::UiFrame;
use nemesis_wm::view::DesktopView;
use ratatui::{buffer::Buffer, layout::Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Preset {
    /// 1920x1080 design units, no painting.
    Design,
    /// Cell-sized layout, painted into an offscreen buffer.
    Terminal,
}

#[derive(Parser, Debug)]
#[command(
    name = "wm-bench",
    version = env!("CARGO_PKG_VERSION"),
    about = "Drives drag and resize gestures through a desktop session without a terminal"
)]
struct BenchCli {
    /// Windows to open before the run.
    #[arg(short = 'w', long = "windows", default_value_t = 8)]
    windows: usize,

    /// Gestures (press, moves, release) to simulate.
    #[arg(short = 'g', long = "gestures", default_value_t = 10_000)]
    gestures: u64,

    /// Pointer moves per gesture.
    #[arg(short = 'm', long = "moves", default_value_t = 12)]
    moves: u32,

    #[arg(short = 'p', long = "preset", value_enum, default_value_t = Preset::Terminal)]
    preset: Preset,

    /// Screen size for the terminal preset.
    #[arg(long = "cols", default_value_t = 160)]
    cols: u16,

    #[arg(long = "rows", default_value_t = 48)]
    rows: u16,

    /// Let windows be dragged fully outside the workspace.
    #[arg(long = "no-drag-clamp")]
    no_drag_clamp: bool,

    /// Fixed seed for a repeatable pointer path.
    #[arg(long = "seed")]
    seed: Option<u64>,
}

struct BenchConfig {
    windows: usize,
    gestures: u64,
    moves: u32,
    preset: Preset,
    viewport: Viewport,
    desktop: DesktopConfig,
    seed: u64,
}

impl TryFrom<&BenchCli> for BenchConfig {
    type Error = String;

    fn try_from(cli: &BenchCli) -> Result<Self, Self::Error> {
        if !(1..=64).contains(&cli.windows) {
            return Err("windows must be between 1 and 64".to_string());
        }
        if cli.gestures == 0 {
            return Err("gestures must be at least 1".to_string());
        }
        if !(1..=1_000).contains(&cli.moves) {
            return Err("moves must be between 1 and 1000".to_string());
        }
        let (viewport, desktop) = match cli.preset {
            Preset::Design => (
                Viewport::new(1920, 1080, DESIGN_TASKBAR_HEIGHT),
                DesktopConfig::default(),
            ),
            Preset::Terminal => (
                Viewport::new(cli.cols as u32, cli.rows as u32, TERMINAL_TASKBAR_HEIGHT),
                DesktopConfig::terminal(),
            ),
        };
        nemesis_wm::config::validate_viewport(viewport).map_err(|err| err.to_string())?;
        let desktop = desktop.with_clamp_drag(!cli.no_drag_clamp);
        desktop.validate().map_err(|err| err.to_string())?;
        Ok(Self {
            windows: cli.windows,
            gestures: cli.gestures,
            moves: cli.moves,
            preset: cli.preset,
            viewport,
            desktop,
            seed: cli.seed.unwrap_or_else(seed_from_clock),
        })
    }
}

fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
        ^ 0xA5A5_A5A5_1234_5678
}

fn main() -> io::Result<()> {
    let args = BenchCli::parse();
    let config = BenchConfig::try_from(&args)
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;
    let stats = run_benchmark(&config)?;
    println!("{}", stats.final_report(&config));
    Ok(())
}

fn run_benchmark(config: &BenchConfig) -> io::Result<BenchStats> {
    let now = Instant::now();
    let mut session = DesktopSession::new("bench", config.desktop.clone(), config.viewport, now)
        .map_err(io::Error::other)?;
    let apps = AppId::ALL;
    for idx in 0..config.windows {
        session.launch_new(apps[idx % apps.len()], now);
    }

    let mut path = PointerPath::new(config.seed);
    let mut stats = BenchStats::new();
    let mut view = DesktopView::new();
    let screen = Rect::new(
        0,
        0,
        config.viewport.width.min(u16::MAX as u32) as u16,
        config.viewport.workspace().height.min(u16::MAX as u32) as u16,
    );
    let mut buffer = Buffer::empty(screen);

    for _ in 0..config.gestures {
        let gesture_start = Instant::now();
        let workspace = session.workspace();
        let Some(target) = path.pick_window(&session) else {
            break;
        };
        let chrome = session.registry().config().chrome;
        let resize = path.coin();
        let press = if resize {
            Point::new(
                target.x + target.width as i32 - 1,
                target.y + target.height as i32 - 1,
            )
        } else {
            Point::new(
                target.x + (target.width / 3) as i32,
                target.y + (chrome.titlebar_height / 2) as i32,
            )
        };
        session.handle_pointer(PointerEvent::down(press.x, press.y));
        if session.gesture_active() {
            stats.started += 1;
        }
        let mut pointer = press;
        for _ in 0..config.moves {
            pointer = path.step(pointer, workspace);
            session.handle_pointer(PointerEvent::moved(pointer.x, pointer.y));
            stats.pointer_events += 1;
        }
        session.handle_pointer(PointerEvent::up(pointer.x, pointer.y));
        stats.pointer_events += 2;
        stats.record_gesture(gesture_start.elapsed());

        if config.preset == Preset::Terminal {
            let frame_start = Instant::now();
            buffer.reset();
            let mut frame = UiFrame::from_parts(screen, &mut buffer);
            view.render(&mut frame, screen, &mut session, Instant::now(), true);
            stats.record_frame(frame_start.elapsed());
        }
    }
    stats.windows_left = session.registry().len();
    stats.mark_completed();
    Ok(stats)
}

/// Deterministic pointer wander from a seed.
struct PointerPath {
    state: u64,
}

impl PointerPath {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }

    fn coin(&mut self) -> bool {
        self.next() & 1 == 1
    }

    fn pick_window(&mut self, session: &DesktopSession) -> Option<WindowRect> {
        let workspace = session.workspace();
        let order = session.registry().draw_order();
        if order.is_empty() {
            return None;
        }
        let idx = self.next() as usize % order.len();
        Some(order[idx].frame(workspace))
    }

    fn step(&mut self, from: Point, workspace: WindowRect) -> Point {
        let span_x = (workspace.width / 20).max(1) as i32;
        let span_y = (workspace.height / 20).max(1) as i32;
        let dx = (self.next() % (2 * span_x as u32 + 1)) as i32 - span_x;
        let dy = (self.next() % (2 * span_y as u32 + 1)) as i32 - span_y;
        Point::new(from.x + dx, from.y + dy)
    }
}

struct BenchStats {
    start: Instant,
    completed_at: Option<Instant>,
    gestures: u64,
    started: u64,
    pointer_events: u64,
    total_gesture_time: Duration,
    slowest_gesture: Duration,
    frames: u64,
    total_frame_time: Duration,
    windows_left: usize,
}

impl BenchStats {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            completed_at: None,
            gestures: 0,
            started: 0,
            pointer_events: 0,
            total_gesture_time: Duration::ZERO,
            slowest_gesture: Duration::ZERO,
            frames: 0,
            total_frame_time: Duration::ZERO,
            windows_left: 0,
        }
    }

    fn elapsed(&self) -> Duration {
        match self.completed_at {
            Some(done) => done.duration_since(self.start),
            None => self.start.elapsed(),
        }
    }

    fn mark_completed(&mut self) {
        self.completed_at = Some(Instant::now());
    }

    fn record_gesture(&mut self, time: Duration) {
        self.gestures = self.gestures.saturating_add(1);
        self.total_gesture_time += time;
        self.slowest_gesture = self.slowest_gesture.max(time);
    }

    fn record_frame(&mut self, time: Duration) {
        self.frames = self.frames.saturating_add(1);
        self.total_frame_time += time;
    }

    fn average_us(total: Duration, count: u64) -> f64 {
        if count == 0 {
            return 0.0;
        }
        total.as_secs_f64() / count as f64 * 1_000_000.0
    }

    fn final_report(&self, config: &BenchConfig) -> String {
        let elapsed = self.elapsed().as_secs_f64();
        let events_per_sec = if elapsed > 0.0 {
            self.pointer_events as f64 / elapsed
        } else {
            0.0
        };
        indoc::formatdoc!(
            r#"
            Window bench ({preset:?} preset, seed {seed}).
            Duration: {elapsed:.2}s | Windows: {windows} open, {left} left
            Gestures: {gestures} ({started} grabbed a window) | Pointer events: {events} (~{eps:.0}/s)
            Avg gesture: {avg_gesture:.1} us | Worst: {worst:.1} us
            Frames: {frames} | Avg frame: {avg_frame:.1} us
            "#,
            preset = config.preset,
            seed = config.seed,
            elapsed = elapsed,
            windows = config.windows,
            left = self.windows_left,
            gestures = self.gestures,
            started = self.started,
            events = self.pointer_events,
            eps = events_per_sec,
            avg_gesture = Self::average_us(self.total_gesture_time, self.gestures),
            worst = self.slowest_gesture.as_secs_f64() * 1_000_000.0,
            frames = self.frames,
            avg_frame = Self::average_us(self.total_frame_time, self.frames),
        )
    }
}
