use std::io;
use std::time::Instant;

use clap::Parser;
use ratatui::layout::Rect;
use tracing::Level;

use nemesis_wm::apps::AppId;
use nemesis_wm::config::{DesktopConfig, tick_interval};
use nemesis_wm::constants::{DEFAULT_USER, TERMINAL_TASKBAR_HEIGHT};
use nemesis_wm::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use nemesis_wm::geometry::Viewport;
use nemesis_wm::log_buffer::{
    DEFAULT_MAX_LINES, LogBuffer, install_panic_hook, set_global_log_buffer,
};
use nemesis_wm::runner::{App, run};
use nemesis_wm::state::SessionState;
use nemesis_wm::tracing_sub;

/// Lines of the log echoed to stderr when the desktop exits with an error.
const LOG_TAIL_ON_ERROR: usize = 20;

#[derive(Parser, Debug)]
#[command(
    name = "nemesis-wm",
    version = env!("CARGO_PKG_VERSION"),
    about = "A floating desktop window manager in your terminal"
)]
struct Cli {
    /// User name prefilled at the login gate.
    #[arg(short = 'u', long = "user", default_value = DEFAULT_USER)]
    user: String,

    /// Go straight to the desktop.
    #[arg(long = "skip-login")]
    skip_login: bool,

    /// Open an app once the desktop is up (repeatable), e.g. `--open nemecalc`.
    #[arg(short = 'o', long = "open", value_name = "APP")]
    open: Vec<AppId>,

    /// Let windows be dragged fully outside the workspace.
    #[arg(long = "no-drag-clamp")]
    no_drag_clamp: bool,

    #[arg(long = "log-level", value_name = "LEVEL", default_value_t = Level::DEBUG)]
    log_level: Level,

    /// Event loop poll interval in milliseconds.
    #[arg(long = "tick-ms", value_name = "MS", default_value_t = 16)]
    tick_ms: u64,
}

fn invalid_input(err: impl std::error::Error + Send + Sync + 'static) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, err)
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let poll_interval = tick_interval(cli.tick_ms).map_err(invalid_input)?;

    let log_buffer = LogBuffer::new(DEFAULT_MAX_LINES);
    set_global_log_buffer(log_buffer.clone());
    install_panic_hook();
    tracing_sub::init(cli.log_level);

    let config = DesktopConfig::terminal().with_clamp_drag(!cli.no_drag_clamp);
    config.validate().map_err(invalid_input)?;

    let (cols, rows) = crossterm::terminal::size()?;
    let screen = Rect::new(0, 0, cols, rows);
    let taskbar_rows = TERMINAL_TASKBAR_HEIGHT as u16;
    let viewport = Viewport::new(cols as u32, rows as u32, TERMINAL_TASKBAR_HEIGHT);

    let mut state = SessionState::booting(cli.user.clone(), Instant::now());
    if cli.skip_login {
        state
            .login(cli.user.clone(), config.clone(), viewport, Instant::now())
            .map_err(invalid_input)?;
    }
    tracing::info!(
        user = %cli.user,
        skip_login = cli.skip_login,
        clamp_drag = config.clamp_drag,
        "starting desktop"
    );

    let mut app = App::new(config, state, screen, taskbar_rows).with_startup_apps(cli.open);
    let result = {
        let mut output = ConsoleOutputDriver::new()?;
        run(&mut app, ConsoleInputDriver::new(), &mut output, poll_interval)
    };

    if result.is_err() {
        for line in log_buffer.tail(LOG_TAIL_ON_ERROR) {
            eprintln!("{line}");
        }
    }
    result
}
