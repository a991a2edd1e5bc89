//! Shared crate-wide constants.
//!
//! The `DESIGN_*` values describe the desktop in its native workspace units
//! (the units the desktop layout is designed in). The terminal front end uses
//! the `TERMINAL_*` values, where one workspace unit is one character cell.

/// Smallest width any window may be resized to.
pub const DESIGN_MIN_WIDTH: u32 = 300;
/// Smallest height any window may be resized to.
pub const DESIGN_MIN_HEIGHT: u32 = 200;

/// Size given to freshly opened windows.
pub const DESIGN_DEFAULT_WIDTH: u32 = 800;
pub const DESIGN_DEFAULT_HEIGHT: u32 = 600;

/// Position of the first window on an empty desktop.
pub const DESIGN_CASCADE_ORIGIN: i32 = 100;
/// Offset applied per already-open window so new windows never stack
/// exactly on top of each other.
pub const DESIGN_CASCADE_STEP: i32 = 40;

/// Height of the window titlebar, including its buttons.
pub const DESIGN_TITLEBAR_HEIGHT: u32 = 40;
/// Width of each titlebar button (minimize, maximize, close).
pub const DESIGN_BUTTON_WIDTH: u32 = 26;
/// Edge length of the square bottom-right resize handle.
pub const DESIGN_HANDLE_SIZE: u32 = 16;
/// Height of the taskbar strip reserved at the bottom of the viewport.
pub const DESIGN_TASKBAR_HEIGHT: u32 = 56;

/// Minimum horizontal span of a titlebar that must stay inside the
/// workspace while dragging, so the window can always be grabbed again.
pub const DESIGN_MIN_VISIBLE: u32 = 100;

/// Lowest z-index handed out; the first window on an empty desktop gets it.
pub const BASE_Z_INDEX: u32 = 10;

pub const TERMINAL_MIN_WIDTH: u32 = 24;
pub const TERMINAL_MIN_HEIGHT: u32 = 8;
pub const TERMINAL_DEFAULT_WIDTH: u32 = 52;
pub const TERMINAL_DEFAULT_HEIGHT: u32 = 16;
pub const TERMINAL_CASCADE_ORIGIN_X: i32 = 16;
pub const TERMINAL_CASCADE_ORIGIN_Y: i32 = 1;
pub const TERMINAL_CASCADE_STEP_X: i32 = 4;
pub const TERMINAL_CASCADE_STEP_Y: i32 = 2;
pub const TERMINAL_TITLEBAR_HEIGHT: u32 = 1;
pub const TERMINAL_BUTTON_WIDTH: u32 = 3;
pub const TERMINAL_HANDLE_SIZE: u32 = 1;
pub const TERMINAL_TASKBAR_HEIGHT: u32 = 1;
pub const TERMINAL_MIN_VISIBLE: u32 = 4;

/// Most notifications kept on screen at once; older ones are dropped.
pub const MAX_NOTIFICATIONS: usize = 10;
/// How long a notification stays visible, in milliseconds.
pub const NOTIFICATION_TTL_MS: u64 = 5_000;

/// Default user shown on the login gate.
pub const DEFAULT_USER: &str = "NEMESIS_USER";
