//! Desktop configuration.
//!
//! `DesktopConfig::default()` carries the design values (300x200 floor,
//! 800x600 windows cascading from 100,100 in steps of 40). The terminal
//! front end starts from `DesktopConfig::terminal()`, which scales the same
//! layout down to character cells.

use std::time::Duration;

use thiserror::Error;

use crate::constants::*;
use crate::geometry::{Point, Viewport};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("minimum window size must be non-zero, got {width}x{height}")]
    ZeroMinimum { width: u32, height: u32 },
    #[error(
        "default window size {default_width}x{default_height} is smaller than the minimum {min_width}x{min_height}"
    )]
    DefaultBelowMinimum {
        default_width: u32,
        default_height: u32,
        min_width: u32,
        min_height: u32,
    },
    #[error("cascade step must be non-negative and not (0, 0), got ({x}, {y})")]
    InvalidCascadeStep { x: i32, y: i32 },
    #[error("titlebar height must be non-zero")]
    ZeroTitlebar,
    #[error("titlebar height {titlebar} must be below the minimum window height {min_height}")]
    TitlebarTooTall { titlebar: u32, min_height: u32 },
    #[error("viewport {width}x{height} leaves no workspace above a {taskbar}-unit taskbar")]
    ViewportTooSmall {
        width: u32,
        height: u32,
        taskbar: u32,
    },
    #[error("tick interval must be between {min}ms and {max}ms, got {got}ms")]
    TickOutOfRange { got: u64, min: u64, max: u64 },
}

/// Metrics of the window decoration used for hit testing and rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowChrome {
    pub titlebar_height: u32,
    pub button_width: u32,
    pub handle_size: u32,
}

impl Default for WindowChrome {
    fn default() -> Self {
        Self {
            titlebar_height: DESIGN_TITLEBAR_HEIGHT,
            button_width: DESIGN_BUTTON_WIDTH,
            handle_size: DESIGN_HANDLE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopConfig {
    pub min_width: u32,
    pub min_height: u32,
    pub default_width: u32,
    pub default_height: u32,
    pub cascade_origin: Point,
    pub cascade_step: Point,
    pub base_z: u32,
    pub chrome: WindowChrome,
    /// Keep dragged windows reachable instead of letting them leave the
    /// workspace entirely.
    pub clamp_drag: bool,
    /// Horizontal titlebar span that must stay inside the workspace while
    /// `clamp_drag` is on.
    pub min_visible: u32,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            min_width: DESIGN_MIN_WIDTH,
            min_height: DESIGN_MIN_HEIGHT,
            default_width: DESIGN_DEFAULT_WIDTH,
            default_height: DESIGN_DEFAULT_HEIGHT,
            cascade_origin: Point::new(DESIGN_CASCADE_ORIGIN, DESIGN_CASCADE_ORIGIN),
            cascade_step: Point::new(DESIGN_CASCADE_STEP, DESIGN_CASCADE_STEP),
            base_z: BASE_Z_INDEX,
            chrome: WindowChrome::default(),
            clamp_drag: true,
            min_visible: DESIGN_MIN_VISIBLE,
        }
    }
}

impl DesktopConfig {
    /// Cell-scaled preset for the terminal front end.
    pub fn terminal() -> Self {
        Self {
            min_width: TERMINAL_MIN_WIDTH,
            min_height: TERMINAL_MIN_HEIGHT,
            default_width: TERMINAL_DEFAULT_WIDTH,
            default_height: TERMINAL_DEFAULT_HEIGHT,
            cascade_origin: Point::new(TERMINAL_CASCADE_ORIGIN_X, TERMINAL_CASCADE_ORIGIN_Y),
            cascade_step: Point::new(TERMINAL_CASCADE_STEP_X, TERMINAL_CASCADE_STEP_Y),
            base_z: BASE_Z_INDEX,
            chrome: WindowChrome {
                titlebar_height: TERMINAL_TITLEBAR_HEIGHT,
                button_width: TERMINAL_BUTTON_WIDTH,
                handle_size: TERMINAL_HANDLE_SIZE,
            },
            clamp_drag: true,
            min_visible: TERMINAL_MIN_VISIBLE,
        }
    }

    pub fn with_clamp_drag(mut self, clamp: bool) -> Self {
        self.clamp_drag = clamp;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_width == 0 || self.min_height == 0 {
            return Err(ConfigError::ZeroMinimum {
                width: self.min_width,
                height: self.min_height,
            });
        }
        if self.default_width < self.min_width || self.default_height < self.min_height {
            return Err(ConfigError::DefaultBelowMinimum {
                default_width: self.default_width,
                default_height: self.default_height,
                min_width: self.min_width,
                min_height: self.min_height,
            });
        }
        let step = self.cascade_step;
        if step.x < 0 || step.y < 0 || (step.x == 0 && step.y == 0) {
            return Err(ConfigError::InvalidCascadeStep {
                x: step.x,
                y: step.y,
            });
        }
        if self.chrome.titlebar_height == 0 {
            return Err(ConfigError::ZeroTitlebar);
        }
        if self.chrome.titlebar_height >= self.min_height {
            return Err(ConfigError::TitlebarTooTall {
                titlebar: self.chrome.titlebar_height,
                min_height: self.min_height,
            });
        }
        Ok(())
    }
}

/// Reject viewports that leave no room for windows above the taskbar.
pub fn validate_viewport(viewport: Viewport) -> Result<(), ConfigError> {
    if viewport.width == 0 || viewport.height <= viewport.taskbar_height {
        return Err(ConfigError::ViewportTooSmall {
            width: viewport.width,
            height: viewport.height,
            taskbar: viewport.taskbar_height,
        });
    }
    Ok(())
}

pub const MIN_TICK_MS: u64 = 5;
pub const MAX_TICK_MS: u64 = 1_000;

/// Poll interval of the front end's event loop.
pub fn tick_interval(ms: u64) -> Result<Duration, ConfigError> {
    if !(MIN_TICK_MS..=MAX_TICK_MS).contains(&ms) {
        return Err(ConfigError::TickOutOfRange {
            got: ms,
            min: MIN_TICK_MS,
            max: MAX_TICK_MS,
        });
    }
    Ok(Duration::from_millis(ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        assert_eq!(DesktopConfig::default().validate(), Ok(()));
        assert_eq!(DesktopConfig::terminal().validate(), Ok(()));
    }

    #[test]
    fn default_below_minimum_is_rejected() {
        let cfg = DesktopConfig {
            default_width: 100,
            ..DesktopConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::DefaultBelowMinimum { .. })
        ));
    }

    #[test]
    fn zero_cascade_step_is_rejected() {
        let cfg = DesktopConfig {
            cascade_step: Point::new(0, 0),
            ..DesktopConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidCascadeStep { x: 0, y: 0 })
        );
    }

    #[test]
    fn titlebar_must_fit_inside_minimum_height() {
        let mut cfg = DesktopConfig::terminal();
        cfg.chrome.titlebar_height = cfg.min_height;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::TitlebarTooTall { .. })
        ));
    }

    #[test]
    fn viewport_needs_room_above_taskbar() {
        assert!(validate_viewport(Viewport::new(80, 24, 1)).is_ok());
        assert!(validate_viewport(Viewport::new(80, 1, 1)).is_err());
        assert!(validate_viewport(Viewport::new(0, 24, 1)).is_err());
    }

    #[test]
    fn tick_interval_bounds() {
        assert_eq!(tick_interval(16), Ok(Duration::from_millis(16)));
        assert!(tick_interval(0).is_err());
        assert!(tick_interval(5_000).is_err());
    }
}
