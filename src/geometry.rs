//! Workspace geometry shared by the registry, the gesture controllers and the
//! front end.
//!
//! Origins are signed so a window may sit partially left of or above the
//! workspace; sizes are unsigned and never negative.

use std::ops::Sub;

/// A pointer or window origin in workspace coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point {
            x: self.x.saturating_sub(rhs.x),
            y: self.y.saturating_sub(rhs.y),
        }
    }
}

/// Signed rectangle origin with unsigned size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl WindowRect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// One past the right-most column, widened so huge sizes cannot overflow.
    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// One past the bottom-most row.
    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(&self, point: Point) -> bool {
        if self.is_empty() {
            return false;
        }
        let px = point.x as i64;
        let py = point.y as i64;
        px >= self.x as i64 && px < self.right() && py >= self.y as i64 && py < self.bottom()
    }

    pub fn intersects(&self, other: &WindowRect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        (self.x as i64) < other.right()
            && (other.x as i64) < self.right()
            && (self.y as i64) < other.bottom()
            && (other.y as i64) < self.bottom()
    }
}

/// Host viewport: the full drawable area, with a taskbar strip reserved at
/// the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub taskbar_height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32, taskbar_height: u32) -> Self {
        Self {
            width,
            height,
            taskbar_height,
        }
    }

    /// The visible desktop area excluding the taskbar. This is also the rect
    /// a maximized window occupies.
    pub fn workspace(&self) -> WindowRect {
        WindowRect::new(
            0,
            0,
            self.width,
            self.height.saturating_sub(self.taskbar_height),
        )
    }

    /// The taskbar strip along the bottom edge.
    pub fn taskbar(&self) -> WindowRect {
        let height = self.taskbar_height.min(self.height);
        WindowRect::new(
            0,
            clamp_i32(self.height as i64 - height as i64),
            self.width,
            height,
        )
    }
}

/// Narrow an `i64` back to `i32`, saturating at the bounds.
pub(crate) fn clamp_i32(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Narrow an `i64` size to `u32`, treating negatives as zero.
pub(crate) fn clamp_u32(value: i64) -> u32 {
    value.clamp(0, u32::MAX as i64) as u32
}
