pub mod decorator;
pub mod floating;
pub mod gesture;

mod registry;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::apps::AppId;
use crate::geometry::{Point, WindowRect};

pub use decorator::{HitRegion, NeonDecorator, TitleButton, WindowDecorator};
pub use gesture::{DragController, DragSession, ResizeController, ResizeSession};
pub use registry::WindowRegistry;

static NEXT_WINDOW_SEQ: AtomicU64 = AtomicU64::new(1);

/// Opaque window identity. Ids come from a process-wide counter, so an id is
/// never reused, not even by a later desktop session.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(String);

impl WindowId {
    pub(crate) fn generate() -> Self {
        let seq = NEXT_WINDOW_SEQ.fetch_add(1, Ordering::Relaxed);
        Self(format!("win-{seq}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// State of one open application instance.
///
/// `x`, `y`, `width` and `height` keep the restored geometry while the
/// window is maximized or minimized, so both states undo cleanly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowRecord {
    pub id: WindowId,
    pub app_id: AppId,
    pub title: String,
    pub is_minimized: bool,
    pub is_maximized: bool,
    pub z_index: u32,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl WindowRecord {
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Stored (restored) geometry, regardless of maximize state.
    pub fn rect(&self) -> WindowRect {
        WindowRect::new(self.x, self.y, self.width, self.height)
    }

    /// Geometry as painted: the whole workspace while maximized.
    pub fn frame(&self, workspace: WindowRect) -> WindowRect {
        if self.is_maximized {
            workspace
        } else {
            self.rect()
        }
    }

    pub fn is_visible(&self) -> bool {
        !self.is_minimized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_distinct() {
        let a = WindowId::generate();
        let b = WindowId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("win-"));
    }

    #[test]
    fn maximized_frame_is_the_workspace() {
        let mut rec = WindowRecord {
            id: WindowId::generate(),
            app_id: AppId::NemeCalc,
            title: "NemeCalc".into(),
            is_minimized: false,
            is_maximized: false,
            z_index: 10,
            x: 5,
            y: 6,
            width: 30,
            height: 10,
        };
        let ws = WindowRect::new(0, 0, 80, 23);
        assert_eq!(rec.frame(ws), WindowRect::new(5, 6, 30, 10));
        rec.is_maximized = true;
        assert_eq!(rec.frame(ws), ws);
        assert_eq!(rec.rect(), WindowRect::new(5, 6, 30, 10));
    }
}
