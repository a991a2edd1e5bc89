//! Pointer events in workspace coordinates.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::geometry::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub point: Point,
}

impl PointerEvent {
    pub const fn down(x: i32, y: i32) -> Self {
        Self {
            kind: PointerKind::Down,
            point: Point::new(x, y),
        }
    }

    pub const fn moved(x: i32, y: i32) -> Self {
        Self {
            kind: PointerKind::Move,
            point: Point::new(x, y),
        }
    }

    pub const fn up(x: i32, y: i32) -> Self {
        Self {
            kind: PointerKind::Up,
            point: Point::new(x, y),
        }
    }

    /// Translate a terminal mouse event into workspace coordinates, with the
    /// workspace drawn at `workspace`. Only the primary button takes part in
    /// gestures; everything else maps to `None`.
    pub fn from_mouse(mouse: &MouseEvent, workspace: Rect) -> Option<Self> {
        let kind = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => PointerKind::Down,
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => PointerKind::Move,
            MouseEventKind::Up(MouseButton::Left) => PointerKind::Up,
            _ => return None,
        };
        Some(Self {
            kind,
            point: Point::new(
                mouse.column as i32 - workspace.x as i32,
                mouse.row as i32 - workspace.y as i32,
            ),
        })
    }
}
