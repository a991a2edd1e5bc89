//! Pointer math for floating windows.
//!
//! Everything here is pure: the gesture controllers feed in the geometry
//! captured at gesture start plus the current pointer delta, and apply the
//! result through the registry.

use crate::geometry::{Point, WindowRect, clamp_i32, clamp_u32};

/// Keep a dragged window reachable.
///
/// Horizontally at least `min_visible` units of the titlebar (or the whole
/// window, if narrower) stay inside the workspace. Vertically the titlebar
/// row never leaves the workspace: `ws.y <= y <= ws.bottom - titlebar`.
pub fn clamp_drag_origin(
    origin: Point,
    width: u32,
    workspace: WindowRect,
    titlebar_height: u32,
    min_visible: u32,
) -> Point {
    let visible = min_visible.min(width).min(workspace.width) as i64;
    let min_x = workspace.x as i64 + visible - width as i64;
    let max_x = workspace.right() - visible;
    let x = (origin.x as i64).clamp(min_x.min(max_x), max_x);

    let min_y = workspace.y as i64;
    let max_y = (workspace.bottom() - titlebar_height as i64).max(min_y);
    let y = (origin.y as i64).clamp(min_y, max_y);

    Point::new(clamp_i32(x), clamp_i32(y))
}

/// Size for a bottom-right resize by `(dx, dy)` from `start`.
///
/// The size first grows or shrinks by the delta and is floored at
/// `min_width` x `min_height`, then the right and bottom edges are pulled
/// back to the workspace edge. The floor wins when both cannot hold.
pub fn apply_resize(
    start: WindowRect,
    dx: i32,
    dy: i32,
    workspace: WindowRect,
    min_width: u32,
    min_height: u32,
) -> (u32, u32) {
    let mut width = (start.width as i64 + dx as i64).max(min_width as i64);
    let mut height = (start.height as i64 + dy as i64).max(min_height as i64);

    let room_w = workspace.right() - start.x as i64;
    let room_h = workspace.bottom() - start.y as i64;
    width = width.min(room_w).max(min_width as i64);
    height = height.min(room_h).max(min_height as i64);

    (clamp_u32(width), clamp_u32(height))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WS: WindowRect = WindowRect::new(0, 0, 1920, 1024);

    #[test]
    fn drag_inside_workspace_is_untouched() {
        let p = clamp_drag_origin(Point::new(150, 130), 800, WS, 40, 100);
        assert_eq!(p, Point::new(150, 130));
    }

    #[test]
    fn drag_keeps_titlebar_span_visible_horizontally() {
        let left = clamp_drag_origin(Point::new(-5000, 100), 800, WS, 40, 100);
        assert_eq!(left.x, 100 - 800);
        let right = clamp_drag_origin(Point::new(5000, 100), 800, WS, 40, 100);
        assert_eq!(right.x, 1920 - 100);
    }

    #[test]
    fn drag_keeps_titlebar_row_inside_vertically() {
        let up = clamp_drag_origin(Point::new(10, -300), 800, WS, 40, 100);
        assert_eq!(up.y, 0);
        let down = clamp_drag_origin(Point::new(10, 5000), 800, WS, 40, 100);
        assert_eq!(down.y, 1024 - 40);
    }

    #[test]
    fn narrow_window_stays_fully_visible() {
        let p = clamp_drag_origin(Point::new(-50, 0), 60, WS, 40, 100);
        assert_eq!(p.x, 0);
    }

    #[test]
    fn resize_grows_with_pointer() {
        let start = WindowRect::new(100, 100, 800, 600);
        assert_eq!(apply_resize(start, 50, 20, WS, 300, 200), (850, 620));
    }

    #[test]
    fn resize_floors_at_minimum() {
        let start = WindowRect::new(100, 100, 800, 600);
        assert_eq!(apply_resize(start, 50, -700, WS, 300, 200), (850, 200));
        assert_eq!(apply_resize(start, -2000, -2000, WS, 300, 200), (300, 200));
    }

    #[test]
    fn resize_stops_at_workspace_edge() {
        let start = WindowRect::new(1000, 500, 800, 400);
        assert_eq!(apply_resize(start, 500, 500, WS, 300, 200), (920, 524));
    }

    #[test]
    fn floor_wins_over_workspace_clamp() {
        let start = WindowRect::new(1800, 950, 300, 200);
        assert_eq!(apply_resize(start, 10, 10, WS, 300, 200), (300, 200));
    }
}
