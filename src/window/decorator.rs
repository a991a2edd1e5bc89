use ratatui::buffer::Buffer;
use ratatui::prelude::Rect;
use ratatui::style::{Modifier, Style};

use crate::config::WindowChrome;
use crate::geometry::{Point, WindowRect};
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleButton {
    Minimize,
    Maximize,
    Close,
}

impl TitleButton {
    /// Left-to-right order at the right end of the titlebar.
    pub const ORDER: [TitleButton; 3] = [
        TitleButton::Minimize,
        TitleButton::Maximize,
        TitleButton::Close,
    ];

    pub fn glyph(self) -> &'static str {
        match self {
            TitleButton::Minimize => "_",
            TitleButton::Maximize => "□",
            TitleButton::Close => "x",
        }
    }
}

/// Part of a window frame under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitRegion {
    Titlebar,
    Button(TitleButton),
    ResizeHandle,
    Body,
}

impl WindowChrome {
    /// Classify `point` against a window painted at `frame`.
    ///
    /// The titlebar wins over the handle when a tiny window makes them
    /// overlap. Maximized windows have no resize handle.
    pub fn hit_test(&self, frame: WindowRect, point: Point, maximized: bool) -> Option<HitRegion> {
        if !frame.contains(point) {
            return None;
        }
        let px = point.x as i64;
        let py = point.y as i64;
        let right = frame.right();
        let bottom = frame.bottom();

        if py < frame.y as i64 + self.titlebar_height as i64 {
            let bw = self.button_width.max(1) as i64;
            let buttons_start = (right - bw * TitleButton::ORDER.len() as i64).max(frame.x as i64);
            if px >= buttons_start {
                let idx = ((px - buttons_start) / bw).min(TitleButton::ORDER.len() as i64 - 1);
                return Some(HitRegion::Button(TitleButton::ORDER[idx as usize]));
            }
            return Some(HitRegion::Titlebar);
        }

        let handle = self.handle_size as i64;
        if !maximized && handle > 0 && px >= right - handle && py >= bottom - handle {
            return Some(HitRegion::ResizeHandle);
        }
        Some(HitRegion::Body)
    }

    /// Area left for application content: inside the side and bottom
    /// borders, below the titlebar.
    pub fn body(&self, frame: WindowRect) -> WindowRect {
        WindowRect::new(
            frame.x.saturating_add(1),
            frame.y.saturating_add(self.titlebar_height as i32),
            frame.width.saturating_sub(2),
            frame.height.saturating_sub(self.titlebar_height + 1),
        )
    }
}

/// Project a workspace rect onto the screen area hosting the workspace,
/// clipped to that area. `None` when nothing of it is visible.
pub fn to_screen(area: Rect, rect: WindowRect) -> Option<Rect> {
    let left = (rect.x as i64).max(0);
    let top = (rect.y as i64).max(0);
    let right = rect.right().min(area.width as i64);
    let bottom = rect.bottom().min(area.height as i64);
    if left >= right || top >= bottom {
        return None;
    }
    Some(Rect {
        x: area.x + left as u16,
        y: area.y + top as u16,
        width: (right - left) as u16,
        height: (bottom - top) as u16,
    })
}

/// How a window is drawn, independent of what it hosts.
pub trait WindowDecorator: std::fmt::Debug {
    #[allow(clippy::too_many_arguments)]
    fn render_window(
        &self,
        buffer: &mut Buffer,
        area: Rect,
        frame: WindowRect,
        chrome: &WindowChrome,
        title: &str,
        focused: bool,
        maximized: bool,
    );
}

/// Cyan-bordered chrome with a violet titlebar on the focused window.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeonDecorator;

fn put(buffer: &mut Buffer, area: Rect, x: i64, y: i64, symbol: &str, style: Style) {
    if x < 0 || y < 0 || x >= area.width as i64 || y >= area.height as i64 {
        return;
    }
    if let Some(cell) = buffer.cell_mut((area.x + x as u16, area.y + y as u16)) {
        cell.set_symbol(symbol);
        cell.set_style(style);
    }
}

impl WindowDecorator for NeonDecorator {
    fn render_window(
        &self,
        buffer: &mut Buffer,
        area: Rect,
        frame: WindowRect,
        chrome: &WindowChrome,
        title: &str,
        focused: bool,
        maximized: bool,
    ) {
        if frame.is_empty() {
            return;
        }
        let header_style = {
            let style = Style::default()
                .bg(theme::decorator_header_bg(focused))
                .fg(theme::decorator_header_fg());
            if focused {
                style.add_modifier(Modifier::BOLD)
            } else {
                style
            }
        };
        let border_style = Style::default()
            .fg(theme::decorator_border(focused))
            .bg(theme::window_bg());

        let left = frame.x as i64;
        let top = frame.y as i64;
        let right = frame.right() - 1;
        let bottom = frame.bottom() - 1;
        let header_rows = (chrome.titlebar_height as i64).min(frame.height as i64);

        // Titlebar
        for y in top..top + header_rows {
            for x in left..=right {
                put(buffer, area, x, y, " ", header_style);
            }
        }
        let bw = chrome.button_width.max(1) as i64;
        let buttons_start = (right + 1 - bw * TitleButton::ORDER.len() as i64).max(left);
        for (idx, button) in TitleButton::ORDER.iter().enumerate() {
            let x = buttons_start + idx as i64 * bw + bw / 2;
            let style = if *button == TitleButton::Close {
                header_style.fg(theme::danger())
            } else {
                header_style
            };
            put(buffer, area, x, top, button.glyph(), style);
        }
        let title_room = (buttons_start - left - 2).max(0) as usize;
        for (idx, ch) in title.chars().take(title_room).enumerate() {
            put(
                buffer,
                area,
                left + 1 + idx as i64,
                top,
                &ch.to_string(),
                header_style,
            );
        }

        // Borders
        for y in top + header_rows..bottom {
            put(buffer, area, left, y, "│", border_style);
            put(buffer, area, right, y, "│", border_style);
        }
        if bottom >= top + header_rows {
            for x in left..=right {
                let symbol = if x == left {
                    "└"
                } else if x == right {
                    "┘"
                } else {
                    "─"
                };
                put(buffer, area, x, bottom, symbol, border_style);
            }
            if !maximized && chrome.handle_size > 0 {
                put(
                    buffer,
                    area,
                    right,
                    bottom,
                    "◢",
                    border_style.fg(theme::accent()),
                );
            }
        }
    }
}
