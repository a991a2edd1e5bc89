//! Neon palette of the desktop.
//!
//! Colors are declared as RGB and resolved per terminal: truecolor terminals
//! get them verbatim, everything else the closest xterm-256 entry.

use std::sync::OnceLock;

use ratatui::style::Color;

pub const CYAN_RGB: (u8, u8, u8) = (0x00, 0xD4, 0xFF);
pub const VIOLET_RGB: (u8, u8, u8) = (0x6C, 0x00, 0xFF);
pub const VOID_RGB: (u8, u8, u8) = (0x0A, 0x0A, 0x0F);
pub const PANEL_RGB: (u8, u8, u8) = (0x14, 0x14, 0x1E);
pub const MUTED_RGB: (u8, u8, u8) = (0x6B, 0x72, 0x80);
pub const DANGER_RGB: (u8, u8, u8) = (0xFF, 0x3B, 0x5C);
pub const WARNING_RGB: (u8, u8, u8) = (0xFA, 0xCC, 0x15);
pub const TEXT_RGB: (u8, u8, u8) = (0xE5, 0xE7, 0xEB);

fn truecolor() -> bool {
    static TRUECOLOR: OnceLock<bool> = OnceLock::new();
    *TRUECOLOR.get_or_init(|| {
        std::env::var("COLORTERM").is_ok_and(|var| {
            let var = var.to_ascii_lowercase();
            var.contains("truecolor") || var.contains("24bit")
        })
    })
}

pub fn rgb(color: (u8, u8, u8)) -> Color {
    if truecolor() {
        Color::Rgb(color.0, color.1, color.2)
    } else {
        Color::Indexed(xterm_index(color))
    }
}

const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

fn nearest_level(v: u8) -> usize {
    CUBE_LEVELS
        .iter()
        .enumerate()
        .min_by_key(|(_, level)| (**level as i32 - v as i32).abs())
        .map_or(0, |(idx, _)| idx)
}

fn distance((r1, g1, b1): (u8, u8, u8), (r2, g2, b2): (u8, u8, u8)) -> u32 {
    let d = |a: u8, b: u8| (a as i32 - b as i32).pow(2) as u32;
    d(r1, r2) + d(g1, g2) + d(b1, b2)
}

/// Closest entry of the 6x6x6 cube or the 24-step gray ramp.
fn xterm_index(color: (u8, u8, u8)) -> u8 {
    let (r, g, b) = (
        nearest_level(color.0),
        nearest_level(color.1),
        nearest_level(color.2),
    );
    let cube_rgb = (CUBE_LEVELS[r], CUBE_LEVELS[g], CUBE_LEVELS[b]);
    let cube_idx = 16 + 36 * r + 6 * g + b;

    let avg = (color.0 as u32 + color.1 as u32 + color.2 as u32) / 3;
    let step = (avg.saturating_sub(8) / 10).min(23);
    let gray = (8 + step * 10) as u8;

    if distance(color, (gray, gray, gray)) < distance(color, cube_rgb) {
        (232 + step) as u8
    } else {
        cube_idx as u8
    }
}

pub fn accent() -> Color {
    rgb(CYAN_RGB)
}

pub fn accent_alt() -> Color {
    rgb(VIOLET_RGB)
}

pub fn desktop_bg() -> Color {
    rgb(VOID_RGB)
}

pub fn text() -> Color {
    rgb(TEXT_RGB)
}

pub fn muted() -> Color {
    rgb(MUTED_RGB)
}

pub fn danger() -> Color {
    rgb(DANGER_RGB)
}

pub fn warning() -> Color {
    rgb(WARNING_RGB)
}

// Taskbar / start menu
pub fn panel_bg() -> Color {
    rgb(PANEL_RGB)
}
pub fn panel_fg() -> Color {
    text()
}
pub fn panel_active_bg() -> Color {
    accent_alt()
}
pub fn panel_active_fg() -> Color {
    Color::White
}
pub fn menu_selected_bg() -> Color {
    accent()
}
pub fn menu_selected_fg() -> Color {
    rgb(VOID_RGB)
}

// Window chrome
pub fn decorator_header_bg(focused: bool) -> Color {
    if focused { accent_alt() } else { panel_bg() }
}
pub fn decorator_header_fg() -> Color {
    Color::White
}
pub fn decorator_border(focused: bool) -> Color {
    if focused { accent() } else { muted() }
}
pub fn window_bg() -> Color {
    rgb(VOID_RGB)
}
