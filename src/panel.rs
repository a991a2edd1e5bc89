//! The taskbar strip: start button, launcher/window entries and the tray.

use std::time::Duration;

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
};

use crate::apps::{AppCatalog, AppId};
use crate::launcher::TaskbarEntry;
use crate::theme;
use crate::ui::{UiFrame, ellipsize, rect_contains, safe_set_string};
use crate::window::WindowId;

const START_LABEL: &str = " ◆ NEMESIS ";
const MAX_ENTRY_LABEL: usize = 18;

/// What a press on the taskbar landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelHit {
    StartButton,
    /// A pinned app that has no window yet.
    Launch(AppId),
    Window(WindowId),
}

#[derive(Debug, Default)]
pub struct Panel {
    area: Rect,
    start_rect: Option<Rect>,
    entry_hits: Vec<(Rect, PanelHit)>,
    hostname: Option<String>,
}

impl Panel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed host name instead of asking the OS.
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    fn hostname(&mut self) -> &str {
        self.hostname.get_or_insert_with(|| {
            hostname::get()
                .ok()
                .and_then(|s| s.into_string().ok())
                .unwrap_or_else(|| "localhost".to_string())
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &mut self,
        frame: &mut UiFrame<'_>,
        area: Rect,
        entries: &[TaskbarEntry],
        catalog: &dyn AppCatalog,
        menu_open: bool,
        user: &str,
        uptime: Duration,
    ) {
        self.area = area;
        self.start_rect = None;
        self.entry_hits.clear();
        if area.width == 0 || area.height == 0 {
            return;
        }
        let base = Style::default()
            .bg(theme::panel_bg())
            .fg(theme::panel_fg());
        frame.fill(area, base);
        let y = area.y;
        let max_x = area.x.saturating_add(area.width);

        let tray = format!(" {}@{}  up {} ", user, self.hostname(), format_uptime(uptime));
        let tray_width = tray.chars().count() as u16;
        let tray_x = max_x.saturating_sub(tray_width).max(area.x);

        let buffer = frame.buffer_mut();
        let bounds = area.intersection(buffer.area);

        let mut x = area.x;
        let start_width = START_LABEL.chars().count() as u16;
        let start_style = if menu_open {
            Style::default()
                .bg(theme::accent_alt())
                .fg(theme::text())
                .add_modifier(Modifier::BOLD)
        } else {
            base.fg(theme::accent()).add_modifier(Modifier::BOLD)
        };
        safe_set_string(buffer, bounds, x, y, START_LABEL, start_style);
        self.start_rect = Some(Rect::new(x, y, start_width.min(area.width), 1));
        x = x.saturating_add(start_width).saturating_add(1);

        for entry in entries {
            let glyph = catalog
                .metadata(entry.app_id)
                .map_or("▪", |meta| meta.icon_glyph);
            let chunk = format!(" {glyph} {} ", ellipsize(&entry.title, MAX_ENTRY_LABEL));
            let width = chunk.chars().count() as u16;
            if x.saturating_add(width) > tray_x {
                break;
            }
            let style = if entry.active {
                Style::default()
                    .bg(theme::panel_active_bg())
                    .fg(theme::panel_active_fg())
                    .add_modifier(Modifier::BOLD)
            } else if entry.window.is_none() {
                base.fg(theme::muted())
            } else if entry.minimized {
                base.add_modifier(Modifier::DIM)
            } else {
                base.add_modifier(Modifier::UNDERLINED)
            };
            safe_set_string(buffer, bounds, x, y, &chunk, style);
            let hit = match &entry.window {
                Some(id) => PanelHit::Window(id.clone()),
                None => PanelHit::Launch(entry.app_id),
            };
            self.entry_hits.push((Rect::new(x, y, width, 1), hit));
            x = x.saturating_add(width);
        }

        safe_set_string(buffer, bounds, tray_x, y, &tray, base.fg(theme::muted()));
    }

    /// Resolve a press at a screen cell against the last rendered frame.
    pub fn hit_test(&self, column: u16, row: u16) -> Option<PanelHit> {
        if !rect_contains(self.area, column, row) {
            return None;
        }
        if self
            .start_rect
            .is_some_and(|rect| rect_contains(rect, column, row))
        {
            return Some(PanelHit::StartButton);
        }
        self.entry_hits
            .iter()
            .find(|(rect, _)| rect_contains(*rect, column, row))
            .map(|(_, hit)| hit.clone())
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        rect_contains(self.area, column, row)
    }
}

/// `HH:MM:SS`, with hours allowed past 99.
pub fn format_uptime(uptime: Duration) -> String {
    let secs = uptime.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}
