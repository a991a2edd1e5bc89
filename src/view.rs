//! Painting of the login gate and the desktop, plus hit-testing of the
//! pieces that are not windows (desktop icons, start menu).
//!
//! Windows are hit-tested by the session itself in workspace coordinates;
//! everything here works in screen cells against the last painted frame.

use std::time::Instant;

use indoc::indoc;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};

use crate::apps::{AppCatalog, AppId};
use crate::component_context::ComponentContext;
use crate::desktop::DesktopSession;
use crate::notifications::NotificationKind;
use crate::state::{LoginField, LoginForm};
use crate::theme;
use crate::ui::{UiFrame, ellipsize, rect_contains, safe_set_string};
use crate::window::{NeonDecorator, WindowDecorator, decorator::to_screen};

const LOGO: &str = indoc! {"
    ╔╗╔╔═╗╔╦╗╔═╗╔═╗╦╔═╗
    ║║║║╣ ║║║║╣ ╚═╗║╚═╗
    ╝╚╝╚═╝╩ ╩╚═╝╚═╝╩╚═╝
"};

const ICON_WIDTH: u16 = 12;
const ICON_HEIGHT: u16 = 3;
const MENU_WIDTH: u16 = 34;
const TOAST_WIDTH: u16 = 40;
const TOAST_HEIGHT: u16 = 4;
const MAX_TOASTS: usize = 3;

/// A press on something painted by the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewHit {
    Icon(AppId),
    MenuItem(AppId),
    MenuLogout,
    /// Inside the open start menu but on nothing actionable.
    Menu,
}

#[derive(Debug, Default)]
pub struct DesktopView {
    decorator: NeonDecorator,
    icon_hits: Vec<(Rect, AppId)>,
    menu_rect: Option<Rect>,
    menu_hits: Vec<(Rect, ViewHit)>,
}

impl DesktopView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paint the desktop into `area` (the workspace's screen rect).
    pub fn render(
        &mut self,
        frame: &mut UiFrame<'_>,
        area: Rect,
        session: &mut DesktopSession,
        now: Instant,
        cursor_visible: bool,
    ) {
        self.icon_hits.clear();
        self.menu_hits.clear();
        self.menu_rect = None;
        frame.fill(area, Style::default().bg(theme::desktop_bg()));
        self.render_icons(frame, area, session.registry().catalog());
        self.render_windows(frame, area, session, cursor_visible);
        render_notifications(frame, area, session, now);
        if session.start_menu().is_open() {
            self.render_start_menu(frame, area, session);
        }
    }

    fn render_icons(&mut self, frame: &mut UiFrame<'_>, area: Rect, catalog: &dyn AppCatalog) {
        let icon_style = Style::default().bg(theme::desktop_bg()).fg(theme::accent());
        let label_style = Style::default().bg(theme::desktop_bg()).fg(theme::text());
        for (idx, app) in AppId::DESKTOP_ICONS.into_iter().enumerate() {
            let Some(meta) = catalog.metadata(app) else {
                continue;
            };
            let rect = Rect::new(
                area.x.saturating_add(1),
                area.y
                    .saturating_add(1)
                    .saturating_add(idx as u16 * (ICON_HEIGHT + 1)),
                ICON_WIDTH,
                ICON_HEIGHT,
            )
            .intersection(area);
            if rect.is_empty() {
                continue;
            }
            let label = ellipsize(meta.display_name, ICON_WIDTH as usize);
            let center = |text: &str| {
                rect.x + (ICON_WIDTH.saturating_sub(text.chars().count() as u16)) / 2
            };
            let buffer = frame.buffer_mut();
            let glyph = format!("[{}]", meta.icon_glyph);
            safe_set_string(buffer, rect, center(&glyph), rect.y, &glyph, icon_style);
            safe_set_string(buffer, rect, center(&label), rect.y + 1, &label, label_style);
            self.icon_hits.push((rect, app));
        }
    }

    fn render_windows(
        &mut self,
        frame: &mut UiFrame<'_>,
        area: Rect,
        session: &mut DesktopSession,
        cursor_visible: bool,
    ) {
        let workspace = session.workspace();
        let (registry, contents) = session.parts_mut();
        let chrome = registry.config().chrome;
        for rec in registry.draw_order() {
            let rect = rec.frame(workspace);
            let Some(screen) = to_screen(area, rect) else {
                continue;
            };
            let focused = registry.is_focused(&rec.id);
            frame.render_widget(Clear, screen);
            frame.fill(screen, Style::default().bg(theme::window_bg()));
            self.decorator.render_window(
                frame.buffer_mut(),
                area,
                rect,
                &chrome,
                &rec.title,
                focused,
                rec.is_maximized,
            );
            if let Some(body) = to_screen(area, chrome.body(rect)) {
                let ctx = ComponentContext::new(focused).with_cursor_visible(cursor_visible);
                contents
                    .content_for(&rec.id, rec.app_id)
                    .render(frame, body, &ctx);
            }
        }
    }

    fn render_start_menu(&mut self, frame: &mut UiFrame<'_>, area: Rect, session: &DesktopSession) {
        let menu = session.start_menu();
        let catalog = session.registry().catalog();
        let apps = menu.filtered(catalog);
        // Border, search row, separator, items, separator, logout row, border.
        let wanted = apps.len() as u16 + 6;
        let height = wanted.min(area.height);
        let width = MENU_WIDTH.min(area.width);
        if height < 4 || width < 8 {
            return;
        }
        let rect = Rect::new(
            area.x,
            area.y.saturating_add(area.height.saturating_sub(height)),
            width,
            height,
        );
        self.menu_rect = Some(rect);
        frame.render_widget(Clear, rect);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::accent()))
            .title(Span::styled(
                " START ",
                Style::default()
                    .fg(theme::accent())
                    .add_modifier(Modifier::BOLD),
            ))
            .style(Style::default().bg(theme::panel_bg()).fg(theme::panel_fg()));
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let bounds = inner;
        let buffer = frame.buffer_mut();
        let mut y = inner.y;
        let search = format!("⌕ {}▏", menu.query());
        safe_set_string(
            buffer,
            bounds,
            inner.x,
            y,
            &search,
            Style::default().fg(theme::text()),
        );
        y = y.saturating_add(2);

        let logout_y = inner.y.saturating_add(inner.height).saturating_sub(1);
        for (idx, app) in apps.iter().enumerate() {
            if y + 1 >= logout_y {
                break;
            }
            let Some(meta) = catalog.metadata(*app) else {
                continue;
            };
            let selected = idx == menu.selected();
            let style = if selected {
                Style::default()
                    .bg(theme::menu_selected_bg())
                    .fg(theme::menu_selected_fg())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme::panel_fg())
            };
            let row = Rect::new(inner.x, y, inner.width, 1);
            let text = format!(" {} {:<width$}", meta.icon_glyph, meta.display_name, width = inner.width as usize);
            safe_set_string(buffer, bounds, inner.x, y, &text, style);
            self.menu_hits.push((row, ViewHit::MenuItem(*app)));
            y += 1;
        }
        if apps.is_empty() {
            safe_set_string(
                buffer,
                bounds,
                inner.x + 1,
                y,
                "no matching apps",
                Style::default().fg(theme::muted()),
            );
        }

        safe_set_string(
            buffer,
            bounds,
            inner.x + 1,
            logout_y,
            "⏻ Log out",
            Style::default().fg(theme::danger()),
        );
        self.menu_hits
            .push((Rect::new(inner.x, logout_y, inner.width, 1), ViewHit::MenuLogout));
    }

    /// Resolve a press against the last painted frame. The start menu sits
    /// above the icons, so it is checked first.
    pub fn hit_test(&self, column: u16, row: u16) -> Option<ViewHit> {
        if let Some(rect) = self.menu_rect
            && rect_contains(rect, column, row)
        {
            let hit = self
                .menu_hits
                .iter()
                .find(|(rect, _)| rect_contains(*rect, column, row))
                .map_or(ViewHit::Menu, |(_, hit)| *hit);
            return Some(hit);
        }
        self.icon_hits
            .iter()
            .find(|(rect, _)| rect_contains(*rect, column, row))
            .map(|(_, app)| ViewHit::Icon(*app))
    }
}

fn toast_color(kind: NotificationKind) -> ratatui::style::Color {
    match kind {
        NotificationKind::System => theme::accent(),
        NotificationKind::Info => theme::text(),
        NotificationKind::Warning => theme::warning(),
        NotificationKind::Error => theme::danger(),
    }
}

fn render_notifications(
    frame: &mut UiFrame<'_>,
    area: Rect,
    session: &DesktopSession,
    now: Instant,
) {
    let width = TOAST_WIDTH.min(area.width);
    let x = area.x + area.width - width;
    let mut y = area.y;
    for note in session.notifications().iter().take(MAX_TOASTS) {
        if y.saturating_add(TOAST_HEIGHT) > area.y.saturating_add(area.height) {
            break;
        }
        let rect = Rect::new(x, y, width, TOAST_HEIGHT);
        let color = toast_color(note.kind);
        let age = now.saturating_duration_since(note.created_at).as_secs();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(Span::styled(
                format!(" {} ", note.title),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
            .title_bottom(Line::from(format!(" {} · {age}s ", note.kind)).right_aligned())
            .style(Style::default().bg(theme::panel_bg()).fg(theme::text()));
        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(note.message.as_str())
                .block(block)
                .wrap(Wrap { trim: true }),
            rect,
        );
        y += TOAST_HEIGHT;
    }
}

/// Full-screen login gate.
pub fn render_login(frame: &mut UiFrame<'_>, area: Rect, form: &LoginForm, hints: &str) {
    frame.fill(area, Style::default().bg(theme::desktop_bg()));

    let logo_lines: Vec<&str> = LOGO.lines().collect();
    let box_width = 44.min(area.width);
    let box_height = (logo_lines.len() as u16 + 9).min(area.height);
    let rect = Rect::new(
        area.x + area.width.saturating_sub(box_width) / 2,
        area.y + area.height.saturating_sub(box_height) / 2,
        box_width,
        box_height,
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(theme::accent()))
        .style(Style::default().bg(theme::panel_bg()).fg(theme::text()));

    let field_style = |field: LoginField| {
        if form.field() == field && !form.is_submitting() {
            Style::default()
                .bg(theme::menu_selected_bg())
                .fg(theme::menu_selected_fg())
        } else {
            Style::default().fg(theme::text())
        }
    };
    let mut lines: Vec<Line> = logo_lines
        .iter()
        .map(|line| {
            Line::from(Span::styled(
                *line,
                Style::default()
                    .fg(theme::accent_alt())
                    .add_modifier(Modifier::BOLD),
            ))
            .centered()
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" USER  ", Style::default().fg(theme::muted())),
        Span::styled(format!(" {:<24}", form.username()), field_style(LoginField::Username)),
    ]));
    lines.push(Line::from(vec![
        Span::styled(" PASS  ", Style::default().fg(theme::muted())),
        Span::styled(
            format!(" {:<24}", "•".repeat(form.password_len())),
            field_style(LoginField::Password),
        ),
    ]));
    lines.push(Line::from(""));
    let status = if form.is_submitting() {
        Span::styled(
            "AUTHENTICATING…",
            Style::default()
                .fg(theme::warning())
                .add_modifier(Modifier::SLOW_BLINK),
        )
    } else {
        Span::styled("[ Enter ] authenticate", Style::default().fg(theme::accent()))
    };
    lines.push(Line::from(status).centered());

    frame.render_widget(Paragraph::new(lines).block(block), rect);

    if area.height > 0 {
        let bounds = Rect::new(area.x, area.y + area.height - 1, area.width, 1);
        safe_set_string(
            frame.buffer_mut(),
            bounds,
            area.x + 1,
            bounds.y,
            hints,
            Style::default().fg(theme::muted()),
        );
    }
}

/// Boot splash: the logo, a status line and a progress bar.
pub fn render_boot(frame: &mut UiFrame<'_>, area: Rect, progress: f64) {
    frame.fill(area, Style::default().bg(theme::desktop_bg()));

    let logo_lines: Vec<&str> = LOGO.lines().collect();
    let height = (logo_lines.len() as u16 + 4).min(area.height);
    let width = 34.min(area.width);
    let rect = Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    );
    let bar_width = width.saturating_sub(2) as usize;
    let filled = ((bar_width as f64) * progress.clamp(0.0, 1.0)).round() as usize;

    let mut lines: Vec<Line> = logo_lines
        .iter()
        .map(|line| {
            Line::from(Span::styled(*line, Style::default().fg(theme::accent_alt()))).centered()
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(
        Line::from(Span::styled(
            "NEMESIS OS INITIALIZING...",
            Style::default()
                .fg(theme::accent())
                .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK),
        ))
        .centered(),
    );
    lines.push(Line::from(""));
    lines.push(
        Line::from(vec![
            Span::styled("█".repeat(filled), Style::default().fg(theme::accent())),
            Span::styled(
                "░".repeat(bar_width - filled),
                Style::default().fg(theme::muted()),
            ),
        ])
        .centered(),
    );
    frame.render_widget(Paragraph::new(lines), rect);
}
