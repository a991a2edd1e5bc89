use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use indoc::indoc;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use super::{AppContent, Component, ComponentContext, StatusBar};
use crate::theme;
use crate::ui::{UiFrame, safe_set_string};

const STARTER_DOCUMENT: &str = indoc! {"
    # MISSION_OBJECTIVE

    - [x] Secure neural bridge
    - [ ] Decrypt core archives
    - [ ] Initiate system purge

    > The future belongs to those who control the code."};

/// How one source line is shown in preview mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewLine<'a> {
    Heading(&'a str),
    Bullet(&'a str),
    Quote(&'a str),
    Text(&'a str),
}

pub fn preview_line(line: &str) -> PreviewLine<'_> {
    if let Some(rest) = line.strip_prefix("# ") {
        PreviewLine::Heading(rest)
    } else if let Some(rest) = line.strip_prefix("- ") {
        PreviewLine::Bullet(rest)
    } else if let Some(rest) = line.strip_prefix("> ") {
        PreviewLine::Quote(rest)
    } else {
        PreviewLine::Text(line)
    }
}

/// Markdown scratchpad with an edit and a preview mode.
#[derive(Debug)]
pub struct DocsComponent {
    content: String,
    /// Byte offset, always on a char boundary.
    cursor: usize,
    preview: bool,
    scroll: usize,
    footer: StatusBar,
}

impl Default for DocsComponent {
    fn default() -> Self {
        Self::with_content(STARTER_DOCUMENT)
    }
}

impl DocsComponent {
    pub fn with_content(content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            cursor: content.len(),
            content,
            preview: false,
            scroll: 0,
            footer: StatusBar::new(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_preview(&self) -> bool {
        self.preview
    }

    pub fn toggle_preview(&mut self) {
        self.preview = !self.preview;
    }

    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }

    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    pub fn insert(&mut self, ch: char) {
        self.content.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = self.content[..self.cursor].chars().next_back() {
            self.cursor -= prev.len_utf8();
            self.content.remove(self.cursor);
        }
    }

    fn move_left(&mut self) {
        if let Some(prev) = self.content[..self.cursor].chars().next_back() {
            self.cursor -= prev.len_utf8();
        }
    }

    fn move_right(&mut self) {
        if let Some(next) = self.content[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }

    fn line_start(&self) -> usize {
        self.content[..self.cursor].rfind('\n').map_or(0, |idx| idx + 1)
    }

    fn line_end(&self) -> usize {
        self.content[self.cursor..]
            .find('\n')
            .map_or(self.content.len(), |idx| self.cursor + idx)
    }

    /// Row and column (in chars) of the cursor.
    fn cursor_position(&self) -> (usize, usize) {
        let before = &self.content[..self.cursor];
        let row = before.matches('\n').count();
        let col = before[self.line_start()..].chars().count();
        (row, col)
    }

    fn render_source(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        let (row, col) = self.cursor_position();
        let rows = area.height as usize;
        if row < self.scroll {
            self.scroll = row;
        } else if rows > 0 && row >= self.scroll + rows {
            self.scroll = row + 1 - rows;
        }
        let bounds = area.intersection(frame.area());
        let buffer = frame.buffer_mut();
        let style = Style::default().fg(theme::text());
        for (idx, line) in self.content.split('\n').skip(self.scroll).take(rows).enumerate() {
            let y = area.y.saturating_add(idx as u16);
            safe_set_string(buffer, bounds, area.x, y, line, style);
        }
        if ctx.show_cursor() {
            let x = area.x.saturating_add(col as u16);
            let y = area.y.saturating_add((row - self.scroll) as u16);
            if x < bounds.x.saturating_add(bounds.width)
                && let Some(cell) = buffer.cell_mut((x, y))
            {
                cell.set_style(Style::default().bg(theme::accent()).fg(theme::desktop_bg()));
            }
        }
    }

    fn render_preview(&self, frame: &mut UiFrame<'_>, area: Rect) {
        let bounds = area.intersection(frame.area());
        let buffer = frame.buffer_mut();
        for (idx, line) in self.content.lines().take(area.height as usize).enumerate() {
            let y = area.y.saturating_add(idx as u16);
            let (text, style) = match preview_line(line) {
                PreviewLine::Heading(text) => (
                    text.to_string(),
                    Style::default()
                        .fg(theme::accent())
                        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                ),
                PreviewLine::Bullet(text) => (
                    format!("  • {text}"),
                    Style::default().fg(theme::text()),
                ),
                PreviewLine::Quote(text) => (
                    format!("┃ {text}"),
                    Style::default()
                        .fg(theme::muted())
                        .add_modifier(Modifier::ITALIC),
                ),
                PreviewLine::Text(text) => (text.to_string(), Style::default().fg(theme::text())),
            };
            safe_set_string(buffer, bounds, area.x, y, &text, style);
        }
    }
}

impl Component for DocsComponent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let body = Rect {
            height: area.height.saturating_sub(1),
            ..area
        };
        if self.preview {
            self.render_preview(frame, body);
        } else {
            self.render_source(frame, body, ctx);
        }

        self.footer.set_left(format!(
            "WORDS: {}  CHARS: {}",
            self.word_count(),
            self.char_count()
        ));
        self.footer.set_right(if self.preview {
            "PREVIEW_MODE ^P"
        } else {
            "EDIT_MODE ^P"
        });
        self.footer
            .set_style(Style::default().bg(theme::panel_bg()).fg(theme::muted()));
        let footer_area = Rect {
            y: area.y.saturating_add(body.height),
            height: 1,
            ..area
        };
        self.footer.render(frame, footer_area, ctx);
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
        let Event::Key(key) = event else {
            return false;
        };
        if key.kind == KeyEventKind::Release {
            return false;
        }
        if key.code == KeyCode::Char('p') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.toggle_preview();
            return true;
        }
        if self.preview {
            return false;
        }
        match key.code {
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => self.insert(ch),
            KeyCode::Enter => self.insert('\n'),
            KeyCode::Tab => {
                self.insert(' ');
                self.insert(' ');
            }
            KeyCode::Backspace => self.backspace(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => self.cursor = self.line_start(),
            KeyCode::End => self.cursor = self.line_end(),
            _ => return false,
        }
        true
    }
}

impl AppContent for DocsComponent {
    /// The first heading names the document.
    fn title(&self) -> Option<String> {
        self.content.lines().find_map(|line| match preview_line(line) {
            PreviewLine::Heading(text) if !text.trim().is_empty() => {
                Some(format!("NemeDocs: {}", text.trim()))
            }
            _ => None,
        })
    }
}
