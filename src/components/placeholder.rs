use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use super::{AppContent, Component, ComponentContext};
use crate::theme;
use crate::ui::{UiFrame, safe_set_string};

pub const PLACEHOLDER_TEXT: &str = "APPLICATION_MODULE_PENDING_IMPLEMENTATION";

/// Body of windows whose app has no registered content.
#[derive(Debug, Default)]
pub struct PlaceholderComponent;

impl Component for PlaceholderComponent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let bounds = area.intersection(frame.area());
        let text_width = PLACEHOLDER_TEXT.len() as u16;
        let x = area.x + area.width.saturating_sub(text_width) / 2;
        let y = area.y + area.height / 2;
        safe_set_string(
            frame.buffer_mut(),
            bounds,
            x,
            y,
            PLACEHOLDER_TEXT,
            Style::default()
                .fg(theme::muted())
                .add_modifier(Modifier::ITALIC),
        );
    }
}

impl AppContent for PlaceholderComponent {}
