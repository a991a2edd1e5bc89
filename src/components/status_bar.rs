use ratatui::layout::Rect;
use ratatui::style::Style;

use super::ComponentContext;
use crate::ui::{UiFrame, safe_set_string, truncate_to_width};

/// One-row strip with left- and right-aligned text.
#[derive(Debug, Default)]
pub struct StatusBar {
    left: String,
    right: String,
    style: Style,
}

impl StatusBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_left<T: Into<String>>(&mut self, value: T) {
        self.left = value.into();
    }

    pub fn set_right<T: Into<String>>(&mut self, value: T) {
        self.right = value.into();
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }
}

impl super::Component for StatusBar {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let bounds = area.intersection(frame.area());
        if bounds.width == 0 || bounds.height == 0 {
            return;
        }
        let width = area.width as usize;
        let buffer = frame.buffer_mut();
        for x in bounds.x..bounds.x.saturating_add(bounds.width) {
            if let Some(cell) = buffer.cell_mut((x, area.y)) {
                cell.set_symbol(" ");
                cell.set_style(self.style);
            }
        }

        let left = truncate_to_width(&self.left, width);
        safe_set_string(buffer, bounds, area.x, area.y, &left, self.style);

        let left_width = left.chars().count();
        if !self.right.is_empty() && left_width + 1 < width {
            let right = truncate_to_width(&self.right, width - left_width - 1);
            let start_x = area
                .x
                .saturating_add((width - right.chars().count()) as u16);
            safe_set_string(buffer, bounds, start_x, area.y, &right, self.style);
        }
    }
}
