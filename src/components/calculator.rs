use crossterm::event::{Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use super::{AppContent, Component, ComponentContext};
use crate::theme;
use crate::ui::{UiFrame, rect_contains, safe_set_string};

const KEYPAD: [[char; 4]; 4] = [
    ['7', '8', '9', '/'],
    ['4', '5', '6', '*'],
    ['1', '2', '3', '-'],
    ['0', '.', '=', '+'],
];

/// Rows above the keypad: equation, display, spacer.
const HEADER_ROWS: u16 = 3;

/// Two-register calculator: an entry `display` and a pending `equation`
/// (`"<lhs> <op> "`) completed by `=`.
#[derive(Debug)]
pub struct CalculatorComponent {
    display: String,
    equation: String,
    last_area: Rect,
}

impl Default for CalculatorComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl CalculatorComponent {
    pub fn new() -> Self {
        Self {
            display: "0".to_string(),
            equation: String::new(),
            last_area: Rect::default(),
        }
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn equation(&self) -> &str {
        &self.equation
    }

    /// Feed one keypad symbol. Unknown symbols are ignored.
    pub fn press(&mut self, key: char) -> bool {
        match key {
            '0'..='9' | '.' => self.push_digit(key),
            '+' | '-' | '*' | '/' => self.push_op(key),
            '=' => self.calculate(),
            'c' | 'C' => self.clear(),
            _ => return false,
        }
        true
    }

    fn push_digit(&mut self, digit: char) {
        if self.display == "0" || self.display == "Error" {
            self.display.clear();
        }
        self.display.push(digit);
    }

    fn push_op(&mut self, op: char) {
        self.equation = format!("{} {} ", self.display, op);
        self.display = "0".to_string();
    }

    fn calculate(&mut self) {
        match evaluate(&self.equation, &self.display) {
            Some(result) => {
                self.equation = format!("{}{} =", self.equation, self.display);
                self.display = format_number(result);
            }
            None => self.display = "Error".to_string(),
        }
    }

    pub fn clear(&mut self) {
        self.display = "0".to_string();
        self.equation.clear();
    }

    fn key_at(&self, column: u16, row: u16) -> Option<char> {
        let area = self.last_area;
        if !rect_contains(area, column, row) {
            return None;
        }
        let rel_y = row - area.y;
        if rel_y < HEADER_ROWS {
            return None;
        }
        let pad_row = (rel_y - HEADER_ROWS) as usize;
        if pad_row == KEYPAD.len() {
            return Some('c');
        }
        let cell_w = (area.width / 4).max(1);
        let col = (((column - area.x) / cell_w) as usize).min(3);
        KEYPAD.get(pad_row).map(|keys| keys[col])
    }
}

/// `lhs op rhs` where `equation` is `"<lhs> <op> "`. Anything else, and
/// non-finite results such as division by zero, is an error.
fn evaluate(equation: &str, rhs: &str) -> Option<f64> {
    let mut parts = equation.split_whitespace();
    let lhs: f64 = parts.next()?.parse().ok()?;
    let op = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    let rhs: f64 = rhs.parse().ok()?;
    let value = match op {
        "+" => lhs + rhs,
        "-" => lhs - rhs,
        "*" => lhs * rhs,
        "/" => lhs / rhs,
        _ => return None,
    };
    value.is_finite().then_some(value)
}

fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    value.to_string()
}

impl Component for CalculatorComponent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        self.last_area = area;
        if area.width == 0 || area.height == 0 {
            return;
        }
        let bounds = area.intersection(frame.area());
        let buffer = frame.buffer_mut();
        let right_align = |text: &str| {
            area.x
                .saturating_add(area.width.saturating_sub(text.chars().count() as u16 + 1))
        };

        let eq_style = Style::default().fg(theme::muted());
        safe_set_string(
            buffer,
            bounds,
            right_align(&self.equation),
            area.y,
            &self.equation,
            eq_style,
        );
        let display_style = Style::default()
            .fg(theme::accent())
            .add_modifier(Modifier::BOLD);
        safe_set_string(
            buffer,
            bounds,
            right_align(&self.display),
            area.y.saturating_add(1),
            &self.display,
            display_style,
        );

        let cell_w = (area.width / 4).max(1);
        for (row, keys) in KEYPAD.iter().enumerate() {
            let y = area.y.saturating_add(HEADER_ROWS + row as u16);
            for (col, key) in keys.iter().enumerate() {
                let style = if *key == '=' {
                    Style::default().bg(theme::accent_alt()).fg(theme::text())
                } else if ctx.focused() {
                    Style::default().fg(theme::text())
                } else {
                    Style::default().fg(theme::muted())
                };
                let label = format!("[ {key} ]");
                let x = area.x.saturating_add(col as u16 * cell_w);
                safe_set_string(buffer, bounds, x, y, &label, style);
            }
        }
        let clear_y = area.y.saturating_add(HEADER_ROWS + KEYPAD.len() as u16);
        safe_set_string(
            buffer,
            bounds,
            area.x,
            clear_y,
            "[ CLEAR SEQUENCE ]",
            Style::default().fg(theme::danger()),
        );
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => match key.code {
                KeyCode::Char(ch) => self.press(if ch == 'x' { '*' } else { ch }),
                KeyCode::Enter => self.press('='),
                KeyCode::Backspace | KeyCode::Delete => self.press('c'),
                _ => false,
            },
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => self
                .key_at(mouse.column, mouse.row)
                .is_some_and(|key| self.press(key)),
            _ => false,
        }
    }
}

impl AppContent for CalculatorComponent {}
