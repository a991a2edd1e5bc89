use crossterm::event::Event;
use ratatui::layout::Rect;

use crate::ui::UiFrame;

pub mod calculator;
pub mod docs;
pub mod placeholder;
pub mod status_bar;
pub mod terminal;

pub use calculator::CalculatorComponent;
pub use docs::DocsComponent;
pub use placeholder::PlaceholderComponent;
pub use status_bar::StatusBar;
pub use terminal::TerminalComponent;

pub use crate::component_context::ComponentContext;

pub trait Component {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext);

    fn handle_event(&mut self, _event: &Event, _ctx: &ComponentContext) -> bool {
        false
    }
}

/// Body of a hosted application window.
///
/// The window manager never looks inside; it only asks for a render, routes
/// input to the focused window's content and picks up title changes.
pub trait AppContent: Component + std::fmt::Debug {
    /// Title the content wants on its window, if it differs from the app name.
    fn title(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::UiFrame;
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
    use ratatui::prelude::Rect;

    #[derive(Debug)]
    struct DummyComp;
    impl Component for DummyComp {
        fn render(&mut self, _frame: &mut UiFrame<'_>, _area: Rect, _ctx: &ComponentContext) {}
    }
    impl AppContent for DummyComp {}

    #[test]
    fn default_handle_event_returns_false() {
        let mut d = DummyComp;
        assert!(!d.handle_event(
            &Event::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE)),
            &ComponentContext::default()
        ));
        assert_eq!(d.title(), None);
    }
}
