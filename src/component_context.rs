//! Shared component rendering context
//!
//! `ComponentContext` carries the window state a hosted component may care
//! about while rendering or handling input, so the component trait does not
//! grow ad-hoc boolean parameters.

/// Context passed to `Component` trait methods.
///
/// - `focused`: the hosting window is the focused one.
/// - `cursor_visible`: blink phase for text cursors.
#[derive(Debug, Clone, Copy)]
pub struct ComponentContext {
    focused: bool,
    cursor_visible: bool,
}

impl ComponentContext {
    pub const fn new(focused: bool) -> Self {
        Self {
            focused,
            cursor_visible: true,
        }
    }

    pub const fn focused(&self) -> bool {
        self.focused
    }

    /// A cursor is drawn only on a focused component during the visible
    /// blink phase.
    pub const fn show_cursor(&self) -> bool {
        self.focused && self.cursor_visible
    }

    pub const fn with_focus(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub const fn with_cursor_visible(mut self, visible: bool) -> Self {
        self.cursor_visible = visible;
        self
    }
}

impl Default for ComponentContext {
    fn default() -> Self {
        Self::new(false)
    }
}
