//! Start menu state: open flag, search query and selection.

use crate::apps::{AppCatalog, AppId};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StartMenu {
    open: bool,
    query: String,
    selected: usize,
}

impl StartMenu {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open = true;
        }
    }

    /// Closing also forgets the search.
    pub fn close(&mut self) {
        self.open = false;
        self.query.clear();
        self.selected = 0;
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn push_char(&mut self, ch: char) {
        self.query.push(ch);
        self.selected = 0;
    }

    pub fn pop_char(&mut self) {
        self.query.pop();
        self.selected = 0;
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn move_selection(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        let max = len - 1;
        self.selected = if delta.is_negative() {
            self.selected.saturating_sub(delta.unsigned_abs())
        } else {
            (self.selected + delta as usize).min(max)
        };
    }

    /// Apps whose display name contains the query, ignoring case.
    pub fn filtered(&self, catalog: &dyn AppCatalog) -> Vec<AppId> {
        let needle = self.query.to_lowercase();
        AppId::ALL
            .into_iter()
            .filter(|app| {
                catalog
                    .metadata(*app)
                    .is_some_and(|meta| meta.display_name.to_lowercase().contains(&needle))
            })
            .collect()
    }

    pub fn selected_app(&self, catalog: &dyn AppCatalog) -> Option<AppId> {
        self.filtered(catalog).get(self.selected).copied()
    }
}
