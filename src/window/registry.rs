use crate::apps::{AppCatalog, AppId, BuiltinCatalog};
use crate::config::DesktopConfig;
use crate::geometry::{Point, WindowRect, clamp_i32};

use super::floating::clamp_drag_origin;
use super::{WindowId, WindowRecord};

/// Single source of truth for open windows.
///
/// Records are kept in creation order; paint order is derived from
/// `z_index`. Every operation addressed to an unknown id is a no-op that
/// reports `false`.
#[derive(Debug)]
pub struct WindowRegistry {
    catalog: Box<dyn AppCatalog>,
    config: DesktopConfig,
    records: Vec<WindowRecord>,
    focused: Option<WindowId>,
    /// Bounds new windows cascade within, when known.
    workspace: Option<WindowRect>,
}

impl Default for WindowRegistry {
    fn default() -> Self {
        Self::new(DesktopConfig::default())
    }
}

impl WindowRegistry {
    pub fn new(config: DesktopConfig) -> Self {
        Self::with_catalog(config, Box::new(BuiltinCatalog))
    }

    pub fn with_catalog(config: DesktopConfig, catalog: Box<dyn AppCatalog>) -> Self {
        Self {
            catalog,
            config,
            records: Vec::new(),
            focused: None,
            workspace: None,
        }
    }

    /// Keep the cascade of newly opened windows inside `workspace`.
    pub fn set_workspace(&mut self, workspace: WindowRect) {
        self.workspace = Some(workspace);
    }

    pub fn config(&self) -> &DesktopConfig {
        &self.config
    }

    pub fn catalog(&self) -> &dyn AppCatalog {
        self.catalog.as_ref()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &WindowRecord> {
        self.records.iter()
    }

    pub fn get(&self, id: &WindowId) -> Option<&WindowRecord> {
        self.records.iter().find(|rec| &rec.id == id)
    }

    fn get_mut(&mut self, id: &WindowId) -> Option<&mut WindowRecord> {
        self.records.iter_mut().find(|rec| &rec.id == id)
    }

    pub fn focused(&self) -> Option<&WindowId> {
        self.focused.as_ref()
    }

    pub fn is_focused(&self, id: &WindowId) -> bool {
        self.focused.as_ref() == Some(id)
    }

    /// First window (in creation order) hosting `app`.
    pub fn find_by_app(&self, app: AppId) -> Option<&WindowRecord> {
        self.records.iter().find(|rec| rec.app_id == app)
    }

    pub fn max_z(&self) -> Option<u32> {
        self.records.iter().map(|rec| rec.z_index).max()
    }

    fn is_strictly_on_top(&self, id: &WindowId) -> bool {
        let Some(rec) = self.get(id) else {
            return false;
        };
        self.records
            .iter()
            .all(|other| &other.id == id || other.z_index < rec.z_index)
    }

    /// Visible windows from bottom to top. Ties keep creation order.
    pub fn draw_order(&self) -> Vec<&WindowRecord> {
        let mut visible: Vec<&WindowRecord> =
            self.records.iter().filter(|rec| rec.is_visible()).collect();
        visible.sort_by_key(|rec| rec.z_index);
        visible
    }

    /// Painted geometry of `id`, or `None` when it is unknown or minimized.
    pub fn frame_of(&self, id: &WindowId, workspace: WindowRect) -> Option<WindowRect> {
        self.get(id)
            .filter(|rec| rec.is_visible())
            .map(|rec| rec.frame(workspace))
    }

    /// Topmost visible window under `point`.
    pub fn window_at(&self, point: Point, workspace: WindowRect) -> Option<&WindowRecord> {
        self.draw_order()
            .into_iter()
            .rev()
            .find(|rec| rec.frame(workspace).contains(point))
    }

    /// Open a window for `app`.
    ///
    /// A pinned app that already has a window gets that window focused
    /// instead of a second one. Apps the catalog does not know are ignored.
    pub fn open(&mut self, app: AppId) -> Option<WindowId> {
        let Some(meta) = self.catalog.metadata(app) else {
            tracing::debug!(app_id = %app, "open ignored: no metadata for app");
            return None;
        };
        let title = meta.display_name.to_string();
        let pinned = meta.pinned;

        if pinned && let Some(existing) = self.find_by_app(app).map(|rec| rec.id.clone()) {
            tracing::debug!(window_id = %existing, app_id = %app, "reusing pinned window");
            self.focus(&existing);
            return Some(existing);
        }

        let z_index = self.next_z();
        let origin = self.cascade_slot(self.records.len() as i64);
        let cfg = &self.config;
        let record = WindowRecord {
            id: WindowId::generate(),
            app_id: app,
            title,
            is_minimized: false,
            is_maximized: false,
            z_index,
            x: origin.x,
            y: origin.y,
            width: cfg.default_width.max(cfg.min_width),
            height: cfg.default_height.max(cfg.min_height),
        };
        let id = record.id.clone();
        tracing::debug!(
            window_id = %id,
            app_id = %app,
            z = z_index,
            x = record.x,
            y = record.y,
            "opened window"
        );
        self.records.push(record);
        self.focused = Some(id.clone());
        Some(id)
    }

    pub fn close(&mut self, id: &WindowId) -> bool {
        let before = self.records.len();
        self.records.retain(|rec| &rec.id != id);
        if self.records.len() == before {
            return false;
        }
        if self.is_focused(id) {
            self.focused = None;
        }
        tracing::debug!(window_id = %id, "closed window");
        true
    }

    /// Raise `id` above every other window, restore it if minimized, and make
    /// it the focused window.
    pub fn focus(&mut self, id: &WindowId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        let raise = !self.is_strictly_on_top(id);
        let z_index = if raise { Some(self.next_z()) } else { None };
        if let Some(rec) = self.get_mut(id) {
            rec.is_minimized = false;
            if let Some(z) = z_index {
                rec.z_index = z;
            }
        }
        if !self.is_focused(id) || raise {
            tracing::debug!(window_id = %id, z = ?z_index, "focused window");
        }
        self.focused = Some(id.clone());
        true
    }

    pub fn minimize(&mut self, id: &WindowId) -> bool {
        let Some(rec) = self.get_mut(id) else {
            return false;
        };
        rec.is_minimized = true;
        if self.is_focused(id) {
            self.focused = None;
        }
        tracing::debug!(window_id = %id, "minimized window");
        true
    }

    /// Un-minimize without focusing or raising.
    pub fn restore(&mut self, id: &WindowId) -> bool {
        let Some(rec) = self.get_mut(id) else {
            return false;
        };
        rec.is_minimized = false;
        true
    }

    /// Flip the maximized flag. Stored geometry is left untouched so the
    /// next toggle restores it exactly.
    pub fn toggle_maximize(&mut self, id: &WindowId) -> bool {
        let Some(rec) = self.get_mut(id) else {
            return false;
        };
        rec.is_maximized = !rec.is_maximized;
        tracing::debug!(window_id = %id, maximized = rec.is_maximized, "toggled maximize");
        true
    }

    /// Reposition `id`. Has no effect on a maximized window.
    pub fn move_to(&mut self, id: &WindowId, x: i32, y: i32) -> bool {
        let Some(rec) = self.get_mut(id) else {
            return false;
        };
        if rec.is_maximized {
            return false;
        }
        rec.x = x;
        rec.y = y;
        tracing::trace!(window_id = %id, x, y, "moved window");
        true
    }

    /// Resize `id`, never below the configured minimum size.
    pub fn resize(&mut self, id: &WindowId, width: u32, height: u32) -> bool {
        let min_width = self.config.min_width;
        let min_height = self.config.min_height;
        let Some(rec) = self.get_mut(id) else {
            return false;
        };
        rec.width = width.max(min_width);
        rec.height = height.max(min_height);
        tracing::trace!(window_id = %id, width = rec.width, height = rec.height, "resized window");
        true
    }

    /// Rename a window; an empty title falls back to the app name.
    pub fn set_title(&mut self, id: &WindowId, title: impl Into<String>) -> bool {
        let title = title.into();
        let Some(app) = self.get(id).map(|rec| rec.app_id) else {
            return false;
        };
        let title = if title.trim().is_empty() {
            self.catalog
                .metadata(app)
                .map(|meta| meta.display_name.to_string())
                .unwrap_or_else(|| app.to_string())
        } else {
            title
        };
        if let Some(rec) = self.get_mut(id) {
            rec.title = title;
        }
        true
    }

    fn cascade_point(&self, n: i64) -> Point {
        let cfg = &self.config;
        Point::new(
            clamp_i32(cfg.cascade_origin.x as i64 + n * cfg.cascade_step.x as i64),
            clamp_i32(cfg.cascade_origin.y as i64 + n * cfg.cascade_step.y as i64),
        )
    }

    /// Origin of the `count`-th window. The cascade starts over once a
    /// titlebar would leave the workspace.
    fn cascade_slot(&self, count: i64) -> Point {
        let Some(ws) = self.workspace else {
            return self.cascade_point(count);
        };
        let cfg = &self.config;
        let width = cfg.default_width.max(cfg.min_width);
        let visible = cfg.min_visible.min(width).max(1) as i64;
        let titlebar = cfg.chrome.titlebar_height as i64;
        let fits = |p: Point| {
            p.x as i64 >= ws.x as i64
                && p.y as i64 >= ws.y as i64
                && p.x as i64 + visible <= ws.right()
                && p.y as i64 + titlebar <= ws.bottom()
        };
        let wanted = self.cascade_point(count);
        if fits(wanted) {
            return wanted;
        }
        let slots = (0..count)
            .take_while(|n| fits(self.cascade_point(*n)))
            .count() as i64;
        if slots == 0 {
            return clamp_drag_origin(
                self.cascade_point(0),
                width,
                ws,
                cfg.chrome.titlebar_height,
                cfg.min_visible,
            );
        }
        self.cascade_point(count % slots)
    }

    /// z-index for a window that must land above everything else.
    fn next_z(&mut self) -> u32 {
        let base = self.config.base_z;
        match self.max_z() {
            None => base,
            Some(top) if top == u32::MAX => {
                self.compact_stack();
                self.max_z().map_or(base, |z| z.saturating_add(1).max(base))
            }
            Some(top) => top.saturating_add(1).max(base),
        }
    }

    /// Renumber z-indices from the base upward, keeping relative order.
    fn compact_stack(&mut self) {
        let base = self.config.base_z;
        let mut order: Vec<usize> = (0..self.records.len()).collect();
        order.sort_by_key(|&idx| self.records[idx].z_index);
        for (rank, idx) in order.into_iter().enumerate() {
            self.records[idx].z_index = base.saturating_add(rank as u32);
        }
        tracing::debug!(windows = self.records.len(), "compacted z-order");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apps::AppMetadata;

    fn registry() -> WindowRegistry {
        WindowRegistry::new(DesktopConfig::default())
    }

    #[test]
    fn first_window_uses_design_defaults() {
        let mut reg = registry();
        let id = reg.open(AppId::NemeCalc).expect("calc opens");
        let rec = reg.get(&id).expect("record exists");
        assert_eq!(rec.z_index, 10);
        assert_eq!((rec.x, rec.y), (100, 100));
        assert_eq!((rec.width, rec.height), (800, 600));
        assert_eq!(rec.title, "NemeCalc");
        assert_eq!(reg.focused(), Some(&id));
    }

    #[test]
    fn second_window_cascades_and_stacks() {
        let mut reg = registry();
        reg.open(AppId::NemeCalc);
        let b = reg.open(AppId::NemeNotes).expect("notes opens");
        let rec = reg.get(&b).expect("record exists");
        assert_eq!(rec.z_index, 11);
        assert_eq!((rec.x, rec.y), (140, 140));
        assert_eq!(reg.focused(), Some(&b));
    }

    #[test]
    fn cascade_wraps_inside_small_workspace() {
        let mut reg = WindowRegistry::new(DesktopConfig::terminal());
        let ws = WindowRect::new(0, 0, 80, 23);
        reg.set_workspace(ws);
        for _ in 0..30 {
            let id = reg.open(AppId::NemeCalc).expect("opens");
            let rec = reg.get(&id).expect("record exists");
            assert!(ws.contains(Point::new(rec.x, rec.y)), "{:?}", rec.origin());
            assert!(rec.x + 4 <= 80);
        }
        let origins: Vec<Point> = reg.iter().map(|rec| rec.origin()).collect();
        assert_eq!(origins[0], Point::new(16, 1));
        assert_eq!(origins[10], Point::new(56, 21));
        assert_eq!(origins[11], origins[0]);
    }

    #[test]
    fn cascade_keeps_design_positions_in_large_workspace() {
        let mut reg = registry();
        reg.set_workspace(WindowRect::new(0, 0, 1920, 1024));
        reg.open(AppId::NemeCalc);
        let b = reg.open(AppId::NemeCalc).expect("opens");
        assert_eq!(reg.get(&b).map(|rec| rec.origin()), Some(Point::new(140, 140)));
    }

    #[test]
    fn cascade_origin_outside_tiny_workspace_is_clamped() {
        let mut reg = WindowRegistry::new(DesktopConfig::terminal());
        let ws = WindowRect::new(0, 0, 10, 1);
        reg.set_workspace(ws);
        let id = reg.open(AppId::NemeCalc).expect("opens");
        let rec = reg.get(&id).expect("record exists");
        assert_eq!(rec.y, 0);
        assert!(rec.x as i64 + 4 <= ws.right());
    }

    #[test]
    fn non_pinned_apps_may_have_several_windows() {
        let mut reg = registry();
        let a = reg.open(AppId::NemeCalc);
        let b = reg.open(AppId::NemeCalc);
        assert_ne!(a, b);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn pinned_app_reuses_its_window() {
        let mut reg = registry();
        let first = reg.open(AppId::NemeTerm).expect("term opens");
        reg.open(AppId::NemeCalc);
        reg.minimize(&first);
        let again = reg.open(AppId::NemeTerm).expect("term reopens");
        assert_eq!(again, first);
        assert_eq!(reg.len(), 2);
        let rec = reg.get(&first).expect("record exists");
        assert!(!rec.is_minimized);
        assert_eq!(reg.focused(), Some(&first));
        assert_eq!(reg.max_z(), Some(rec.z_index));
    }

    #[test]
    fn focus_raises_to_strict_top() {
        let mut reg = registry();
        let a = reg.open(AppId::NemeCalc).expect("a");
        let b = reg.open(AppId::NemeNotes).expect("b");
        assert!(reg.focus(&a));
        let za = reg.get(&a).map(|r| r.z_index);
        let zb = reg.get(&b).map(|r| r.z_index);
        assert!(za > zb);
        assert_eq!(reg.focused(), Some(&a));
    }

    #[test]
    fn focus_is_idempotent_on_top_window() {
        let mut reg = registry();
        let a = reg.open(AppId::NemeCalc).expect("a");
        let z = reg.get(&a).map(|r| r.z_index);
        reg.focus(&a);
        reg.focus(&a);
        assert_eq!(reg.get(&a).map(|r| r.z_index), z);
    }

    #[test]
    fn focus_clears_minimized() {
        let mut reg = registry();
        let a = reg.open(AppId::NemeCalc).expect("a");
        reg.minimize(&a);
        reg.focus(&a);
        assert!(reg.get(&a).is_some_and(|r| !r.is_minimized));
    }

    #[test]
    fn close_focused_leaves_no_focus() {
        let mut reg = registry();
        let a = reg.open(AppId::NemeCalc).expect("a");
        let b = reg.open(AppId::NemeNotes).expect("b");
        assert!(reg.close(&b));
        assert_eq!(reg.focused(), None);
        assert!(reg.get(&b).is_none());
        assert!(reg.get(&a).is_some());
    }

    #[test]
    fn close_unfocused_keeps_focus() {
        let mut reg = registry();
        let a = reg.open(AppId::NemeCalc).expect("a");
        let b = reg.open(AppId::NemeNotes).expect("b");
        reg.close(&a);
        assert_eq!(reg.focused(), Some(&b));
    }

    #[test]
    fn minimize_only_clears_focus_of_focused_window() {
        let mut reg = registry();
        let a = reg.open(AppId::NemeCalc).expect("a");
        let b = reg.open(AppId::NemeNotes).expect("b");
        reg.minimize(&a);
        assert_eq!(reg.focused(), Some(&b));
        reg.minimize(&b);
        assert_eq!(reg.focused(), None);
    }

    #[test]
    fn unknown_ids_are_no_ops() {
        let mut reg = registry();
        let a = reg.open(AppId::NemeCalc).expect("a");
        reg.close(&a);
        assert!(!reg.focus(&a));
        assert!(!reg.close(&a));
        assert!(!reg.minimize(&a));
        assert!(!reg.toggle_maximize(&a));
        assert!(!reg.move_to(&a, 1, 1));
        assert!(!reg.resize(&a, 1, 1));
        assert!(!reg.set_title(&a, "x"));
        assert!(reg.is_empty());
        assert_eq!(reg.focused(), None);
    }

    #[test]
    fn toggle_maximize_preserves_geometry() {
        let mut reg = registry();
        let a = reg.open(AppId::NemeCalc).expect("a");
        reg.move_to(&a, 33, 44);
        reg.resize(&a, 500, 400);
        let before = reg.get(&a).map(|r| r.rect());
        reg.toggle_maximize(&a);
        assert!(reg.get(&a).is_some_and(|r| r.is_maximized));
        reg.toggle_maximize(&a);
        assert_eq!(reg.get(&a).map(|r| r.rect()), before);
    }

    #[test]
    fn move_is_ignored_while_maximized() {
        let mut reg = registry();
        let a = reg.open(AppId::NemeCalc).expect("a");
        reg.toggle_maximize(&a);
        assert!(!reg.move_to(&a, 0, 0));
        assert_eq!(reg.get(&a).map(|r| (r.x, r.y)), Some((100, 100)));
    }

    #[test]
    fn resize_clamps_to_floor() {
        let mut reg = registry();
        let a = reg.open(AppId::NemeCalc).expect("a");
        reg.resize(&a, 0, 5);
        assert_eq!(reg.get(&a).map(|r| (r.width, r.height)), Some((300, 200)));
    }

    #[test]
    fn empty_title_falls_back_to_app_name() {
        let mut reg = registry();
        let a = reg.open(AppId::NemeDocs).expect("a");
        reg.set_title(&a, "mission.md");
        assert_eq!(reg.get(&a).map(|r| r.title.as_str()), Some("mission.md"));
        reg.set_title(&a, "   ");
        assert_eq!(reg.get(&a).map(|r| r.title.as_str()), Some("NemeDocs"));
    }

    #[test]
    fn window_at_picks_topmost_visible() {
        let mut reg = registry();
        let ws = WindowRect::new(0, 0, 1920, 1024);
        let a = reg.open(AppId::NemeCalc).expect("a");
        let b = reg.open(AppId::NemeNotes).expect("b");
        let hit = Point::new(500, 500);
        assert_eq!(reg.window_at(hit, ws).map(|r| &r.id), Some(&b));
        reg.minimize(&b);
        assert_eq!(reg.window_at(hit, ws).map(|r| &r.id), Some(&a));
        assert!(reg.window_at(Point::new(5, 5), ws).is_none());
    }

    #[test]
    fn draw_order_skips_minimized_windows() {
        let mut reg = registry();
        let a = reg.open(AppId::NemeCalc).expect("a");
        let b = reg.open(AppId::NemeNotes).expect("b");
        reg.focus(&a);
        let order: Vec<&WindowId> = reg.draw_order().into_iter().map(|r| &r.id).collect();
        assert_eq!(order, vec![&b, &a]);
        reg.minimize(&b);
        assert_eq!(reg.draw_order().len(), 1);
    }

    #[test]
    fn z_overflow_compacts_the_stack() {
        let mut reg = registry();
        let a = reg.open(AppId::NemeCalc).expect("a");
        let b = reg.open(AppId::NemeNotes).expect("b");
        if let Some(rec) = reg.get_mut(&b) {
            rec.z_index = u32::MAX;
        }
        reg.focus(&a);
        let za = reg.get(&a).map(|r| r.z_index).unwrap_or_default();
        let zb = reg.get(&b).map(|r| r.z_index).unwrap_or_default();
        assert!(za > zb);
        assert!(za < u32::MAX);
    }

    #[derive(Debug)]
    struct CalcOnly(AppMetadata);

    impl AppCatalog for CalcOnly {
        fn metadata(&self, app: AppId) -> Option<&AppMetadata> {
            (app == AppId::NemeCalc).then_some(&self.0)
        }
    }

    #[test]
    fn open_without_metadata_is_a_no_op() {
        let catalog = CalcOnly(AppId::NemeCalc.metadata().clone());
        let mut reg = WindowRegistry::with_catalog(DesktopConfig::default(), Box::new(catalog));
        assert!(reg.open(AppId::NemeWeb).is_none());
        assert!(reg.is_empty());
        assert!(reg.open(AppId::NemeCalc).is_some());
    }
}
