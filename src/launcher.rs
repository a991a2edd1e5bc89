//! Binding between launchers (desktop icons, start menu, taskbar) and the
//! window registry.

use crate::apps::AppId;
use crate::window::{WindowId, WindowRegistry};

/// Open `app`, or bring its existing window forward.
pub fn launch(registry: &mut WindowRegistry, app: AppId) -> Option<WindowId> {
    if let Some(existing) = registry.find_by_app(app).map(|rec| rec.id.clone()) {
        tracing::debug!(window_id = %existing, app_id = %app, "launch focuses existing window");
        registry.focus(&existing);
        return Some(existing);
    }
    registry.open(app)
}

/// Open another instance of `app`. Pinned apps stay single-window and behave
/// like [`launch`].
pub fn launch_new(registry: &mut WindowRegistry, app: AppId) -> Option<WindowId> {
    if registry.catalog().is_pinned(app) {
        return launch(registry, app);
    }
    registry.open(app)
}

/// Taskbar click on a running window.
pub fn activate_window(registry: &mut WindowRegistry, id: &WindowId) -> bool {
    registry.focus(id)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskbarEntry {
    pub app_id: AppId,
    pub window: Option<WindowId>,
    pub title: String,
    pub pinned: bool,
    /// The entry's window is the focused one.
    pub active: bool,
    pub minimized: bool,
}

/// Pinned apps first (running or not), then every other window in creation
/// order.
pub fn taskbar_entries(registry: &WindowRegistry) -> Vec<TaskbarEntry> {
    let catalog = registry.catalog();
    let mut entries: Vec<TaskbarEntry> = catalog
        .pinned()
        .into_iter()
        .map(|app| {
            let rec = registry.find_by_app(app);
            let title = rec.map(|rec| rec.title.clone()).unwrap_or_else(|| {
                catalog
                    .metadata(app)
                    .map_or_else(|| app.to_string(), |meta| meta.display_name.to_string())
            });
            TaskbarEntry {
                app_id: app,
                window: rec.map(|rec| rec.id.clone()),
                title,
                pinned: true,
                active: rec.is_some_and(|rec| registry.is_focused(&rec.id)),
                minimized: rec.is_some_and(|rec| rec.is_minimized),
            }
        })
        .collect();

    entries.extend(
        registry
            .iter()
            .filter(|rec| !catalog.is_pinned(rec.app_id))
            .map(|rec| TaskbarEntry {
                app_id: rec.app_id,
                window: Some(rec.id.clone()),
                title: rec.title.clone(),
                pinned: false,
                active: registry.is_focused(&rec.id),
                minimized: rec.is_minimized,
            }),
    );
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DesktopConfig;

    fn registry() -> WindowRegistry {
        WindowRegistry::new(DesktopConfig::default())
    }

    #[test]
    fn launch_twice_focuses_same_window() {
        let mut reg = registry();
        let first = launch(&mut reg, AppId::NemeCalc);
        reg.open(AppId::NemeNotes);
        let second = launch(&mut reg, AppId::NemeCalc);
        assert_eq!(first, second);
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.focused(), first.as_ref());
    }

    #[test]
    fn launch_new_spawns_for_unpinned_only() {
        let mut reg = registry();
        launch_new(&mut reg, AppId::NemeCalc);
        launch_new(&mut reg, AppId::NemeCalc);
        assert_eq!(reg.len(), 2);
        launch_new(&mut reg, AppId::NemeTerm);
        launch_new(&mut reg, AppId::NemeTerm);
        assert_eq!(reg.len(), 3);
    }

    #[test]
    fn activate_restores_minimized_window() {
        let mut reg = registry();
        let id = launch(&mut reg, AppId::NemeWeb).expect("web opens");
        reg.minimize(&id);
        assert!(activate_window(&mut reg, &id));
        assert_eq!(reg.focused(), Some(&id));
        assert!(reg.get(&id).is_some_and(|r| !r.is_minimized));
    }

    #[test]
    fn taskbar_lists_pinned_then_running() {
        let mut reg = registry();
        let calc = launch(&mut reg, AppId::NemeCalc).expect("calc opens");
        let term = launch(&mut reg, AppId::NemeTerm).expect("term opens");
        let entries = taskbar_entries(&reg);
        let apps: Vec<AppId> = entries.iter().map(|e| e.app_id).collect();
        assert_eq!(
            apps,
            vec![
                AppId::FileNexus,
                AppId::NemeDocs,
                AppId::NemeTerm,
                AppId::NemeWeb,
                AppId::NemeCalc
            ]
        );
        assert_eq!(entries[2].window.as_ref(), Some(&term));
        assert!(entries[2].active);
        assert!(entries[0].window.is_none());
        assert_eq!(entries[4].window.as_ref(), Some(&calc));
        assert!(!entries[4].active);
    }
}
