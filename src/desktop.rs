//! One logged-in desktop.
//!
//! `DesktopSession` owns every piece of per-session state: the window
//! registry, both gesture controllers, per-window content, notifications and
//! the start menu. Logging out drops it, and with it every window and the
//! focus.

use std::time::{Duration, Instant};

use crossterm::event::Event;

use crate::apps::AppId;
use crate::component_context::ComponentContext;
use crate::config::{ConfigError, DesktopConfig};
use crate::content::ContentRegistry;
use crate::geometry::{Point, Viewport, WindowRect};
use crate::input::{PointerEvent, PointerKind};
use crate::launcher;
use crate::notifications::{NotificationCenter, NotificationKind};
use crate::start_menu::StartMenu;
use crate::window::{
    DragController, HitRegion, ResizeController, TitleButton, WindowId, WindowRegistry,
};

#[derive(Debug)]
pub struct DesktopSession {
    user: String,
    viewport: Viewport,
    registry: WindowRegistry,
    drag: DragController,
    resize: ResizeController,
    contents: ContentRegistry,
    notifications: NotificationCenter,
    start_menu: StartMenu,
    started_at: Instant,
}

impl DesktopSession {
    /// Start a session with the built-in app content.
    pub fn new(
        user: impl Into<String>,
        config: DesktopConfig,
        viewport: Viewport,
        now: Instant,
    ) -> Result<Self, ConfigError> {
        let user = user.into();
        let contents = ContentRegistry::with_builtin_apps(&user);
        Self::with_contents(user, config, viewport, contents, now)
    }

    pub fn with_contents(
        user: impl Into<String>,
        config: DesktopConfig,
        viewport: Viewport,
        contents: ContentRegistry,
        now: Instant,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let user = user.into();
        let mut notifications = NotificationCenter::default();
        notifications.push(
            "SYSTEM_ONLINE",
            format!("Welcome back, {user}. All systems nominal."),
            NotificationKind::System,
            now,
        );
        tracing::info!(user = %user, "session started");
        let mut registry = WindowRegistry::new(config);
        registry.set_workspace(viewport.workspace());
        Ok(Self {
            user,
            viewport,
            registry,
            drag: DragController::new(),
            resize: ResizeController::new(),
            contents,
            notifications,
            start_menu: StartMenu::default(),
            started_at: now,
        })
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn workspace(&self) -> WindowRect {
        self.viewport.workspace()
    }

    /// Follow a host resize. Windows keep their geometry; maximized windows
    /// pick up the new workspace on their next paint.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if viewport != self.viewport {
            tracing::debug!(
                width = viewport.width,
                height = viewport.height,
                "viewport changed"
            );
            self.viewport = viewport;
            self.registry.set_workspace(viewport.workspace());
        }
    }

    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }

    pub fn contents_mut(&mut self) -> &mut ContentRegistry {
        &mut self.contents
    }

    /// Registry and content together, for painting.
    pub fn parts_mut(&mut self) -> (&WindowRegistry, &mut ContentRegistry) {
        (&self.registry, &mut self.contents)
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn start_menu(&self) -> &StartMenu {
        &self.start_menu
    }

    pub fn start_menu_mut(&mut self) -> &mut StartMenu {
        &mut self.start_menu
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn resize(&self) -> &ResizeController {
        &self.resize
    }

    pub fn gesture_active(&self) -> bool {
        self.drag.is_active() || self.resize.is_active()
    }

    pub fn uptime(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }

    /// Desktop icon, start menu or pinned taskbar launcher.
    pub fn launch(&mut self, app: AppId, now: Instant) -> Option<WindowId> {
        self.start_menu.close();
        let id = launcher::launch(&mut self.registry, app);
        if id.is_none() {
            self.notify_launch_failure(app, now);
        }
        id
    }

    /// Explicit request for another window of `app`.
    pub fn launch_new(&mut self, app: AppId, now: Instant) -> Option<WindowId> {
        self.start_menu.close();
        let id = launcher::launch_new(&mut self.registry, app);
        if id.is_none() {
            self.notify_launch_failure(app, now);
        }
        id
    }

    fn notify_launch_failure(&mut self, app: AppId, now: Instant) {
        tracing::warn!(app_id = %app, "launch refused");
        self.notifications.push(
            "LAUNCH_FAILED",
            format!("No module registered for {app}"),
            NotificationKind::Error,
            now,
        );
    }

    pub fn activate_window(&mut self, id: &WindowId) -> bool {
        launcher::activate_window(&mut self.registry, id)
    }

    pub fn close_window(&mut self, id: &WindowId) -> bool {
        if self.drag.active_window() == Some(id) {
            self.drag.end();
        }
        if self.resize.active_window() == Some(id) {
            self.resize.end();
        }
        let closed = self.registry.close(id);
        if closed {
            let registry = &self.registry;
            self.contents.prune(|live| registry.get(live).is_some());
        }
        closed
    }

    /// Route one pointer event. Returns whether anything changed.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        let workspace = self.workspace();
        match event.kind {
            PointerKind::Down => self.pointer_down(event, workspace),
            PointerKind::Move => {
                if self.drag.is_active() {
                    self.drag.update(&mut self.registry, event.point, workspace)
                } else if self.resize.is_active() {
                    self.resize
                        .update(&mut self.registry, event.point, workspace)
                } else {
                    false
                }
            }
            PointerKind::Up => {
                let active = self.gesture_active();
                self.drag.end();
                self.resize.end();
                active
            }
        }
    }

    fn pointer_down(&mut self, event: PointerEvent, workspace: WindowRect) -> bool {
        // Single pointer: a second press while a gesture runs is ignored.
        if self.gesture_active() {
            return false;
        }
        let Some(rec) = self.registry.window_at(event.point, workspace) else {
            return false;
        };
        let id = rec.id.clone();
        let maximized = rec.is_maximized;
        let frame = rec.frame(workspace);
        let chrome = self.registry.config().chrome;
        let Some(region) = chrome.hit_test(frame, event.point, maximized) else {
            return false;
        };
        tracing::trace!(window_id = %id, ?region, "pointer down");

        match region {
            HitRegion::Button(TitleButton::Minimize) => self.registry.minimize(&id),
            HitRegion::Button(TitleButton::Maximize) => {
                self.registry.focus(&id);
                self.registry.toggle_maximize(&id)
            }
            HitRegion::Button(TitleButton::Close) => self.close_window(&id),
            HitRegion::Titlebar if maximized => self.registry.focus(&id),
            HitRegion::Titlebar => self.drag.begin(&mut self.registry, &id, event.point),
            HitRegion::ResizeHandle => self.resize.begin(&mut self.registry, &id, event.point),
            HitRegion::Body => self.registry.focus(&id),
        }
    }

    /// Whether `point` lands in the body of the focused window, where a
    /// press belongs to the hosted app rather than the window manager.
    pub fn focused_body_contains(&self, point: Point) -> bool {
        let workspace = self.workspace();
        let Some(top) = self.registry.window_at(point, workspace) else {
            return false;
        };
        if !self.registry.is_focused(&top.id) {
            return false;
        }
        let chrome = self.registry.config().chrome;
        chrome.hit_test(top.frame(workspace), point, top.is_maximized) == Some(HitRegion::Body)
    }

    /// Abort a running drag or resize, restoring the geometry it started
    /// from.
    pub fn cancel_gesture(&mut self) -> bool {
        let dragged = self.drag.cancel(&mut self.registry);
        let resized = self.resize.cancel(&mut self.registry);
        dragged || resized
    }

    /// Hand `event` to the focused window's content and pick up any title
    /// change it asks for.
    pub fn forward_to_focused(&mut self, event: &Event, ctx: ComponentContext) -> bool {
        let Some(rec) = self.registry.focused().and_then(|id| self.registry.get(id)) else {
            return false;
        };
        let id = rec.id.clone();
        let app = rec.app_id;
        let content = self.contents.content_for(&id, app);
        let handled = content.handle_event(event, &ctx.with_focus(true));
        let title = content.title();
        if let Some(title) = title
            && self.registry.get(&id).is_some_and(|rec| rec.title != title)
        {
            self.registry.set_title(&id, title);
        }
        handled
    }

    /// Periodic housekeeping: expire notifications, drop content of closed
    /// windows.
    pub fn tick(&mut self, now: Instant) {
        self.notifications.prune(now);
        let registry = &self.registry;
        self.contents.prune(|id| registry.get(id).is_some());
    }
}
