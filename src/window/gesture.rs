//! Pointer gesture state machines.
//!
//! Each controller is `Idle` or holds one session captured on pointer-down.
//! Sessions remember the geometry at gesture start, so every `update`
//! recomputes from that snapshot instead of accumulating deltas.

use crate::geometry::{Point, WindowRect};

use super::floating::{apply_resize, clamp_drag_origin};
use super::{WindowId, WindowRegistry};

/// Whether `id` may start a gesture: it must exist, be visible and not be
/// maximized.
fn can_grab(registry: &WindowRegistry, id: &WindowId) -> bool {
    registry
        .get(id)
        .is_some_and(|rec| rec.is_visible() && !rec.is_maximized)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub id: WindowId,
    /// Pointer position relative to the window origin at grab time.
    pub offset: Point,
    pub start: Point,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// Titlebar drag.
#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }

    pub fn active_window(&self) -> Option<&WindowId> {
        self.session().map(|session| &session.id)
    }

    /// Start dragging `id`. Returns `false` when a drag is already running
    /// or the window cannot be grabbed.
    pub fn begin(&mut self, registry: &mut WindowRegistry, id: &WindowId, pointer: Point) -> bool {
        if self.is_active() || !can_grab(registry, id) {
            return false;
        }
        registry.focus(id);
        let Some(start) = registry.get(id).map(|rec| rec.origin()) else {
            return false;
        };
        tracing::debug!(window_id = %id, x = start.x, y = start.y, "drag begin");
        self.state = DragState::Dragging(DragSession {
            id: id.clone(),
            offset: pointer - start,
            start,
        });
        true
    }

    /// Follow the pointer. A window that disappeared mid-drag ends the
    /// gesture.
    pub fn update(
        &mut self,
        registry: &mut WindowRegistry,
        pointer: Point,
        workspace: WindowRect,
    ) -> bool {
        let DragState::Dragging(session) = &self.state else {
            return false;
        };
        let Some(width) = registry.get(&session.id).map(|rec| rec.width) else {
            tracing::debug!(window_id = %session.id, "drag target vanished");
            self.state = DragState::Idle;
            return false;
        };
        let mut target = pointer - session.offset;
        let cfg = registry.config();
        if cfg.clamp_drag {
            target = clamp_drag_origin(
                target,
                width,
                workspace,
                cfg.chrome.titlebar_height,
                cfg.min_visible,
            );
        }
        let id = session.id.clone();
        registry.move_to(&id, target.x, target.y)
    }

    pub fn end(&mut self) {
        if let DragState::Dragging(session) = std::mem::take(&mut self.state) {
            tracing::debug!(window_id = %session.id, "drag end");
        }
    }

    /// Abort the drag and put the window back where it started.
    pub fn cancel(&mut self, registry: &mut WindowRegistry) -> bool {
        let DragState::Dragging(session) = std::mem::take(&mut self.state) else {
            return false;
        };
        tracing::debug!(window_id = %session.id, "drag cancelled");
        registry.move_to(&session.id, session.start.x, session.start.y)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeSession {
    pub id: WindowId,
    pub pointer_origin: Point,
    pub start: WindowRect,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum ResizeState {
    #[default]
    Idle,
    Resizing(ResizeSession),
}

/// Bottom-right handle resize.
#[derive(Debug, Default)]
pub struct ResizeController {
    state: ResizeState,
}

impl ResizeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, ResizeState::Resizing(_))
    }

    pub fn session(&self) -> Option<&ResizeSession> {
        match &self.state {
            ResizeState::Resizing(session) => Some(session),
            ResizeState::Idle => None,
        }
    }

    pub fn active_window(&self) -> Option<&WindowId> {
        self.session().map(|session| &session.id)
    }

    pub fn begin(&mut self, registry: &mut WindowRegistry, id: &WindowId, pointer: Point) -> bool {
        if self.is_active() || !can_grab(registry, id) {
            return false;
        }
        registry.focus(id);
        let Some(start) = registry.get(id).map(|rec| rec.rect()) else {
            return false;
        };
        tracing::debug!(
            window_id = %id,
            width = start.width,
            height = start.height,
            "resize begin"
        );
        self.state = ResizeState::Resizing(ResizeSession {
            id: id.clone(),
            pointer_origin: pointer,
            start,
        });
        true
    }

    pub fn update(
        &mut self,
        registry: &mut WindowRegistry,
        pointer: Point,
        workspace: WindowRect,
    ) -> bool {
        let ResizeState::Resizing(session) = &self.state else {
            return false;
        };
        let Some(origin) = registry.get(&session.id).map(|rec| rec.origin()) else {
            tracing::debug!(window_id = %session.id, "resize target vanished");
            self.state = ResizeState::Idle;
            return false;
        };
        let delta = pointer - session.pointer_origin;
        let start = WindowRect {
            x: origin.x,
            y: origin.y,
            ..session.start
        };
        let cfg = registry.config();
        let (width, height) = apply_resize(
            start,
            delta.x,
            delta.y,
            workspace,
            cfg.min_width,
            cfg.min_height,
        );
        let id = session.id.clone();
        registry.resize(&id, width, height)
    }

    pub fn end(&mut self) {
        if let ResizeState::Resizing(session) = std::mem::take(&mut self.state) {
            tracing::debug!(window_id = %session.id, "resize end");
        }
    }

    /// Abort the resize and restore the starting size.
    pub fn cancel(&mut self, registry: &mut WindowRegistry) -> bool {
        let ResizeState::Resizing(session) = std::mem::take(&mut self.state) else {
            return false;
        };
        tracing::debug!(window_id = %session.id, "resize cancelled");
        registry.resize(&session.id, session.start.width, session.start.height)
    }
}
