//! Terminal front end: routes crossterm events to the login gate or the
//! desktop session and paints both.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use crate::apps::AppId;
use crate::component_context::ComponentContext;
use crate::config::{ConfigError, DesktopConfig};
use crate::desktop::DesktopSession;
use crate::drivers::{InputDriver, OutputDriver};
use crate::event_loop::{ControlFlow, EventLoop};
use crate::geometry::Viewport;
use crate::input::PointerEvent;
use crate::keybindings::{Action, KeyBindings};
use crate::launcher::taskbar_entries;
use crate::panel::{Panel, PanelHit};
use crate::state::SessionState;
use crate::ui::UiFrame;
use crate::view::{DesktopView, ViewHit, render_boot, render_login};

const CURSOR_BLINK: Duration = Duration::from_millis(500);

#[derive(Debug)]
pub struct App {
    config: DesktopConfig,
    state: SessionState,
    keybindings: KeyBindings,
    panel: Panel,
    view: DesktopView,
    screen: Rect,
    taskbar_rows: u16,
    startup_apps: Vec<AppId>,
    started_at: Instant,
}

impl App {
    pub fn new(config: DesktopConfig, state: SessionState, screen: Rect, taskbar_rows: u16) -> Self {
        Self {
            config,
            state,
            keybindings: KeyBindings::default(),
            panel: Panel::new(),
            view: DesktopView::new(),
            screen,
            taskbar_rows,
            startup_apps: Vec::new(),
            started_at: Instant::now(),
        }
    }

    /// Apps to open as soon as a session exists.
    pub fn with_startup_apps(mut self, apps: Vec<AppId>) -> Self {
        self.startup_apps = apps;
        self
    }

    pub fn with_panel(mut self, panel: Panel) -> Self {
        self.panel = panel;
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn session(&self) -> Option<&DesktopSession> {
        self.state.session()
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            self.screen.width as u32,
            self.screen.height as u32,
            self.taskbar_rows as u32,
        )
    }

    pub fn set_screen(&mut self, screen: Rect) {
        self.screen = screen;
    }

    fn workspace_area(&self) -> Rect {
        Rect {
            height: self.screen.height.saturating_sub(self.taskbar_rows),
            ..self.screen
        }
    }

    fn taskbar_area(&self) -> Rect {
        let height = self.taskbar_rows.min(self.screen.height);
        Rect {
            y: self.screen.y + self.screen.height - height,
            height,
            ..self.screen
        }
    }

    fn cursor_visible(&self, now: Instant) -> bool {
        let phase = now.saturating_duration_since(self.started_at).as_millis()
            / CURSOR_BLINK.as_millis();
        phase % 2 == 0
    }

    /// Timers: finish a pending login, expire notifications, open the
    /// startup apps once there is a desktop to open them on.
    pub fn tick(&mut self, now: Instant) -> Result<(), ConfigError> {
        let viewport = self.viewport();
        self.state.tick(&self.config, viewport, now)?;
        if !self.startup_apps.is_empty()
            && let Some(session) = self.state.session_mut()
        {
            for app in self.startup_apps.drain(..) {
                session.launch(app, now);
            }
        }
        Ok(())
    }

    pub fn handle_event(&mut self, event: &Event, now: Instant) -> ControlFlow {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key, event, now),
            Event::Mouse(mouse) => {
                self.handle_mouse(event, mouse, now);
                ControlFlow::Continue
            }
            Event::Resize(width, height) => {
                self.set_screen(Rect::new(0, 0, *width, *height));
                ControlFlow::Continue
            }
            _ => ControlFlow::Continue,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent, event: &Event, now: Instant) -> ControlFlow {
        let action = self.keybindings.action_for_key(key);
        if action == Some(Action::Quit) {
            tracing::info!("quit requested");
            return ControlFlow::Quit;
        }
        if let Some(form) = self.state.login_form_mut() {
            form.handle_key(key, now);
            return ControlFlow::Continue;
        }
        if action == Some(Action::Logout) {
            self.state.logout();
            return ControlFlow::Continue;
        }
        let ctx = ComponentContext::new(true).with_cursor_visible(self.cursor_visible(now));
        let Some(session) = self.state.session_mut() else {
            return ControlFlow::Continue;
        };
        match action {
            Some(Action::ToggleStartMenu) => session.start_menu_mut().toggle(),
            Some(Action::CancelGesture) if session.gesture_active() => {
                session.cancel_gesture();
            }
            Some(Action::CancelGesture) if session.start_menu().is_open() => {
                session.start_menu_mut().close();
            }
            _ if session.start_menu().is_open() => menu_key(session, key, now),
            _ => {
                session.forward_to_focused(event, ctx);
            }
        }
        ControlFlow::Continue
    }

    fn handle_mouse(&mut self, event: &Event, mouse: &MouseEvent, now: Instant) {
        let workspace = self.workspace_area();
        let ctx = ComponentContext::new(true).with_cursor_visible(self.cursor_visible(now));
        let Some(session) = self.state.session_mut() else {
            return;
        };
        let (column, row) = (mouse.column, mouse.row);
        let pressed = mouse.kind == MouseEventKind::Down(MouseButton::Left);
        let pointer = PointerEvent::from_mouse(mouse, workspace);

        if pressed && !session.gesture_active() {
            if let Some(hit) = self.panel.hit_test(column, row) {
                match hit {
                    PanelHit::StartButton => session.start_menu_mut().toggle(),
                    PanelHit::Launch(app) => {
                        session.launch(app, now);
                    }
                    PanelHit::Window(id) => {
                        session.start_menu_mut().close();
                        session.activate_window(&id);
                    }
                }
                return;
            }
            // Windows are drawn over the desktop icons.
            let over_window = pointer.is_some_and(|p| {
                session
                    .registry()
                    .window_at(p.point, session.workspace())
                    .is_some()
            });
            match self.view.hit_test(column, row) {
                Some(ViewHit::MenuItem(app)) => {
                    session.launch(app, now);
                    return;
                }
                Some(ViewHit::Icon(app)) if !over_window => {
                    session.launch(app, now);
                    return;
                }
                Some(ViewHit::MenuLogout) => {
                    self.state.logout();
                    return;
                }
                Some(ViewHit::Menu) => return,
                Some(ViewHit::Icon(_)) | None => session.start_menu_mut().close(),
            }
        }

        let Some(pointer) = pointer else {
            return;
        };
        session.handle_pointer(pointer);
        if pressed && !session.gesture_active() && session.focused_body_contains(pointer.point) {
            // A body click also reaches the app, e.g. calculator keys.
            session.forward_to_focused(event, ctx);
        }
    }

    pub fn render(&mut self, frame: &mut UiFrame<'_>, now: Instant) {
        let screen = frame.area();
        if screen != self.screen {
            self.set_screen(screen);
        }
        let cursor_visible = self.cursor_visible(now);
        let workspace = self.workspace_area();
        let taskbar = self.taskbar_area();
        match &mut self.state {
            SessionState::Booting(splash) => {
                render_boot(frame, screen, splash.progress(now));
            }
            SessionState::LoggedOut(form) => {
                render_login(frame, screen, form, &self.keybindings.hint_line());
            }
            SessionState::LoggedIn(session) => {
                self.view
                    .render(frame, workspace, session, now, cursor_visible);
                let entries = taskbar_entries(session.registry());
                self.panel.render(
                    frame,
                    taskbar,
                    &entries,
                    session.registry().catalog(),
                    session.start_menu().is_open(),
                    session.user(),
                    session.uptime(now),
                );
            }
        }
    }
}

fn menu_key(session: &mut DesktopSession, key: &KeyEvent, now: Instant) {
    let count = session
        .start_menu()
        .filtered(session.registry().catalog())
        .len();
    match key.code {
        KeyCode::Char(ch) => session.start_menu_mut().push_char(ch),
        KeyCode::Backspace => session.start_menu_mut().pop_char(),
        KeyCode::Up => session.start_menu_mut().move_selection(-1, count),
        KeyCode::Down => session.start_menu_mut().move_selection(1, count),
        KeyCode::Enter => {
            if let Some(app) = session
                .start_menu()
                .selected_app(session.registry().catalog())
            {
                session.launch(app, now);
            }
        }
        _ => {}
    }
}

/// Own the terminal until the user quits.
pub fn run<D, O>(app: &mut App, input: D, output: &mut O, poll_interval: Duration) -> io::Result<()>
where
    D: InputDriver,
    O: OutputDriver,
{
    output.enter()?;
    let mut event_loop = EventLoop::new(input, poll_interval);
    let result = event_loop.run(|_, event| {
        let now = Instant::now();
        match event {
            Some(event) => Ok(app.handle_event(&event, now)),
            None => {
                app.tick(now).map_err(io::Error::other)?;
                output.draw(|mut frame| app.render(&mut frame, now))?;
                Ok(ControlFlow::Continue)
            }
        }
    });
    output.exit()?;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{BOOT_DELAY, LOGIN_DELAY};
    use crossterm::event::KeyModifiers;
    use ratatui::buffer::Buffer;
    use std::collections::VecDeque;

    const SCREEN: Rect = Rect {
        x: 0,
        y: 0,
        width: 120,
        height: 40,
    };

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn draw(app: &mut App, now: Instant) -> Buffer {
        let mut buffer = Buffer::empty(SCREEN);
        let mut frame = UiFrame::from_parts(SCREEN, &mut buffer);
        app.render(&mut frame, now);
        buffer
    }

    fn logged_in_app(now: Instant) -> App {
        let mut state = SessionState::default();
        state
            .login(
                "neo",
                DesktopConfig::terminal(),
                Viewport::new(120, 40, 1),
                now,
            )
            .expect("login");
        App::new(DesktopConfig::terminal(), state, SCREEN, 1)
            .with_panel(Panel::new().with_hostname("grid"))
    }

    #[test]
    fn login_flow_reaches_desktop_with_startup_apps() {
        let start = Instant::now();
        let mut app = App::new(
            DesktopConfig::terminal(),
            SessionState::default(),
            SCREEN,
            1,
        )
        .with_startup_apps(vec![AppId::NemeTerm]);
        app.handle_event(&key(KeyCode::Char('x')), start);
        app.handle_event(&key(KeyCode::Enter), start);
        app.tick(start).expect("tick");
        assert!(app.session().is_none());
        app.tick(start + LOGIN_DELAY).expect("tick");
        let session = app.session().expect("logged in");
        assert_eq!(session.registry().len(), 1);
        assert_eq!(
            session.registry().iter().next().map(|rec| rec.app_id),
            Some(AppId::NemeTerm)
        );
    }

    #[test]
    fn ctrl_q_quits_from_anywhere() {
        let mut app = App::new(
            DesktopConfig::terminal(),
            SessionState::default(),
            SCREEN,
            1,
        );
        let quit = Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        assert_eq!(app.handle_event(&quit, Instant::now()), ControlFlow::Quit);
    }

    #[test]
    fn mouse_drag_moves_window() {
        let now = Instant::now();
        let mut app = logged_in_app(now);
        app.tick(now).expect("tick");
        let id = app
            .state
            .session_mut()
            .and_then(|s| s.launch(AppId::NemeCalc, now))
            .expect("opens");
        draw(&mut app, now);
        // Terminal preset: cascade origin (16, 1), titlebar one row.
        app.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 20, 1), now);
        app.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 30, 6), now);
        app.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 30, 6), now);
        let rec = app
            .session()
            .and_then(|s| s.registry().get(&id))
            .expect("window");
        assert_eq!((rec.x, rec.y), (26, 6));
    }

    #[test]
    fn taskbar_start_button_and_menu_launch() {
        let now = Instant::now();
        let mut app = logged_in_app(now);
        draw(&mut app, now);
        app.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 2, 39), now);
        assert!(app.session().is_some_and(|s| s.start_menu().is_open()));

        for ch in "calc".chars() {
            app.handle_event(&key(KeyCode::Char(ch)), now);
        }
        app.handle_event(&key(KeyCode::Enter), now);
        let session = app.session().expect("session");
        assert!(!session.start_menu().is_open());
        assert!(session.registry().find_by_app(AppId::NemeCalc).is_some());
    }

    #[test]
    fn escape_closes_menu_then_cancels_gesture() {
        let now = Instant::now();
        let mut app = logged_in_app(now);
        if let Some(s) = app.state.session_mut() {
            s.start_menu_mut().toggle();
        }
        app.handle_event(&key(KeyCode::Esc), now);
        assert!(app.session().is_some_and(|s| !s.start_menu().is_open()));
    }

    #[test]
    fn f10_logs_out() {
        let now = Instant::now();
        let mut app = logged_in_app(now);
        app.handle_event(&key(KeyCode::F(10)), now);
        assert!(!app.state().is_logged_in());
        assert_eq!(
            app.state().login_form().map(|form| form.username()),
            Some("neo")
        );
    }

    #[test]
    fn desktop_icon_click_launches_app() {
        let now = Instant::now();
        let mut app = logged_in_app(now);
        draw(&mut app, now);
        app.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 3, 5), now);
        assert!(
            app.session()
                .is_some_and(|s| s.registry().find_by_app(AppId::NemeDocs).is_some())
        );
    }

    #[test]
    fn window_over_icon_takes_the_press() {
        let now = Instant::now();
        let mut app = logged_in_app(now);
        let id = app
            .state
            .session_mut()
            .and_then(|s| s.launch(AppId::NemeCalc, now))
            .expect("opens");
        draw(&mut app, now);
        // Drag the calculator from (16, 1) onto the FileNexus icon.
        app.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 20, 1), now);
        app.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 4, 1), now);
        app.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 4, 1), now);
        draw(&mut app, now);

        app.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 3, 1), now);
        let session = app.session().expect("session");
        assert_eq!(session.drag().active_window(), Some(&id));
        assert_eq!(session.registry().len(), 1);
        assert!(session.registry().find_by_app(AppId::FileNexus).is_none());
    }

    #[test]
    fn boot_splash_ignores_input_then_shows_login() {
        let start = Instant::now();
        let mut app = App::new(
            DesktopConfig::terminal(),
            SessionState::booting("neo", start),
            SCREEN,
            1,
        );
        app.handle_event(&key(KeyCode::Enter), start);
        app.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 2, 39), start);
        let text: String = draw(&mut app, start)
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("NEMESIS OS INITIALIZING..."));

        app.tick(start + BOOT_DELAY).expect("tick");
        let form = app.state().login_form().expect("login gate");
        assert_eq!(form.username(), "neo");
        assert!(!form.is_submitting());
    }

    struct Scripted(VecDeque<Event>);

    impl InputDriver for Scripted {
        fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
            Ok(!self.0.is_empty())
        }

        fn read(&mut self) -> io::Result<Event> {
            self.0
                .pop_front()
                .ok_or_else(|| io::Error::other("no more events"))
        }
    }

    #[derive(Default)]
    struct Headless {
        entered: bool,
        frames: usize,
        buffer: Option<Buffer>,
    }

    impl OutputDriver for Headless {
        fn enter(&mut self) -> io::Result<()> {
            self.entered = true;
            Ok(())
        }

        fn exit(&mut self) -> io::Result<()> {
            self.entered = false;
            Ok(())
        }

        fn draw<F>(&mut self, f: F) -> io::Result<()>
        where
            F: FnOnce(UiFrame<'_>),
        {
            let buffer = self.buffer.get_or_insert_with(|| Buffer::empty(SCREEN));
            f(UiFrame::from_parts(SCREEN, buffer));
            self.frames += 1;
            Ok(())
        }
    }

    #[test]
    fn run_draws_until_quit_and_restores_terminal() {
        let now = Instant::now();
        let mut app = logged_in_app(now);
        let input = Scripted(VecDeque::from([
            key(KeyCode::F(1)),
            Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL)),
        ]));
        let mut output = Headless::default();
        run(&mut app, input, &mut output, Duration::from_millis(1)).expect("runs");
        assert!(!output.entered);
        assert_eq!(output.frames, 1);
        assert!(app.session().is_some_and(|s| s.start_menu().is_open()));
    }
}
