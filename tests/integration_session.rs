use std::time::{Duration, Instant};

use nemesis_wm::apps::AppId;
use nemesis_wm::config::DesktopConfig;
use nemesis_wm::content::ContentRegistry;
use nemesis_wm::desktop::DesktopSession;
use nemesis_wm::geometry::{Point, Viewport};
use nemesis_wm::input::PointerEvent;
use nemesis_wm::notifications::NotificationKind;
use nemesis_wm::state::{LOGIN_DELAY, SessionState};

const VIEWPORT: Viewport = Viewport::new(1920, 1080, 56);

fn session() -> DesktopSession {
    DesktopSession::new("neo", DesktopConfig::default(), VIEWPORT, Instant::now())
        .expect("valid config")
}

#[test]
fn pointer_drag_through_session() {
    let mut s = session();
    let id = s.launch(AppId::FileNexus, Instant::now()).expect("opens");
    s.handle_pointer(PointerEvent::down(150, 120));
    s.handle_pointer(PointerEvent::moved(200, 150));
    s.handle_pointer(PointerEvent::moved(250, 150));
    s.handle_pointer(PointerEvent::up(250, 150));
    assert_eq!(
        s.registry().get(&id).map(|r| r.origin()),
        Some(Point::new(200, 130))
    );
    // A stray release changes nothing.
    assert!(!s.handle_pointer(PointerEvent::up(0, 0)));
}

#[test]
fn resize_handle_through_session() {
    let mut s = session();
    let id = s.launch(AppId::FileNexus, Instant::now()).expect("opens");
    s.handle_pointer(PointerEvent::down(895, 695));
    assert!(s.resize().is_active());
    s.handle_pointer(PointerEvent::moved(945, -5));
    s.handle_pointer(PointerEvent::up(945, -5));
    assert_eq!(
        s.registry().get(&id).map(|r| (r.width, r.height)),
        Some((850, 200))
    );
}

#[test]
fn second_press_during_gesture_is_ignored() {
    let mut s = session();
    let a = s.launch(AppId::NemeCalc, Instant::now()).expect("opens");
    let b = s.launch_new(AppId::NemeCalc, Instant::now()).expect("opens");
    s.handle_pointer(PointerEvent::down(200, 150));
    assert_eq!(s.drag().active_window(), Some(&b));
    assert!(!s.handle_pointer(PointerEvent::down(895, 695)));
    assert!(!s.resize().is_active());
    s.handle_pointer(PointerEvent::up(200, 150));
    assert!(s.registry().get(&a).is_some());
}

#[test]
fn titlebar_buttons_minimize_maximize_close() {
    let mut s = session();
    let id = s.launch(AppId::NemeCalc, Instant::now()).expect("opens");
    // Buttons are 26 wide at the right end of the 900-wide titlebar edge:
    // minimize 822..848, maximize 848..874, close 874..900.
    s.handle_pointer(PointerEvent::down(860, 110));
    s.handle_pointer(PointerEvent::up(860, 110));
    assert!(s.registry().get(&id).is_some_and(|r| r.is_maximized));
    // Maximized: the buttons now sit at the right end of the workspace.
    s.handle_pointer(PointerEvent::down(1920 - 13, 5));
    assert!(s.registry().get(&id).is_none());

    let id = s.launch(AppId::NemeCalc, Instant::now()).expect("opens");
    let frame = s.registry().frame_of(&id, s.workspace()).expect("visible");
    let minimize_x = frame.x + frame.width as i32 - 3 * 26 + 5;
    s.handle_pointer(PointerEvent::down(minimize_x, frame.y + 5));
    assert!(s.registry().get(&id).is_some_and(|r| r.is_minimized));
    assert_eq!(s.registry().focused(), None);
}

#[test]
fn app_without_content_provider_still_opens() {
    let mut s = DesktopSession::with_contents(
        "neo",
        DesktopConfig::default(),
        VIEWPORT,
        ContentRegistry::new(),
        Instant::now(),
    )
    .expect("valid config");
    let id = s.launch(AppId::NemePlayer, Instant::now()).expect("opens");
    assert_eq!(s.registry().len(), 1);
    assert!(
        s.notifications()
            .iter()
            .all(|n| n.kind != NotificationKind::Error)
    );
    assert!(s.contents_mut().content_for(&id, AppId::NemePlayer).title().is_none());
}

#[test]
fn notifications_expire_on_tick() {
    let start = Instant::now();
    let mut s = DesktopSession::new("neo", DesktopConfig::default(), VIEWPORT, start)
        .expect("valid config");
    assert_eq!(s.notifications().len(), 1);
    s.tick(start + Duration::from_secs(6));
    assert!(s.notifications().is_empty());
}

#[test]
fn logout_then_login_starts_clean() {
    let start = Instant::now();
    let mut state = SessionState::default();
    state
        .login("neo", DesktopConfig::default(), VIEWPORT, start)
        .expect("login");
    if let Some(s) = state.session_mut() {
        s.launch(AppId::NemeDocs, start);
        s.launch(AppId::NemeCalc, start);
    }
    state.logout();
    let form = state.login_form_mut().expect("logged out");
    assert_eq!(form.username(), "neo");
    assert!(form.submit(start));
    state
        .tick(&DesktopConfig::default(), VIEWPORT, start + LOGIN_DELAY)
        .expect("tick");
    let s = state.session().expect("logged back in");
    assert!(s.registry().is_empty());
    assert_eq!(s.registry().focused(), None);
}

#[test]
fn every_cascaded_titlebar_stays_reachable_on_small_terminal() {
    let mut s = DesktopSession::new(
        "neo",
        DesktopConfig::terminal(),
        Viewport::new(80, 24, 1),
        Instant::now(),
    )
    .expect("valid config");
    let ws = s.workspace();
    for n in 0..20 {
        let id = s.launch_new(AppId::NemeNotes, Instant::now()).expect("opens");
        let origin = s.registry().get(&id).map(|rec| rec.origin()).expect("record");
        assert!(
            ws.contains(origin),
            "window {n} titlebar at {origin:?} outside {ws:?}"
        );
        // The titlebar can still be grabbed to drag the window.
        s.handle_pointer(PointerEvent::down(origin.x + 1, origin.y));
        assert_eq!(s.drag().active_window(), Some(&id));
        s.handle_pointer(PointerEvent::up(origin.x + 1, origin.y));
    }
}
