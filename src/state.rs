//! Login gate and session lifecycle.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::config::{ConfigError, DesktopConfig};
use crate::constants::DEFAULT_USER;
use crate::desktop::DesktopSession;
use crate::geometry::Viewport;

/// Pause between submitting the login form and the desktop appearing.
pub const LOGIN_DELAY: Duration = Duration::from_millis(1_200);

/// How long the boot splash stays up before the login gate.
pub const BOOT_DELAY: Duration = Duration::from_secs(2);

/// Boot splash shown before the login gate; remembers who to prefill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootSplash {
    username: String,
    started_at: Instant,
}

impl BootSplash {
    pub fn new(username: impl Into<String>, now: Instant) -> Self {
        Self {
            username: username.into(),
            started_at: now,
        }
    }

    /// Fraction of the boot delay that has passed, in `0.0..=1.0`.
    pub fn progress(&self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f64() / BOOT_DELAY.as_secs_f64()).min(1.0)
    }

    pub fn done(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started_at) >= BOOT_DELAY
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    Username,
    #[default]
    Password,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginForm {
    username: String,
    password: String,
    field: LoginField,
    submitted_at: Option<Instant>,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new(DEFAULT_USER)
    }
}

impl LoginForm {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: String::new(),
            field: LoginField::default(),
            submitted_at: None,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Password length, for masking.
    pub fn password_len(&self) -> usize {
        self.password.chars().count()
    }

    pub fn field(&self) -> LoginField {
        self.field
    }

    pub fn is_submitting(&self) -> bool {
        self.submitted_at.is_some()
    }

    /// Any password is accepted; only an empty user name is refused.
    pub fn submit(&mut self, now: Instant) -> bool {
        if self.username.trim().is_empty() || self.is_submitting() {
            return false;
        }
        self.submitted_at = Some(now);
        true
    }

    /// The submitted form has waited out the login delay.
    pub fn ready(&self, now: Instant) -> bool {
        self.submitted_at
            .is_some_and(|at| now.saturating_duration_since(at) >= LOGIN_DELAY)
    }

    pub fn handle_key(&mut self, key: &KeyEvent, now: Instant) -> bool {
        if key.kind == KeyEventKind::Release || self.is_submitting() {
            return false;
        }
        let target = match self.field {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        };
        match key.code {
            KeyCode::Char(ch) => target.push(ch),
            KeyCode::Backspace => {
                target.pop();
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.field = match self.field {
                    LoginField::Username => LoginField::Password,
                    LoginField::Password => LoginField::Username,
                };
            }
            KeyCode::Enter => return self.submit(now),
            _ => return false,
        }
        true
    }
}

#[derive(Debug)]
pub enum SessionState {
    Booting(BootSplash),
    LoggedOut(LoginForm),
    LoggedIn(Box<DesktopSession>),
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::LoggedOut(LoginForm::default())
    }
}

impl SessionState {
    /// Start at the boot splash; the login gate follows after
    /// [`BOOT_DELAY`].
    pub fn booting(username: impl Into<String>, now: Instant) -> Self {
        SessionState::Booting(BootSplash::new(username, now))
    }

    pub fn is_booting(&self) -> bool {
        matches!(self, SessionState::Booting(_))
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self, SessionState::LoggedIn(_))
    }

    pub fn session(&self) -> Option<&DesktopSession> {
        match self {
            SessionState::LoggedIn(session) => Some(session.as_ref()),
            _ => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut DesktopSession> {
        match self {
            SessionState::LoggedIn(session) => Some(session.as_mut()),
            _ => None,
        }
    }

    pub fn login_form(&self) -> Option<&LoginForm> {
        match self {
            SessionState::LoggedOut(form) => Some(form),
            _ => None,
        }
    }

    pub fn login_form_mut(&mut self) -> Option<&mut LoginForm> {
        match self {
            SessionState::LoggedOut(form) => Some(form),
            _ => None,
        }
    }

    /// Replace whatever state there is with a fresh desktop for `user`.
    pub fn login(
        &mut self,
        user: impl Into<String>,
        config: DesktopConfig,
        viewport: Viewport,
        now: Instant,
    ) -> Result<(), ConfigError> {
        let session = DesktopSession::new(user, config, viewport, now)?;
        *self = SessionState::LoggedIn(Box::new(session));
        Ok(())
    }

    /// Drop the desktop, and every window with it, and return to the login
    /// gate with the user name prefilled.
    pub fn logout(&mut self) {
        if let SessionState::LoggedIn(session) = self {
            tracing::info!(user = %session.user(), "session ended");
            let user = session.user().to_string();
            *self = SessionState::LoggedOut(LoginForm::new(user));
        }
    }

    /// Leave the boot splash, or complete a pending login, once its delay
    /// is over.
    pub fn tick(
        &mut self,
        config: &DesktopConfig,
        viewport: Viewport,
        now: Instant,
    ) -> Result<(), ConfigError> {
        match self {
            SessionState::Booting(splash) if splash.done(now) => {
                tracing::debug!("boot finished");
                let user = splash.username.clone();
                *self = SessionState::LoggedOut(LoginForm::new(user));
                Ok(())
            }
            SessionState::Booting(_) => Ok(()),
            SessionState::LoggedOut(form) if form.ready(now) => {
                let user = form.username().trim().to_string();
                self.login(user, config.clone(), viewport, now)
            }
            SessionState::LoggedOut(_) => Ok(()),
            SessionState::LoggedIn(session) => {
                session.set_viewport(viewport);
                session.tick(now);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apps::AppId;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    const VIEWPORT: Viewport = Viewport::new(1920, 1080, 56);

    #[test]
    fn form_edits_focused_field() {
        let mut form = LoginForm::default();
        let now = Instant::now();
        form.handle_key(&key(KeyCode::Char('k')), now);
        assert_eq!(form.password_len(), 1);
        form.handle_key(&key(KeyCode::Tab), now);
        form.handle_key(&key(KeyCode::Backspace), now);
        assert_eq!(form.username(), "NEMESIS_USE");
    }

    #[test]
    fn login_completes_after_delay() {
        let mut state = SessionState::default();
        let start = Instant::now();
        let config = DesktopConfig::default();
        if let Some(form) = state.login_form_mut() {
            assert!(form.handle_key(&key(KeyCode::Enter), start));
        }
        state
            .tick(&config, VIEWPORT, start + Duration::from_millis(100))
            .expect("tick");
        assert!(!state.is_logged_in());
        state
            .tick(&config, VIEWPORT, start + LOGIN_DELAY)
            .expect("tick");
        assert_eq!(state.session().map(|s| s.user()), Some("NEMESIS_USER"));
    }

    #[test]
    fn boot_splash_gives_way_to_login_form() {
        let start = Instant::now();
        let config = DesktopConfig::default();
        let mut state = SessionState::booting("neo", start);
        assert!(state.login_form().is_none());
        state
            .tick(&config, VIEWPORT, start + Duration::from_millis(1_999))
            .expect("tick");
        assert!(state.is_booting());
        state
            .tick(&config, VIEWPORT, start + BOOT_DELAY)
            .expect("tick");
        assert_eq!(state.login_form().map(|f| f.username()), Some("neo"));
    }

    #[test]
    fn boot_progress_is_capped() {
        let start = Instant::now();
        let splash = BootSplash::new("neo", start);
        assert_eq!(splash.progress(start), 0.0);
        assert_eq!(splash.progress(start + BOOT_DELAY * 3), 1.0);
    }

    #[test]
    fn logout_while_booting_is_a_no_op() {
        let mut state = SessionState::booting("neo", Instant::now());
        state.logout();
        assert!(state.is_booting());
    }

    #[test]
    fn empty_user_cannot_submit() {
        let mut form = LoginForm::new("  ");
        assert!(!form.submit(Instant::now()));
    }

    #[test]
    fn logout_discards_windows() {
        let mut state = SessionState::default();
        let now = Instant::now();
        state
            .login("neo", DesktopConfig::default(), VIEWPORT, now)
            .expect("login");
        if let Some(session) = state.session_mut() {
            session.launch(AppId::NemeCalc, now);
        }
        state.logout();
        assert!(!state.is_logged_in());
        state
            .login("neo", DesktopConfig::default(), VIEWPORT, now)
            .expect("login");
        assert_eq!(state.session().map(|s| s.registry().len()), Some(0));
        assert_eq!(
            state.session().and_then(|s| s.registry().focused()),
            None
        );
    }
}
