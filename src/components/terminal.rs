use std::time::{SystemTime, UNIX_EPOCH};

use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use indoc::indoc;
use ratatui::layout::Rect;
use ratatui::style::Style;

use super::{AppContent, Component, ComponentContext};
use crate::log_buffer::{LogBuffer, global_log_buffer};
use crate::theme;
use crate::ui::{UiFrame, safe_set_string};

const BANNER: &str = indoc! {r#"
    Nemesis OS [Version 4.0.1.002]
    (c) 2025 Nemesis Core Systems. All rights reserved.

    Type "help" for a list of available system commands.
"#};

const HELP: &str = indoc! {"
    AVAILABLE COMMANDS:
    - help: List commands
    - clear: Reset terminal
    - date: System time
    - ls: List directory
    - whoami: User info
    - ping: Network test
    - log [n]: Recent system log entries
    - log save <path>: Export the system log"};

const DEFAULT_LOG_LINES: usize = 10;
const MAX_HISTORY: usize = 500;

/// Scripted shell. Nothing is executed; every command answers from a
/// fixed table.
#[derive(Debug)]
pub struct TerminalComponent {
    user: String,
    history: Vec<String>,
    input: String,
    log: Option<LogBuffer>,
}

impl TerminalComponent {
    pub fn new(user: impl Into<String>) -> Self {
        Self::with_log(user, global_log_buffer())
    }

    pub fn with_log(user: impl Into<String>, log: Option<LogBuffer>) -> Self {
        Self {
            user: user.into(),
            history: BANNER.lines().map(str::to_string).collect(),
            input: String::new(),
            log,
        }
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Run `line` as if typed at the prompt.
    pub fn submit(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        self.history.push(format!("> {line}"));
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or_default().to_lowercase();
        let args: Vec<&str> = words.collect();
        tracing::debug!(command = %command, "nemeterm command");

        match command.as_str() {
            "help" => self.print_block(HELP),
            "clear" => self.history.clear(),
            "date" => {
                let secs = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map_or(0, |elapsed| elapsed.as_secs());
                self.print(format_utc(secs));
            }
            "ls" => self.print_block("Documents/\nDownloads/\nSystem/\nkernel.sys\ncore.bin"),
            "whoami" => {
                self.print(format!("{} (ROOT_PRIVILEGES)", self.user));
                self.print("NODE_ID: 0x92FB-4A12");
            }
            "ping" => self.print_block(indoc! {"
                PING nexus.core (127.0.0.1): 56 data bytes
                64 bytes from 127.0.0.1: icmp_seq=0 ttl=64 time=0.04 ms
                64 bytes from 127.0.0.1: icmp_seq=1 ttl=64 time=0.05 ms"}),
            "log" => self.run_log(&args),
            _ => self.print(format!("Command not found: {command}")),
        }

        if self.history.len() > MAX_HISTORY {
            let excess = self.history.len() - MAX_HISTORY;
            self.history.drain(..excess);
        }
    }

    fn run_log(&mut self, args: &[&str]) {
        let Some(log) = self.log.clone() else {
            self.print("LOG_BUFFER_OFFLINE");
            return;
        };
        match args {
            ["save", path] => match log.export_to(path) {
                Ok(count) => self.print(format!("Exported {count} entries to {path}")),
                Err(err) => self.print(format!("Export failed: {err}")),
            },
            ["save"] => self.print("usage: log save <path>"),
            [] => self.print_tail(&log, DEFAULT_LOG_LINES),
            [count] => match count.parse::<usize>() {
                Ok(count) => self.print_tail(&log, count),
                Err(_) => self.print(format!("invalid count: {count}")),
            },
            _ => self.print("usage: log [n] | log save <path>"),
        }
    }

    fn print_tail(&mut self, log: &LogBuffer, count: usize) {
        let lines = log.tail(count);
        if lines.is_empty() {
            self.print("(log is empty)");
        }
        self.history.extend(lines);
    }

    fn print(&mut self, line: impl Into<String>) {
        self.history.push(line.into());
    }

    fn print_block(&mut self, block: &str) {
        self.history.extend(block.lines().map(str::to_string));
    }
}

/// `YYYY-MM-DD HH:MM:SS UTC` for seconds since the Unix epoch.
pub fn format_utc(secs: u64) -> String {
    let days = (secs / 86_400) as i64;
    let rem = secs % 86_400;
    // Civil-from-days over 400-year eras.
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    format!(
        "{year:04}-{month:02}-{day:02} {:02}:{:02}:{:02} UTC",
        rem / 3_600,
        (rem % 3_600) / 60,
        rem % 60
    )
}

impl Component for TerminalComponent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let bounds = area.intersection(frame.area());
        let buffer = frame.buffer_mut();
        let rows = area.height as usize;
        // Prompt takes the last row; history scrolls above it.
        let visible = rows.saturating_sub(1);
        let skip = self.history.len().saturating_sub(visible);
        let out_style = Style::default().fg(theme::text());
        for (idx, line) in self.history.iter().skip(skip).enumerate() {
            let style = if line.starts_with("> ") {
                Style::default().fg(theme::muted())
            } else {
                out_style
            };
            safe_set_string(
                buffer,
                bounds,
                area.x,
                area.y.saturating_add(idx as u16),
                line,
                style,
            );
        }

        let prompt_y = area.y.saturating_add((rows - 1) as u16);
        let prompt = format!("❯ {}", self.input);
        safe_set_string(
            buffer,
            bounds,
            area.x,
            prompt_y,
            &prompt,
            Style::default().fg(theme::accent()),
        );
        if ctx.show_cursor() {
            let x = area.x.saturating_add(prompt.chars().count() as u16);
            if x < bounds.x.saturating_add(bounds.width)
                && let Some(cell) = buffer.cell_mut((x, prompt_y))
            {
                cell.set_symbol("█");
                cell.set_style(Style::default().fg(theme::accent()));
            }
        }
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
        let Event::Key(key) = event else {
            return false;
        };
        if key.kind == KeyEventKind::Release {
            return false;
        }
        match key.code {
            KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.history.clear();
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.push(ch);
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Enter => {
                let line = std::mem::take(&mut self.input);
                self.submit(&line);
            }
            _ => return false,
        }
        true
    }
}

impl AppContent for TerminalComponent {}

#[cfg(test)]
mod tests {
    use super::*;

    fn term() -> TerminalComponent {
        TerminalComponent::with_log("NEMESIS_USER", None)
    }

    #[test]
    fn starts_with_banner() {
        let t = term();
        assert_eq!(t.history()[0], "Nemesis OS [Version 4.0.1.002]");
    }

    #[test]
    fn unknown_command_is_reported() {
        let mut t = term();
        t.submit("Hack");
        assert_eq!(
            t.history().last().map(String::as_str),
            Some("Command not found: hack")
        );
    }

    #[test]
    fn clear_empties_history() {
        let mut t = term();
        t.submit("ls");
        t.submit("clear");
        assert!(t.history().is_empty());
    }

    #[test]
    fn whoami_uses_session_user() {
        let mut t = TerminalComponent::with_log("neo", None);
        t.submit("whoami");
        assert!(t.history().iter().any(|line| line == "neo (ROOT_PRIVILEGES)"));
    }

    #[test]
    fn typing_and_enter_submit_the_line() {
        let mut t = term();
        let ctx = ComponentContext::new(true);
        for ch in "ls".chars() {
            t.handle_event(
                &Event::Key(crossterm::event::KeyEvent::new(
                    KeyCode::Char(ch),
                    KeyModifiers::NONE,
                )),
                &ctx,
            );
        }
        assert_eq!(t.input(), "ls");
        t.handle_event(
            &Event::Key(crossterm::event::KeyEvent::new(
                KeyCode::Enter,
                KeyModifiers::NONE,
            )),
            &ctx,
        );
        assert_eq!(t.input(), "");
        assert!(t.history().iter().any(|line| line == "kernel.sys"));
    }

    #[test]
    fn log_shows_tail_of_buffer() {
        let log = LogBuffer::new(10);
        for idx in 0..4 {
            log.push(format!("event {idx}"));
        }
        let mut t = TerminalComponent::with_log("u", Some(log));
        t.submit("log 2");
        let tail: Vec<&str> = t.history().iter().rev().take(2).map(String::as_str).collect();
        assert_eq!(tail, vec!["event 3", "event 2"]);
    }

    #[test]
    fn log_save_exports_to_file() {
        let log = LogBuffer::new(10);
        log.push("event");
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.log");
        let mut t = TerminalComponent::with_log("u", Some(log));
        t.submit(&format!("log save {}", path.display()));
        assert_eq!(
            std::fs::read_to_string(&path).expect("exported"),
            "event\n"
        );
    }

    #[test]
    fn utc_formatting() {
        assert_eq!(format_utc(0), "1970-01-01 00:00:00 UTC");
        assert_eq!(format_utc(951_782_400), "2000-02-29 00:00:00 UTC");
        assert_eq!(format_utc(1_700_000_000), "2023-11-14 22:13:20 UTC");
    }
}
