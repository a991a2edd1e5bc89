//! In-memory log sink.
//!
//! While the front end owns the terminal, tracing output is captured here
//! instead of stderr. NemeTerm's `log` command reads it back and `log save`
//! writes it to a file.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

pub const DEFAULT_MAX_LINES: usize = 2000;

static GLOBAL_LOG: OnceLock<LogBuffer> = OnceLock::new();
static PANIC_HOOK_INSTALLED: OnceLock<()> = OnceLock::new();

/// Install `buffer` as the process-wide sink. Only the first call wins.
pub fn set_global_log_buffer(buffer: LogBuffer) -> bool {
    GLOBAL_LOG.set(buffer).is_ok()
}

pub fn global_log_buffer() -> Option<LogBuffer> {
    GLOBAL_LOG.get().cloned()
}

/// Record panics in the global buffer before the default hook runs, so they
/// survive the terminal being restored.
pub fn install_panic_hook() {
    if PANIC_HOOK_INSTALLED.set(()).is_err() {
        return;
    }
    let prev = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if let Some(buffer) = GLOBAL_LOG.get() {
            buffer.push("=== PANIC ===");
            if let Some(location) = info.location() {
                buffer.push(format!("{}:{}", location.file(), location.line()));
            }
            let message = info
                .payload()
                .downcast_ref::<&str>()
                .map(|msg| msg.to_string())
                .or_else(|| info.payload().downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "<non-string panic>".to_string());
            buffer.push(format!("message: {message}"));
        }
        prev(info);
    }));
}

#[derive(Debug)]
struct Lines {
    lines: VecDeque<String>,
    max_lines: usize,
}

/// Bounded, shareable line buffer. Clones share storage.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    inner: Arc<Mutex<Lines>>,
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINES)
    }
}

impl LogBuffer {
    pub fn new(max_lines: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Lines {
                lines: VecDeque::new(),
                max_lines: max_lines.max(1),
            })),
        }
    }

    // A panic while holding the lock leaves plain strings behind, which are
    // still fine to read.
    fn lock(&self) -> MutexGuard<'_, Lines> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn push(&self, line: impl Into<String>) {
        let mut buffer = self.lock();
        buffer.lines.push_back(line.into());
        while buffer.lines.len() > buffer.max_lines {
            buffer.lines.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.lock().lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().lines.is_empty()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lock().lines.iter().cloned().collect()
    }

    /// The newest `count` lines, oldest first.
    pub fn tail(&self, count: usize) -> Vec<String> {
        let buffer = self.lock();
        let skip = buffer.lines.len().saturating_sub(count);
        buffer.lines.iter().skip(skip).cloned().collect()
    }

    pub fn writer(&self) -> LogWriter {
        LogWriter {
            buffer: self.clone(),
            pending: Vec::new(),
        }
    }

    /// Write every buffered line to `path`, replacing the file. Returns the
    /// number of lines written.
    pub fn export_to(&self, path: impl AsRef<Path>) -> io::Result<usize> {
        let lines = self.lines();
        let mut out = BufWriter::new(File::create(path.as_ref())?);
        for line in &lines {
            writeln!(out, "{line}")?;
        }
        out.flush()?;
        Ok(lines.len())
    }
}

/// `io::Write` adapter that splits output into lines.
#[derive(Debug)]
pub struct LogWriter {
    buffer: LogBuffer,
    pending: Vec<u8>,
}

impl LogWriter {
    fn drain_complete_lines(&mut self) {
        let Some(pos) = self.pending.iter().rposition(|b| *b == b'\n') else {
            return;
        };
        let drained: Vec<u8> = self.pending.drain(..=pos).collect();
        String::from_utf8_lossy(&drained)
            .split('\n')
            .filter(|line| !line.is_empty())
            .for_each(|line| self.buffer.push(line));
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        self.drain_complete_lines();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            let rest = String::from_utf8_lossy(&self.pending).into_owned();
            self.pending.clear();
            self.buffer.push(rest);
        }
        Ok(())
    }
}

impl Drop for LogWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_newest_lines() {
        let buffer = LogBuffer::new(2);
        buffer.push("a");
        buffer.push("b");
        buffer.push("c");
        assert_eq!(buffer.lines(), vec!["b", "c"]);
    }

    #[test]
    fn tail_returns_oldest_first() {
        let buffer = LogBuffer::new(10);
        for idx in 0..5 {
            buffer.push(format!("line {idx}"));
        }
        assert_eq!(buffer.tail(2), vec!["line 3", "line 4"]);
        assert_eq!(buffer.tail(99).len(), 5);
    }

    #[test]
    fn writer_splits_lines_and_flushes_partial() {
        let buffer = LogBuffer::new(10);
        {
            let mut writer = buffer.writer();
            write!(writer, "one\ntw").expect("write");
            assert_eq!(buffer.lines(), vec!["one"]);
            write!(writer, "o\nthree").expect("write");
        }
        assert_eq!(buffer.lines(), vec!["one", "two", "three"]);
    }

    #[test]
    fn export_writes_all_lines() {
        let buffer = LogBuffer::new(10);
        buffer.push("opened window");
        buffer.push("closed window");
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.log");
        assert_eq!(buffer.export_to(&path).expect("export"), 2);
        let text = std::fs::read_to_string(&path).expect("read back");
        assert_eq!(text, "opened window\nclosed window\n");
    }
}
