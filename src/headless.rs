//! Headless Terminal Runner
//!
//! Drives a [`Terminal`] from a byte stream without a window or a host
//! process. Useful for testing and for generating deterministic snapshots.
//!
//! Input is fed in transport sized chunks, smooth scroll delays are
//! completed immediately, and replies the engine produced are kept so a
//! caller can inspect what would have been sent to the host.

use std::io::{self, Read, Write};
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::config::Config;
use crate::core::Snapshot;
use crate::terminal::{Terminal, TerminalEvent};

/// Bytes read from the input per pump
const CHUNK_SIZE: usize = 4096;

/// Errors from running the headless terminal
#[derive(Debug, Error)]
pub enum HeadlessError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// How the final screen is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// A terminal with no window attached
pub struct HeadlessRunner {
    terminal: Terminal,
    replies: Vec<u8>,
    events: Vec<TerminalEvent>,
}

impl HeadlessRunner {
    pub fn new(config: &Config) -> Self {
        Self {
            terminal: Terminal::with_config(config),
            replies: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Interpret bytes, completing any smooth scroll right away
    pub fn feed(&mut self, data: &[u8]) {
        self.terminal.on_bytes(data);
        self.terminal.pump();
        while self.terminal.has_pending_scroll() {
            self.terminal.tick(Instant::now() + Duration::from_secs(1));
        }
        self.replies.extend(self.terminal.take_output());
        self.events.extend(self.terminal.drain_events());
    }

    /// Feed everything a reader produces
    pub fn run<R: Read>(&mut self, mut input: R) -> Result<(), HeadlessError> {
        let mut chunk = [0u8; CHUNK_SIZE];
        loop {
            let n = match input.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            };
            self.feed(&chunk[..n]);
        }
        tracing::debug!(
            "headless run finished: {} reply bytes, {} events",
            self.replies.len(),
            self.events.len()
        );
        Ok(())
    }

    pub fn terminal(&self) -> &Terminal {
        &self.terminal
    }

    pub fn snapshot(&self) -> Snapshot {
        self.terminal.snapshot()
    }

    /// Bytes the engine would have sent to the host
    pub fn replies(&self) -> &[u8] {
        &self.replies
    }

    /// Events collected while running
    pub fn events(&self) -> &[TerminalEvent] {
        &self.events
    }

    /// The final screen in the requested format
    pub fn render(&self, format: OutputFormat) -> Result<String, HeadlessError> {
        let snapshot = self.snapshot();
        Ok(match format {
            OutputFormat::Text => snapshot.to_text(),
            OutputFormat::Json => snapshot.to_json()?,
        })
    }

    /// Write the final screen, followed by the replies when asked for
    pub fn write_to<W: Write>(&self, mut out: W, format: OutputFormat, replies: bool) -> Result<(), HeadlessError> {
        out.write_all(self.render(format)?.as_bytes())?;
        if replies && !self.replies.is_empty() {
            writeln!(out, "--- replies ---")?;
            writeln!(out, "{}", escape_bytes(&self.replies))?;
        }
        out.flush()?;
        Ok(())
    }
}

/// Printable form of raw bytes: ESC as `\e`, other controls as `\xNN`
pub fn escape_bytes(bytes: &[u8]) -> String {
    let mut result = String::with_capacity(bytes.len());
    for &byte in bytes {
        match byte {
            0x1B => result.push_str("\\e"),
            b'\\' => result.push_str("\\\\"),
            0x20..=0x7E => result.push(byte as char),
            _ => result.push_str(&format!("\\x{byte:02x}")),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner(cols: usize, rows: usize) -> HeadlessRunner {
        HeadlessRunner::new(&Config {
            columns: cols,
            rows,
            ..Config::default()
        })
    }

    #[test]
    fn test_headless_basic() {
        let mut runner = runner(80, 24);
        runner.feed(b"Hello, World!");
        let text = runner.render(OutputFormat::Text).unwrap();
        assert_eq!(text, "Hello, World!\n");
    }

    #[test]
    fn test_headless_colors() {
        let mut runner = runner(80, 24);
        runner.feed(b"\x1b[31mRed\x1b[0m Normal");
        let json = runner.render(OutputFormat::Json).unwrap();
        assert!(json.contains("\"ch\": \"R\""));
        assert!(json.contains("\"index\": 1"));
    }

    #[test]
    fn test_headless_cursor_movement() {
        let mut runner = runner(10, 5);
        runner.feed(b"\x1b[3;5HX");
        let snapshot = runner.snapshot();
        assert_eq!(snapshot.cursor.row, 2);
        assert_eq!(snapshot.cursor.col, 5);
    }

    #[test]
    fn test_headless_json_roundtrip() {
        let mut runner = runner(80, 24);
        runner.feed(b"Test\x1b[1;31mBold Red\x1b[0m");
        let json = runner.render(OutputFormat::Json).unwrap();
        let restored = Snapshot::from_json(&json).unwrap();
        assert!(runner.snapshot().content_equals(&restored));
    }

    #[test]
    fn test_headless_completes_smooth_scroll() {
        let mut runner = runner(10, 2);
        runner.feed(b"\x1b[?4ha\r\nb\r\nc\r\nd");
        assert_eq!(runner.render(OutputFormat::Text).unwrap(), "c\nd\n");
    }

    #[test]
    fn test_headless_run_reader_and_replies() {
        let mut runner = runner(80, 24);
        runner.run(&b"\x1b[6n\x07"[..]).unwrap();
        assert_eq!(runner.replies(), b"\x1b[1;1R");
        assert_eq!(runner.events(), &[TerminalEvent::Bell]);

        let mut out = Vec::new();
        runner.write_to(&mut out, OutputFormat::Text, true).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "\n--- replies ---\n\\e[1;1R\n");
    }

    #[test]
    fn test_escape_bytes() {
        assert_eq!(escape_bytes(b"\x1bP\\\x07ok"), "\\eP\\\\\\x07ok");
    }
}
