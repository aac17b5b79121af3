//! Terminal Executor
//!
//! Ties together the parser, the screen buffers and the mode state, and
//! applies parsed actions to them. This is the main integration point
//! between the transport, the renderer and the emulation core.
//!
//! Inbound bytes are queued with [`Terminal::on_bytes`] and interpreted by
//! [`Terminal::pump`]. Replies to host queries and encoded local input are
//! collected for the transport with [`Terminal::take_output`]; things the
//! host application must act on (bell, title, clipboard, file transfer)
//! are collected with [`Terminal::drain_events`].

mod control;
mod csi;
mod keyboard;
mod motion;
mod strings;

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::Config;
use crate::core::{
    Cursor, CursorShape, Encoding, EraseMode, Line, Margins, Modes, Point, ScreenBuffer, Snapshot, SnapshotSource,
};
use crate::parser::{Action, CommandTable, Parser, ParserMode};

/// Delay applied to each scroll while DECSCLM is set
const SMOOTH_SCROLL_DELAY: Duration = Duration::from_millis(25);
/// Half period of blinking text and cursor
const BLINK_PERIOD: Duration = Duration::from_millis(660);

const MAX_COLUMNS: usize = 1000;
const MAX_ROWS: usize = 500;

/// Something the host application has to act on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    Bell,
    TitleChanged(String),
    /// OSC 52: store these bytes on the clipboard
    ClipboardSet(Vec<u8>),
    /// APC 7: the host offers this file for download
    DownloadFile(String),
    /// APC 8: the host asks for this file to be uploaded
    UploadFile(String),
    Resized { cols: usize, rows: usize },
}

/// A scroll held back by smooth scrolling
#[derive(Debug, Clone, Copy)]
struct PendingScroll {
    forward: bool,
    region: Margins,
    deadline: Instant,
}

/// The emulation engine for one session
pub struct Terminal {
    config: Config,
    parser: Parser,
    commands: CommandTable,
    /// Scratch space for actions produced by one byte
    actions: Vec<Action>,
    /// Received bytes not yet interpreted
    pending: VecDeque<u8>,
    /// Bytes for the transport
    output: Vec<u8>,
    events: Vec<TerminalEvent>,

    primary: ScreenBuffer,
    alternate: ScreenBuffer,
    /// Host writable status line
    status: ScreenBuffer,
    alternate_active: bool,
    /// DECSASD: output goes to the status line
    status_active: bool,
    /// DECSSDT: 0 none, 1 indicator, 2 host writable
    status_display: u32,

    cursor: Cursor,
    /// DECSC slots for the primary and alternate screen
    saved_cursor: [Option<Cursor>; 2],
    /// Main screen cursor while the status line is active
    saved_status: Option<Cursor>,
    margins: Margins,
    modes: Modes,
    tab_stops: Vec<bool>,

    title: String,
    /// Last printed character, for REP
    last_char: Option<char>,
    /// Hyperlink applied to written cells, 0 for none
    link: u32,
    /// DECUDK definitions by key number
    udk: Option<HashMap<u32, Vec<u8>>>,
    udk_locked: bool,

    smooth_scroll: Option<PendingScroll>,
    blink_on: bool,
    last_blink: Option<Instant>,
    /// Last reported mouse position, to drop duplicate motion reports
    last_mouse: Option<(usize, usize)>,
}

impl Terminal {
    /// Create a terminal with default settings and the given size
    pub fn new(cols: usize, rows: usize) -> Self {
        Self::with_config(&Config {
            columns: cols,
            rows,
            ..Config::default()
        })
    }

    /// Create a terminal from a configuration
    pub fn with_config(config: &Config) -> Self {
        let cols = config.columns.clamp(1, MAX_COLUMNS);
        let rows = config.rows.clamp(1, MAX_ROWS);
        let mut primary = ScreenBuffer::new(cols, rows, config.scrollback_lines);
        primary.set_word_characters(&config.word_characters);
        let mut alternate = ScreenBuffer::new(cols, rows, 0);
        alternate.set_word_characters(&config.word_characters);

        let mut terminal = Self {
            config: config.clone(),
            parser: Parser::new(),
            commands: CommandTable::new(),
            actions: Vec::new(),
            pending: VecDeque::new(),
            output: Vec::new(),
            events: Vec::new(),
            primary,
            alternate,
            status: ScreenBuffer::new(cols, 1, 0),
            alternate_active: false,
            status_active: false,
            status_display: 0,
            cursor: Cursor::new(),
            saved_cursor: [None, None],
            saved_status: None,
            margins: Margins::full(cols, rows),
            modes: Modes::new(),
            tab_stops: Vec::new(),
            title: String::new(),
            last_char: None,
            link: 0,
            udk: None,
            udk_locked: false,
            smooth_scroll: None,
            blink_on: true,
            last_blink: None,
            last_mouse: None,
        };
        terminal.modes.encoding = config.encoding;
        terminal.reset();
        terminal
    }

    /// Apply changed preferences to a running session
    pub fn apply_config(&mut self, config: &Config) {
        self.primary.set_scrollback_capacity(config.scrollback_lines);
        self.primary.set_word_characters(&config.word_characters);
        self.alternate.set_word_characters(&config.word_characters);
        if config.encoding != self.config.encoding {
            self.modes.encoding = config.encoding;
        }
        if config.bracketed_paste != self.config.bracketed_paste {
            self.modes.bracketed_paste = config.bracketed_paste;
        }
        let resize = (config.columns, config.rows) != (self.config.columns, self.config.rows);
        self.config = config.clone();
        if resize {
            self.resize(config.columns, config.rows);
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ---- Transport boundary ----

    /// Queue bytes received from the host
    pub fn on_bytes(&mut self, data: &[u8]) {
        self.pending.extend(data);
    }

    /// Interpret queued bytes until the queue is empty or a smooth scroll
    /// is waiting for its deadline
    pub fn pump(&mut self) {
        let mut actions = std::mem::take(&mut self.actions);
        while self.smooth_scroll.is_none() {
            let Some(byte) = self.pending.pop_front() else {
                break;
            };
            let mode = self.parser_mode();
            self.parser.advance(byte, mode, &mut actions);
            for action in actions.drain(..) {
                self.apply_action(action);
            }
        }
        self.actions = actions;
    }

    /// Queue and interpret bytes
    pub fn process(&mut self, data: &[u8]) {
        self.on_bytes(data);
        self.pump();
    }

    /// Advance time based state: a due smooth scroll and the blink phase
    pub fn tick(&mut self, now: Instant) {
        if let Some(scroll) = self.smooth_scroll {
            if now >= scroll.deadline {
                self.smooth_scroll = None;
                self.perform_scroll(scroll.forward, scroll.region);
            }
        }
        self.pump();

        match self.last_blink {
            Some(last) if now.saturating_duration_since(last) < BLINK_PERIOD => {},
            Some(_) => {
                self.blink_on = !self.blink_on;
                self.last_blink = Some(now);
                self.screen_mut().mark_dirty();
            },
            None => self.last_blink = Some(now),
        }
    }

    /// Whether a smooth scroll step is waiting for `tick`
    pub fn has_pending_scroll(&self) -> bool {
        self.smooth_scroll.is_some()
    }

    /// Bytes received but not interpreted yet
    pub fn pending_input(&self) -> usize {
        self.pending.len()
    }

    /// Drain bytes destined for the host
    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }

    pub fn drain_events(&mut self) -> Vec<TerminalEvent> {
        std::mem::take(&mut self.events)
    }

    // ---- Rendering boundary ----

    /// A row of the displayed screen; negative indices reach into scrollback
    pub fn get_line(&self, index: isize) -> Option<&Line> {
        self.buffer().get_line(index)
    }

    /// Cursor of the main screen
    pub fn cursor_state(&self) -> &Cursor {
        match (&self.saved_status, self.status_active) {
            (Some(saved), true) => saved,
            _ => &self.cursor,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.buffer().is_dirty() || self.status.is_dirty()
    }

    pub fn clear_dirty(&mut self) {
        self.primary.clear_dirty();
        self.alternate.clear_dirty();
        self.status.clear_dirty();
    }

    /// Normalized selection endpoints, `None` when nothing is selected
    pub fn selection_range(&self) -> Option<(Point, Point)> {
        let selection = self.buffer().selection();
        if selection.is_empty() {
            None
        } else {
            Some(selection.range())
        }
    }

    /// (columns, rows)
    pub fn terminal_size(&self) -> (usize, usize) {
        (self.primary.width(), self.primary.height())
    }

    pub fn modes(&self) -> &Modes {
        &self.modes
    }

    pub fn margins(&self) -> &Margins {
        &self.margins
    }

    /// The displayed screen buffer
    pub fn buffer(&self) -> &ScreenBuffer {
        if self.alternate_active {
            &self.alternate
        } else {
            &self.primary
        }
    }

    /// The displayed screen buffer, for selection and search
    pub fn buffer_mut(&mut self) -> &mut ScreenBuffer {
        if self.alternate_active {
            &mut self.alternate
        } else {
            &mut self.primary
        }
    }

    pub fn is_alternate_screen(&self) -> bool {
        self.alternate_active
    }

    /// The host writable status line, when it is shown
    pub fn status_line(&self) -> Option<&ScreenBuffer> {
        (self.status_display == 2).then_some(&self.status)
    }

    /// DECSSDT status display type
    pub fn status_display(&self) -> u32 {
        self.status_display
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Current blink phase; blinking text and cursor show when true
    pub fn blink_on(&self) -> bool {
        self.blink_on
    }

    /// Plain text of a displayed row
    pub fn line_text(&self, index: isize) -> String {
        self.buffer().line_text(index)
    }

    /// Capture the displayed screen
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(SnapshotSource {
            buffer: self.buffer(),
            cursor: self.cursor_state(),
            modes: &self.modes,
            margins: &self.margins,
            title: &self.title,
            alternate_screen: self.alternate_active,
        })
    }

    // ---- Resize boundary ----

    /// Resize at the request of the window. Rows above the cursor move into
    /// scrollback when the cursor would otherwise fall off the bottom.
    pub fn resize(&mut self, cols: usize, rows: usize) {
        let new_cols = cols.clamp(1, MAX_COLUMNS);
        let new_rows = rows.clamp(1, MAX_ROWS);
        if (new_cols, new_rows) != (cols, rows) {
            debug!("resize to {cols}x{rows} clamped to {new_cols}x{new_rows}");
        }
        if (new_cols, new_rows) == self.terminal_size() {
            return;
        }

        let main_row = self.cursor_state().row;
        let excess = (main_row + 1).saturating_sub(new_rows);
        if excess > 0 {
            let buffer = self.buffer_mut();
            let (bottom, right) = (buffer.height() - 1, buffer.width() - 1);
            for _ in 0..excess {
                buffer.scroll_forward(0, bottom, 0, right);
            }
        }

        self.resize_buffers(new_cols, new_rows);

        let cursors = std::iter::once(&mut self.cursor)
            .chain(self.saved_status.iter_mut())
            .chain(self.saved_cursor.iter_mut().flatten());
        for cursor in cursors {
            cursor.row = cursor.row.saturating_sub(excess).min(new_rows - 1);
            cursor.col = cursor.col.min(new_cols - 1);
            cursor.pending_wrap = false;
        }
        if self.status_active {
            self.cursor.row = 0;
        }
    }

    /// Resize requested by the host (DECCOLM, DECSNLS, window ops): the
    /// screen is cleared and the cursor homed
    fn host_resize(&mut self, cols: usize, rows: usize) {
        let cols = cols.clamp(1, MAX_COLUMNS);
        let rows = rows.clamp(1, MAX_ROWS);
        if (cols, rows) != self.terminal_size() {
            self.resize_buffers(cols, rows);
        }
        self.cursor.set_position(0, 0);
        for saved in self.saved_cursor.iter_mut().flatten() {
            saved.set_position(0, 0);
        }
        let buffer = self.screen_mut();
        buffer.erase_display(0, 0, EraseMode::All, false);
    }

    fn resize_buffers(&mut self, cols: usize, rows: usize) {
        let mut anchor = 0;
        self.primary.resize(cols, rows, &mut anchor);
        let mut anchor = 0;
        self.alternate.resize(cols, rows, &mut anchor);
        let mut anchor = 0;
        self.status.resize(cols, 1, &mut anchor);
        self.margins = Margins::full(cols, rows);
        self.reset_tab_stops();
        self.events.push(TerminalEvent::Resized { cols, rows });
    }

    // ---- Reset ----

    /// RIS: return to the power-on state
    pub fn reset(&mut self) {
        let (cols, rows) = self.terminal_size();

        self.modes.reset();
        self.modes.bracketed_paste = self.config.bracketed_paste;
        self.modes.conformance_level = self.config.conformance_level.clamp(1, 5);
        self.modes.c1_8bit = false;

        self.cursor.reset();
        self.cursor.shape = if self.config.cursor_block {
            CursorShape::Block
        } else {
            CursorShape::Underline
        };
        self.cursor.blinking = self.config.cursor_blink;
        self.saved_cursor = [None, None];
        self.saved_status = None;

        self.status_active = false;
        self.status_display = if self.config.status_line { 1 } else { 0 };
        self.alternate_active = false;
        self.margins = Margins::full(cols, rows);
        self.reset_tab_stops();
        self.smooth_scroll = None;
        self.last_char = None;
        self.link = 0;
        self.last_mouse = None;

        for buffer in [&mut self.primary, &mut self.alternate, &mut self.status] {
            buffer.set_erase_colors(Default::default(), Default::default());
            buffer.clear();
        }
    }

    /// DECSTR: reset modes and rendition without clearing the screen
    pub fn soft_reset(&mut self) {
        self.modes.cursor_visible = true;
        self.modes.insert = false;
        self.modes.keypad_application = false;
        self.modes.cursor_keys_application = false;
        self.modes.national_replacement = false;

        let (_, rows) = self.terminal_size();
        self.margins.top = 0;
        self.margins.bottom = rows - 1;

        self.cursor.style.reset();
        self.cursor.charsets.reset();
        self.cursor.origin_mode = false;
        self.cursor.autowrap = true;
        self.saved_cursor[0] = Some(self.cursor.clone());
    }

    // ---- Internals ----

    fn parser_mode(&self) -> ParserMode {
        ParserMode {
            vt52: !self.modes.ansi,
            c1_controls: self.modes.eight_bit_controls(),
            utf8: self.modes.encoding == Encoding::Utf8,
            nrc: self.modes.national_replacement,
        }
    }

    /// The buffer output currently goes to
    fn screen(&self) -> &ScreenBuffer {
        if self.status_active {
            &self.status
        } else {
            self.buffer()
        }
    }

    fn screen_mut(&mut self) -> &mut ScreenBuffer {
        if self.status_active {
            &mut self.status
        } else {
            self.buffer_mut()
        }
    }

    /// Margins in effect for the buffer output goes to
    fn region(&self) -> Margins {
        if self.status_active {
            Margins::full(self.status.width(), 1)
        } else {
            self.margins
        }
    }

    fn width(&self) -> usize {
        self.screen().width()
    }

    fn height(&self) -> usize {
        self.screen().height()
    }

    fn reset_tab_stops(&mut self) {
        let width = self.primary.width();
        self.tab_stops = (0..width).map(|col| col % 8 == 0 && col != 0).collect();
    }

    fn apply_action(&mut self, action: Action) {
        match action {
            Action::Print(ch) => {
                let ch = if (0x20..0x7F).contains(&(ch as u32)) {
                    self.cursor.charsets.translate_gl(ch as u8)
                } else {
                    ch
                };
                self.write_char(ch);
            },
            Action::PrintGr(byte) => {
                let ch = self.cursor.charsets.translate_gr(byte);
                self.write_char(ch);
            },
            Action::Execute(byte) => self.execute(byte),
            Action::Esc(byte) => self.escape(byte),
            Action::Vt52(byte) => self.vt52(byte),
            Action::Vt52Position { line, column } => {
                self.move_to(usize::from(line), usize::from(column));
            },
            Action::Designate {
                slot,
                size96,
                designator,
            } => self.designate(slot, size96, designator),
            Action::SelectEncoding(byte) => self.select_encoding(byte),
            Action::LineAttribute(byte) => self.line_attribute(byte),
            Action::ControlTransmission(byte) => self.control_transmission(byte),
            Action::Csi(seq) => self.csi(&seq),
            Action::Osc { number, payload } => self.osc(number, &payload),
            Action::Dcs(command) => self.dcs(command),
            Action::Apc { number, payload } => self.apc(number, &payload),
        }
    }

    /// Queue a reply for the host, in 8-bit C1 form when S8C1T is active
    fn send(&mut self, reply: &[u8]) {
        if !self.modes.eight_bit_controls() {
            self.output.extend_from_slice(reply);
            return;
        }
        let mut bytes = reply.iter().peekable();
        while let Some(&byte) = bytes.next() {
            if byte == 0x1B {
                let c1 = match bytes.peek() {
                    Some(b'D') => Some(0x84),
                    Some(b'E') => Some(0x85),
                    Some(b'H') => Some(0x88),
                    Some(b'M') => Some(0x8D),
                    Some(b'N') => Some(0x8E),
                    Some(b'O') => Some(0x8F),
                    Some(b'P') => Some(0x90),
                    Some(b'[') => Some(0x9B),
                    Some(b'\\') => Some(0x9C),
                    Some(b']') => Some(0x9D),
                    _ => None,
                };
                if let Some(c1) = c1 {
                    bytes.next();
                    self.output.push(c1);
                    continue;
                }
            }
            self.output.push(byte);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Attrs, Color};

    pub(super) fn term() -> Terminal {
        Terminal::new(80, 24)
    }

    pub(super) fn text(terminal: &Terminal, row: isize) -> String {
        terminal.line_text(row).trim_end().to_string()
    }

    #[test]
    fn test_terminal_new() {
        let terminal = term();
        assert_eq!(terminal.terminal_size(), (80, 24));
        assert_eq!(terminal.cursor_state().row, 0);
        assert!(terminal.modes().cursor_visible);
        assert!(terminal.modes().bracketed_paste);
    }

    #[test]
    fn test_print_text() {
        let mut terminal = term();
        terminal.process(b"Hello, World!");
        assert_eq!(text(&terminal, 0), "Hello, World!");
        assert_eq!(terminal.cursor_state().col, 13);
    }

    #[test]
    fn test_hello_world_scenario() {
        let mut terminal = term();
        terminal.process(b"\x1b[2JHello\r\nWorld");
        assert_eq!(text(&terminal, 0), "Hello");
        assert_eq!(text(&terminal, 1), "World");
        assert_eq!((terminal.cursor_state().row, terminal.cursor_state().col), (1, 5));
    }

    #[test]
    fn test_sgr_bold_red_then_reset() {
        let mut terminal = term();
        terminal.process(b"\x1b[1;31mX\x1b[0mY");
        let x = terminal.buffer().cell(0, 0).copied().unwrap();
        assert!(x.style.contains(Attrs::BOLD));
        assert_eq!(x.style.fg, Color::RED);
        let y = terminal.buffer().cell(0, 1).copied().unwrap();
        assert!(y.style.is_default());
    }

    #[test]
    fn test_byte_at_a_time_matches_chunk() {
        let input = b"\x1b[1;31mred\x1b[0m \x1b]0;title\x07\x1b[5;10Hx";
        let mut whole = term();
        whole.process(input);
        let mut split = term();
        for &byte in input.iter() {
            split.process(&[byte]);
        }
        assert!(whole.snapshot().content_equals(&split.snapshot()));
        assert_eq!(whole.cursor_state(), split.cursor_state());
        assert_eq!(whole.title(), split.title());
    }

    #[test]
    fn test_autowrap() {
        let mut terminal = Terminal::new(10, 3);
        terminal.process(b"0123456789AB");
        assert_eq!(text(&terminal, 0), "0123456789");
        assert_eq!(text(&terminal, 1), "AB");
        assert!(terminal.get_line(0).unwrap().is_wrapped());
        assert_eq!(terminal.cursor_state().col, 2);
    }

    #[test]
    fn test_pending_wrap_at_last_column() {
        let mut terminal = Terminal::new(10, 3);
        terminal.process(b"0123456789");
        assert_eq!(terminal.cursor_state().row, 0);
        assert!(terminal.cursor_state().pending_wrap);
        terminal.process(b"\r");
        assert_eq!(terminal.cursor_state().col, 0);
        assert!(!terminal.get_line(0).unwrap().is_wrapped());
    }

    #[test]
    fn test_no_autowrap_overwrites_last_column() {
        let mut terminal = Terminal::new(10, 3);
        terminal.process(b"\x1b[?7l0123456789XYZ");
        assert_eq!(text(&terminal, 0), "012345678Z");
        assert_eq!(text(&terminal, 1), "");
    }

    #[test]
    fn test_scrollback_collects_lines() {
        let mut terminal = Terminal::new(10, 3);
        terminal.process(b"one\r\ntwo\r\nthree\r\nfour");
        assert_eq!(terminal.buffer().buffered(), 1);
        assert_eq!(text(&terminal, -1), "one");
        assert_eq!(text(&terminal, 0), "two");
        assert_eq!(text(&terminal, 2), "four");
    }

    #[test]
    fn test_resize_keeps_cursor_visible() {
        let mut terminal = Terminal::new(10, 5);
        terminal.process(b"a\r\nb\r\nc\r\nd\r\ne");
        terminal.resize(10, 3);
        assert_eq!(terminal.terminal_size(), (10, 3));
        assert_eq!(terminal.cursor_state().row, 2);
        assert_eq!(text(&terminal, 2), "e");
        assert_eq!(text(&terminal, -1), "b");
        assert!(terminal
            .drain_events()
            .contains(&TerminalEvent::Resized { cols: 10, rows: 3 }));
    }

    #[test]
    fn test_resize_clamps_geometry() {
        let mut terminal = term();
        terminal.resize(0, 10_000);
        assert_eq!(terminal.terminal_size(), (1, MAX_ROWS));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut terminal = term();
        terminal.process(b"\x1b[?25l\x1b[4h\x1b[5;10r\x1b[1mtext");
        terminal.process(b"\x1bc");
        assert!(terminal.modes().cursor_visible);
        assert!(!terminal.modes().insert);
        assert_eq!(terminal.margins(), &Margins::full(80, 24));
        assert_eq!(text(&terminal, 0), "");
        assert!(terminal.cursor_state().style.is_default());
    }

    #[test]
    fn test_soft_reset_keeps_screen() {
        let mut terminal = term();
        terminal.process(b"keep\x1b[?25l\x1b[1m\x1b[!p");
        assert_eq!(text(&terminal, 0), "keep");
        assert!(terminal.modes().cursor_visible);
        assert!(terminal.cursor_state().style.is_default());
    }

    #[test]
    fn test_smooth_scroll_defers_until_tick() {
        let mut terminal = Terminal::new(10, 2);
        terminal.process(b"\x1b[?4hone\r\ntwo\r\nthree");
        assert!(terminal.has_pending_scroll());
        assert_eq!(text(&terminal, 1), "two");
        assert!(terminal.pending_input() > 0);

        terminal.tick(Instant::now() + Duration::from_millis(50));
        assert!(!terminal.has_pending_scroll());
        assert_eq!(text(&terminal, 0), "two");
        assert_eq!(text(&terminal, 1), "three");
    }

    #[test]
    fn test_smooth_scroll_autowrap_lands_on_new_row() {
        let mut terminal = Terminal::new(5, 2);
        terminal.process(b"\x1b[?4h\x1b[2;1HabcdeF");
        terminal.tick(Instant::now() + Duration::from_millis(50));
        assert!(!terminal.has_pending_scroll());
        assert_eq!(text(&terminal, 0), "abcde");
        assert_eq!(text(&terminal, 1), "F");
    }

    #[test]
    fn test_blink_phase_toggles() {
        let mut terminal = term();
        let start = Instant::now();
        terminal.tick(start);
        assert!(terminal.blink_on());
        terminal.tick(start + BLINK_PERIOD);
        assert!(!terminal.blink_on());
        terminal.tick(start + BLINK_PERIOD + Duration::from_millis(10));
        assert!(!terminal.blink_on());
    }

    #[test]
    fn test_eight_bit_replies() {
        let mut terminal = term();
        terminal.process(b"\x1b G\x1b[6n");
        assert_eq!(terminal.take_output(), b"\x9b1;1R");
        terminal.process(b"\x1b F\x1b[6n");
        assert_eq!(terminal.take_output(), b"\x1b[1;1R");
    }

    #[test]
    fn test_snapshot_reflects_screen() {
        let mut terminal = Terminal::new(20, 3);
        terminal.process(b"\x1b]2;snap\x07abc");
        let snapshot = terminal.snapshot();
        assert_eq!(snapshot.title, "snap");
        assert_eq!(snapshot.to_text(), "abc\n");
        assert_eq!(snapshot.cursor.col, 3);
    }

    #[test]
    fn test_apply_config() {
        let mut terminal = term();
        let config = Config {
            columns: 100,
            rows: 30,
            encoding: Encoding::Latin1,
            ..Config::default()
        };
        terminal.apply_config(&config);
        assert_eq!(terminal.terminal_size(), (100, 30));
        assert_eq!(terminal.modes().encoding, Encoding::Latin1);
        terminal.process(&[0xE9]);
        assert_eq!(text(&terminal, 0), "é");
    }
}
