//! Local input: keys, typed text, paste and mouse reports

use tracing::debug;

use super::{Terminal, TerminalEvent};
use crate::core::{Encoding, MouseMode};
use crate::input::{encode_key, encode_mouse, encode_paste, encode_text, Key, KeyboardState, Modifiers};

/// Mouse button value of a report with no button held
const NO_BUTTON: u8 = 3;
/// Added to the button value for motion reports
const MOTION: u8 = 32;

impl Terminal {
    /// Encoding state derived from the current modes and preferences
    pub fn keyboard_state(&self) -> KeyboardState {
        KeyboardState {
            ansi: self.modes.ansi,
            cursor_keys_application: self.modes.cursor_keys_application,
            keypad_application: self.modes.keypad_application,
            linefeed_newline: self.modes.linefeed_newline,
            backarrow_sends_bs: self.modes.backarrow_sends_bs,
            xterm_keys: self.config.xterm_keys,
            old_fn_keys: self.config.old_fn_keys,
            alt_sends_escape: self.config.alt_sends_escape,
            utf8: self.modes.encoding == Encoding::Utf8,
        }
    }

    /// Handle a key press. Auto-repeated presses are dropped while DECARM
    /// is reset. A user defined key wins over the normal encoding.
    pub fn key_down(&mut self, key: Key, modifiers: Modifiers, repeat: bool) {
        if repeat && !self.modes.auto_repeat {
            return;
        }

        let udk_modifiers = if self.config.udk_with_shift {
            Modifiers::SHIFT
        } else {
            Modifiers::NONE
        };
        let defined = key
            .udk_number()
            .filter(|_| modifiers == udk_modifiers)
            .and_then(|number| self.udk.as_ref()?.get(&number).cloned());

        let bytes = match defined {
            Some(bytes) => bytes,
            None => encode_key(key, modifiers, &self.keyboard_state()),
        };
        if bytes.is_empty() {
            debug!("{key:?} with {modifiers:?} sends nothing");
            return;
        }
        self.buffer_mut().clear_selection();
        self.send_input(&bytes);
    }

    /// Send typed text in the session encoding
    pub fn send_text(&mut self, text: &str) {
        let bytes = encode_text(text, self.modes.encoding == Encoding::Utf8);
        self.buffer_mut().clear_selection();
        self.send_input(&bytes);
    }

    /// Send clipboard contents, filtered and bracketed per the current modes
    pub fn paste(&mut self, text: &str) {
        let disallowed = self.config.disallowed_paste_bytes();
        let encoded = encode_text(text, self.modes.encoding == Encoding::Utf8);
        let bytes = encode_paste(&encoded, self.modes.bracketed_paste, &disallowed);
        self.buffer_mut().clear_selection();
        self.send_input(&bytes);
    }

    /// Report a mouse event at a 0-based cell. `button` is 0-2 for a
    /// press, 3 for a release, and 32 plus the held button for motion.
    pub fn mouse_report(&mut self, button: u8, row: usize, col: usize, modifiers: Modifiers) {
        let motion = button >= MOTION;
        let wanted = match self.modes.mouse {
            MouseMode::None => false,
            MouseMode::X10 => button < NO_BUTTON,
            MouseMode::Normal | MouseMode::Highlight => !motion,
            MouseMode::ButtonEvent => !motion || button - MOTION < NO_BUTTON,
            MouseMode::AnyEvent => true,
        };
        if !wanted {
            return;
        }
        if motion && self.last_mouse == Some((row, col)) {
            return;
        }
        self.last_mouse = Some((row, col));

        let modifiers = if self.modes.mouse == MouseMode::X10 {
            Modifiers::NONE
        } else {
            modifiers
        };
        let report = encode_mouse(button, row, col, modifiers);
        self.send_input(&report);
    }

    /// Queue local input for the host. A locked keyboard (KAM) rings the
    /// bell instead; with SRM reset the input is echoed locally too.
    fn send_input(&mut self, bytes: &[u8]) {
        if self.modes.keyboard_action {
            self.events.push(TerminalEvent::Bell);
            return;
        }
        self.output.extend_from_slice(bytes);
        if !self.modes.send_receive {
            self.on_bytes(bytes);
            self.pump();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{term, text};
    use super::super::{Terminal, TerminalEvent};
    use crate::config::Config;
    use crate::core::Point;
    use crate::input::{Key, Modifiers};

    #[test]
    fn test_cursor_keys_follow_mode() {
        let mut terminal = term();
        terminal.key_down(Key::Up, Modifiers::NONE, false);
        assert_eq!(terminal.take_output(), b"\x1b[A");
        terminal.process(b"\x1b[?1h");
        terminal.key_down(Key::Up, Modifiers::NONE, false);
        assert_eq!(terminal.take_output(), b"\x1bOA");
    }

    #[test]
    fn test_vt52_keys() {
        let mut terminal = term();
        terminal.process(b"\x1b[?2l");
        terminal.key_down(Key::Left, Modifiers::NONE, false);
        assert_eq!(terminal.take_output(), b"\x1bD");
    }

    #[test]
    fn test_auto_repeat_mode() {
        let mut terminal = term();
        terminal.process(b"\x1b[?8l");
        terminal.key_down(Key::Down, Modifiers::NONE, true);
        assert!(terminal.take_output().is_empty());
        terminal.key_down(Key::Down, Modifiers::NONE, false);
        assert_eq!(terminal.take_output(), b"\x1b[B");
    }

    #[test]
    fn test_user_defined_key_overrides() {
        let mut terminal = term();
        terminal.process(b"\x1bP1;1|17/6c730d\x1b\\");
        terminal.key_down(Key::Function(6), Modifiers::NONE, false);
        assert_eq!(terminal.take_output(), b"ls\r");
        terminal.key_down(Key::Function(6), Modifiers::SHIFT, false);
        assert_ne!(terminal.take_output(), b"ls\r");
    }

    #[test]
    fn test_user_defined_key_with_shift() {
        let mut terminal = Terminal::with_config(&Config {
            udk_with_shift: true,
            ..Config::default()
        });
        terminal.process(b"\x1bP1;1|17/41\x1b\\");
        terminal.key_down(Key::Function(6), Modifiers::SHIFT, false);
        assert_eq!(terminal.take_output(), b"A");
    }

    #[test]
    fn test_keyboard_locked_rings_bell() {
        let mut terminal = term();
        terminal.process(b"\x1b[2h");
        terminal.send_text("x");
        assert!(terminal.take_output().is_empty());
        assert_eq!(terminal.drain_events(), vec![TerminalEvent::Bell]);
    }

    #[test]
    fn test_local_echo() {
        let mut terminal = term();
        terminal.process(b"\x1b[12l");
        terminal.send_text("hi");
        assert_eq!(terminal.take_output(), b"hi");
        assert_eq!(text(&terminal, 0), "hi");
    }

    #[test]
    fn test_latin1_text() {
        let mut terminal = term();
        terminal.process(b"\x1b%@");
        terminal.send_text("é€");
        assert_eq!(terminal.take_output(), vec![0xE9, b'?']);
    }

    #[test]
    fn test_paste_filters_and_brackets() {
        let mut terminal = term();
        terminal.paste("a\x1bb\x08c");
        assert_eq!(terminal.take_output(), b"\x1b[200~a b c\x1b[201~");
        terminal.process(b"\x1b[?2004l");
        terminal.paste("plain\r");
        assert_eq!(terminal.take_output(), b"plain\r");
    }

    #[test]
    fn test_key_clears_selection() {
        let mut terminal = term();
        terminal.process(b"select me");
        terminal
            .buffer_mut()
            .set_selection(Point { line: 0, col: 0 }, Point { line: 0, col: 5 }, false);
        assert!(terminal.selection_range().is_some());
        terminal.key_down(Key::Char('a'), Modifiers::CTRL, false);
        assert_eq!(terminal.take_output(), b"\x01");
        assert!(terminal.selection_range().is_none());
    }

    #[test]
    fn test_mouse_reports_follow_mode() {
        let mut terminal = term();
        terminal.mouse_report(0, 1, 2, Modifiers::NONE);
        assert!(terminal.take_output().is_empty());

        terminal.process(b"\x1b[?1000h");
        terminal.mouse_report(0, 1, 2, Modifiers::CTRL);
        assert_eq!(terminal.take_output(), b"\x1b[M0#\"");
        terminal.mouse_report(32, 1, 3, Modifiers::NONE);
        assert!(terminal.take_output().is_empty());

        terminal.process(b"\x1b[?1002h");
        terminal.mouse_report(32, 1, 3, Modifiers::NONE);
        assert_eq!(terminal.take_output(), b"\x1b[M@$\"");
        terminal.mouse_report(32, 1, 3, Modifiers::NONE);
        assert!(terminal.take_output().is_empty());
    }

    #[test]
    fn test_x10_mouse_ignores_release() {
        let mut terminal = term();
        terminal.process(b"\x1b[?9h");
        terminal.mouse_report(3, 0, 0, Modifiers::NONE);
        assert!(terminal.take_output().is_empty());
        terminal.mouse_report(1, 0, 0, Modifiers::SHIFT);
        assert_eq!(terminal.take_output(), b"\x1b[M!!!");
    }
}
