//! Input Encoding Module
//!
//! The inverse direction of the parser: translates local key events into
//! the byte sequences a host expects from a VT-class terminal.
//!
//! # Keyboard Encoding
//!
//! Three families are selected by terminal state:
//! - VT52 (DECANM reset): two-byte `ESC x` mnemonics
//! - ANSI: CSI/SS3 sequences without modifier encoding
//! - xterm: adds a numeric modifier parameter and legacy F-key numbering
//!
//! Application keypad mode (DECNKM) remaps the numeric keypad in every
//! family. Backspace, Return, Tab and Ctrl+key folding are shared.
//!
//! # Mouse Encoding
//!
//! Mouse reports use the X10 encoding (`CSI M Cb Cx Cy`).

const ESC: u8 = 0x1b;
const CSI: &str = "\x1b[";
const SS3: &str = "\x1bO";

/// Largest 0-based coordinate an X10 mouse report can carry
const MOUSE_MAX_POSITION: usize = (b'~' - b'!') as usize;

/// Keyboard modifiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
    };
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
    };
    pub const CTRL: Modifiers = Modifiers {
        shift: false,
        ctrl: true,
        alt: false,
    };
    pub const ALT: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: true,
    };

    /// xterm modifier bits: Shift=1, Alt=2, Ctrl=4
    pub fn bits(&self) -> u8 {
        self.shift as u8 + 2 * self.alt as u8 + 4 * self.ctrl as u8
    }

    /// Get the modifier parameter for CSI sequences (1 + bitmask)
    pub fn as_csi_param(&self) -> u8 {
        1 + self.bits()
    }

    /// Check if any modifier is pressed
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt
    }
}

/// Numeric keypad keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeypadKey {
    /// Num Lock, PF1 on a VT keyboard
    NumLock,
    Divide,
    Multiply,
    Minus,
    Plus,
    Comma,
    Decimal,
    Enter,
    Digit(u8),
}

/// Keys that are not plain text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    // Cursor keys
    Up,
    Down,
    Left,
    Right,

    // Navigation
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,

    /// F1 through F20
    Function(u8),

    // Editing
    Backspace,
    Tab,
    Enter,
    Escape,

    Keypad(KeypadKey),

    /// A character key, relevant when combined with Ctrl or Alt
    Char(char),
}

impl Key {
    /// DECUDK key number for F1-F20
    pub fn udk_number(self) -> Option<u32> {
        let Key::Function(n) = self else {
            return None;
        };
        function_code(n)
    }
}

/// VT220 function key codes, also used by DECUDK
fn function_code(n: u8) -> Option<u32> {
    const CODES: [u32; 20] = [11, 12, 13, 14, 15, 17, 18, 19, 20, 21, 23, 24, 25, 26, 28, 29, 31, 32, 33, 34];
    CODES.get(usize::from(n).checked_sub(1)?).copied()
}

/// Terminal state that shapes key encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardState {
    /// DECANM: reset selects the VT52 family
    pub ansi: bool,
    /// DECCKM
    pub cursor_keys_application: bool,
    /// DECNKM
    pub keypad_application: bool,
    /// LNM: Return sends CR LF
    pub linefeed_newline: bool,
    /// DECBKM: Backspace sends BS instead of DEL
    pub backarrow_sends_bs: bool,
    pub xterm_keys: bool,
    pub old_fn_keys: bool,
    pub alt_sends_escape: bool,
    /// Encode 8-bit Alt characters as UTF-8
    pub utf8: bool,
}

impl Default for KeyboardState {
    fn default() -> Self {
        Self {
            ansi: true,
            cursor_keys_application: false,
            keypad_application: false,
            linefeed_newline: false,
            backarrow_sends_bs: false,
            xterm_keys: true,
            old_fn_keys: false,
            alt_sends_escape: true,
            utf8: true,
        }
    }
}

impl KeyboardState {
    fn newline(&self) -> Vec<u8> {
        if self.linefeed_newline {
            b"\r\n".to_vec()
        } else {
            b"\r".to_vec()
        }
    }

    fn cursor_prefix(&self) -> &'static str {
        if self.cursor_keys_application {
            SS3
        } else {
            CSI
        }
    }
}

/// Encode a key press; an empty result means the key sends nothing
pub fn encode_key(key: Key, modifiers: Modifiers, state: &KeyboardState) -> Vec<u8> {
    let text = if !state.ansi {
        encode_vt52(key, modifiers, state)
    } else if state.xterm_keys {
        encode_xterm(key, modifiers, state)
    } else {
        encode_ansi(key, modifiers, state)
    };

    if text.is_empty() && key == Key::Escape && !modifiers.any() {
        return vec![ESC];
    }
    text
}

/// Keys every family encodes the same way
fn encode_common(key: Key, modifiers: Modifiers, state: &KeyboardState) -> Vec<u8> {
    match key {
        Key::Backspace => {
            if state.backarrow_sends_bs {
                vec![0x08]
            } else {
                vec![0x7f]
            }
        },
        Key::Enter => state.newline(),
        Key::Tab => vec![0x09],
        Key::Escape => vec![ESC],
        Key::Char(c) if modifiers.ctrl => match c {
            '2' | ' ' => vec![0x00],
            '3' => vec![ESC],
            '4' => vec![0x1c],
            '5' => vec![0x1d],
            '6' => vec![0x1e],
            '7' => vec![0x1f],
            '8' => vec![0x7f],
            _ => {
                let c = c.to_ascii_uppercase();
                if ('@'..'`').contains(&c) {
                    vec![c as u8 - b'@']
                } else {
                    Vec::new()
                }
            },
        },
        Key::Char(c) => encode_text(c.encode_utf8(&mut [0u8; 4]), state.utf8),
        _ => Vec::new(),
    }
}

fn encode_vt52(key: Key, modifiers: Modifiers, state: &KeyboardState) -> Vec<u8> {
    let app = state.keypad_application;
    let text: Vec<u8> = match key {
        Key::Up => b"\x1bA".to_vec(),
        Key::Down => b"\x1bB".to_vec(),
        Key::Right => b"\x1bC".to_vec(),
        Key::Left => b"\x1bD".to_vec(),
        Key::Keypad(pad) => match pad {
            KeypadKey::NumLock => b"\x1bP".to_vec(),
            KeypadKey::Divide => b"\x1bQ".to_vec(),
            KeypadKey::Multiply => b"\x1bR".to_vec(),
            KeypadKey::Minus if modifiers.alt => pick(app, b"\x1b?m", b"-"),
            KeypadKey::Minus => b"\x1bS".to_vec(),
            KeypadKey::Enter if app => b"\x1b?M".to_vec(),
            KeypadKey::Enter => state.newline(),
            KeypadKey::Plus | KeypadKey::Comma => pick(app, b"\x1b?l", b","),
            KeypadKey::Decimal => pick(app, b"\x1b?n", b"."),
            KeypadKey::Digit(d) if app => vec![ESC, b'?', b'p' + d.min(9)],
            KeypadKey::Digit(d) => vec![b'0' + d.min(9)],
        },
        _ => Vec::new(),
    };
    if text.is_empty() {
        encode_common(key, modifiers, state)
    } else {
        text
    }
}

fn encode_ansi(key: Key, modifiers: Modifiers, state: &KeyboardState) -> Vec<u8> {
    let app = state.keypad_application;
    let cursor = state.cursor_prefix();
    let text: Vec<u8> = match key {
        Key::Up => format!("{cursor}A").into_bytes(),
        Key::Down => format!("{cursor}B").into_bytes(),
        Key::Right => format!("{cursor}C").into_bytes(),
        Key::Left => format!("{cursor}D").into_bytes(),
        Key::Home => b"\x1b[1~".to_vec(),
        Key::End => b"\x1b[4~".to_vec(),
        Key::Insert => b"\x1b[2~".to_vec(),
        Key::Delete => b"\x1b[3~".to_vec(),
        Key::PageUp => b"\x1b[5~".to_vec(),
        Key::PageDown => b"\x1b[6~".to_vec(),
        Key::Keypad(pad) => match pad {
            KeypadKey::NumLock => b"\x1bOP".to_vec(),
            KeypadKey::Divide => b"\x1bOQ".to_vec(),
            KeypadKey::Multiply => b"\x1bOR".to_vec(),
            KeypadKey::Minus if modifiers.alt => pick(app, b"\x1bOm", b"-"),
            KeypadKey::Minus => b"\x1bOS".to_vec(),
            KeypadKey::Enter if app => b"\x1bOM".to_vec(),
            KeypadKey::Enter => state.newline(),
            KeypadKey::Plus | KeypadKey::Comma => pick(app, b"\x1bOl", b","),
            KeypadKey::Decimal => pick(app, b"\x1bOn", b"."),
            KeypadKey::Digit(d) if app => vec![ESC, b'O', b'p' + d.min(9)],
            KeypadKey::Digit(d) => vec![b'0' + d.min(9)],
        },
        Key::Function(n) => {
            let suffix = if modifiers.shift { ";2~" } else { "~" };
            // Alt shifts F1-F12 up to the F11-F22 codes
            let n = if modifiers.alt && n <= 12 { n + 10 } else { n };
            match n {
                21 => format!("{CSI}35{suffix}").into_bytes(),
                22 => format!("{CSI}36{suffix}").into_bytes(),
                _ => function_code(n)
                    .map(|code| format!("{CSI}{code}{suffix}").into_bytes())
                    .unwrap_or_default(),
            }
        },
        _ => Vec::new(),
    };
    if text.is_empty() {
        encode_common(key, modifiers, state)
    } else {
        text
    }
}

/// xterm numbering used with `old_fn_keys`, Ctrl selecting the upper half
const OLD_FN_CODES: [u32; 24] = [
    11, 12, 13, 14, 15, 17, 18, 19, 20, 21, 23, 24, 23, 24, 25, 26, 28, 29, 31, 32, 33, 34, 42, 43,
];

fn encode_xterm(key: Key, modifiers: Modifiers, state: &KeyboardState) -> Vec<u8> {
    let bits = modifiers.bits();
    let param = modifiers.as_csi_param();
    // ";N" after a number, "1;N" before a final byte
    let (mod2, mod3) = if bits != 0 {
        (format!(";{param}"), format!("1;{param}"))
    } else {
        (String::new(), String::new())
    };
    let cursor = state.cursor_prefix();

    let mut text: Vec<u8> = match key {
        Key::Up => format!("{cursor}{mod3}A").into_bytes(),
        Key::Down => format!("{cursor}{mod3}B").into_bytes(),
        Key::Right => format!("{cursor}{mod3}C").into_bytes(),
        Key::Left => format!("{cursor}{mod3}D").into_bytes(),
        Key::Home => format!("{cursor}{mod3}H").into_bytes(),
        Key::End => format!("{cursor}{mod3}F").into_bytes(),
        Key::Insert => format!("{CSI}2{mod2}~").into_bytes(),
        Key::Delete => format!("{CSI}3{mod2}~").into_bytes(),
        Key::PageUp => format!("{CSI}5{mod2}~").into_bytes(),
        Key::PageDown => format!("{CSI}6{mod2}~").into_bytes(),
        Key::Function(n @ 1..=4) => {
            let last = [b'P', b'Q', b'R', b'S'][usize::from(n - 1)] as char;
            format!("{SS3}{mod3}{last}").into_bytes()
        },
        Key::Function(n) => function_code(n)
            .map(|code| format!("{CSI}{code}{mod2}~").into_bytes())
            .unwrap_or_default(),
        _ => Vec::new(),
    };

    if let Key::Function(n @ 1..=12) = key {
        if state.old_fn_keys {
            let index = usize::from(n - 1) + if modifiers.ctrl { 12 } else { 0 };
            let bits = modifiers.shift as u8 + 2 * modifiers.alt as u8;
            let suffix = if bits != 0 {
                format!(";{}", bits + 1)
            } else {
                String::new()
            };
            text = format!("{CSI}{}{suffix}~", OLD_FN_CODES[index]).into_bytes();
        }
    }

    if let Key::Keypad(pad) = key {
        text = if state.keypad_application {
            match pad {
                KeypadKey::Multiply => b"\x1bOj".to_vec(),
                KeypadKey::Plus => b"\x1bOk".to_vec(),
                KeypadKey::Comma => b"\x1bOl".to_vec(),
                KeypadKey::Minus => b"\x1bOm".to_vec(),
                KeypadKey::Decimal => b"\x1b[3~".to_vec(),
                KeypadKey::Divide => b"\x1bOo".to_vec(),
                KeypadKey::NumLock => b"\x1bOP".to_vec(),
                KeypadKey::Enter => b"\x1bOM".to_vec(),
                KeypadKey::Digit(d) => match d {
                    0 => b"\x1b[2~".to_vec(),
                    1 => b"\x1bOF".to_vec(),
                    2 => b"\x1b[B".to_vec(),
                    3 => b"\x1b[6~".to_vec(),
                    4 => b"\x1b[D".to_vec(),
                    5 => b"\x1b[E".to_vec(),
                    6 => b"\x1b[C".to_vec(),
                    7 => b"\x1bOH".to_vec(),
                    8 => b"\x1b[A".to_vec(),
                    _ => b"\x1b[5~".to_vec(),
                },
            }
        } else {
            match pad {
                KeypadKey::Multiply => b"*".to_vec(),
                KeypadKey::Minus => b"-".to_vec(),
                KeypadKey::Divide => b"/".to_vec(),
                KeypadKey::Plus => b"+".to_vec(),
                KeypadKey::Comma => b",".to_vec(),
                KeypadKey::Decimal => b".".to_vec(),
                KeypadKey::NumLock => b"\x1bOP".to_vec(),
                KeypadKey::Enter => state.newline(),
                KeypadKey::Digit(d) => vec![b'0' + d.min(9)],
            }
        };
    }

    if text.is_empty() && modifiers.alt && !modifiers.ctrl {
        if let Key::Char(c) = key {
            if c.is_ascii_graphic() || c == ' ' {
                text = if state.alt_sends_escape {
                    vec![ESC, c as u8]
                } else {
                    let high = char::from(c as u8 | 0x80);
                    encode_text(high.encode_utf8(&mut [0u8; 4]), state.utf8)
                };
            }
        }
    }

    if text.is_empty() {
        encode_common(key, modifiers, state)
    } else {
        text
    }
}

fn pick(application: bool, app: &[u8], normal: &[u8]) -> Vec<u8> {
    if application {
        app.to_vec()
    } else {
        normal.to_vec()
    }
}

/// Encode typed text in the session encoding; characters Latin-1 cannot
/// represent become '?'
pub fn encode_text(text: &str, utf8: bool) -> Vec<u8> {
    if utf8 {
        return text.as_bytes().to_vec();
    }
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

/// Encode pasted text: disallowed control bytes become spaces and the
/// result is wrapped in CSI 200~ / CSI 201~ when bracketed paste is on
pub fn encode_paste(text: &[u8], bracketed: bool, disallowed: &[u8]) -> Vec<u8> {
    let cleaned = text.iter().map(|&b| if disallowed.contains(&b) { b' ' } else { b });
    if bracketed {
        let mut result = encode_bracketed_paste(true);
        result.extend(cleaned);
        result.extend(encode_bracketed_paste(false));
        result
    } else {
        cleaned.collect()
    }
}

/// Encode bracketed paste start/end
pub fn encode_bracketed_paste(start: bool) -> Vec<u8> {
    if start {
        b"\x1b[200~".to_vec()
    } else {
        b"\x1b[201~".to_vec()
    }
}

/// Encode an X10 mouse report; `button` is 0-2 for presses, 3 for release
/// and 32 and up for motion
pub fn encode_mouse(button: u8, row: usize, col: usize, modifiers: Modifiers) -> Vec<u8> {
    let mut cb = 32u8.wrapping_add(button);
    if modifiers.shift {
        cb |= 4;
    }
    if modifiers.alt {
        cb |= 8;
    }
    if modifiers.ctrl {
        cb |= 16;
    }
    let cx = b'!' + col.min(MOUSE_MAX_POSITION) as u8;
    let cy = b'!' + row.min(MOUSE_MAX_POSITION) as u8;
    vec![ESC, b'[', b'M', cb, cx, cy]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ansi() -> KeyboardState {
        KeyboardState {
            xterm_keys: false,
            ..KeyboardState::default()
        }
    }

    fn vt52() -> KeyboardState {
        KeyboardState {
            ansi: false,
            ..KeyboardState::default()
        }
    }

    #[test]
    fn test_cursor_keys_normal() {
        let state = KeyboardState::default();
        assert_eq!(encode_key(Key::Up, Modifiers::NONE, &state), b"\x1b[A");
        assert_eq!(encode_key(Key::Down, Modifiers::NONE, &state), b"\x1b[B");
        assert_eq!(encode_key(Key::Right, Modifiers::NONE, &state), b"\x1b[C");
        assert_eq!(encode_key(Key::Left, Modifiers::NONE, &state), b"\x1b[D");
    }

    #[test]
    fn test_cursor_keys_application() {
        let state = KeyboardState {
            cursor_keys_application: true,
            ..KeyboardState::default()
        };
        assert_eq!(encode_key(Key::Up, Modifiers::NONE, &state), b"\x1bOA");
        assert_eq!(encode_key(Key::Home, Modifiers::NONE, &state), b"\x1bOH");
    }

    #[test]
    fn test_cursor_keys_with_modifiers() {
        let state = KeyboardState::default();
        assert_eq!(encode_key(Key::Up, Modifiers::SHIFT, &state), b"\x1b[1;2A");
        assert_eq!(encode_key(Key::Up, Modifiers::CTRL, &state), b"\x1b[1;5A");
        let mods = Modifiers {
            shift: true,
            ctrl: true,
            alt: false,
        };
        assert_eq!(encode_key(Key::Up, mods, &state), b"\x1b[1;6A");
        assert_eq!(encode_key(Key::Delete, Modifiers::ALT, &state), b"\x1b[3;3~");
    }

    #[test]
    fn test_xterm_function_keys() {
        let state = KeyboardState::default();
        assert_eq!(encode_key(Key::Function(1), Modifiers::NONE, &state), b"\x1bOP");
        assert_eq!(encode_key(Key::Function(2), Modifiers::SHIFT, &state), b"\x1bO1;2Q");
        assert_eq!(encode_key(Key::Function(5), Modifiers::NONE, &state), b"\x1b[15~");
        assert_eq!(encode_key(Key::Function(12), Modifiers::CTRL, &state), b"\x1b[24;5~");
        assert_eq!(encode_key(Key::Function(20), Modifiers::NONE, &state), b"\x1b[34~");
    }

    #[test]
    fn test_xterm_old_function_keys() {
        let state = KeyboardState {
            old_fn_keys: true,
            ..KeyboardState::default()
        };
        assert_eq!(encode_key(Key::Function(1), Modifiers::NONE, &state), b"\x1b[11~");
        assert_eq!(encode_key(Key::Function(1), Modifiers::CTRL, &state), b"\x1b[23~");
        assert_eq!(encode_key(Key::Function(12), Modifiers::CTRL, &state), b"\x1b[43~");
        assert_eq!(encode_key(Key::Function(3), Modifiers::SHIFT, &state), b"\x1b[13;2~");
    }

    #[test]
    fn test_ansi_keys() {
        let state = ansi();
        assert_eq!(encode_key(Key::Home, Modifiers::NONE, &state), b"\x1b[1~");
        assert_eq!(encode_key(Key::End, Modifiers::NONE, &state), b"\x1b[4~");
        assert_eq!(encode_key(Key::Up, Modifiers::SHIFT, &state), b"\x1b[A");
        assert_eq!(encode_key(Key::Function(1), Modifiers::NONE, &state), b"\x1b[11~");
        assert_eq!(encode_key(Key::Function(6), Modifiers::SHIFT, &state), b"\x1b[17;2~");
        assert_eq!(encode_key(Key::Function(1), Modifiers::ALT, &state), b"\x1b[23~");
        assert_eq!(encode_key(Key::Function(12), Modifiers::ALT, &state), b"\x1b[36~");
    }

    #[test]
    fn test_keypad_modes() {
        let numeric = ansi();
        let application = KeyboardState {
            keypad_application: true,
            ..ansi()
        };
        let five = Key::Keypad(KeypadKey::Digit(5));
        assert_eq!(encode_key(five, Modifiers::NONE, &numeric), b"5");
        assert_eq!(encode_key(five, Modifiers::NONE, &application), b"\x1bOu");
        let enter = Key::Keypad(KeypadKey::Enter);
        assert_eq!(encode_key(enter, Modifiers::NONE, &application), b"\x1bOM");
        assert_eq!(encode_key(Key::Keypad(KeypadKey::Minus), Modifiers::NONE, &numeric), b"\x1bOS");

        let xterm = KeyboardState {
            keypad_application: true,
            ..KeyboardState::default()
        };
        assert_eq!(encode_key(Key::Keypad(KeypadKey::Digit(8)), Modifiers::NONE, &xterm), b"\x1b[A");
        assert_eq!(encode_key(Key::Keypad(KeypadKey::Plus), Modifiers::NONE, &xterm), b"\x1bOk");
    }

    #[test]
    fn test_vt52_keys() {
        let state = vt52();
        assert_eq!(encode_key(Key::Up, Modifiers::NONE, &state), b"\x1bA");
        assert_eq!(encode_key(Key::Keypad(KeypadKey::NumLock), Modifiers::NONE, &state), b"\x1bP");
        let app = KeyboardState {
            keypad_application: true,
            ..vt52()
        };
        assert_eq!(encode_key(Key::Keypad(KeypadKey::Digit(0)), Modifiers::NONE, &app), b"\x1b?p");
        assert_eq!(encode_key(Key::Backspace, Modifiers::NONE, &state), b"\x7f");
    }

    #[test]
    fn test_editing_keys() {
        let state = KeyboardState::default();
        assert_eq!(encode_key(Key::Backspace, Modifiers::NONE, &state), b"\x7f");
        assert_eq!(encode_key(Key::Tab, Modifiers::NONE, &state), b"\x09");
        assert_eq!(encode_key(Key::Enter, Modifiers::NONE, &state), b"\x0d");
        assert_eq!(encode_key(Key::Escape, Modifiers::NONE, &state), b"\x1b");

        let state = KeyboardState {
            linefeed_newline: true,
            backarrow_sends_bs: true,
            ..KeyboardState::default()
        };
        assert_eq!(encode_key(Key::Enter, Modifiers::NONE, &state), b"\r\n");
        assert_eq!(encode_key(Key::Backspace, Modifiers::NONE, &state), b"\x08");
    }

    #[test]
    fn test_control_folding() {
        let state = KeyboardState::default();
        assert_eq!(encode_key(Key::Char('c'), Modifiers::CTRL, &state), vec![0x03]);
        assert_eq!(encode_key(Key::Char('['), Modifiers::CTRL, &state), vec![0x1b]);
        assert_eq!(encode_key(Key::Char('2'), Modifiers::CTRL, &state), vec![0x00]);
        assert_eq!(encode_key(Key::Char('8'), Modifiers::CTRL, &state), vec![0x7f]);
        assert!(encode_key(Key::Char('é'), Modifiers::CTRL, &state).is_empty());
    }

    #[test]
    fn test_alt_characters() {
        let state = KeyboardState::default();
        assert_eq!(encode_key(Key::Char('x'), Modifiers::ALT, &state), b"\x1bx");

        let state = KeyboardState {
            alt_sends_escape: false,
            ..KeyboardState::default()
        };
        assert_eq!(encode_key(Key::Char('a'), Modifiers::ALT, &state), "á".as_bytes());
        let latin1 = KeyboardState { utf8: false, ..state };
        assert_eq!(encode_key(Key::Char('a'), Modifiers::ALT, &latin1), vec![0xE1]);
    }

    #[test]
    fn test_udk_numbers() {
        assert_eq!(Key::Function(1).udk_number(), Some(11));
        assert_eq!(Key::Function(6).udk_number(), Some(17));
        assert_eq!(Key::Function(15).udk_number(), Some(28));
        assert_eq!(Key::Function(20).udk_number(), Some(34));
        assert_eq!(Key::Function(21).udk_number(), None);
        assert_eq!(Key::Up.udk_number(), None);
    }

    #[test]
    fn test_encode_text() {
        assert_eq!(encode_text("héllo", true), "héllo".as_bytes());
        assert_eq!(encode_text("héllo", false), vec![b'h', 0xE9, b'l', b'l', b'o']);
        assert_eq!(encode_text("日", false), b"?");
    }

    #[test]
    fn test_paste_filtering() {
        let disallowed = [0x08, 0x1b, 0x7f];
        assert_eq!(encode_paste(b"a\x1bb\x7f", false, &disallowed), b"a b ");
        assert_eq!(encode_paste(b"ls\n", true, &disallowed), b"\x1b[200~ls\n\x1b[201~");
    }

    #[test]
    fn test_mouse_x10_encoding() {
        assert_eq!(encode_mouse(0, 0, 0, Modifiers::NONE), b"\x1b[M !!");
        assert_eq!(encode_mouse(2, 4, 9, Modifiers::CTRL), vec![0x1b, b'[', b'M', 32 + 2 + 16, b'!' + 9, b'!' + 4]);
        assert_eq!(encode_mouse(0, 500, 500, Modifiers::NONE), b"\x1b[M ~~");
    }
}
