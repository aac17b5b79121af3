//! Parser State Machine
//!
//! A resumable byte-at-a-time state machine in the style of the DEC ANSI
//! parser model (<https://vt100.net/emu/dec_ansi_parser>), extended with
//! the VT52 escape grammar, the multi-byte ESC introducers and the payload
//! grammars of device control strings.
//!
//! The parser owns exactly the bytes it has not finished interpreting.
//! Feeding input one byte at a time or in any chunking produces the same
//! actions. Anything that cannot continue a sequence drops it and returns
//! to `Ground`; nothing is ever reported as an error.

use tracing::trace;

use super::actions::{Action, CsiSequence, CsiTag, DcsCommand};

/// Parameters beyond this count are dropped
const MAX_PARAMS: usize = 32;
/// Longest OSC/APC payload kept
const MAX_STRING: usize = 1 << 20;
/// Longest DECRQSS request kept
const MAX_REQUEST: usize = 16;

const REPLACEMENT: char = '\u{FFFD}';

/// Terminal state the parser needs to classify a byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParserMode {
    /// DECANM reset: ESC introduces VT52 sequences
    pub vt52: bool,
    /// Recognise 8-bit C1 controls (0x80-0x9F)
    pub c1_controls: bool,
    /// Decode bytes above 0x7F as UTF-8 rather than Latin-1
    pub utf8: bool,
    /// DECNRCM: bytes 0xA0-0xFF go through the GR charset
    pub nrc: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StringKind {
    Osc,
    Dcs,
    Apc,
    /// PM and SOS: collected and thrown away
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Ground,
    Escape,
    Designate { slot: u8, size96: bool },
    SelectEncoding,
    LineAttribute,
    ControlTransmission,
    /// ESC with an unsupported intermediate: swallow up to the final byte
    EscapeIgnore,
    Vt52Line,
    Vt52Column { line: u8 },
    Csi,
    CsiIgnore,
    Osc,
    Dcs,
    Apc,
    IgnoreString,
    /// ESC seen inside a string; `\` terminates it
    StringEscape(StringKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DcsState {
    #[default]
    Start,
    /// After Pc, expecting `;` or `|`
    UdkClear,
    /// After `;`, expecting Pl or `|`
    UdkLock,
    /// After Pl, expecting `|`
    UdkBar,
    UdkKey,
    UdkValue,
    RequestDollar,
    RequestSettings,
    Ignore,
}

/// In-progress device control string
#[derive(Debug, Default)]
struct DcsPayload {
    state: DcsState,
    clear: bool,
    lock: bool,
    key: u32,
    value: Vec<u8>,
    high_nibble: Option<u8>,
    keys: Vec<(u32, Vec<u8>)>,
    request: Vec<u8>,
}

impl DcsPayload {
    fn put(&mut self, byte: u8) {
        use DcsState::*;
        self.state = match (self.state, byte) {
            (Start, b'0') => {
                self.clear = true;
                self.lock = true;
                UdkClear
            },
            (Start, b'1') => {
                self.lock = true;
                UdkClear
            },
            (Start, b';') => {
                self.clear = true;
                self.lock = true;
                UdkLock
            },
            (Start, b'|') => {
                self.clear = true;
                self.lock = true;
                UdkKey
            },
            (Start, b'$') => RequestDollar,
            (UdkClear, b';') => UdkLock,
            (UdkClear, b'|') | (UdkLock, b'|') => UdkKey,
            (UdkLock, b'0') => UdkBar,
            (UdkLock, b'1') => {
                self.lock = false;
                UdkBar
            },
            (UdkBar, b'|') => UdkKey,
            (UdkKey, b'0'..=b'9') => {
                self.key = self.key.saturating_mul(10).saturating_add((byte - b'0') as u32);
                UdkKey
            },
            (UdkKey, b'/') => {
                self.value.clear();
                self.high_nibble = None;
                UdkValue
            },
            (UdkKey, b';') => {
                self.key = 0;
                UdkKey
            },
            (UdkValue, b';') => {
                self.finish_key();
                UdkKey
            },
            (UdkValue, _) => match (byte as char).to_digit(16) {
                Some(nibble) => {
                    let nibble = nibble as u8;
                    match self.high_nibble.take() {
                        Some(high) => self.value.push(high << 4 | nibble),
                        None => self.high_nibble = Some(nibble),
                    }
                    UdkValue
                },
                None => Ignore,
            },
            (RequestDollar, b'q') => RequestSettings,
            (RequestSettings, _) => {
                if self.request.len() < MAX_REQUEST {
                    self.request.push(byte);
                }
                RequestSettings
            },
            _ => Ignore,
        };
    }

    fn finish_key(&mut self) {
        self.keys.push((self.key, std::mem::take(&mut self.value)));
        self.key = 0;
        self.high_nibble = None;
    }

    /// The command to apply at ST, if the string was well formed
    fn finish(mut self) -> Option<DcsCommand> {
        match self.state {
            DcsState::UdkKey | DcsState::UdkValue | DcsState::UdkBar | DcsState::UdkLock | DcsState::UdkClear => {
                if self.state == DcsState::UdkValue {
                    self.finish_key();
                }
                Some(DcsCommand::UserDefinedKeys {
                    clear: self.clear,
                    lock: self.lock,
                    keys: self.keys,
                })
            },
            DcsState::RequestSettings => Some(DcsCommand::RequestSettings(self.request)),
            _ => None,
        }
    }
}

/// The terminal parser
#[derive(Debug)]
pub struct Parser {
    state: State,
    params: Vec<u32>,
    current_param: u32,
    param_has_digit: bool,
    tag: u32,
    /// OSC/APC number and payload
    string_number: u32,
    string_in_payload: bool,
    string: Vec<u8>,
    dcs: DcsPayload,
    utf8_buffer: [u8; 4],
    utf8_len: usize,
    utf8_needed: usize,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Create a new parser in the ground state
    pub fn new() -> Self {
        Self {
            state: State::Ground,
            params: Vec::with_capacity(16),
            current_param: 0,
            param_has_digit: false,
            tag: 0,
            string_number: 0,
            string_in_payload: false,
            string: Vec::with_capacity(256),
            dcs: DcsPayload::default(),
            utf8_buffer: [0; 4],
            utf8_len: 0,
            utf8_needed: 0,
        }
    }

    /// Drop any partial sequence and return to ground
    pub fn reset(&mut self) {
        self.state = State::Ground;
        self.clear_params();
        self.string.clear();
        self.dcs = DcsPayload::default();
        self.utf8_len = 0;
        self.utf8_needed = 0;
    }

    pub fn is_ground(&self) -> bool {
        self.state == State::Ground && self.utf8_needed == 0
    }

    fn clear_params(&mut self) {
        self.params.clear();
        self.current_param = 0;
        self.param_has_digit = false;
        self.tag = 0;
    }

    /// Process a chunk of bytes with a fixed mode, returning actions
    pub fn parse(&mut self, data: &[u8], mode: ParserMode) -> Vec<Action> {
        let mut actions = Vec::new();
        for &byte in data {
            self.advance(byte, mode, &mut actions);
        }
        actions
    }

    /// Feed one byte, appending any completed actions to `out`
    pub fn advance(&mut self, byte: u8, mode: ParserMode, out: &mut Vec<Action>) {
        if self.utf8_needed > 0 {
            if (0x80..=0xBF).contains(&byte) {
                self.utf8_continue(byte, out);
                return;
            }
            self.utf8_needed = 0;
            self.utf8_len = 0;
            out.push(Action::Print(REPLACEMENT));
        }

        match byte {
            0x18 | 0x1A => {
                self.cancel();
                out.push(Action::Execute(byte));
            },
            0x1B => self.escape(),
            0x00..=0x1F => self.control(byte, out),
            0x80..=0x9F if mode.c1_controls => self.c1(byte, out),
            _ => self.printable(byte, mode, out),
        }
    }

    fn cancel(&mut self) {
        self.state = State::Ground;
        self.string.clear();
        self.dcs = DcsPayload::default();
    }

    fn string_kind(&self) -> Option<StringKind> {
        match self.state {
            State::Osc => Some(StringKind::Osc),
            State::Dcs => Some(StringKind::Dcs),
            State::Apc => Some(StringKind::Apc),
            State::IgnoreString => Some(StringKind::Ignored),
            _ => None,
        }
    }

    fn escape(&mut self) {
        self.state = match self.string_kind() {
            Some(kind) => State::StringEscape(kind),
            None => {
                self.clear_params();
                State::Escape
            },
        };
    }

    fn control(&mut self, byte: u8, out: &mut Vec<Action>) {
        match self.state {
            State::Osc | State::Apc if byte == 0x07 => self.finish_string(out),
            State::Osc | State::Apc | State::Dcs | State::IgnoreString => {},
            State::StringEscape(_) => {
                self.abandon_string();
                self.state = State::Escape;
                out.push(Action::Execute(byte));
            },
            _ => out.push(Action::Execute(byte)),
        }
    }

    fn c1(&mut self, byte: u8, out: &mut Vec<Action>) {
        if self.string_kind().is_some() || matches!(self.state, State::StringEscape(_)) {
            if byte == 0x9C {
                self.finish_string(out);
                return;
            }
            self.abandon_string();
        }
        self.state = State::Ground;
        match byte {
            0x84 | 0x85 | 0x88 | 0x8D | 0x8E | 0x8F => out.push(Action::Execute(byte)),
            0x90 => self.begin_dcs(),
            0x9B => self.begin_csi(),
            0x9D => self.begin_string(State::Osc),
            0x9F => self.begin_string(State::Apc),
            0x98 | 0x9E => self.begin_string(State::IgnoreString),
            _ => trace!("ignoring C1 control {byte:#04x}"),
        }
    }

    fn printable(&mut self, byte: u8, mode: ParserMode, out: &mut Vec<Action>) {
        match self.state {
            State::Ground => self.ground(byte, mode, out),
            State::Escape => self.escape_final(byte, mode, out),
            State::Designate { slot, size96 } => match byte {
                0x20..=0x2F => self.state = State::EscapeIgnore,
                0x30..=0x7E => {
                    self.state = State::Ground;
                    out.push(Action::Designate {
                        slot,
                        size96,
                        designator: byte,
                    });
                },
                _ => self.state = State::Ground,
            },
            State::SelectEncoding | State::LineAttribute | State::ControlTransmission => {
                let state = std::mem::replace(&mut self.state, State::Ground);
                if (0x30..=0x7E).contains(&byte) {
                    out.push(match state {
                        State::SelectEncoding => Action::SelectEncoding(byte),
                        State::LineAttribute => Action::LineAttribute(byte),
                        _ => Action::ControlTransmission(byte),
                    });
                }
            },
            State::EscapeIgnore => {
                if !(0x20..=0x2F).contains(&byte) {
                    self.state = State::Ground;
                }
            },
            State::Vt52Line => {
                self.state = State::Vt52Column {
                    line: byte.saturating_sub(0x20),
                };
            },
            State::Vt52Column { line } => {
                self.state = State::Ground;
                out.push(Action::Vt52Position {
                    line,
                    column: byte.saturating_sub(0x20),
                });
            },
            State::Csi => self.csi(byte, out),
            State::CsiIgnore => {
                if (0x40..=0x7E).contains(&byte) {
                    self.state = State::Ground;
                }
            },
            State::Osc | State::Apc => self.string_put(byte),
            State::Dcs => self.dcs.put(byte),
            State::IgnoreString => {},
            State::StringEscape(_) => {
                if byte == b'\\' {
                    self.finish_string(out);
                } else {
                    self.abandon_string();
                    self.state = State::Escape;
                    self.escape_final(byte, mode, out);
                }
            },
        }
    }

    fn ground(&mut self, byte: u8, mode: ParserMode, out: &mut Vec<Action>) {
        match byte {
            0x20..=0x7E => out.push(Action::Print(byte as char)),
            0x7F => {},
            0xA0..=0xFF if mode.nrc => out.push(Action::PrintGr(byte)),
            _ if !mode.utf8 => out.push(Action::Print(byte as char)),
            0xC2..=0xDF => self.utf8_start(byte, 1),
            0xE0..=0xEF => self.utf8_start(byte, 2),
            0xF0..=0xF4 => self.utf8_start(byte, 3),
            _ => out.push(Action::Print(REPLACEMENT)),
        }
    }

    fn utf8_start(&mut self, byte: u8, needed: usize) {
        self.utf8_buffer[0] = byte;
        self.utf8_len = 1;
        self.utf8_needed = needed;
    }

    fn utf8_continue(&mut self, byte: u8, out: &mut Vec<Action>) {
        self.utf8_buffer[self.utf8_len] = byte;
        self.utf8_len += 1;
        self.utf8_needed -= 1;
        if self.utf8_needed == 0 {
            let ch = std::str::from_utf8(&self.utf8_buffer[..self.utf8_len])
                .ok()
                .and_then(|s| s.chars().next())
                .unwrap_or(REPLACEMENT);
            self.utf8_len = 0;
            out.push(Action::Print(ch));
        }
    }

    fn escape_final(&mut self, byte: u8, mode: ParserMode, out: &mut Vec<Action>) {
        if mode.vt52 {
            self.state = State::Ground;
            match byte {
                b'Y' => self.state = State::Vt52Line,
                0x20..=0x7E => out.push(Action::Vt52(byte)),
                _ => {},
            }
            return;
        }

        self.state = match byte {
            b' ' => State::ControlTransmission,
            b'#' => State::LineAttribute,
            b'%' => State::SelectEncoding,
            b'(' => State::Designate { slot: 0, size96: false },
            b')' => State::Designate { slot: 1, size96: false },
            b'*' => State::Designate { slot: 2, size96: false },
            b'+' => State::Designate { slot: 3, size96: false },
            b'-' => State::Designate { slot: 1, size96: true },
            b'.' => State::Designate { slot: 2, size96: true },
            b'/' => State::Designate { slot: 3, size96: true },
            0x21..=0x2F => State::EscapeIgnore,
            b'[' => {
                self.begin_csi();
                return;
            },
            b']' => {
                self.begin_string(State::Osc);
                return;
            },
            b'P' => {
                self.begin_dcs();
                return;
            },
            b'_' => {
                self.begin_string(State::Apc);
                return;
            },
            b'^' | b'X' => {
                self.begin_string(State::IgnoreString);
                return;
            },
            0x30..=0x7E => {
                out.push(Action::Esc(byte));
                State::Ground
            },
            _ => State::Ground,
        };
    }

    fn begin_csi(&mut self) {
        self.clear_params();
        self.state = State::Csi;
    }

    fn begin_dcs(&mut self) {
        self.dcs = DcsPayload::default();
        self.state = State::Dcs;
    }

    fn begin_string(&mut self, state: State) {
        self.string.clear();
        self.string_number = 0;
        self.string_in_payload = false;
        self.state = state;
    }

    fn push_param(&mut self) {
        if self.params.len() < MAX_PARAMS {
            self.params.push(self.current_param);
        }
        self.current_param = 0;
        self.param_has_digit = false;
    }

    fn csi(&mut self, byte: u8, out: &mut Vec<Action>) {
        match byte {
            b'0'..=b'9' => {
                self.current_param = self.current_param.saturating_mul(10).saturating_add((byte - b'0') as u32);
                self.param_has_digit = true;
            },
            b';' | b':' => self.push_param(),
            0x20..=0x3F => {
                if self.tag > 0x00FF_FFFF {
                    self.state = State::CsiIgnore;
                } else {
                    self.tag = (self.tag << 8) | byte as u32;
                }
            },
            0x40..=0x7E => {
                if self.param_has_digit || !self.params.is_empty() {
                    self.push_param();
                }
                self.state = State::Ground;
                let tag = CsiTag((self.tag << 8) | byte as u32);
                out.push(Action::Csi(CsiSequence {
                    params: std::mem::take(&mut self.params),
                    tag,
                }));
                self.clear_params();
            },
            _ => self.state = State::CsiIgnore,
        }
    }

    fn string_put(&mut self, byte: u8) {
        if !self.string_in_payload {
            if byte.is_ascii_digit() {
                self.string_number = self.string_number.saturating_mul(10).saturating_add((byte - b'0') as u32);
                return;
            }
            self.string_in_payload = true;
            if byte == b';' {
                return;
            }
        }
        if self.string.len() < MAX_STRING {
            self.string.push(byte);
        }
    }

    fn abandon_string(&mut self) {
        self.string.clear();
        self.dcs = DcsPayload::default();
        self.state = State::Ground;
    }

    fn finish_string(&mut self, out: &mut Vec<Action>) {
        let kind = match self.state {
            State::StringEscape(kind) => Some(kind),
            _ => self.string_kind(),
        };
        self.state = State::Ground;
        let payload = || String::from_utf8_lossy(&self.string).into_owned();
        match kind {
            Some(StringKind::Osc) => out.push(Action::Osc {
                number: self.string_number,
                payload: payload(),
            }),
            Some(StringKind::Apc) => out.push(Action::Apc {
                number: self.string_number,
                payload: payload(),
            }),
            Some(StringKind::Dcs) => {
                if let Some(command) = std::mem::take(&mut self.dcs).finish() {
                    out.push(Action::Dcs(command));
                }
            },
            Some(StringKind::Ignored) | None => {},
        }
        self.string.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UTF8: ParserMode = ParserMode {
        vt52: false,
        c1_controls: false,
        utf8: true,
        nrc: false,
    };

    fn parse(bytes: &[u8]) -> Vec<Action> {
        Parser::new().parse(bytes, UTF8)
    }

    fn csi(params: &[u32], tag: &[u8]) -> Action {
        Action::Csi(CsiSequence {
            params: params.to_vec(),
            tag: CsiTag::new(tag),
        })
    }

    #[test]
    fn test_print_ascii() {
        assert_eq!(parse(b"Hi"), vec![Action::Print('H'), Action::Print('i')]);
    }

    #[test]
    fn test_utf8_split_across_calls() {
        let mut parser = Parser::new();
        let bytes = "日".as_bytes();
        assert!(parser.parse(&bytes[..1], UTF8).is_empty());
        assert!(parser.parse(&bytes[1..2], UTF8).is_empty());
        assert_eq!(parser.parse(&bytes[2..], UTF8), vec![Action::Print('日')]);
    }

    #[test]
    fn test_utf8_invalid_continuation() {
        assert_eq!(parse(&[0xC3, b'A']), vec![Action::Print(REPLACEMENT), Action::Print('A')]);
    }

    #[test]
    fn test_latin1_bytes() {
        let mode = ParserMode { utf8: false, ..UTF8 };
        assert_eq!(Parser::new().parse(&[0xE9], mode), vec![Action::Print('é')]);
    }

    #[test]
    fn test_nrc_gr_bytes() {
        let mode = ParserMode { nrc: true, ..UTF8 };
        assert_eq!(Parser::new().parse(&[0xE9], mode), vec![Action::PrintGr(0xE9)]);
    }

    #[test]
    fn test_c0_controls() {
        assert_eq!(parse(b"\r\n\x07"), vec![Action::Execute(0x0D), Action::Execute(0x0A), Action::Execute(0x07)]);
    }

    #[test]
    fn test_csi_params() {
        assert_eq!(parse(b"\x1b[1;31m"), vec![csi(&[1, 31], b"m")]);
        assert_eq!(parse(b"\x1b[m"), vec![csi(&[], b"m")]);
        assert_eq!(parse(b"\x1b[;5H"), vec![csi(&[0, 5], b"H")]);
        assert_eq!(parse(b"\x1b[38:5:1m"), vec![csi(&[38, 5, 1], b"m")]);
    }

    #[test]
    fn test_csi_compound_tags() {
        assert_eq!(parse(b"\x1b[?25l"), vec![csi(&[25], b"?l")]);
        assert_eq!(parse(b"\x1b[?1$p"), vec![csi(&[1], b"?$p")]);
        assert_eq!(parse(b"\x1b[2 q"), vec![csi(&[2], b" q")]);
        assert_eq!(parse(b"\x1b[61;1\"p"), vec![csi(&[61, 1], b"\"p")]);
    }

    #[test]
    fn test_csi_param_cap() {
        let mut seq = b"\x1b[".to_vec();
        for _ in 0..40 {
            seq.extend_from_slice(b"1;");
        }
        seq.push(b'm');
        match &parse(&seq)[0] {
            Action::Csi(csi) => assert_eq!(csi.params.len(), MAX_PARAMS),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_control_inside_csi_executes() {
        assert_eq!(parse(b"\x1b[2\nA"), vec![Action::Execute(0x0A), csi(&[2], b"A")]);
    }

    #[test]
    fn test_cancel_aborts_sequence() {
        assert_eq!(parse(b"\x1b[2\x18A"), vec![Action::Execute(0x18), Action::Print('A')]);
    }

    #[test]
    fn test_esc_sequences() {
        assert_eq!(parse(b"\x1b7\x1bc"), vec![Action::Esc(b'7'), Action::Esc(b'c')]);
        assert_eq!(parse(b"\x1b(0"), vec![Action::Designate {
            slot: 0,
            size96: false,
            designator: b'0',
        }]);
        assert_eq!(parse(b"\x1b-A"), vec![Action::Designate {
            slot: 1,
            size96: true,
            designator: b'A',
        }]);
        assert_eq!(parse(b"\x1b#8"), vec![Action::LineAttribute(b'8')]);
        assert_eq!(parse(b"\x1b G"), vec![Action::ControlTransmission(b'G')]);
        assert_eq!(parse(b"\x1b%G"), vec![Action::SelectEncoding(b'G')]);
        assert_eq!(parse(b"\x1b!xA"), vec![Action::Print('A')]);
    }

    #[test]
    fn test_vt52_sequences() {
        let mode = ParserMode { vt52: true, ..UTF8 };
        let mut parser = Parser::new();
        assert_eq!(parser.parse(b"\x1bA\x1bY%*", mode), vec![Action::Vt52(b'A'), Action::Vt52Position {
            line: 5,
            column: 10
        }]);
    }

    #[test]
    fn test_osc_bel_and_st() {
        let expected = vec![Action::Osc {
            number: 2,
            payload: "title".to_string(),
        }];
        assert_eq!(parse(b"\x1b]2;title\x07"), expected);
        assert_eq!(parse(b"\x1b]2;title\x1b\\"), expected);
    }

    #[test]
    fn test_osc_with_utf8_payload() {
        assert_eq!(parse("\x1b]0;héllo\x07".as_bytes()), vec![Action::Osc {
            number: 0,
            payload: "héllo".to_string(),
        }]);
    }

    #[test]
    fn test_string_escape_abandons_on_other_byte() {
        assert_eq!(parse(b"\x1b]2;ti\x1b[1mX"), vec![csi(&[1], b"m"), Action::Print('X')]);
    }

    #[test]
    fn test_apc_st_terminates() {
        assert_eq!(parse(b"\x1b_7;cGF0aA==\x1b\\"), vec![Action::Apc {
            number: 7,
            payload: "cGF0aA==".to_string(),
        }]);
    }

    #[test]
    fn test_pm_ignored() {
        assert_eq!(parse(b"\x1b^secret\x1b\\A"), vec![Action::Print('A')]);
    }

    #[test]
    fn test_c1_controls_when_enabled() {
        let mode = ParserMode { c1_controls: true, utf8: false, ..UTF8 };
        let mut parser = Parser::new();
        assert_eq!(parser.parse(b"\x9b2J\x84", mode), vec![csi(&[2], b"J"), Action::Execute(0x84)]);
        assert_eq!(parser.parse(b"\x9d0;t\x9c", mode), vec![Action::Osc {
            number: 0,
            payload: "t".to_string(),
        }]);
    }

    #[test]
    fn test_udk_definition() {
        assert_eq!(parse(b"\x1bP0;1|17/414243;18/44\x1b\\"), vec![Action::Dcs(DcsCommand::UserDefinedKeys {
            clear: true,
            lock: false,
            keys: vec![(17, b"ABC".to_vec()), (18, b"D".to_vec())],
        })]);
    }

    #[test]
    fn test_udk_malformed_is_dropped() {
        assert!(parse(b"\x1bP0;1|17/4Z\x1b\\").is_empty());
    }

    #[test]
    fn test_udk_cancelled_is_dropped() {
        assert_eq!(parse(b"\x1bP0;1|17/41\x18"), vec![Action::Execute(0x18)]);
    }

    #[test]
    fn test_decrqss_request() {
        assert_eq!(parse(b"\x1bP$q\"p\x1b\\"), vec![Action::Dcs(DcsCommand::RequestSettings(b"\"p".to_vec()))]);
    }

    #[test]
    fn test_chunking_is_irrelevant() {
        let input = b"A\x1b[1;31mB\x1b]0;t\x07\xe6\x97\xa5\x1bP$qm\x1b\\C";
        let whole = parse(input);
        let mut parser = Parser::new();
        let mut split = Vec::new();
        for &byte in input.iter() {
            parser.advance(byte, UTF8, &mut split);
        }
        assert_eq!(whole, split);
        assert!(parser.is_ground());
    }
}
