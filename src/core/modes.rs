//! Terminal mode flags
//!
//! The ANSI and DEC private modes that are plain switches. Modes whose
//! change moves the cursor or touches the screen (DECCOLM, DECOM, DECAWM,
//! the alternate screen family) are handled by the terminal, which keeps
//! their state where it belongs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Mouse reporting mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MouseMode {
    #[default]
    None,
    /// Mode 9: press only
    X10,
    /// Mode 1000: press and release
    Normal,
    /// Mode 1001
    Highlight,
    /// Mode 1002: motion while a button is held
    ButtonEvent,
    /// Mode 1003: all motion
    AnyEvent,
}

impl MouseMode {
    fn from_mode(id: u32) -> Option<Self> {
        match id {
            9 => Some(MouseMode::X10),
            1000 => Some(MouseMode::Normal),
            1001 => Some(MouseMode::Highlight),
            1002 => Some(MouseMode::ButtonEvent),
            1003 => Some(MouseMode::AnyEvent),
            _ => None,
        }
    }
}

/// Byte encoding of printable input above 0x7F
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Encoding {
    #[default]
    Utf8,
    Latin1,
}

/// Named mode switches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modes {
    /// KAM (2): keyboard locked
    pub keyboard_action: bool,
    /// IRM (4): insert instead of replace
    pub insert: bool,
    /// SRM (12): when reset, sent text is echoed locally
    pub send_receive: bool,
    /// LNM (20): LF implies CR, Return sends CR LF
    pub linefeed_newline: bool,

    /// DECCKM (1)
    pub cursor_keys_application: bool,
    /// DECANM (2): reset selects VT52 mode
    pub ansi: bool,
    /// DECSCLM (4)
    pub smooth_scroll: bool,
    /// DECSCNM (5)
    pub reverse_screen: bool,
    /// DECARM (8)
    pub auto_repeat: bool,
    /// DECPFF (18)
    pub print_form_feed: bool,
    /// DECPEX (19)
    pub print_extent: bool,
    /// DECTCEM (25)
    pub cursor_visible: bool,
    /// DECNRCM (42)
    pub national_replacement: bool,
    /// DECNKM (66) and DECKPAM/DECKPNM
    pub keypad_application: bool,
    /// DECBKM (67): Backspace sends BS instead of DEL
    pub backarrow_sends_bs: bool,
    /// DECLRMM (69)
    pub left_right_margins: bool,
    /// 2004
    pub bracketed_paste: bool,
    pub mouse: MouseMode,

    /// DECSCL level, 1 (VT100) to 5
    pub conformance_level: u8,
    /// S8C1T: replies use 8-bit C1 controls
    pub c1_8bit: bool,
    pub encoding: Encoding,
    /// DECSACE: rectangle extent for DECCARA/DECRARA instead of stream
    pub rectangle_extent: bool,

    /// Values saved by XTSAVE (CSI ? s)
    saved: HashMap<u32, bool>,
}

impl Default for Modes {
    fn default() -> Self {
        Self {
            keyboard_action: false,
            insert: false,
            send_receive: true,
            linefeed_newline: false,
            cursor_keys_application: false,
            ansi: true,
            smooth_scroll: false,
            reverse_screen: false,
            auto_repeat: true,
            print_form_feed: false,
            print_extent: false,
            cursor_visible: true,
            national_replacement: false,
            keypad_application: false,
            backarrow_sends_bs: false,
            left_right_margins: false,
            bracketed_paste: false,
            mouse: MouseMode::None,
            conformance_level: 4,
            c1_8bit: false,
            encoding: Encoding::Utf8,
            rectangle_extent: false,
            saved: HashMap::new(),
        }
    }
}

impl Modes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Power-on values, keeping the configured encoding and paste mode
    pub fn reset(&mut self) {
        let encoding = self.encoding;
        let bracketed_paste = self.bracketed_paste;
        *self = Self {
            encoding,
            bracketed_paste,
            ..Self::default()
        };
    }

    /// Read a plain switch; `None` for modes this struct does not own
    pub fn get(&self, id: u32, ansi: bool) -> Option<bool> {
        if ansi {
            return match id {
                2 => Some(self.keyboard_action),
                4 => Some(self.insert),
                12 => Some(self.send_receive),
                20 => Some(self.linefeed_newline),
                _ => None,
            };
        }
        match id {
            1 => Some(self.cursor_keys_application),
            2 => Some(self.ansi),
            4 => Some(self.smooth_scroll),
            5 => Some(self.reverse_screen),
            8 => Some(self.auto_repeat),
            18 => Some(self.print_form_feed),
            19 => Some(self.print_extent),
            25 => Some(self.cursor_visible),
            42 => Some(self.national_replacement),
            66 => Some(self.keypad_application),
            67 => Some(self.backarrow_sends_bs),
            69 => Some(self.left_right_margins),
            2004 => Some(self.bracketed_paste),
            _ => MouseMode::from_mode(id).map(|mode| self.mouse == mode),
        }
    }

    /// Write a plain switch; returns false for modes this struct does not own
    pub fn set(&mut self, id: u32, ansi: bool, value: bool) -> bool {
        let flag = if ansi {
            match id {
                2 => &mut self.keyboard_action,
                4 => &mut self.insert,
                12 => &mut self.send_receive,
                20 => &mut self.linefeed_newline,
                _ => return false,
            }
        } else {
            match id {
                1 => &mut self.cursor_keys_application,
                2 => &mut self.ansi,
                4 => &mut self.smooth_scroll,
                5 => &mut self.reverse_screen,
                8 => &mut self.auto_repeat,
                18 => &mut self.print_form_feed,
                19 => &mut self.print_extent,
                25 => &mut self.cursor_visible,
                42 => &mut self.national_replacement,
                66 => &mut self.keypad_application,
                67 => &mut self.backarrow_sends_bs,
                69 => &mut self.left_right_margins,
                2004 => &mut self.bracketed_paste,
                _ => {
                    let Some(mode) = MouseMode::from_mode(id) else {
                        return false;
                    };
                    if value {
                        self.mouse = mode;
                    } else if self.mouse == mode {
                        self.mouse = MouseMode::None;
                    }
                    return true;
                },
            }
        };
        *flag = value;
        true
    }

    /// Remember a DEC private mode value for a later restore
    pub fn save(&mut self, id: u32, value: bool) {
        self.saved.insert(id, value);
    }

    pub fn saved(&self, id: u32) -> Option<bool> {
        self.saved.get(&id).copied()
    }

    /// Whether 8-bit C1 controls are in effect for replies
    pub fn eight_bit_controls(&self) -> bool {
        self.c1_8bit && self.conformance_level >= 2
    }
}
