//! C0/C1 controls and escape sequences

use tracing::debug;

use super::{Terminal, TerminalEvent};
use crate::core::{Attrs, Charset, Encoding, EraseMode, LineSize};

impl Terminal {
    /// Execute a C0 control or single-byte C1 control
    pub(super) fn execute(&mut self, byte: u8) {
        match byte {
            0x05 => {
                // ENQ - Answerback
                let answerback: Vec<u8> = self
                    .config
                    .answerback
                    .bytes()
                    .filter(|&b| b != b'\r' && b != b'\n')
                    .collect();
                self.send(&answerback);
            }
            0x07 => {
                // BEL - Bell
                self.events.push(TerminalEvent::Bell);
            }
            0x08 => {
                // BS - Backspace
                self.cursor_left(1);
            }
            0x09 => {
                // HT - Horizontal Tab
                self.tab(1);
            }
            0x0A..=0x0C => {
                // LF, VT, FF
                self.linefeed();
            }
            0x0D => {
                // CR - Carriage Return
                self.carriage_return();
            }
            0x0E => {
                // SO - Shift Out (G1 into GL)
                self.cursor.charsets.gl = 1;
            }
            0x0F => {
                // SI - Shift In (G0 into GL)
                self.cursor.charsets.gl = 0;
            }
            0x1A => {
                // SUB - shown as a reversed question mark
                self.write_char('¿');
            }
            0x84 => self.index(),
            0x85 => self.newline(),
            0x88 => self.set_tab_stop(),
            0x8D => self.reverse_index(),
            0x8E => self.cursor.charsets.single_shift = 2,
            0x8F => self.cursor.charsets.single_shift = 3,
            _ => {
                // Other controls are ignored
            }
        }
    }

    /// Dispatch `ESC final`
    pub(super) fn escape(&mut self, byte: u8) {
        match byte {
            b'<' => self.modes.ansi = true,
            b'=' => {
                // DECKPAM - Application Keypad
                self.modes.keypad_application = true;
            }
            b'>' => {
                // DECKPNM - Normal Keypad
                self.modes.keypad_application = false;
            }
            b'D' => self.index(),
            b'E' => self.newline(),
            b'H' => self.set_tab_stop(),
            b'M' => self.reverse_index(),
            b'N' => self.cursor.charsets.single_shift = 2,
            b'O' => self.cursor.charsets.single_shift = 3,
            b'7' => self.save_cursor(),
            b'8' => self.restore_cursor(),
            b'6' => self.back_index(),
            b'9' => self.forward_index(),
            b'Z' => {
                // DECID - same as DA1
                self.send(b"\x1b[?64;1;2;6;8;9c");
            }
            b'c' => {
                // RIS - Reset to Initial State
                self.reset();
            }
            b'n' => self.cursor.charsets.gl = 2,
            b'o' => self.cursor.charsets.gl = 3,
            b'~' => self.cursor.charsets.gr = 1,
            b'}' => self.cursor.charsets.gr = 2,
            b'|' => self.cursor.charsets.gr = 3,
            b'V' => {
                // SPA - Start of Protected Area
                self.cursor.style.set(Attrs::PROTECTED);
            }
            b'W' => {
                // EPA - End of Protected Area
                self.cursor.style.clear(Attrs::PROTECTED);
            }
            b'l' | b'm' => {
                // HP memory lock/unlock, not supported
            }
            _ => {
                debug!("unhandled ESC {:?}", byte as char);
            }
        }
    }

    /// Dispatch a VT52 escape
    pub(super) fn vt52(&mut self, byte: u8) {
        match byte {
            b'<' => {
                // Enter ANSI mode at VT100 level
                self.modes.ansi = true;
                self.modes.conformance_level = 1;
            }
            b'A' => self.cursor_up(1),
            b'B' => self.cursor_down(1),
            b'C' => self.cursor_right(1),
            b'D' => self.cursor_left(1),
            b'H' => self.move_to(0, 0),
            b'I' => self.reverse_index(),
            b'=' => self.modes.keypad_application = true,
            b'>' => self.modes.keypad_application = false,
            b'F' => {
                // Graphics mode: line drawing in G1
                self.cursor.charsets.gl = 1;
            }
            b'G' => self.cursor.charsets.gl = 0,
            b'K' => {
                let (row, col) = (self.cursor.row, self.cursor.col.min(self.width() - 1));
                self.screen_mut().erase_line(row, col, EraseMode::ToEnd, false);
            }
            b'J' => {
                let (row, col) = (self.cursor.row, self.cursor.col.min(self.width() - 1));
                self.screen_mut().erase_display(row, col, EraseMode::ToEnd, false);
            }
            b'Z' => {
                // Identify
                self.output.extend_from_slice(b"\x1b/Z");
            }
            _ => {
                debug!("unhandled VT52 ESC {:?}", byte as char);
            }
        }
    }

    /// SCS: designate a character set into G0-G3
    pub(super) fn designate(&mut self, slot: u8, size96: bool, designator: u8) {
        if self.modes.conformance_level < 2 && slot > 1 {
            debug!("G{slot} designation refused at level 1");
            return;
        }
        match Charset::from_designator(designator, size96) {
            Some(charset) => self.cursor.charsets.designate(usize::from(slot), charset, designator),
            None => debug!("unsupported charset {:?} for G{slot}", designator as char),
        }
    }

    /// `ESC % final`
    pub(super) fn select_encoding(&mut self, byte: u8) {
        match byte {
            b'@' => self.modes.encoding = Encoding::Latin1,
            b'G' => self.modes.encoding = Encoding::Utf8,
            _ => debug!("unsupported encoding {:?}", byte as char),
        }
    }

    /// `ESC # final`
    pub(super) fn line_attribute(&mut self, byte: u8) {
        let row = self.cursor.row;
        match byte {
            b'3' => self.screen_mut().set_line_size(row, LineSize::DoubleHeightTop),
            b'4' => self.screen_mut().set_line_size(row, LineSize::DoubleHeightBottom),
            b'5' => self.screen_mut().set_line_size(row, LineSize::Single),
            b'6' => self.screen_mut().set_line_size(row, LineSize::DoubleWidth),
            b'8' => {
                // DECALN - Screen Alignment Pattern
                self.screen_mut().fill_with_e();
            }
            _ => debug!("unhandled ESC # {:?}", byte as char),
        }
    }

    /// `ESC SP final`: C1 transmission and ANSI conformance levels
    pub(super) fn control_transmission(&mut self, byte: u8) {
        match byte {
            b'F' => {
                // S7C1T
                self.modes.c1_8bit = false;
            }
            b'G' => {
                // S8C1T
                if self.modes.conformance_level >= 2 {
                    self.modes.c1_8bit = true;
                }
            }
            b'L' | b'M' | b'N' => {
                if byte == b'N' {
                    self.cursor.charsets.designate(0, Charset::Us, b'B');
                    self.cursor.charsets.gl = 0;
                }
                self.cursor.charsets.designate(1, Charset::Latin1, b'A');
                self.cursor.charsets.gr = 1;
            }
            _ => debug!("unhandled ESC SP {:?}", byte as char),
        }
    }
}
