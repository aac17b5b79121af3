//! Character set handling
//!
//! Four designation slots (G0-G3) are each bound to a 94- or 96-character
//! set. GL and GR select which slot maps the 7-bit and 8-bit printable
//! ranges; a single shift (SS2/SS3) overrides the mapping for one character.

use serde::{Deserialize, Serialize};

/// A graphic character set that can be designated into G0-G3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Charset {
    /// US ASCII
    #[default]
    Us,
    Uk,
    Dutch,
    Finnish,
    French,
    FrenchCanadian,
    German,
    Italian,
    /// Danish and Norwegian
    Danish,
    Spanish,
    Swedish,
    Swiss,
    /// DEC special graphics (line drawing)
    DecLineDrawing,
    /// 96-character Latin-1 supplemental set
    Latin1,
}

/// Replacements applied to the US set at 0x23, 0x40, 0x5B-0x60, 0x7B-0x7E.
/// A space keeps the US character.
type Replacements = [char; 12];

const NRC_POSITIONS: [u8; 12] = [0x23, 0x40, 0x5B, 0x5C, 0x5D, 0x5E, 0x5F, 0x60, 0x7B, 0x7C, 0x7D, 0x7E];

const UK: Replacements = ['£', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' '];
const DUTCH: Replacements = ['£', '¾', 'ĳ', '½', '|', ' ', ' ', ' ', '¨', 'ƒ', '¼', '´'];
const FINNISH: Replacements = [' ', ' ', 'Ä', 'Ö', 'Å', 'Ü', ' ', 'é', 'ä', 'ö', 'å', 'ü'];
const FRENCH: Replacements = ['£', 'à', '°', 'ç', '§', ' ', ' ', ' ', 'é', 'ù', 'è', '¨'];
const FRENCH_CANADIAN: Replacements = [' ', 'à', 'â', 'ç', 'ê', 'î', ' ', 'ô', 'é', 'ù', 'è', 'û'];
const GERMAN: Replacements = [' ', '§', 'Ä', 'Ö', 'Ü', ' ', ' ', ' ', 'ä', 'ö', 'ü', 'ß'];
const ITALIAN: Replacements = ['£', '§', '°', 'ç', 'é', ' ', ' ', 'ù', 'à', 'ò', 'è', 'ì'];
const DANISH: Replacements = [' ', 'Ä', 'Æ', 'Ø', 'Å', 'Ü', ' ', 'ä', 'æ', 'ø', 'å', 'ü'];
const SPANISH: Replacements = ['£', '§', '¡', 'Ñ', '¿', ' ', ' ', ' ', '°', 'ñ', 'ç', ' '];
const SWEDISH: Replacements = [' ', 'É', 'Ä', 'Ö', 'Å', 'Ü', ' ', 'é', 'ä', 'ö', 'å', 'ü'];
const SWISS: Replacements = ['ù', 'à', 'é', 'ç', 'ê', 'î', 'è', 'ô', 'ä', 'ö', 'ü', 'û'];

/// DEC special graphics for 0x5F-0x7E
const LINE_DRAWING: [char; 32] = [
    ' ', '◆', '▒', '␉', '␌', '␍', '␊', '°', '±', '␤', '␋', '┘', '┐', '┌', '└', '┼', '⎺', '⎻', '─', '⎼', '⎽', '├', '┤', '┴',
    '┬', '│', '≤', '≥', 'π', '≠', '£', '·',
];

impl Charset {
    /// Resolve a designator final byte for a 94- or 96-character slot
    pub fn from_designator(designator: u8, size96: bool) -> Option<Charset> {
        if size96 {
            return match designator {
                b'A' => Some(Charset::Latin1),
                _ => None,
            };
        }
        match designator {
            b'B' | b'1' => Some(Charset::Us),
            b'A' => Some(Charset::Uk),
            b'4' => Some(Charset::Dutch),
            b'C' | b'5' => Some(Charset::Finnish),
            b'R' => Some(Charset::French),
            b'Q' => Some(Charset::FrenchCanadian),
            b'K' => Some(Charset::German),
            b'Y' => Some(Charset::Italian),
            b'E' | b'6' => Some(Charset::Danish),
            b'Z' => Some(Charset::Spanish),
            b'H' | b'7' => Some(Charset::Swedish),
            b'=' => Some(Charset::Swiss),
            b'0' | b'2' => Some(Charset::DecLineDrawing),
            _ => None,
        }
    }

    fn replacements(self) -> Option<&'static Replacements> {
        match self {
            Charset::Uk => Some(&UK),
            Charset::Dutch => Some(&DUTCH),
            Charset::Finnish => Some(&FINNISH),
            Charset::French => Some(&FRENCH),
            Charset::FrenchCanadian => Some(&FRENCH_CANADIAN),
            Charset::German => Some(&GERMAN),
            Charset::Italian => Some(&ITALIAN),
            Charset::Danish => Some(&DANISH),
            Charset::Spanish => Some(&SPANISH),
            Charset::Swedish => Some(&SWEDISH),
            Charset::Swiss => Some(&SWISS),
            _ => None,
        }
    }

    /// Map a 7-bit printable byte (0x20-0x7F) through this set
    pub fn map(self, byte: u8) -> char {
        let byte = byte & 0x7F;
        match self {
            Charset::Us => byte as char,
            Charset::Latin1 => char::from(byte | 0x80),
            Charset::DecLineDrawing => {
                if (0x5F..=0x7E).contains(&byte) {
                    LINE_DRAWING[(byte - 0x5F) as usize]
                } else {
                    byte as char
                }
            },
            nrc => {
                let replaced = nrc.replacements().and_then(|table| {
                    NRC_POSITIONS
                        .iter()
                        .position(|&p| p == byte)
                        .map(|i| table[i])
                        .filter(|&c| c != ' ')
                });
                replaced.unwrap_or(byte as char)
            },
        }
    }
}

/// G0-G3 designations plus GL/GR invocation and single-shift state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharsetState {
    pub slots: [Charset; 4],
    /// Designator bytes, kept for DECCIR reports
    pub designators: [u8; 4],
    /// Slot invoked into GL (0-3)
    pub gl: u8,
    /// Slot invoked into GR (1-3)
    pub gr: u8,
    /// Pending SS2/SS3 (2 or 3), 0 when none
    pub single_shift: u8,
}

impl Default for CharsetState {
    fn default() -> Self {
        Self {
            slots: [Charset::Us, Charset::DecLineDrawing, Charset::Us, Charset::DecLineDrawing],
            designators: [b'B', b'0', b'B', b'0'],
            gl: 0,
            gr: 2,
            single_shift: 0,
        }
    }
}

impl CharsetState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn designate(&mut self, slot: usize, charset: Charset, designator: u8) {
        if let Some(s) = self.slots.get_mut(slot) {
            *s = charset;
            self.designators[slot] = designator;
        }
    }

    /// Translate a GL byte, consuming any pending single shift
    pub fn translate_gl(&mut self, byte: u8) -> char {
        let slot = self.take_slot(self.gl);
        self.slots[slot].map(byte)
    }

    /// Translate a GR byte (0xA0-0xFF), consuming any pending single shift
    pub fn translate_gr(&mut self, byte: u8) -> char {
        let slot = self.take_slot(self.gr);
        self.slots[slot].map(byte & 0x7F)
    }

    fn take_slot(&mut self, invoked: u8) -> usize {
        let slot = if self.single_shift != 0 {
            self.single_shift
        } else {
            invoked
        };
        self.single_shift = 0;
        (slot & 3) as usize
    }
}
